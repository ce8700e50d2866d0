use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Scalar metadata attached to entities and relationships.
/// Key-ordered so that equality ignores the order the model emitted keys in.
pub type Metadata = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Company,
    RiskFactor,
    Amount,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Company, EntityType::RiskFactor, EntityType::Amount];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Company => "Company",
            EntityType::RiskFactor => "RiskFactor",
            EntityType::Amount => "Amount",
        }
    }
}

impl FromStr for EntityType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Company" => Ok(EntityType::Company),
            "RiskFactor" => Ok(EntityType::RiskFactor),
            "Amount" => Ok(EntityType::Amount),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "OWNS")]
    Owns,
    #[serde(rename = "HAS")]
    Has,
    #[serde(rename = "FACES")]
    Faces,
    #[serde(rename = "PARTNERS_WITH")]
    PartnersWith,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::Owns,
        RelationshipType::Has,
        RelationshipType::Faces,
        RelationshipType::PartnersWith,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Owns => "OWNS",
            RelationshipType::Has => "HAS",
            RelationshipType::Faces => "FACES",
            RelationshipType::PartnersWith => "PARTNERS_WITH",
        }
    }
}

impl FromStr for RelationshipType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNS" => Ok(RelationshipType::Owns),
            "HAS" => Ok(RelationshipType::Has),
            "FACES" => Ok(RelationshipType::Faces),
            "PARTNERS_WITH" => Ok(RelationshipType::PartnersWith),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    pub value: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub metadata: Metadata,
}

/// A knowledge graph document that has passed validation.
///
/// The fields are private: the only way to obtain a `Document` is through
/// [`crate::validator::validate`], so every value of this type satisfies the
/// id-uniqueness and reference-closure invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
}

impl Document {
    pub(crate) fn new_unchecked(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        Self { entities, relationships }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_wire_names() {
        for t in EntityType::ALL {
            assert_eq!(t.as_str().parse::<EntityType>(), Ok(t));
            assert_eq!(serde_json::to_value(t).unwrap(), json!(t.as_str()));
        }
        for t in RelationshipType::ALL {
            assert_eq!(t.as_str().parse::<RelationshipType>(), Ok(t));
            assert_eq!(serde_json::to_value(t).unwrap(), json!(t.as_str()));
        }
        assert!("company".parse::<EntityType>().is_err());
        assert!("owns".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_document_serializes_to_wire_shape() {
        let doc = Document::new_unchecked(
            vec![Entity {
                id: "c1".into(),
                entity_type: EntityType::Company,
                name: "Acme".into(),
                value: None,
                metadata: Metadata::new(),
            }],
            vec![],
        );

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "entities": [{"id": "c1", "type": "Company", "name": "Acme", "value": null, "metadata": {}}],
                "relationships": []
            })
        );
    }
}
