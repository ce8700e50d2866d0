use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::schema::{Document, Entity, EntityType, Metadata, Relationship, RelationshipType};

const ROOT: &str = "$";

/// Check a parsed JSON value against the knowledge graph schema.
///
/// Fails fast: the error names the first rule broken, in this order: top-level
/// shape, then each entity (fields, type, id), then each relationship (fields,
/// type, endpoint resolution).
pub fn validate(raw: &Value) -> Result<Document, ValidationError> {
    let root = as_object(raw, ROOT)?;
    let raw_entities = required_array(root, ROOT, "entities")?;
    let raw_relationships = required_array(root, ROOT, "relationships")?;

    let mut entities = Vec::with_capacity(raw_entities.len());
    let mut seen_ids = HashSet::with_capacity(raw_entities.len());

    for (i, raw_entity) in raw_entities.iter().enumerate() {
        let path = format!("entities[{}]", i);
        let entity = parse_entity(raw_entity, &path)?;

        if !seen_ids.insert(entity.id.clone()) {
            return Err(ValidationError::DuplicateId {
                path: join(&path, "id"),
                id: entity.id,
            });
        }
        entities.push(entity);
    }

    let mut relationships = Vec::with_capacity(raw_relationships.len());
    for (i, raw_rel) in raw_relationships.iter().enumerate() {
        let path = format!("relationships[{}]", i);
        let rel = parse_relationship(raw_rel, &path)?;

        for (field, id) in [("source", &rel.source), ("target", &rel.target)] {
            if !seen_ids.contains(id) {
                return Err(ValidationError::UnknownEntity {
                    path: join(&path, field),
                    id: id.clone(),
                });
            }
        }
        relationships.push(rel);
    }

    Ok(Document::new_unchecked(entities, relationships))
}

impl Document {
    /// Parse JSON text and validate it
    pub fn from_json_str(text: &str) -> Result<Document, ValidationError> {
        let value: Value = serde_json::from_str(text).map_err(|e| ValidationError::InvalidJson {
            path: ROOT.to_string(),
            message: e.to_string(),
        })?;
        validate(&value)
    }
}

fn parse_entity(raw: &Value, path: &str) -> Result<Entity, ValidationError> {
    let obj = as_object(raw, path)?;

    let id = required_str(obj, path, "id")?;
    let type_name = required_str(obj, path, "type")?;
    let name = required_str(obj, path, "name")?;
    let value = optional_value(obj, path)?;
    let metadata = optional_metadata(obj, path)?;

    let entity_type = type_name
        .parse::<EntityType>()
        .map_err(|_| ValidationError::UnknownEntityType {
            path: join(path, "type"),
            value: type_name.to_string(),
        })?;

    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId { path: join(path, "id") });
    }

    Ok(Entity {
        id: id.to_string(),
        entity_type,
        name: name.to_string(),
        value,
        metadata,
    })
}

fn parse_relationship(raw: &Value, path: &str) -> Result<Relationship, ValidationError> {
    let obj = as_object(raw, path)?;

    let source = required_str(obj, path, "source")?;
    let target = required_str(obj, path, "target")?;
    let type_name = required_str(obj, path, "type")?;
    let metadata = optional_metadata(obj, path)?;

    let relationship_type = type_name
        .parse::<RelationshipType>()
        .map_err(|_| ValidationError::UnknownRelationshipType {
            path: join(path, "type"),
            value: type_name.to_string(),
        })?;

    Ok(Relationship {
        source: source.to_string(),
        target: target.to_string(),
        relationship_type,
        metadata,
    })
}

fn join(parent: &str, key: &str) -> String {
    if parent == ROOT {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::NotAnObject {
        path: path.to_string(),
    })
}

fn required<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value, ValidationError> {
    obj.get(key).ok_or_else(|| ValidationError::MissingField {
        path: join(parent, key),
    })
}

fn required_array<'a>(
    obj: &'a Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'a Vec<Value>, ValidationError> {
    required(obj, parent, key)?
        .as_array()
        .ok_or_else(|| ValidationError::WrongType {
            path: join(parent, key),
            expected: "an array",
        })
}

fn required_str<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a str, ValidationError> {
    required(obj, parent, key)?
        .as_str()
        .ok_or_else(|| ValidationError::WrongType {
            path: join(parent, key),
            expected: "a string",
        })
}

/// `value` may be a string, a number (kept as its decimal text), null or absent
fn optional_value(obj: &Map<String, Value>, parent: &str) -> Result<Option<String>, ValidationError> {
    match obj.get("value") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(ValidationError::WrongType {
            path: join(parent, "value"),
            expected: "a string, number or null",
        }),
    }
}

fn optional_metadata(obj: &Map<String, Value>, parent: &str) -> Result<Metadata, ValidationError> {
    let path = join(parent, "metadata");
    let map = match obj.get("metadata") {
        None | Some(Value::Null) => return Ok(Metadata::new()),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ValidationError::WrongType {
                path,
                expected: "an object",
            });
        }
    };

    let mut metadata = Metadata::new();
    for (key, value) in map {
        if value.is_array() || value.is_object() {
            return Err(ValidationError::WrongType {
                path: join(&path, key),
                expected: "a scalar (string, number, boolean or null)",
            });
        }
        metadata.insert(key.clone(), value.clone());
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "entities": [
                {"id": "c1", "type": "Company", "name": "Acme", "value": null, "metadata": {}},
                {"id": "a1", "type": "Amount", "name": "Revenue", "value": "$10M", "metadata": {"currency": "USD", "year": 2023}}
            ],
            "relationships": [
                {"source": "c1", "target": "a1", "type": "HAS", "metadata": {}}
            ]
        })
    }

    #[test]
    fn test_valid_document() {
        let doc = validate(&sample()).unwrap();
        assert_eq!(doc.entities().len(), 2);
        assert_eq!(doc.relationships().len(), 1);

        let amount = doc.entity("a1").unwrap();
        assert_eq!(amount.entity_type, EntityType::Amount);
        assert_eq!(amount.value.as_deref(), Some("$10M"));
        assert_eq!(amount.metadata.get("year"), Some(&json!(2023)));
        assert_eq!(doc.relationships()[0].relationship_type, RelationshipType::Has);
    }

    #[test]
    fn test_every_endpoint_resolves() {
        let doc = validate(&sample()).unwrap();
        for rel in doc.relationships() {
            assert!(doc.entity(&rel.source).is_some());
            assert!(doc.entity(&rel.target).is_some());
        }
    }

    #[test]
    fn test_missing_top_level_fields() {
        let err = validate(&json!({"entities": []})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { path: "relationships".into() });

        let err = validate(&json!({"relationships": []})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { path: "entities".into() });

        let err = validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.rule(), "not_an_object");
    }

    #[test]
    fn test_top_level_fields_must_be_arrays() {
        let err = validate(&json!({"entities": {}, "relationships": []})).unwrap_err();
        assert_eq!(err.rule(), "wrong_type");
        assert_eq!(err.path(), "entities");
    }

    #[test]
    fn test_unknown_entity_type_names_entity() {
        let mut raw = sample();
        raw["entities"][1]["type"] = json!("Person");

        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownEntityType {
                path: "entities[1].type".into(),
                value: "Person".into()
            }
        );
    }

    #[test]
    fn test_entity_type_is_case_sensitive() {
        let mut raw = sample();
        raw["entities"][0]["type"] = json!("company");
        assert_eq!(validate(&raw).unwrap_err().rule(), "unknown_entity_type");
    }

    #[test]
    fn test_missing_and_mistyped_entity_fields() {
        let mut raw = sample();
        raw["entities"][0].as_object_mut().unwrap().remove("name");
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::MissingField { path: "entities[0].name".into() }
        );

        let mut raw = sample();
        raw["entities"][0]["id"] = json!(7);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.rule(), "wrong_type");
        assert_eq!(err.path(), "entities[0].id");

        let mut raw = sample();
        raw["entities"][1] = json!("c2");
        assert_eq!(validate(&raw).unwrap_err().path(), "entities[1]");
    }

    #[test]
    fn test_empty_and_duplicate_ids() {
        let mut raw = sample();
        raw["entities"][0]["id"] = json!("  ");
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::EmptyId { path: "entities[0].id".into() }
        );

        let mut raw = sample();
        raw["entities"][1]["id"] = json!("c1");
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::DuplicateId {
                path: "entities[1].id".into(),
                id: "c1".into()
            }
        );
    }

    #[test]
    fn test_dangling_reference_names_relationship() {
        let mut raw = sample();
        raw["relationships"][0]["target"] = json!("ghost");

        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::UnknownEntity {
                path: "relationships[0].target".into(),
                id: "ghost".into()
            }
        );
    }

    #[test]
    fn test_unknown_relationship_type() {
        let mut raw = sample();
        raw["relationships"][0]["type"] = json!("ACQUIRED");
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.rule(), "unknown_relationship_type");
        assert_eq!(err.path(), "relationships[0].type");
    }

    #[test]
    fn test_relationship_type_checked_before_endpoints() {
        let mut raw = sample();
        raw["relationships"][0]["type"] = json!("ACQUIRED");
        raw["relationships"][0]["source"] = json!("ghost");
        assert_eq!(validate(&raw).unwrap_err().rule(), "unknown_relationship_type");
    }

    #[test]
    fn test_optional_value_and_metadata() {
        let raw = json!({
            "entities": [
                {"id": "a1", "type": "Amount", "name": "Capex", "value": 2500000000u64},
                {"id": "r1", "type": "RiskFactor", "name": "Market volatility", "metadata": null}
            ],
            "relationships": []
        });
        let doc = validate(&raw).unwrap();
        assert_eq!(doc.entities()[0].value.as_deref(), Some("2500000000"));
        assert!(doc.entities()[0].metadata.is_empty());
        assert_eq!(doc.entities()[1].value, None);
    }

    #[test]
    fn test_rejects_nested_metadata() {
        let mut raw = sample();
        raw["entities"][1]["metadata"] = json!({"segments": ["retail", "digital"]});
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.rule(), "wrong_type");
        assert_eq!(err.path(), "entities[1].metadata.segments");

        let mut raw = sample();
        raw["entities"][1]["value"] = json!(true);
        assert_eq!(validate(&raw).unwrap_err().path(), "entities[1].value");
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let doc = validate(&sample()).unwrap();
        let text = doc.to_json_pretty().unwrap();
        let again = Document::from_json_str(&text).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        let err = Document::from_json_str("{not json").unwrap_err();
        assert_eq!(err.rule(), "invalid_json");
        assert_eq!(err.path(), "$");
    }

    #[test]
    fn test_empty_document_is_valid() {
        let doc = validate(&json!({"entities": [], "relationships": []})).unwrap();
        assert!(doc.entities().is_empty());
        assert!(doc.relationships().is_empty());
    }
}
