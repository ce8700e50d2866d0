use extract::{Document, EntityType, Metadata, RelationshipType};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    pub id: String,
    pub entity_type: EntityType,
    pub name: String,
    pub value: Option<String>,
}

impl EntityNode {
    /// Name, with the value on a second line when present
    pub fn label(&self) -> String {
        match &self.value {
            Some(value) => format!("{}\n({})", self.name, value),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationEdge {
    pub relationship_type: RelationshipType,
    pub metadata: Metadata,
}

/// Directed multigraph: one node per entity, one edge per relationship.
/// Parallel edges between the same pair of nodes are kept.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<EntityNode, RelationEdge>,
    id_to_idx: HashMap<String, NodeIndex>,
}

/// Build the graph for a validated document.
///
/// Entity ids are unique and every relationship endpoint resolves, which
/// `Document` guarantees, so node lookups here cannot miss.
pub fn assemble(document: &Document) -> KnowledgeGraph {
    let mut kg = KnowledgeGraph {
        graph: DiGraph::with_capacity(document.entities().len(), document.relationships().len()),
        id_to_idx: HashMap::with_capacity(document.entities().len()),
    };

    for entity in document.entities() {
        let idx = kg.graph.add_node(EntityNode {
            id: entity.id.clone(),
            entity_type: entity.entity_type,
            name: entity.name.clone(),
            value: entity.value.clone(),
        });
        kg.id_to_idx.insert(entity.id.clone(), idx);
    }

    for rel in document.relationships() {
        let source = kg.id_to_idx[&rel.source];
        let target = kg.id_to_idx[&rel.target];
        kg.graph.add_edge(
            source,
            target,
            RelationEdge {
                relationship_type: rel.relationship_type,
                metadata: rel.metadata.clone(),
            },
        );
    }

    kg
}

impl KnowledgeGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, id: &str) -> Option<&EntityNode> {
        self.id_to_idx.get(id).map(|&idx| &self.graph[idx])
    }

    /// Nodes in document order
    pub fn nodes(&self) -> impl Iterator<Item = &EntityNode> {
        self.graph.node_weights()
    }

    pub fn nodes_of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &EntityNode> {
        self.nodes().filter(move |n| n.entity_type == entity_type)
    }

    /// Edges in document order as (source node, edge, target node)
    pub fn edges(&self) -> impl Iterator<Item = (&EntityNode, &RelationEdge, &EntityNode)> {
        self.graph.edge_references().map(|e| {
            (&self.graph[e.source()], e.weight(), &self.graph[e.target()])
        })
    }

    /// Underlying petgraph structure, for layout and algorithms
    pub fn inner(&self) -> &DiGraph<EntityNode, RelationEdge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::validate;
    use serde_json::json;

    fn acme() -> Document {
        validate(&json!({
            "entities": [
                {"id": "c1", "type": "Company", "name": "Acme", "value": null, "metadata": {}},
                {"id": "a1", "type": "Amount", "name": "Revenue", "value": "$10M", "metadata": {}}
            ],
            "relationships": [
                {"source": "c1", "target": "a1", "type": "HAS", "metadata": {}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_assembles_single_edge() {
        let kg = assemble(&acme());

        assert_eq!(kg.node_count(), 2);
        assert_eq!(kg.edge_count(), 1);
        assert_eq!(kg.nodes_of_type(EntityType::Company).count(), 1);
        assert_eq!(kg.nodes_of_type(EntityType::Amount).count(), 1);
        assert_eq!(kg.nodes_of_type(EntityType::RiskFactor).count(), 0);

        let (source, edge, target) = kg.edges().next().unwrap();
        assert_eq!(source.id, "c1");
        assert_eq!(target.id, "a1");
        assert_eq!(edge.relationship_type, RelationshipType::Has);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let doc = validate(&json!({
            "entities": [
                {"id": "jio", "type": "Company", "name": "Jio"},
                {"id": "google", "type": "Company", "name": "Google"}
            ],
            "relationships": [
                {"source": "jio", "target": "google", "type": "PARTNERS_WITH", "metadata": {"year": 2020}},
                {"source": "jio", "target": "google", "type": "PARTNERS_WITH", "metadata": {"year": 2023}},
                {"source": "google", "target": "jio", "type": "OWNS"}
            ]
        }))
        .unwrap();

        let kg = assemble(&doc);
        assert_eq!(kg.node_count(), 2);
        assert_eq!(kg.edge_count(), 3);

        let from_jio: Vec<_> = kg.edges().filter(|(s, _, _)| s.id == "jio").collect();
        assert_eq!(from_jio.len(), 2);
        assert_eq!(from_jio[0].1.metadata.get("year"), Some(&json!(2020)));
        assert_eq!(from_jio[1].1.metadata.get("year"), Some(&json!(2023)));
        assert!(from_jio.iter().all(|(_, _, t)| t.id == "google"));
    }

    #[test]
    fn test_counts_match_document_and_edges_resolve() {
        let doc = acme();
        let kg = assemble(&doc);
        assert_eq!(kg.node_count(), doc.entities().len());
        assert_eq!(kg.edge_count(), doc.relationships().len());

        for (source, _, target) in kg.edges() {
            assert!(kg.node(&source.id).is_some());
            assert!(kg.node(&target.id).is_some());
        }
    }

    #[test]
    fn test_node_label_and_lookup() {
        let kg = assemble(&acme());
        assert_eq!(kg.node("a1").unwrap().label(), "Revenue\n($10M)");
        assert_eq!(kg.node("c1").unwrap().label(), "Acme");
        assert!(kg.node("ghost").is_none());
    }

    #[test]
    fn test_empty_document() {
        let doc = validate(&json!({"entities": [], "relationships": []})).unwrap();
        let kg = assemble(&doc);
        assert!(kg.is_empty());
        assert_eq!(kg.edge_count(), 0);
    }
}
