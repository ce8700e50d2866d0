use extract::{EntityType, RelationshipType};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::assemble::KnowledgeGraph;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphSummary {
    pub total_entities: usize,
    pub companies: usize,
    pub risk_factors: usize,
    pub amounts: usize,
    pub total_relationships: usize,
    pub relationships_by_type: BTreeMap<String, usize>,
}

impl GraphSummary {
    pub fn of(graph: &KnowledgeGraph) -> Self {
        let mut relationships_by_type = BTreeMap::new();
        for (_, edge, _) in graph.edges() {
            *relationships_by_type
                .entry(edge.relationship_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        Self {
            total_entities: graph.node_count(),
            companies: graph.nodes_of_type(EntityType::Company).count(),
            risk_factors: graph.nodes_of_type(EntityType::RiskFactor).count(),
            amounts: graph.nodes_of_type(EntityType::Amount).count(),
            total_relationships: graph.edge_count(),
            relationships_by_type,
        }
    }

    pub fn relationships_of(&self, relationship_type: RelationshipType) -> usize {
        self.relationships_by_type
            .get(relationship_type.as_str())
            .copied()
            .unwrap_or(0)
    }
}

/// `Source --[TYPE]--> Target` lines using entity names
pub fn describe_edges(graph: &KnowledgeGraph) -> Vec<String> {
    graph
        .edges()
        .map(|(source, edge, target)| {
            format!("{} --[{}]--> {}", source.name, edge.relationship_type, target.name)
        })
        .collect()
}

/// `Name (Type)` lines for entities
pub fn describe_nodes(graph: &KnowledgeGraph) -> Vec<String> {
    graph
        .nodes()
        .map(|node| format!("{} ({})", node.name, node.entity_type))
        .collect()
}
