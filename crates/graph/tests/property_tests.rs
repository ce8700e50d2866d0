//! Property-based tests for graph assembly and rendering.
//!
//! For any validated document:
//! - one node per entity, one edge per relationship, parallel edges included
//! - the summary and the Mermaid source account for every edge
//! - the spring layout is deterministic and stays inside the unit square

use extract::{Document, EntityType, RelationshipType, validate};
use graph::{GraphSummary, LayoutConfig, assemble, render_mermaid, spring_layout};
use proptest::prelude::*;
use proptest::sample::select;
use serde_json::json;
use std::collections::HashMap;

fn arb_document() -> impl Strategy<Value = Document> {
    (1usize..10)
        .prop_flat_map(|n| {
            let entities = prop::collection::vec(
                (
                    select(EntityType::ALL.to_vec()),
                    "[A-Za-z][A-Za-z &<>\"#]{0,16}",
                    prop::option::of(any::<u32>()),
                ),
                n,
            );
            // Few nodes, many edges: repeated pairs are the norm
            let relationships = prop::collection::vec(
                (0..n, 0..n, select(RelationshipType::ALL.to_vec()), any::<u16>()),
                0..20,
            );
            (entities, relationships)
        })
        .prop_map(|(entities, relationships)| {
            let entities: Vec<_> = entities
                .into_iter()
                .enumerate()
                .map(|(i, (entity_type, name, value))| {
                    json!({
                        "id": format!("n{}", i),
                        "type": entity_type.as_str(),
                        "name": name,
                        "value": value,
                        "metadata": {"page": i}
                    })
                })
                .collect();
            let relationships: Vec<_> = relationships
                .into_iter()
                .map(|(s, t, relationship_type, year)| {
                    json!({
                        "source": format!("n{}", s),
                        "target": format!("n{}", t),
                        "type": relationship_type.as_str(),
                        "metadata": {"year": year}
                    })
                })
                .collect();
            validate(&json!({"entities": entities, "relationships": relationships}))
                .expect("generated document is well formed")
        })
}

type EdgeKey = (String, String, RelationshipType);

fn multiplicities(keys: impl Iterator<Item = EdgeKey>) -> HashMap<EdgeKey, usize> {
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn counts_match_document(doc in arb_document()) {
        let kg = assemble(&doc);
        prop_assert_eq!(kg.node_count(), doc.entities().len());
        prop_assert_eq!(kg.edge_count(), doc.relationships().len());

        for (node, entity) in kg.nodes().zip(doc.entities()) {
            prop_assert_eq!(&node.id, &entity.id);
            prop_assert_eq!(node.entity_type, entity.entity_type);
        }
    }

    #[test]
    fn parallel_edges_keep_their_multiplicity(doc in arb_document()) {
        let kg = assemble(&doc);
        let expected = multiplicities(
            doc.relationships()
                .iter()
                .map(|r| (r.source.clone(), r.target.clone(), r.relationship_type)),
        );
        let actual = multiplicities(
            kg.edges().map(|(s, e, t)| (s.id.clone(), t.id.clone(), e.relationship_type)),
        );
        prop_assert_eq!(actual, expected);

        // Edge order and metadata follow the document
        for ((_, edge, _), rel) in kg.edges().zip(doc.relationships()) {
            prop_assert_eq!(&edge.metadata, &rel.metadata);
        }
    }

    #[test]
    fn summary_accounts_for_everything(doc in arb_document()) {
        let summary = GraphSummary::of(&assemble(&doc));
        prop_assert_eq!(summary.total_entities, doc.entities().len());
        prop_assert_eq!(
            summary.companies + summary.risk_factors + summary.amounts,
            summary.total_entities
        );
        prop_assert_eq!(summary.relationships_by_type.values().sum::<usize>(), summary.total_relationships);
        for t in RelationshipType::ALL {
            let n = doc.relationships().iter().filter(|r| r.relationship_type == t).count();
            prop_assert_eq!(summary.relationships_of(t), n);
        }
    }

    #[test]
    fn mermaid_has_a_line_per_node_and_edge(doc in arb_document()) {
        let src = render_mermaid(&assemble(&doc));
        let lines: Vec<&str> = src.lines().collect();
        prop_assert_eq!(lines[0], "graph TD");
        prop_assert_eq!(lines.iter().filter(|l| l.contains(" -->|")).count(), doc.relationships().len());
        prop_assert_eq!(lines.iter().filter(|l| l.trim_start().starts_with("style ")).count(), doc.entities().len());
        // Names are escaped, so no raw quote can end a label early
        prop_assert!(lines.iter().skip(1).all(|l| l.matches('"').count() % 2 == 0));
        prop_assert!(!src.contains('<'));
    }

    #[test]
    fn layout_is_deterministic_and_bounded(doc in arb_document(), seed in any::<u64>()) {
        let kg = assemble(&doc);
        let config = LayoutConfig { seed, iterations: 20, ..LayoutConfig::default() };
        let first = spring_layout(&kg, &config);
        let second = spring_layout(&kg, &config);

        prop_assert_eq!(first.len(), kg.node_count());
        prop_assert_eq!(&first, &second);
        for (x, y) in first {
            prop_assert!(x.is_finite() && y.is_finite());
            prop_assert!((-1.0..=1.0).contains(&x) && (-1.0..=1.0).contains(&y), "({}, {})", x, y);
        }
    }
}
