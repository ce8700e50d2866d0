use anyhow::{Context, Result};
use extract::EntityType;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::assemble::KnowledgeGraph;

/// Words the flowchart grammar reads as statements when they appear as a node id
const RESERVED_IDS: [&str; 17] = [
    "graph", "flowchart", "subgraph", "end", "direction", "style", "linkStyle", "classDef",
    "class", "click", "call", "href", "default", "interpolate", "accTitle", "accDescr", "_self",
];

pub fn type_color(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Company => "#4A90E2",
        EntityType::RiskFactor => "#E24A4A",
        EntityType::Amount => "#4AE24A",
    }
}

/// Mermaid `graph TD` source for the knowledge graph
pub fn render_mermaid(graph: &KnowledgeGraph) -> String {
    let mut lines = vec!["graph TD".to_string()];

    // Graph node indices follow document order, so ids line up with nodes()
    let ids = mermaid_ids(graph.nodes().map(|n| n.id.as_str()));

    for (node, mid) in graph.nodes().zip(&ids) {
        lines.push(format!("    {}[\"{}\"]", mid, escape_label(&node.name)));
        lines.push(format!(
            "    style {} fill:{},stroke:#333,stroke-width:2px",
            mid,
            type_color(node.entity_type)
        ));
    }

    for edge in graph.inner().edge_indices() {
        let Some((source, target)) = graph.inner().edge_endpoints(edge) else {
            continue;
        };
        lines.push(format!(
            "    {} -->|{}| {}",
            ids[source.index()],
            graph.inner()[edge].relationship_type,
            ids[target.index()]
        ));
    }

    lines.join("\n")
}

/// Markdown document wrapping the Mermaid source with entity and relationship counts
pub fn render_markdown(graph: &KnowledgeGraph) -> String {
    format!(
        "# Financial Knowledge Graph (Mermaid)\n\n```mermaid\n{}\n```\n\n## Entities\n{} entities extracted\n\n## Relationships\n{} relationships extracted\n",
        render_mermaid(graph),
        graph.node_count(),
        graph.edge_count()
    )
}

pub async fn write_markdown(graph: &KnowledgeGraph, path: &Path) -> Result<()> {
    tokio::fs::write(path, render_markdown(graph))
        .await
        .context(format!("Failed to write Mermaid chart to {:?}", path))?;
    info!(path = %path.display(), "Saved Mermaid chart");
    Ok(())
}

/// Turn entity ids into unique Mermaid identifiers
fn mermaid_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    let mut out = Vec::new();

    for id in ids {
        let mut base: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if base.is_empty() || RESERVED_IDS.iter().any(|w| base.eq_ignore_ascii_case(w)) {
            base.push_str("_node");
        }

        let mut candidate = base.clone();
        let mut n = 2;
        while !used.insert(candidate.clone()) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        out.push(candidate);
    }

    out
}

/// Labels are HTML inside Mermaid, so markup characters go through entity codes
fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '#' => out.push_str("#35;"),
            '"' => out.push_str("#quot;"),
            '&' => out.push_str("#amp;"),
            '<' => out.push_str("#lt;"),
            '>' => out.push_str("#gt;"),
            '\n' => out.push_str("<br/>"),
            c => out.push(c),
        }
    }
    out
}
