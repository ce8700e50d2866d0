use anyhow::{Context, Result};
use extract::EntityType;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::assemble::KnowledgeGraph;
use crate::layout::{LayoutConfig, spring_layout};

const LABEL_CHARS: usize = 20;
const EDGE_GREY: RGBColor = RGBColor(128, 128, 128);

#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub node_radius: i32,
    pub layout: LayoutConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
            node_radius: 22,
            layout: LayoutConfig::default(),
        }
    }
}

pub fn type_rgb(entity_type: EntityType) -> RGBColor {
    match entity_type {
        EntityType::Company => RGBColor(0x4A, 0x90, 0xE2),
        EntityType::RiskFactor => RGBColor(0xE2, 0x4A, 0x4A),
        EntityType::Amount => RGBColor(0x4A, 0xE2, 0x4A),
    }
}

/// Draw the graph as a PNG: spring layout, nodes coloured by entity type,
/// edges labelled with the relationship type.
pub fn render_png(graph: &KnowledgeGraph, path: &Path, config: &PlotConfig) -> Result<()> {
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Financial Knowledge Graph (Blue=Company, Red=Risk, Green=Amount)",
            ("sans-serif", 30),
        )
        .margin(20)
        .build_cartesian_2d(-1.25f64..1.25f64, -1.25f64..1.25f64)?;

    let positions = spring_layout(graph, &config.layout);
    let centered = |size: f64| {
        ("sans-serif", size)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center))
    };

    // Parallel edges get their labels nudged apart
    let mut pair_seen: HashMap<(usize, usize), usize> = HashMap::new();

    for edge in graph.inner().edge_indices() {
        let Some((s, t)) = graph.inner().edge_endpoints(edge) else {
            continue;
        };
        let (from, to) = (positions[s.index()], positions[t.index()]);
        let label = graph.inner()[edge].relationship_type.as_str();

        let nth = pair_seen.entry((s.index(), t.index())).or_insert(0);
        let nudge = *nth as f64 * 0.05;
        *nth += 1;

        if s == t {
            let loop_center = (from.0, from.1 + 0.07);
            chart.draw_series(std::iter::once(Circle::new(loop_center, 14, EDGE_GREY.stroke_width(2))))?;
            chart.draw_series(std::iter::once(Text::new(
                label,
                (from.0, from.1 + 0.13 + nudge),
                centered(13.0),
            )))?;
            continue;
        }

        chart.draw_series(std::iter::once(PathElement::new(
            vec![from, to],
            EDGE_GREY.mix(0.6).stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(Polygon::new(
            arrow_head(from, to),
            EDGE_GREY.mix(0.9).filled(),
        )))?;

        let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0 + nudge);
        chart.draw_series(std::iter::once(Text::new(label, mid, centered(13.0))))?;
    }

    chart.draw_series(graph.nodes().zip(&positions).map(|(node, &p)| {
        Circle::new(p, config.node_radius, type_rgb(node.entity_type).mix(0.8).filled())
    }))?;

    chart.draw_series(graph.nodes().zip(&positions).map(|(node, &p)| {
        Text::new(truncate_label(&node.name), p, centered(15.0))
    }))?;

    root.present()
        .context(format!("Failed to write visualization to {:?}", path))?;
    info!(path = %path.display(), nodes = graph.node_count(), edges = graph.edge_count(), "Saved visualization");
    Ok(())
}

/// Triangle pointing at `to`, pulled back so it sits on the node's rim
fn arrow_head(from: (f64, f64), to: (f64, f64)) -> Vec<(f64, f64)> {
    const BACKOFF: f64 = 0.07;
    const LENGTH: f64 = 0.05;
    const HALF_WIDTH: f64 = 0.02;

    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt().max(1e-9);
    let (ux, uy) = (dx / len, dy / len);

    let tip = (to.0 - ux * BACKOFF, to.1 - uy * BACKOFF);
    let base = (tip.0 - ux * LENGTH, tip.1 - uy * LENGTH);
    vec![
        tip,
        (base.0 - uy * HALF_WIDTH, base.1 + ux * HALF_WIDTH),
        (base.0 + uy * HALF_WIDTH, base.1 - ux * HALF_WIDTH),
    ]
}

fn truncate_label(name: &str) -> String {
    name.chars().take(LABEL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Reliance Industries Limited"), "Reliance Industries ");
        assert_eq!(truncate_label("Jio"), "Jio");
        assert_eq!(truncate_label("₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹₹").chars().count(), 20);
    }

    #[test]
    fn test_arrow_head_points_at_target() {
        let head = arrow_head((0.0, 0.0), (1.0, 0.0));
        let tip = head[0];
        assert!((tip.0 - 0.93).abs() < 1e-9);
        assert!(tip.1.abs() < 1e-9);
        // base corners straddle the edge line
        assert!(head[1].1 > 0.0 && head[2].1 < 0.0);
    }

    #[test]
    fn test_type_colours_distinct() {
        let colours: Vec<_> = EntityType::ALL.iter().map(|t| type_rgb(*t)).collect();
        assert_ne!(colours[0], colours[1]);
        assert_ne!(colours[1], colours[2]);
    }
}
