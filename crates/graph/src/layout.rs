use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assemble::KnowledgeGraph;

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Ideal edge length multiplier
    pub k: f64,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            k: 2.0,
            iterations: 50,
            seed: 42,
        }
    }
}

/// Fruchterman-Reingold spring layout.
///
/// Returns one position per node (indexed like the graph's nodes), scaled
/// into [-1, 1] on both axes. Same seed, same picture.
pub fn spring_layout(graph: &KnowledgeGraph, config: &LayoutConfig) -> Vec<(f64, f64)> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![(0.0, 0.0)],
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();

    let edges: Vec<(usize, usize)> = graph
        .inner()
        .edge_indices()
        .filter_map(|e| graph.inner().edge_endpoints(e))
        .map(|(s, t)| (s.index(), t.index()))
        .filter(|(s, t)| s != t)
        .collect();

    let k = config.k / (n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (config.iterations.max(1) as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut disp = vec![(0.0f64, 0.0f64); n];

        // Repulsion between every pair
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i].0 += fx;
                disp[i].1 += fy;
                disp[j].0 -= fx;
                disp[j].1 -= fy;
            }
        }

        // Attraction along edges, direction ignored
        for &(s, t) in &edges {
            let dx = pos[s].0 - pos[t].0;
            let dy = pos[s].1 - pos[t].1;
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[s].0 -= fx;
            disp[s].1 -= fy;
            disp[t].0 += fx;
            disp[t].1 += fy;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d.0 * d.0 + d.1 * d.1).sqrt().max(0.01);
            let step = len.min(temperature);
            p.0 += d.0 / len * step;
            p.1 += d.1 / len * step;
        }

        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

/// Center on the origin and scale so the largest coordinate is 1
fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.1).sum::<f64>() / n;

    let mut max = 0.0f64;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        max = max.max(p.0.abs()).max(p.1.abs());
    }

    if max > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= max;
            p.1 /= max;
        }
    }
}
