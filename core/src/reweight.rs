//! Shared-neighbour reweighting.
//!
//! For an edge (a, b), every term w adjacent to both endpoints adds
//! `0.5 * min(co(a, w), co(w, b))` to the edge's co-occurrence. The bonus is
//! computed from raw co-occurrence values only, so the result does not depend
//! on the order edges are visited in.

use crate::config::NEIGHBOUR_BONUS_FACTOR;
use crate::graph::{other_end, StemGraph};
use petgraph::visit::EdgeRef;

/// Refine every edge weight in place. Returns the number of edges that
/// received a non-zero bonus.
pub fn reweight(graph: &mut StemGraph) -> usize {
    let g = &graph.graph;
    // co(a, w) for each neighbour w of the current edge's first endpoint; 0 elsewhere.
    let mut co_with_a: Vec<u64> = vec![0; g.node_count()];
    let mut refined: Vec<f64> = Vec::with_capacity(g.edge_count());
    let mut boosted = 0;

    for edge in g.edge_references() {
        let (a, b) = (edge.source(), edge.target());
        for e in g.edges(a) {
            co_with_a[other_end(&e, a).index()] = e.weight().co_occurrence;
        }

        let mut shared = 0u64;
        for e in g.edges(b) {
            let w = other_end(&e, b);
            let co_aw = co_with_a[w.index()];
            if w != a && co_aw > 0 {
                shared += co_aw.min(e.weight().co_occurrence);
            }
        }

        for e in g.edges(a) {
            co_with_a[other_end(&e, a).index()] = 0;
        }

        if shared > 0 {
            boosted += 1;
        }
        refined.push(edge.weight().co_occurrence as f64 + NEIGHBOUR_BONUS_FACTOR * shared as f64);
    }

    for (weight, value) in graph.graph.edge_weights_mut().zip(refined) {
        weight.weight = value;
    }
    boosted
}
