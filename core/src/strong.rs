//! Strong-edge filter.
//!
//! An edge survives when its refined weight is the largest incident weight at
//! either endpoint. The decision for every edge is taken against the same
//! weights, then the pruned graph is materialised in one go.

use crate::graph::StemGraph;
use petgraph::visit::EdgeRef;

/// Largest refined weight incident to each node, by node index.
pub fn max_incident_weights(graph: &StemGraph) -> Vec<f64> {
    let g = &graph.graph;
    let mut max_rco = vec![f64::NEG_INFINITY; g.node_count()];
    for edge in g.edge_references() {
        let w = edge.weight().weight;
        for end in [edge.source(), edge.target()] {
            let slot = &mut max_rco[end.index()];
            if w > *slot {
                *slot = w;
            }
        }
    }
    max_rco
}

pub fn strong_edges(graph: &StemGraph) -> StemGraph {
    let max_rco = max_incident_weights(graph);
    let g = &graph.graph;
    let keep: Vec<bool> = g
        .edge_references()
        .map(|edge| {
            let w = edge.weight().weight;
            !(w < max_rco[edge.source().index()] && w < max_rco[edge.target().index()])
        })
        .collect();
    let pruned = graph.retain_edges(|e| keep[e.index()]);
    tracing::debug!(before = g.edge_count(), after = pruned.edge_count(), "weak edges removed");
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reweight::reweight;
    use crate::TermArc;

    #[test]
    fn drops_edge_dominated_at_both_ends() {
        let mut g = StemGraph::build(&[TermArc::new(0, 1, 4), TermArc::new(0, 2, 3), TermArc::new(1, 2, 2)]);
        reweight(&mut g);
        let max_rco = max_incident_weights(&g);
        assert_eq!(max_rco, vec![5.0, 5.0, 4.0]);

        let pruned = strong_edges(&g);
        assert_eq!(pruned.node_count(), 3);
        assert_eq!(pruned.edge_count(), 2);
        assert!(pruned.edge_between(1, 2).is_none());
        assert!(pruned.edge_between(0, 1).is_some());
        assert!(pruned.edge_between(0, 2).is_some());
    }

    #[test]
    fn ties_survive() {
        let g = StemGraph::build(&[TermArc::new(0, 1, 2), TermArc::new(1, 2, 2), TermArc::new(2, 3, 2)]);
        assert_eq!(strong_edges(&g).edge_count(), 3);
    }

    #[test]
    fn edge_strong_at_one_end_survives() {
        // 1-2 is weaker than 0-1 at node 1 but is node 2's only edge.
        let g = StemGraph::build(&[TermArc::new(0, 1, 9), TermArc::new(1, 2, 1)]);
        let pruned = strong_edges(&g);
        assert!(pruned.edge_between(1, 2).is_some());
        assert_eq!(pruned.node(2), g.node(2));
    }
}
