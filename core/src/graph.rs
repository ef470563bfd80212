//! Undirected term graph over promoted arcs.

use crate::{TermArc, TermId};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWeight {
    pub co_occurrence: u64,
    /// Starts at `co_occurrence`; replaced by the refined weight.
    pub weight: f64,
}

/// Nodes are added in ascending term id order, so node indices and term ids
/// sort the same way.
#[derive(Debug, Clone, Default)]
pub struct StemGraph {
    pub(crate) graph: UnGraph<TermId, EdgeWeight>,
    node_of: Vec<Option<NodeIndex>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

impl StemGraph {
    /// One node per term referenced by an arc and one edge per distinct pair.
    /// Self-pairs are ignored.
    pub fn build(arcs: &[TermArc]) -> Self {
        let mut arcs: Vec<&TermArc> = arcs.iter().filter(|arc| arc.a != arc.b).collect();
        arcs.sort_by_key(|arc| arc.key());
        arcs.dedup_by_key(|arc| arc.key());

        let mut terms: Vec<TermId> = arcs.iter().flat_map(|arc| [arc.a, arc.b]).collect();
        terms.sort_unstable();
        terms.dedup();

        let max_term = terms.last().map(|&t| t as usize + 1).unwrap_or(0);
        let mut graph = UnGraph::with_capacity(terms.len(), arcs.len());
        let mut node_of = vec![None; max_term];
        for &term in &terms {
            node_of[term as usize] = Some(graph.add_node(term));
        }
        for arc in arcs {
            let (Some(na), Some(nb)) = (node_of[arc.a as usize], node_of[arc.b as usize]) else {
                continue;
            };
            graph.add_edge(
                na,
                nb,
                EdgeWeight { co_occurrence: arc.co_occurrence, weight: arc.co_occurrence as f64 },
            );
        }
        Self { graph, node_of }
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats { nodes: self.graph.node_count(), edges: self.graph.edge_count() }
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }

    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    pub fn node(&self, term: TermId) -> Option<NodeIndex> {
        self.node_of.get(term as usize).copied().flatten()
    }

    #[cfg(test)]
    fn contains_term(&self, term: TermId) -> bool {
        self.node(term).is_some()
    }

    pub fn edge_between(&self, a: TermId, b: TermId) -> Option<&EdgeWeight> {
        let edge = self.graph.find_edge(self.node(a)?, self.node(b)?)?;
        self.graph.edge_weight(edge)
    }

    /// Terms adjacent to `term`, ascending.
    #[cfg(test)]
    fn neighbours(&self, term: TermId) -> Vec<TermId> {
        let Some(node) = self.node(term) else { return Vec::new() };
        let mut out: Vec<TermId> = self.graph.neighbors(node).map(|n| self.graph[n]).collect();
        out.sort_unstable();
        out
    }

    /// Current edges as arcs carrying their refined weight, sorted by pair.
    pub fn arcs(&self) -> Vec<TermArc> {
        let mut arcs: Vec<TermArc> = self
            .graph
            .edge_references()
            .map(|e| {
                let mut arc = TermArc::new(self.graph[e.source()], self.graph[e.target()], e.weight().co_occurrence);
                arc.refined_weight = e.weight().weight;
                arc
            })
            .collect();
        arcs.sort_by_key(|arc| arc.key());
        arcs
    }

    /// New graph with the same nodes (and node indices) keeping only the
    /// edges for which `keep` is true.
    pub(crate) fn retain_edges(&self, keep: impl Fn(EdgeIndex) -> bool) -> Self {
        let graph = self
            .graph
            .filter_map(|_, &term| Some(term), |e, w| if keep(e) { Some(*w) } else { None });
        Self { graph, node_of: self.node_of.clone() }
    }
}

/// Endpoint of `edge` that is not `from`.
pub(crate) fn other_end<E: EdgeRef<NodeId = NodeIndex>>(edge: &E, from: NodeIndex) -> NodeIndex {
    if edge.source() == from { edge.target() } else { edge.source() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nodes_only_for_arc_endpoints() {
        let arcs = vec![TermArc::new(4, 1, 3), TermArc::new(1, 9, 2), TermArc::new(4, 1, 3)];
        let g = StemGraph::build(&arcs);
        assert_eq!(g.stats(), GraphStats { nodes: 3, edges: 2 });
        assert!(g.contains_term(9));
        assert!(!g.contains_term(2));
        assert!(!g.contains_term(100));
        assert_eq!(g.edge_between(1, 4).map(|w| w.weight), Some(3.0));
        assert_eq!(g.neighbours(1), vec![4, 9]);
    }

    #[test]
    fn node_indices_follow_term_order() {
        let g = StemGraph::build(&[TermArc::new(7, 3, 1), TermArc::new(5, 3, 1)]);
        assert_eq!(g.node(3).map(|n| n.index()), Some(0));
        assert_eq!(g.node(5).map(|n| n.index()), Some(1));
        assert_eq!(g.node(7).map(|n| n.index()), Some(2));
    }

    #[test]
    fn self_pairs_are_dropped() {
        let mut arc = TermArc::new(1, 2, 1);
        arc.b = 1;
        let g = StemGraph::build(&[arc]);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.node_count(), 0);
    }
}
