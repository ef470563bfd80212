//! Connected components of the pruned graph and their stems.

use crate::catalog::TermCatalog;
use crate::cooccurrence::common_prefix;
use crate::graph::StemGraph;
use crate::lookup::{LookupTable, StemAssignment};
use crate::TermId;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentStats {
    pub components: usize,
    pub singletons: usize,
    pub largest: usize,
}

/// Connected components as lists of term ids. Members are in ascending term
/// order and components are ordered by their first member.
pub fn connected_components(graph: &StemGraph) -> Vec<Vec<TermId>> {
    let g = &graph.graph;
    let mut sets = UnionFind::<usize>::new(g.node_count());
    for edge in g.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut slot_of_root: Vec<Option<usize>> = vec![None; g.node_count()];
    let mut components: Vec<Vec<TermId>> = Vec::new();
    for (node, root) in sets.into_labeling().into_iter().enumerate() {
        let slot = *slot_of_root[root].get_or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(g[petgraph::graph::NodeIndex::new(node)]);
    }
    components
}

/// Stem for one component: seeded with the common prefix of the first two
/// members, then shrunk to the shortest prefix the first member shares with
/// any other member. `None` for components with fewer than two members.
pub fn component_stem<'a>(catalog: &'a TermCatalog, members: &[TermId]) -> Option<&'a str> {
    let (&first, rest) = members.split_first()?;
    let reference = catalog.text(first);
    let &second = rest.first()?;
    let mut stem = common_prefix(reference, catalog.text(second));
    for &other in rest {
        let candidate = common_prefix(reference, catalog.text(other));
        if candidate.len() < stem.len() {
            stem = candidate;
        }
    }
    Some(stem)
}

/// Assign each member of a multi-term component its component's stem.
/// Singleton components produce nothing.
pub fn extract_stems(graph: &StemGraph, catalog: &TermCatalog) -> (LookupTable, ComponentStats) {
    let mut stats = ComponentStats::default();
    let mut assignments = Vec::new();
    for members in connected_components(graph) {
        stats.components += 1;
        stats.largest = stats.largest.max(members.len());
        let Some(stem) = component_stem(catalog, &members) else {
            stats.singletons += 1;
            continue;
        };
        assignments.extend(members.iter().map(|&term| StemAssignment {
            term: catalog.text(term).to_string(),
            stem: stem.to_string(),
        }));
    }
    (LookupTable::from_assignments(assignments), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Posting, TermArc};

    fn catalog(words: &[&str]) -> TermCatalog {
        let mut c = TermCatalog::new();
        for w in words {
            c.push(*w, vec![Posting::new(0, 1)]);
        }
        c
    }

    #[test]
    fn stem_is_prefix_shared_with_reference() {
        let c = catalog(&["walking", "walked", "walks"]);
        assert_eq!(component_stem(&c, &[0, 1, 2]), Some("walk"));
        assert_eq!(component_stem(&c, &[0]), None);
    }

    #[test]
    fn later_members_shrink_the_seed() {
        let c = catalog(&["abxy", "abxz", "abc"]);
        assert_eq!(component_stem(&c, &[0, 1]), Some("abx"));
        assert_eq!(component_stem(&c, &[0, 1, 2]), Some("ab"));
        assert_eq!(component_stem(&c, &[2, 1, 0]), Some("ab"));
    }

    #[test]
    fn components_group_connected_terms() {
        let g = StemGraph::build(&[TermArc::new(0, 1, 1), TermArc::new(1, 2, 1), TermArc::new(3, 4, 1)]);
        assert_eq!(connected_components(&g), vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn extract_skips_singletons() {
        let c = catalog(&["cats", "cat", "dog", "dogs", "bird"]);
        let g = StemGraph::build(&[TermArc::new(0, 1, 1), TermArc::new(2, 3, 1), TermArc::new(3, 4, 1)]);
        let g = g.retain_edges(|e| e.index() != 2);
        let (table, stats) = extract_stems(&g, &c);
        assert_eq!(stats, ComponentStats { components: 3, singletons: 1, largest: 2 });
        assert_eq!(table.stem("dogs"), "dog");
        assert_eq!(table.stem("cats"), "cat");
        assert!(table.get("bird").is_none());
        assert_eq!(table.len(), 4);
    }
}
