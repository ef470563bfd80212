//! Turns confirmed suffix-pair buckets into graph arcs.

use crate::cooccurrence::SuffixBucket;
use crate::{TermArc, TermId};

#[derive(Debug, Default)]
pub struct Promotion {
    /// Sorted by `(a, b)`, one arc per term pair.
    pub arcs: Vec<TermArc>,
    /// Every term touched by a promoted arc, ascending.
    pub nodes: Vec<TermId>,
    pub confirmed_buckets: usize,
}

/// Keep every member of each bucket confirmed by at least two long-prefix
/// pairs, short-prefix members included. All other buckets are dropped.
pub fn promote(buckets: Vec<SuffixBucket>) -> Promotion {
    let mut promotion = Promotion::default();
    for bucket in buckets.into_iter().filter(|b| b.seen_with_long_prefix() && b.is_confirmed()) {
        promotion.confirmed_buckets += 1;
        promotion.arcs.extend(bucket.members);
    }
    promotion.arcs.sort_by_key(|arc| arc.key());
    promotion.arcs.dedup_by_key(|arc| arc.key());

    promotion.nodes = promotion.arcs.iter().flat_map(|arc| [arc.a, arc.b]).collect();
    promotion.nodes.sort_unstable();
    promotion.nodes.dedup();
    promotion
}
