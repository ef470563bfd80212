//! Pairwise co-occurrence and suffix-pair bucketing.
//!
//! Every pair of terms sharing at least `l1` leading characters is scored by
//! the overlap of its posting lists and filed under the pair of suffixes left
//! once the common prefix is removed.

use crate::catalog::TermCatalog;
use crate::config::{SnsParams, MIN_CONFIRMATIONS};
use crate::{Posting, TermArc, TermId};
use std::collections::HashMap;

pub type SuffixId = u32;

/// Canonical key for a suffix pair. Built from interned suffix ids in
/// ascending order, so `new(x, y) == new(y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuffixPairKey(SuffixId, SuffixId);

impl SuffixPairKey {
    pub fn new(x: SuffixId, y: SuffixId) -> Self {
        if x <= y { Self(x, y) } else { Self(y, x) }
    }
}

/// Maps suffix strings, borrowed from the catalog, to dense ids.
#[derive(Debug, Default)]
pub struct SuffixInterner<'a> {
    ids: HashMap<&'a str, SuffixId>,
}

impl<'a> SuffixInterner<'a> {
    pub fn new() -> Self { Self::default() }

    pub fn intern(&mut self, suffix: &'a str) -> SuffixId {
        let next = self.ids.len() as SuffixId;
        *self.ids.entry(suffix).or_insert(next)
    }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

/// Interned id of every suffix of every term, addressed by term id and the
/// number of leading characters removed. Built once, before the pair scan.
#[derive(Debug, Default)]
pub struct SuffixTable {
    starts: Vec<usize>,
    ids: Vec<SuffixId>,
    distinct: usize,
}

impl SuffixTable {
    pub fn build(catalog: &TermCatalog) -> Self {
        let mut interner = SuffixInterner::new();
        let mut starts = Vec::with_capacity(catalog.len());
        let mut ids = Vec::new();
        for term in catalog.iter() {
            let text = term.text.as_str();
            starts.push(ids.len());
            ids.extend(text.char_indices().map(|(idx, _)| interner.intern(&text[idx..])));
            ids.push(interner.intern(""));
        }
        Self { starts, ids, distinct: interner.len() }
    }

    /// Id of `term` with its first `skip_chars` characters removed.
    pub fn suffix(&self, term: TermId, skip_chars: usize) -> SuffixId {
        self.ids[self.starts[term as usize] + skip_chars]
    }

    /// Number of distinct suffixes across the catalog.
    pub fn distinct(&self) -> usize { self.distinct }
}

#[derive(Debug, Clone)]
pub struct SuffixBucket {
    pub key: SuffixPairKey,
    /// Pairs in this bucket whose common prefix is longer than `l2`.
    pub confirm_count: u32,
    pub members: Vec<TermArc>,
}

impl SuffixBucket {
    fn new(key: SuffixPairKey) -> Self {
        Self { key, confirm_count: 0, members: Vec::new() }
    }

    pub fn seen_with_long_prefix(&self) -> bool {
        self.confirm_count > 0
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirm_count >= MIN_CONFIRMATIONS
    }
}

#[derive(Debug, Default)]
pub struct CooccurrenceAnalysis {
    /// Buckets in creation order.
    pub buckets: Vec<SuffixBucket>,
    /// Pairs whose common prefix reached `l1`.
    pub examined_pairs: usize,
    /// Examined pairs with a non-zero co-occurrence.
    pub candidate_pairs: usize,
}

/// Length of the longest common prefix, in characters and in bytes of `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixSplit {
    pub chars: usize,
    pub bytes: usize,
}

pub fn common_prefix_split(a: &str, b: &str) -> PrefixSplit {
    let mut chars = 0;
    let mut bytes = 0;
    for ((idx, ca), cb) in a.char_indices().zip(b.chars()) {
        if ca != cb {
            return PrefixSplit { chars, bytes: idx };
        }
        chars += 1;
        bytes = idx + ca.len_utf8();
    }
    PrefixSplit { chars, bytes }
}

pub fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    &a[..common_prefix_split(a, b).bytes]
}

/// Sum over shared documents of the smaller frequency. Both lists must be
/// sorted by doc id.
pub fn cooccurrence(x: &[Posting], y: &[Posting]) -> u64 {
    let (mut i, mut j) = (0, 0);
    let mut total = 0u64;
    while i < x.len() && j < y.len() {
        let (px, py) = (x[i], y[j]);
        if px.doc_id == py.doc_id {
            total += px.freq.min(py.freq) as u64;
            i += 1;
            j += 1;
        } else if px.doc_id < py.doc_id {
            i += 1;
        } else {
            j += 1;
        }
    }
    total
}

/// Score every term pair sharing at least `l1` leading characters and file it
/// into its suffix-pair bucket.
///
/// Terms are visited in lexicographic order: the common prefix of a term with
/// its successors never grows, so the inner scan stops at the first successor
/// below `l1`. Pairs skipped that way could never satisfy the prefix test, so
/// the resulting buckets are the same as for a full all-pairs scan.
pub fn analyze(catalog: &TermCatalog, params: &SnsParams) -> CooccurrenceAnalysis {
    let mut order: Vec<TermId> = (0..catalog.len() as TermId).collect();
    order.sort_by(|&x, &y| catalog.text(x).cmp(catalog.text(y)));

    let suffixes = SuffixTable::build(catalog);
    // Bucket slots per smaller suffix id, sorted by the larger one.
    let mut slots_by_low: Vec<Vec<usize>> = vec![Vec::new(); suffixes.distinct()];
    let mut analysis = CooccurrenceAnalysis::default();

    for (pos, &i) in order.iter().enumerate() {
        let text_i = catalog.text(i);
        let postings_i = catalog.postings(i);
        for &j in &order[pos + 1..] {
            let text_j = catalog.text(j);
            let split = common_prefix_split(text_i, text_j);
            if split.chars < params.l1 {
                break;
            }
            analysis.examined_pairs += 1;

            let co = cooccurrence(postings_i, catalog.postings(j));
            if co == 0 {
                continue;
            }
            analysis.candidate_pairs += 1;

            let key = SuffixPairKey::new(
                suffixes.suffix(i, split.chars),
                suffixes.suffix(j, split.chars),
            );
            let slot = bucket_slot(&mut analysis.buckets, &mut slots_by_low[key.0 as usize], key);
            let bucket = &mut analysis.buckets[slot];
            if split.chars > params.l2 {
                bucket.confirm_count += 1;
            }
            bucket.members.push(TermArc::new(i, j, co));
        }
    }

    tracing::debug!(
        suffixes = suffixes.distinct(),
        buckets = analysis.buckets.len(),
        "suffix pairs interned"
    );
    analysis
}

fn bucket_slot(buckets: &mut Vec<SuffixBucket>, partners: &mut Vec<usize>, key: SuffixPairKey) -> usize {
    match partners.binary_search_by_key(&key.1, |&slot| buckets[slot].key.1) {
        Ok(at) => partners[at],
        Err(at) => {
            buckets.push(SuffixBucket::new(key));
            let slot = buckets.len() - 1;
            partners.insert(at, slot);
            slot
        }
    }
}
