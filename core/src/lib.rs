//! Statistical stemming over a term catalog.
//!
//! The SNS stemmer groups word forms that share a long prefix, co-occur in the
//! same documents and whose suffix pair recurs across the lexicon. Stages run
//! leaves first: [`cooccurrence`], [`promote`], [`graph`], [`reweight`],
//! [`strong`] and [`components`]; [`pipeline::run`] drives them in order.

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod components;
pub mod config;
pub mod cooccurrence;
pub mod error;
pub mod graph;
pub mod lookup;
pub mod persist;
pub mod pipeline;
pub mod promote;
pub mod reweight;
pub mod strong;
pub mod tokenizer;

pub use catalog::{CatalogBuilder, Term, TermCatalog};
pub use config::SnsParams;
pub use error::SnsError;
pub use lookup::{LookupTable, StemAssignment};
pub use pipeline::{run, SnsOutcome};

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub freq: u32,
}

impl Posting {
    pub fn new(doc_id: DocId, freq: u32) -> Self {
        Self { doc_id, freq }
    }
}

/// Edge candidate between two terms. `a < b` always holds, so a pair has a
/// single representation regardless of the order it was discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermArc {
    pub a: TermId,
    pub b: TermId,
    pub co_occurrence: u64,
    /// Zero until the reweighting stage has run.
    pub refined_weight: f64,
}

impl TermArc {
    pub fn new(x: TermId, y: TermId, co_occurrence: u64) -> Self {
        debug_assert_ne!(x, y, "arc endpoints must differ");
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self { a, b, co_occurrence, refined_weight: 0.0 }
    }

    pub fn key(&self) -> (TermId, TermId) {
        (self.a, self.b)
    }
}
