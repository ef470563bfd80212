use crate::tokenizer::tokenize_with;
use crate::{DocId, Posting, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub text: String,
    /// Sorted by doc_id, no duplicate doc ids.
    pub postings: Vec<Posting>,
}

/// Dense, id-indexed term storage. Term `i` lives at slot `i`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TermCatalog {
    terms: Vec<Term>,
}

impl TermCatalog {
    pub fn new() -> Self { Self::default() }

    /// Append a term and return its id. Postings are sorted by document and
    /// repeated documents are merged by summing their frequencies.
    pub fn push(&mut self, text: impl Into<String>, mut postings: Vec<Posting>) -> TermId {
        postings.sort_by_key(|p| p.doc_id);
        let mut merged: Vec<Posting> = Vec::with_capacity(postings.len());
        for p in postings {
            match merged.last_mut() {
                Some(last) if last.doc_id == p.doc_id => last.freq += p.freq,
                _ => merged.push(p),
            }
        }
        let id = self.terms.len() as TermId;
        self.terms.push(Term { id, text: text.into(), postings: merged });
        id
    }

    pub fn get(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id as usize)
    }

    /// Panics if `id` is not a term of this catalog.
    pub fn text(&self, id: TermId) -> &str {
        &self.terms[id as usize].text
    }

    /// Panics if `id` is not a term of this catalog.
    pub fn postings(&self, id: TermId) -> &[Posting] {
        &self.terms[id as usize].postings
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    /// Copy of the catalog without terms that can never take part in a pair:
    /// shorter than `min_len` characters, or starting with a digit. Ids are
    /// reassigned densely in the original order.
    pub fn filtered(&self, min_len: usize) -> TermCatalog {
        let mut out = TermCatalog::new();
        for term in self.terms.iter().filter(|t| is_indexable(&t.text, min_len)) {
            out.push(term.text.clone(), term.postings.clone());
        }
        out
    }
}

pub fn is_indexable(text: &str, min_len: usize) -> bool {
    match text.chars().next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some(_) => text.chars().count() >= min_len,
    }
}

/// Accumulates per-document term frequencies into a [`TermCatalog`].
/// Term ids follow first-seen order.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    dictionary: HashMap<String, TermId>,
    texts: Vec<String>,
    postings: Vec<Vec<Posting>>,
    keep_stopwords: bool,
    num_docs: u32,
}

impl CatalogBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn keep_stopwords(mut self, keep: bool) -> Self {
        self.keep_stopwords = keep;
        self
    }

    /// Tokenize `text` and record one posting per distinct term. Returns the
    /// number of tokens seen.
    pub fn add_document(&mut self, doc_id: DocId, text: &str) -> usize {
        let tokens = tokenize_with(text, self.keep_stopwords);
        let num_tokens = tokens.len();
        let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
        for (term, _pos) in tokens {
            let tid = match self.dictionary.get(&term) {
                Some(&tid) => tid,
                None => {
                    let tid = self.texts.len() as TermId;
                    self.texts.push(term.clone());
                    self.postings.push(Vec::new());
                    self.dictionary.insert(term, tid);
                    tid
                }
            };
            *tf_counts.entry(tid).or_insert(0) += 1;
        }
        for (tid, freq) in tf_counts {
            self.postings[tid as usize].push(Posting { doc_id, freq });
        }
        self.num_docs += 1;
        num_tokens
    }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn num_terms(&self) -> usize { self.texts.len() }

    pub fn finish(self) -> TermCatalog {
        let mut catalog = TermCatalog::new();
        for (text, postings) in self.texts.into_iter().zip(self.postings) {
            catalog.push(text, postings);
        }
        catalog
    }
}
