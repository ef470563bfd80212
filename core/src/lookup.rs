//! Term to stem lookup table, serialized as `term\tstem` lines.

use crate::error::{Result, SnsError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemAssignment {
    pub term: String,
    pub stem: String,
}

/// Assignments sorted by term, one per term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    entries: Vec<StemAssignment>,
}

impl LookupTable {
    /// Sorts by term; for a repeated term the first assignment wins.
    pub fn from_assignments(mut entries: Vec<StemAssignment>) -> Self {
        entries.sort_by(|x, y| x.term.cmp(&y.term));
        entries.dedup_by(|later, earlier| later.term == earlier.term);
        Self { entries }
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|e| e.term.as_str().cmp(term))
            .ok()
            .map(|idx| self.entries[idx].stem.as_str())
    }

    /// Stem for `term`, or `term` itself when the table has no entry.
    pub fn stem<'a>(&'a self, term: &'a str) -> &'a str {
        self.get(term).unwrap_or(term)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &StemAssignment> {
        self.entries.iter()
    }

    pub fn distinct_stems(&self) -> usize {
        self.entries.iter().map(|e| e.stem.as_str()).collect::<HashSet<_>>().len()
    }

    pub fn write_tsv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for e in &self.entries {
            writeln!(writer, "{}\t{}", e.term, e.stem)?;
        }
        writer.flush()
    }

    pub fn read_tsv<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            entries.push(parse_line(&line, idx + 1)?);
        }
        Ok(Self::from_assignments(entries))
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<StemAssignment> {
    let mut fields = line.split('\t');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(term), Some(stem), None) if !term.trim().is_empty() => Ok(StemAssignment {
            term: term.trim().to_lowercase(),
            stem: stem.trim().to_lowercase(),
        }),
        _ => Err(SnsError::MalformedLookup {
            line: line_no,
            reason: "expected `term<TAB>stem`".into(),
        }),
    }
}
