use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{DocId, Token};
use crate::postings::codec::Slice;

/// Per-token dictionary entry: idf plus the byte ranges of its ranked and
/// positional postings records in the postings file. Grounded on
/// `original_source/search_helpers.py`'s `(idf, (offset,len), (offset,len))`
/// three-tuple layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermEntry {
    pub idf: f64,
    pub ranked: Slice,
    pub positional: Slice,
}

/// The full in-memory index, loaded once and never mutated (§4.3). Missing
/// tokens are not an error — callers get `None` and treat it as an empty
/// postings list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dictionary {
    pub terms: HashMap<Token, TermEntry>,
    pub doc_vectors: HashMap<DocId, Slice>,
    pub lengths: HashMap<DocId, f64>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary::default()
    }

    pub fn term(&self, token: &Token) -> Option<&TermEntry> {
        self.terms.get(token)
    }

    pub fn doc_count(&self) -> usize {
        self.lengths.len()
    }

    /// `idf(t) = log10(N / df(t))` (§3 invariant 2) is baked into `TermEntry`
    /// at index time, so this is purely informational at query time.
    pub fn n(&self) -> usize {
        self.doc_count()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let dict = bincode::deserialize(&bytes)?;
        Ok(dict)
    }
}
