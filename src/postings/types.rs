use serde::{Deserialize, Serialize};

use crate::core::types::DocId;

/// Anything orderable by a comparable key, so the same skip-list machinery
/// (§4.1) can merge postings (keyed by `DocId`) and the ephemeral per-document
/// position lists built inside the positional-adjacency merge (§4.5, keyed by
/// `u32` offset) alike.
pub trait Keyed {
    type Key: Ord + Clone;
    fn key(&self) -> Self::Key;
}

/// A ranked-retrieval posting: a document and its tf-weight for one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf_weight: f64,
}

impl Posting {
    pub fn new(doc_id: DocId, tf_weight: f64) -> Self {
        Posting { doc_id, tf_weight }
    }
}

impl Keyed for Posting {
    type Key = DocId;
    fn key(&self) -> DocId {
        self.doc_id.clone()
    }
}

/// A positional posting: a document and the ascending token offsets of one term
/// within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalPosting {
    pub doc_id: DocId,
    pub positions: Vec<u32>,
}

impl PositionalPosting {
    pub fn new(doc_id: DocId, positions: Vec<u32>) -> Self {
        PositionalPosting { doc_id, positions }
    }
}

impl Keyed for PositionalPosting {
    type Key = DocId;
    fn key(&self) -> DocId {
        self.doc_id.clone()
    }
}

impl Keyed for DocId {
    type Key = DocId;
    fn key(&self) -> DocId {
        self.clone()
    }
}

impl Keyed for u32 {
    type Key = u32;
    fn key(&self) -> u32 {
        *self
    }
}
