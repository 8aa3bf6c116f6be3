use std::collections::HashMap;

use crate::core::types::Token;

/// Out-of-scope collaborator: looks up synonym tokens for query expansion
/// (SPEC_FULL.md §4.8 step 2). Each candidate carries a bounded similarity
/// weight in (0, 1], Wu-Palmer-style.
pub trait Thesaurus: Send + Sync {
    fn synonyms(&self, token: &Token) -> Vec<(Token, f64)>;
}

/// A flat in-memory synset table: token -> [(synonym, similarity)].
/// No teacher counterpart; grounded directly on the spec's expansion step.
#[derive(Default)]
pub struct TableThesaurus {
    table: HashMap<Token, Vec<(Token, f64)>>,
}

impl TableThesaurus {
    pub fn new() -> Self {
        TableThesaurus {
            table: HashMap::new(),
        }
    }

    pub fn insert(&mut self, token: Token, synonyms: Vec<(Token, f64)>) {
        self.table.insert(token, synonyms);
    }
}

impl Thesaurus for TableThesaurus {
    fn synonyms(&self, token: &Token) -> Vec<(Token, f64)> {
        self.table.get(token).cloned().unwrap_or_default()
    }
}
