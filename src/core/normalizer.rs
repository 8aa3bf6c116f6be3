use lru::LruCache;
use parking_lot::Mutex;
use rust_stemmers::{Algorithm, Stemmer};
use std::num::NonZeroUsize;

use crate::core::types::Token;

/// Out-of-scope collaborator: reduces a raw word to a canonical `Token`.
/// Must be idempotent (`normalize(normalize(x)) == normalize(x)`) and identical
/// between indexer and searcher runs.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, raw_word: &str) -> Token;
}

const DEFAULT_CACHE_CAPACITY: usize = 65_536;

/// Lowercase + Porter-stem, memoized through a bounded LRU cache shared across
/// indexing worker threads. Grounded on `original_source/index.py::normalise`,
/// which memoizes the same computation in a module-level dict.
pub struct StandardNormalizer {
    stemmer: Stemmer,
    cache: Mutex<LruCache<String, Token>>,
}

impl StandardNormalizer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        StandardNormalizer {
            stemmer: Stemmer::create(Algorithm::English),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl Default for StandardNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for StandardNormalizer {
    fn normalize(&self, raw_word: &str) -> Token {
        {
            let mut cache = self.cache.lock();
            if let Some(hit) = cache.get(raw_word) {
                return hit.clone();
            }
        }

        let lowered = raw_word.to_lowercase();
        let stemmed = self.stemmer.stem(&lowered).to_string();
        let token = Token::new(stemmed);

        self.cache.lock().put(raw_word.to_string(), token.clone());
        token
    }
}
