/// Tunables for the ranked scorer (SPEC_FULL.md §10).
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub query_expansion: bool,
    pub relevance_feedback: bool,
    pub alpha: f64,
    pub beta: f64,
    pub threshold: f64,
    pub top_k: Option<usize>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            query_expansion: false,
            relevance_feedback: false,
            alpha: 1.0,
            beta: 0.75,
            threshold: 0.0,
            top_k: None,
        }
    }
}

/// Tunables for the indexer's parallel fan-out.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub workers: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        IndexerConfig {
            workers: num_cpus::get(),
        }
    }
}
