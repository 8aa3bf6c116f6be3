pub mod dictionary;
pub mod indexer;