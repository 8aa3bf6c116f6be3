pub mod config;
pub mod document_source;
pub mod error;
pub mod normalizer;
pub mod thesaurus;
pub mod types;
