use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use retrieva::core::config::IndexerConfig;
use retrieva::core::document_source::{CsvDocumentSource, DocumentSource};
use retrieva::core::normalizer::StandardNormalizer;
use retrieva::index::indexer::build_index;

/// Builds a dictionary and postings file from a CSV document corpus.
#[derive(Parser, Debug)]
#[command(name = "indexer")]
struct Args {
    /// Input CSV corpus: doc_id, an ignored column, then content columns.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output dictionary file.
    #[arg(short = 'd', long = "dictionary")]
    dictionary: PathBuf,

    /// Output postings file.
    #[arg(short = 'p', long = "postings")]
    postings: PathBuf,

    /// Size of the rayon thread pool used for the parallel-by-document fan-out.
    #[arg(long = "workers")]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match args.workers {
        Some(workers) => IndexerConfig { workers },
        None => IndexerConfig::default(),
    };

    let mut source = CsvDocumentSource::new(&args.input);
    let normalizer = StandardNormalizer::new();

    match build_index(
        &mut source as &mut dyn DocumentSource,
        &normalizer,
        config.workers,
        &args.dictionary,
        &args.postings,
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "indexing failed");
            ExitCode::FAILURE
        }
    }
}
