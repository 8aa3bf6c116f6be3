use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use retrieva::core::config::RetrievalConfig;
use retrieva::core::error::Error;
use retrieva::core::normalizer::StandardNormalizer;
use retrieva::core::thesaurus::TableThesaurus;
use retrieva::core::types::DocId;
use retrieva::index::dictionary::Dictionary;
use retrieva::postings::codec::PostingsReader;
use retrieva::query::driver::execute_query;

/// Answers queries against a dictionary/postings file pair built by `indexer`.
#[derive(Parser, Debug)]
#[command(name = "searcher")]
struct Args {
    #[arg(short = 'd', long = "dictionary")]
    dictionary: PathBuf,

    #[arg(short = 'p', long = "postings")]
    postings: PathBuf,

    /// One query per block; a block's first line is the query, subsequent
    /// non-blank lines are DocIds presumed relevant for Rocchio feedback.
    /// Blocks are separated by blank lines.
    #[arg(short = 'q', long = "queries")]
    queries: PathBuf,

    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    #[arg(long = "expand", default_value_t = false)]
    expand: bool,

    #[arg(long = "feedback", default_value_t = false)]
    feedback: bool,

    #[arg(long = "alpha", default_value_t = 1.0)]
    alpha: f64,

    #[arg(long = "beta", default_value_t = 0.75)]
    beta: f64,

    #[arg(long = "threshold", default_value_t = 0.0)]
    threshold: f64,

    #[arg(long = "top-k")]
    top_k: Option<usize>,
}

/// One query line followed by zero or more relevant-DocId lines (§6).
struct QueryBlock {
    query_line: String,
    relevant: Vec<DocId>,
}

fn split_blocks(contents: &str) -> Vec<QueryBlock> {
    let mut blocks = Vec::new();
    let mut lines = contents.lines().peekable();

    while lines.peek().is_some() {
        while matches!(lines.peek(), Some(l) if l.trim().is_empty()) {
            lines.next();
        }
        let query_line = match lines.next() {
            Some(l) => l.to_string(),
            None => break,
        };

        let mut relevant = Vec::new();
        while matches!(lines.peek(), Some(l) if !l.trim().is_empty()) {
            if let Some(l) = lines.next() {
                relevant.push(DocId::new(l.trim().to_string()));
            }
        }

        blocks.push(QueryBlock { query_line, relevant });
    }

    blocks
}

fn run(args: &Args) -> Result<(), Error> {
    let dictionary = Dictionary::load(&args.dictionary)?;
    let mut reader = PostingsReader::open(&args.postings)?;
    let normalizer = StandardNormalizer::new();
    let thesaurus = TableThesaurus::new();

    let config = RetrievalConfig {
        query_expansion: args.expand,
        relevance_feedback: args.feedback,
        alpha: args.alpha,
        beta: args.beta,
        threshold: args.threshold,
        top_k: args.top_k,
    };

    let contents = fs::read_to_string(&args.queries)?;
    let blocks = split_blocks(&contents);

    let mut output_lines = Vec::with_capacity(blocks.len());
    for block in blocks {
        // Per-query isolation (§7): a failing query collapses to a blank
        // output line rather than aborting the batch.
        match execute_query(
            &block.query_line,
            &block.relevant,
            &dictionary,
            &mut reader,
            &normalizer,
            Some(&thesaurus),
            &config,
        ) {
            Ok(doc_ids) => {
                let line = doc_ids
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                tracing::info!(query = %block.query_line, results = doc_ids.len(), "query processed");
                output_lines.push(line);
            }
            Err(err) => {
                tracing::warn!(query = %block.query_line, %err, "query failed, emitting blank line");
                output_lines.push(String::new());
            }
        }
    }

    fs::write(&args.output, output_lines.join("\n") + "\n")?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "search run failed");
            ExitCode::FAILURE
        }
    }
}
