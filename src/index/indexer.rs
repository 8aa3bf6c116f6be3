use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::document_source::DocumentSource;
use crate::core::error::Result;
use crate::core::normalizer::Normalizer;
use crate::core::types::{DocId, Token};
use crate::index::dictionary::{Dictionary, TermEntry};
use crate::postings::codec::PostingsWriter;
use crate::postings::list::PostingsList;
use crate::postings::types::{PositionalPosting, Posting};

/// Raw count vector for one document, used only to seed Rocchio centroids at
/// query time (§4.8). Keyed by the same `Token` the postings dictionary uses.
pub type DocVector = HashMap<Token, u32>;

struct IndexedDoc {
    doc_id: DocId,
    counts: HashMap<Token, u32>,
    positions: HashMap<Token, Vec<u32>>,
    norm: f64,
}

fn index_document(doc_id: DocId, words: &[String], normalizer: &dyn Normalizer) -> IndexedDoc {
    let mut counts: HashMap<Token, u32> = HashMap::new();
    let mut positions: HashMap<Token, Vec<u32>> = HashMap::new();

    for (pos, word) in words.iter().enumerate() {
        let token = normalizer.normalize(word);
        *counts.entry(token.clone()).or_insert(0) += 1;
        positions.entry(token).or_insert_with(Vec::new).push(pos as u32);
    }

    let norm = counts
        .values()
        .map(|&c| tf_weight(c).powi(2))
        .sum::<f64>()
        .sqrt();

    IndexedDoc {
        doc_id,
        counts,
        positions,
        norm,
    }
}

/// `tf_weight = log10(10 * raw_count)` (§3).
fn tf_weight(raw_count: u32) -> f64 {
    (10.0 * raw_count as f64).log10()
}

/// Builds the dictionary and postings files from a `DocumentSource` (§4.4).
/// Per-row normalization and per-row postings contribution are fanned out
/// across a rayon thread pool; the fold back into global per-token postings
/// lists walks rows in their pre-sort (DocId-ascending) order, preserving the
/// sorted invariant (§3, §5) without needing to re-sort afterward.
pub fn build_index(
    source: &mut dyn DocumentSource,
    normalizer: &dyn Normalizer,
    workers: usize,
    dictionary_path: impl AsRef<Path>,
    postings_path: impl AsRef<Path>,
) -> Result<()> {
    info!("reading corpus");
    let mut docs = source.read_all()?;
    docs.sort_by(|a, b| a.0.cmp(&b.0));
    info!(documents = docs.len(), "corpus sorted by doc id");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| crate::core::error::Error::new(crate::core::error::ErrorKind::Internal, e.to_string()))?;

    let progress = AtomicUsize::new(0);
    let total = docs.len();

    let indexed: Vec<IndexedDoc> = pool.install(|| {
        docs.into_par_iter()
            .map(|(doc_id, words)| {
                let result = index_document(doc_id, &words, normalizer);
                let current = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if total > 0 && current % 1000 == 0 {
                    debug!(current, total, "indexing progress");
                }
                result
            })
            .collect()
    });

    info!("folding per-document postings into the global dictionary");
    let mut ranked: HashMap<Token, Vec<Posting>> = HashMap::new();
    let mut positional: HashMap<Token, Vec<PositionalPosting>> = HashMap::new();
    let mut doc_vectors: HashMap<DocId, DocVector> = HashMap::new();
    let mut lengths: HashMap<DocId, f64> = HashMap::new();

    for doc in indexed {
        for (token, &count) in &doc.counts {
            ranked
                .entry(token.clone())
                .or_insert_with(Vec::new)
                .push(Posting::new(doc.doc_id.clone(), tf_weight(count)));
        }
        for (token, positions) in &doc.positions {
            positional
                .entry(token.clone())
                .or_insert_with(Vec::new)
                .push(PositionalPosting::new(doc.doc_id.clone(), positions.clone()));
        }
        lengths.insert(doc.doc_id.clone(), doc.norm);
        doc_vectors.insert(doc.doc_id.clone(), doc.counts);
    }

    let n = lengths.len();
    info!(terms = ranked.len(), documents = n, "building skip lists and serializing");

    let mut writer = PostingsWriter::create(postings_path)?;
    let mut dictionary = Dictionary::new();

    for (token, postings) in ranked {
        let df = postings.len();
        let idf = if df == 0 {
            0.0
        } else {
            (n as f64 / df as f64).log10()
        };

        let ranked_list = PostingsList::from_values(postings);
        let ranked_slice = writer.write_record(ranked_list.values())?;

        let positional_values = positional.remove(&token).unwrap_or_default();
        let positional_list = PostingsList::from_values(positional_values);
        let positional_slice = writer.write_positional_record(positional_list.values())?;

        dictionary.terms.insert(
            token,
            TermEntry {
                idf,
                ranked: ranked_slice,
                positional: positional_slice,
            },
        );
    }

    for (doc_id, vector) in doc_vectors {
        let slice = writer.write_record(std::slice::from_ref(&vector))?;
        dictionary.doc_vectors.insert(doc_id, slice);
    }

    dictionary.lengths = lengths;

    writer.flush()?;
    dictionary.save(dictionary_path)?;
    info!("index build complete");

    Ok(())
}
