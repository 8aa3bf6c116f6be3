use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::core::config::RetrievalConfig;
use crate::core::error::Result;
use crate::core::normalizer::Normalizer;
use crate::core::thesaurus::Thesaurus;
use crate::core::types::{DocId, Token};
use crate::index::dictionary::Dictionary;
use crate::index::indexer::DocVector;
use crate::postings::codec::PostingsReader;

fn tokenize_query(text: &str, normalizer: &dyn Normalizer) -> HashMap<Token, f64> {
    let mut counts: HashMap<Token, f64> = HashMap::new();
    for word in text.unicode_words() {
        let token = normalizer.normalize(word);
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

/// Step 2 (§4.8): merges `synonym -> similarity(reference, synset) * count`
/// into the query vector for every term's synonym set.
fn expand_query(query: &HashMap<Token, f64>, thesaurus: &dyn Thesaurus) -> HashMap<Token, f64> {
    let mut expanded = query.clone();
    for (term, &count) in query {
        for (synonym, factor) in thesaurus.synonyms(term) {
            *expanded.entry(synonym).or_insert(0.0) += factor * count;
        }
    }
    expanded
}

fn load_doc_vector(
    doc_id: &DocId,
    dictionary: &Dictionary,
    reader: &mut PostingsReader,
) -> Result<DocVector> {
    match dictionary.doc_vectors.get(doc_id) {
        Some(slice) => {
            let mut records = reader.read_record::<DocVector>(slice)?;
            Ok(records.pop().unwrap_or_default())
        }
        None => Ok(DocVector::default()),
    }
}

/// Step 3 (§4.8): `q' = alpha*q + beta*centroid(relevant)`, using raw counts
/// for the relevant documents' vectors (Open Question resolved in §9/DESIGN.md).
/// Grounded on `original_source/ranked_retrieval.py::rocchio_algorithm`.
fn apply_rocchio(
    query: &HashMap<Token, f64>,
    relevant: &[DocId],
    dictionary: &Dictionary,
    reader: &mut PostingsReader,
    alpha: f64,
    beta: f64,
) -> Result<HashMap<Token, f64>> {
    if relevant.is_empty() {
        return Ok(query.clone());
    }

    let mut centroid: HashMap<Token, f64> = HashMap::new();
    for doc_id in relevant {
        let vector = load_doc_vector(doc_id, dictionary, reader)?;
        for (token, &count) in &vector {
            *centroid.entry(token.clone()).or_insert(0.0) += count as f64;
        }
    }
    let denom = relevant.len() as f64;
    for value in centroid.values_mut() {
        *value /= denom;
    }

    let mut combined: HashMap<Token, f64> = HashMap::new();
    for (token, &weight) in query {
        combined.insert(token.clone(), alpha * weight);
    }
    for (token, weight) in centroid {
        *combined.entry(token).or_insert(0.0) += beta * weight;
    }

    Ok(combined)
}

/// Cosine (lnc.ltc) ranked retrieval with optional query expansion and
/// Rocchio relevance feedback (§4.8). Returns documents ordered by
/// `(-score, doc_id ascending)`, with scores at or below
/// `config.threshold` dropped and no cap unless `config.top_k` is set.
pub fn ranked_search(
    query_text: &str,
    relevant: &[DocId],
    dictionary: &Dictionary,
    reader: &mut PostingsReader,
    normalizer: &dyn Normalizer,
    thesaurus: Option<&dyn Thesaurus>,
    config: &RetrievalConfig,
) -> Result<Vec<DocId>> {
    let mut query = tokenize_query(query_text, normalizer);

    if config.query_expansion {
        if let Some(thesaurus) = thesaurus {
            query = expand_query(&query, thesaurus);
        }
    }

    if config.relevance_feedback {
        query = apply_rocchio(&query, relevant, dictionary, reader, config.alpha, config.beta)?;
    }

    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for (token, &weight) in &query {
        let entry = match dictionary.term(token) {
            Some(entry) => entry,
            None => continue,
        };
        let postings = reader.read_postings_list::<crate::postings::types::Posting>(&entry.ranked)?;
        for posting in postings.iter() {
            *scores.entry(posting.doc_id.clone()).or_insert(0.0) +=
                weight * posting.tf_weight * entry.idf;
        }
    }

    for (doc_id, score) in scores.iter_mut() {
        if let Some(&norm) = dictionary.lengths.get(doc_id) {
            if norm > 0.0 {
                *score /= norm;
            }
        }
    }

    let mut ranked: Vec<(DocId, f64)> = scores
        .into_iter()
        .filter(|(_, score)| *score > config.threshold)
        .collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    if let Some(k) = config.top_k {
        ranked.truncate(k);
    }

    Ok(ranked.into_iter().map(|(doc_id, _)| doc_id).collect())
}
