use std::collections::HashSet;

use crate::core::config::RetrievalConfig;
use crate::core::error::Result;
use crate::core::normalizer::Normalizer;
use crate::core::thesaurus::Thesaurus;
use crate::core::types::DocId;
use crate::index::dictionary::Dictionary;
use crate::postings::codec::PostingsReader;
use crate::scoring::ranked::ranked_search;
use crate::search::boolean::{boolean_query, QueryItem};

/// One parsed query line: either a pure conjunction (`BOOLEAN`, recognized by
/// a literal `AND` separator) or free text (§4.9).
#[derive(Debug, Clone, PartialEq)]
enum QueryMode {
    Boolean,
    FreeText,
}

/// Splits one query line into its conjuncts, following the CSV-with-quoting
/// rule in §4.9: space-delimited, `"`-quoted elements; an element containing
/// a space after unquoting is a phrase, otherwise a single term.
fn parse_elements(line: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .quote(b'"')
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|s| s.to_string()).collect()),
        None => Ok(Vec::new()),
    }
}

/// Parses one query line into its boolean/free-text mode, the conjuncts used
/// by the boolean executor, and the flattened free-text rendering used by the
/// ranked scorer.
fn parse_query_line(line: &str, normalizer: &dyn Normalizer) -> Result<(QueryMode, Vec<QueryItem>, String)> {
    let elements = parse_elements(line)?;

    let mode = if elements.iter().any(|e| e == "AND") {
        QueryMode::Boolean
    } else {
        QueryMode::FreeText
    };

    let filtered: Vec<String> = elements.into_iter().filter(|e| e != "AND").collect();
    let flattened = filtered.join(" ");

    let items: Vec<QueryItem> = filtered
        .iter()
        .map(|element| {
            if element.contains(' ') {
                let tokens = element
                    .split_whitespace()
                    .map(|w| normalizer.normalize(w))
                    .collect();
                QueryItem::Phrase(tokens)
            } else {
                QueryItem::Term(normalizer.normalize(element))
            }
        })
        .collect();

    Ok((mode, items, flattened))
}

/// Parses and executes one query line (§4.9). Returns the DocIds in their
/// final emitted order: for boolean queries, `R ∩ B` (kept order) followed
/// by `R \ B` (kept order); for free text, `R` directly. An empty/blank
/// query line yields an empty result, not an error (§7 `EmptyQuery`).
pub fn execute_query(
    line: &str,
    relevant: &[DocId],
    dictionary: &Dictionary,
    reader: &mut PostingsReader,
    normalizer: &dyn Normalizer,
    thesaurus: Option<&dyn Thesaurus>,
    config: &RetrievalConfig,
) -> Result<Vec<DocId>> {
    let (mode, items, flattened) = parse_query_line(line, normalizer)?;

    if flattened.trim().is_empty() {
        return Ok(Vec::new());
    }

    let ranked = ranked_search(&flattened, relevant, dictionary, reader, normalizer, thesaurus, config)?;

    match mode {
        QueryMode::FreeText => Ok(ranked),
        QueryMode::Boolean => {
            let boolean_hits: HashSet<DocId> = boolean_query(&items, dictionary, reader)?.into_iter().collect();

            let mut intersected = Vec::new();
            let mut remainder = Vec::new();
            for doc_id in ranked {
                if boolean_hits.contains(&doc_id) {
                    intersected.push(doc_id);
                } else {
                    remainder.push(doc_id);
                }
            }
            intersected.extend(remainder);
            Ok(intersected)
        }
    }
}
