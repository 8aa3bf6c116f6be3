use crate::core::error::Result;
use crate::core::types::{DocId, Token};
use crate::index::dictionary::Dictionary;
use crate::postings::codec::PostingsReader;
use crate::postings::list::PostingsList;
use crate::search::merge::and_merge;
use crate::search::phrase::resolve_phrase;

/// One conjunct of a boolean query: a bare term or a phrase (§4.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryItem {
    Term(Token),
    Phrase(Vec<Token>),
}

impl QueryItem {
    fn idf_key(&self, dictionary: &Dictionary) -> f64 {
        match self {
            QueryItem::Term(t) => dictionary.term(t).map(|e| e.idf).unwrap_or(0.0),
            QueryItem::Phrase(tokens) => tokens
                .iter()
                .map(|t| dictionary.term(t).map(|e| e.idf).unwrap_or(0.0))
                .sum(),
        }
    }

    fn doc_ids(&self, dictionary: &Dictionary, reader: &mut PostingsReader) -> Result<Vec<DocId>> {
        match self {
            QueryItem::Term(t) => match dictionary.term(t) {
                Some(entry) => {
                    let list = reader.read_postings_list::<crate::postings::types::Posting>(&entry.ranked)?;
                    Ok(list.iter().map(|p| p.doc_id.clone()).collect())
                }
                None => Ok(Vec::new()),
            },
            QueryItem::Phrase(tokens) => {
                let list = resolve_phrase(tokens, dictionary, reader)?;
                Ok(list.iter().map(|p| p.doc_id.clone()).collect())
            }
        }
    }
}

/// Pure conjunction over a heterogeneous list of terms/phrases (§4.7).
/// Items are ordered rarest-first by summed idf before folding, so the
/// cheapest intersections run first and an empty intermediate short-circuits.
/// Grounded on `original_source/boolean_retrieval.py::perform_boolean_query`.
pub fn boolean_query(
    items: &[QueryItem],
    dictionary: &Dictionary,
    reader: &mut PostingsReader,
) -> Result<Vec<DocId>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let mut ordered: Vec<&QueryItem> = items.iter().collect();
    ordered.sort_by(|a, b| {
        b.idf_key(dictionary)
            .partial_cmp(&a.idf_key(dictionary))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut accumulator = PostingsList::from_values(ordered[0].doc_ids(dictionary, reader)?);

    for item in &ordered[1..] {
        if accumulator.is_empty() {
            break;
        }
        let next = PostingsList::from_values(item.doc_ids(dictionary, reader)?);
        accumulator = PostingsList::from_values(and_merge(&accumulator, &next));
    }

    Ok(accumulator.values().to_vec())
}
