use crate::core::error::Result;
use crate::core::types::Token;
use crate::index::dictionary::Dictionary;
use crate::postings::codec::PostingsReader;
use crate::postings::list::PostingsList;
use crate::postings::types::PositionalPosting;
use crate::search::merge::positional_adjacency_merge;

/// Reduces an ordered n-gram to the postings list of documents where it
/// occurs contiguously, via repeated positional-adjacency merge (§4.6).
/// Grounded on `original_source/phrasal_retrieval.py::retrieve_phrase`.
pub fn resolve_phrase(
    tokens: &[Token],
    dictionary: &Dictionary,
    reader: &mut PostingsReader,
) -> Result<PostingsList<PositionalPosting>> {
    let mut tokens = tokens.iter();

    let first = match tokens.next() {
        Some(t) => t,
        None => return Ok(PostingsList::from_values(Vec::new())),
    };

    let mut running = match dictionary.term(first) {
        Some(entry) => reader.read_positional_postings_list(&entry.positional)?,
        None => return Ok(PostingsList::from_values(Vec::new())),
    };

    for token in tokens {
        let entry = match dictionary.term(token) {
            Some(entry) => entry,
            None => return Ok(PostingsList::from_values(Vec::new())),
        };
        let next = reader.read_positional_postings_list(&entry.positional)?;
        running = positional_adjacency_merge(&running, &next);
        if running.is_empty() {
            break;
        }
    }

    Ok(running)
}
