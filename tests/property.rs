mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use tempfile::tempdir;

use common::InMemorySource;
use retrieva::core::config::RetrievalConfig;
use retrieva::core::normalizer::StandardNormalizer;
use retrieva::core::types::{DocId, Token};
use retrieva::index::dictionary::Dictionary;
use retrieva::index::indexer::build_index;
use retrieva::postings::codec::{PostingsReader, PostingsWriter};
use retrieva::postings::list::PostingsList;
use retrieva::postings::types::{PositionalPosting, Posting};
use retrieva::scoring::ranked::ranked_search;
use retrieva::search::merge::{and_merge, positional_adjacency_merge};
use retrieva::search::phrase::resolve_phrase;

fn doc_ids(ids: &BTreeSet<u32>) -> Vec<DocId> {
    ids.iter().map(|n| DocId::new(format!("doc-{:06}", n))).collect()
}

proptest! {
    /// Invariant 1: a postings list built from an arbitrary id set is strictly
    /// ascending by DocId.
    #[test]
    fn postings_list_is_strictly_ascending(ids in prop::collection::btree_set(0u32..2000, 0..200)) {
        let values = doc_ids(&ids);
        let list: PostingsList<DocId> = PostingsList::from_values(values.clone());
        let collected: Vec<&DocId> = list.iter().collect();
        let expected: Vec<&DocId> = values.iter().collect();
        prop_assert_eq!(collected, expected);
        for window in list.values().windows(2) {
            prop_assert!(window[0] < window[1]);
        }
    }

    /// Invariant 3: every skip target lands strictly ahead of its source and
    /// within bounds, and targets the expected doc id.
    #[test]
    fn skip_targets_are_in_bounds(ids in prop::collection::btree_set(0u32..2000, 0..500)) {
        let values = doc_ids(&ids);
        let n = values.len();
        let list: PostingsList<DocId> = PostingsList::from_values(values);

        let mut cursor = list.head();
        while let Some(c) = cursor {
            if let Some(target) = c.skip() {
                prop_assert!(target.index() > c.index());
                prop_assert!(target.index() < n);
            }
            cursor = c.next();
        }
    }

    /// Invariant 4: AND is commutative on the resulting DocId set.
    #[test]
    fn and_merge_is_commutative(
        a in prop::collection::btree_set(0u32..500, 0..100),
        b in prop::collection::btree_set(0u32..500, 0..100),
    ) {
        let list_a: PostingsList<DocId> = PostingsList::from_values(doc_ids(&a));
        let list_b: PostingsList<DocId> = PostingsList::from_values(doc_ids(&b));

        let forward = and_merge(&list_a, &list_b);
        let backward = and_merge(&list_b, &list_a);
        prop_assert_eq!(forward, backward);
    }

    /// Invariant 5: AND with an empty operand is empty.
    #[test]
    fn and_merge_with_empty_is_empty(a in prop::collection::btree_set(0u32..500, 0..100)) {
        let list_a: PostingsList<DocId> = PostingsList::from_values(doc_ids(&a));
        let empty: PostingsList<DocId> = PostingsList::from_values(Vec::new());
        prop_assert!(and_merge(&list_a, &empty).is_empty());
        prop_assert!(and_merge(&empty, &list_a).is_empty());
    }

    /// Invariant 10: a postings record round-trips through the codec exactly.
    #[test]
    fn codec_round_trips(ids in prop::collection::btree_set(0u32..2000, 0..200)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("postings.bin");
        let values = doc_ids(&ids);

        let mut writer = PostingsWriter::create(&path).unwrap();
        let slice = writer.write_record(&values).unwrap();
        writer.flush().unwrap();

        let mut reader = PostingsReader::open(&path).unwrap();
        let list: PostingsList<DocId> = reader.read_postings_list(&slice).unwrap();
        prop_assert_eq!(list.values().to_vec(), values);
    }

    /// Invariant 2: for every token, the ranked and positional postings
    /// lists project to the same DocId set.
    #[test]
    fn ranked_and_positional_lists_cover_the_same_docs(
        doc_words in prop::collection::vec(
            prop::collection::vec("(cat|dog|bird|fish)", 0..6),
            1..6,
        ),
    ) {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("dictionary.bin");
        let postings_path = dir.path().join("postings.bin");

        let docs: Vec<(String, String)> = doc_words
            .iter()
            .enumerate()
            .map(|(i, words)| (format!("doc-{:03}", i), words.join(" ")))
            .collect();
        let docs_ref: Vec<(&str, &str)> = docs.iter().map(|(id, w)| (id.as_str(), w.as_str())).collect();

        let mut source = InMemorySource::new(docs_ref);
        let normalizer = StandardNormalizer::new();
        build_index(&mut source, &normalizer, 2, &dict_path, &postings_path).unwrap();

        let dictionary = Dictionary::load(&dict_path).unwrap();
        let mut reader = PostingsReader::open(&postings_path).unwrap();

        for entry in dictionary.terms.values() {
            let ranked: PostingsList<Posting> = reader.read_postings_list(&entry.ranked).unwrap();
            let positional: PostingsList<PositionalPosting> =
                reader.read_positional_postings_list(&entry.positional).unwrap();

            let ranked_docs: BTreeSet<DocId> = ranked.iter().map(|p| p.doc_id.clone()).collect();
            let positional_docs: BTreeSet<DocId> = positional.iter().map(|p| p.doc_id.clone()).collect();
            prop_assert_eq!(ranked_docs, positional_docs);
        }
    }

    /// Invariant 6: a positional self-merge of a term against itself yields,
    /// for each document, exactly the positions `p` where `p-1` is also a
    /// position of that term in the same document.
    #[test]
    fn positional_self_merge_finds_consecutive_offsets(
        doc_positions in prop::collection::vec(prop::collection::btree_set(0u32..50, 0..10), 1..5)
    ) {
        let mut postings: Vec<PositionalPosting> = doc_positions
            .iter()
            .enumerate()
            .filter(|(_, positions)| !positions.is_empty())
            .map(|(i, positions)| {
                PositionalPosting::new(DocId::new(format!("doc-{:03}", i)), positions.iter().copied().collect())
            })
            .collect();
        postings.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));

        let list = PostingsList::from_values(postings.clone());
        let merged = positional_adjacency_merge(&list, &list);

        for posting in &postings {
            let expected: Vec<u32> = posting
                .positions
                .iter()
                .copied()
                .filter(|p| *p > 0 && posting.positions.contains(&(p - 1)))
                .collect();
            let actual = merged
                .iter()
                .find(|m| m.doc_id == posting.doc_id)
                .map(|m| m.positions.clone())
                .unwrap_or_default();
            prop_assert_eq!(actual, expected);
        }
    }

    /// Invariant 8: cosine scores are invariant under uniform positive
    /// scaling of the query vector, up to tie-broken ordering — so repeating
    /// the whole query text (scaling every token's count by the same factor)
    /// leaves the ranked result unchanged.
    #[test]
    fn cosine_ranking_is_scale_invariant_under_query_repetition(repeats in 1usize..6) {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("dictionary.bin");
        let postings_path = dir.path().join("postings.bin");

        let mut source = InMemorySource::new(vec![("d1", "cat cat dog"), ("d2", "cat"), ("d3", "dog bird")]);
        let normalizer = StandardNormalizer::new();
        build_index(&mut source, &normalizer, 2, &dict_path, &postings_path).unwrap();

        let dictionary = Dictionary::load(&dict_path).unwrap();
        let mut reader = PostingsReader::open(&postings_path).unwrap();
        let config = RetrievalConfig::default();

        let base = ranked_search("cat dog", &[], &dictionary, &mut reader, &normalizer, None, &config).unwrap();
        let scaled_query = std::iter::repeat("cat dog").take(repeats).collect::<Vec<_>>().join(" ");
        let scaled = ranked_search(&scaled_query, &[], &dictionary, &mut reader, &normalizer, None, &config).unwrap();

        prop_assert_eq!(base, scaled);
    }

    /// Invariant 9: Rocchio feedback with alpha=1, beta=0 reproduces the
    /// unexpanded query exactly, regardless of which documents are marked
    /// relevant.
    #[test]
    fn rocchio_alpha_one_beta_zero_equals_unexpanded_query(relevant_idx in prop::collection::vec(0usize..3, 1..4)) {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("dictionary.bin");
        let postings_path = dir.path().join("postings.bin");

        let mut source = InMemorySource::new(vec![("d1", "cat cat dog"), ("d2", "cat"), ("d3", "dog bird")]);
        let normalizer = StandardNormalizer::new();
        build_index(&mut source, &normalizer, 2, &dict_path, &postings_path).unwrap();

        let dictionary = Dictionary::load(&dict_path).unwrap();
        let mut reader = PostingsReader::open(&postings_path).unwrap();

        let doc_ids = [DocId::new("d1"), DocId::new("d2"), DocId::new("d3")];
        let relevant: Vec<DocId> = relevant_idx.iter().map(|&i| doc_ids[i].clone()).collect();

        let plain = RetrievalConfig::default();
        let without_feedback =
            ranked_search("cat dog", &[], &dictionary, &mut reader, &normalizer, None, &plain).unwrap();

        let feedback_config = RetrievalConfig {
            relevance_feedback: true,
            alpha: 1.0,
            beta: 0.0,
            ..RetrievalConfig::default()
        };
        let with_feedback = ranked_search(
            "cat dog",
            &relevant,
            &dictionary,
            &mut reader,
            &normalizer,
            None,
            &feedback_config,
        )
        .unwrap();

        prop_assert_eq!(without_feedback, with_feedback);
    }
}

/// Invariant 7: resolving a one-token phrase equals the positional projection
/// of that token directly.
#[test]
fn one_token_phrase_equals_positional_projection() {
    let dir = tempdir().unwrap();
    let dict_path = dir.path().join("dictionary.bin");
    let postings_path = dir.path().join("postings.bin");

    let mut source = InMemorySource::new(vec![("d1", "alpha beta"), ("d2", "beta gamma")]);
    let normalizer = StandardNormalizer::new();
    build_index(&mut source, &normalizer, 2, &dict_path, &postings_path).unwrap();

    let dictionary = Dictionary::load(&dict_path).unwrap();
    let mut reader = PostingsReader::open(&postings_path).unwrap();

    let token = normalizer.normalize("beta");
    let entry = dictionary.term(&token).unwrap();
    let direct: PostingsList<PositionalPosting> = reader.read_positional_postings_list(&entry.positional).unwrap();

    let resolved = resolve_phrase(&[token], &dictionary, &mut reader).unwrap();

    assert_eq!(
        resolved.iter().map(|p| p.doc_id.clone()).collect::<Vec<_>>(),
        direct.iter().map(|p| p.doc_id.clone()).collect::<Vec<_>>()
    );
}

/// A phrase resolver short-circuits to empty when any constituent token is
/// absent from the dictionary, without needing a matching positional merge.
#[test]
fn phrase_with_missing_token_is_empty() {
    let dir = tempdir().unwrap();
    let dict_path = dir.path().join("dictionary.bin");
    let postings_path = dir.path().join("postings.bin");

    let mut source = InMemorySource::new(vec![("d1", "alpha beta")]);
    let normalizer = StandardNormalizer::new();
    build_index(&mut source, &normalizer, 2, &dict_path, &postings_path).unwrap();

    let dictionary = Dictionary::load(&dict_path).unwrap();
    let mut reader = PostingsReader::open(&postings_path).unwrap();

    let tokens = vec![normalizer.normalize("alpha"), normalizer.normalize("nonexistent")];
    let result = resolve_phrase(&tokens, &dictionary, &mut reader).unwrap();
    assert!(result.is_empty());
}

/// Sanity check that the positional-adjacency merge used by the phrase
/// resolver never produces a doc entry with an empty position list.
#[test]
fn positional_adjacency_merge_never_emits_empty_positions() {
    let a = PostingsList::from_values(vec![
        PositionalPosting::new(DocId::new("d1"), vec![0, 5]),
        PositionalPosting::new(DocId::new("d2"), vec![2]),
    ]);
    let b = PostingsList::from_values(vec![
        PositionalPosting::new(DocId::new("d1"), vec![1]),
        PositionalPosting::new(DocId::new("d2"), vec![9]),
    ]);

    let merged = positional_adjacency_merge(&a, &b);
    for posting in merged.iter() {
        assert!(!posting.positions.is_empty());
    }
}
