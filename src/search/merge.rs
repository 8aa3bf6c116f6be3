use crate::core::types::DocId;
use crate::postings::list::PostingsList;
use crate::postings::types::{Keyed, PositionalPosting};

/// Skip-aware conjunction over two DocId-ordered postings lists. Grounded on
/// `original_source/boolean_retrieval.py::perform_and` (§4.5).
pub fn and_merge<T, U>(a: &PostingsList<T>, b: &PostingsList<U>) -> Vec<DocId>
where
    T: Keyed<Key = DocId>,
    U: Keyed<Key = DocId>,
{
    let mut result = Vec::new();
    let mut ca = a.head();
    let mut cb = b.head();

    while let (Some(ac), Some(bc)) = (ca, cb) {
        let ak = ac.key();
        let bk = bc.key();

        if ak == bk {
            result.push(ak);
            ca = ac.next();
            cb = bc.next();
        } else if ak < bk {
            ca = match ac.skip() {
                Some(s) if s.key() <= bk => Some(s),
                _ => ac.next(),
            };
            cb = Some(bc);
        } else {
            cb = match bc.skip() {
                Some(s) if s.key() <= ak => Some(s),
                _ => bc.next(),
            };
            ca = Some(ac);
        }
    }

    result
}

/// Inner skip-aware walk over two ascending position lists, matching
/// `before.pos == after.pos - 1`. Returns the ascending positions of the
/// *second* token of each matched pair, so the result composes into an
/// n-gram match by another adjacency merge against the next term. Grounded
/// on `original_source/phrasal_retrieval.py::merge_positions`.
fn merge_positions(before: &[u32], after: &[u32]) -> Vec<u32> {
    let before_list: PostingsList<u32> = PostingsList::from_values(before.to_vec());
    let after_list: PostingsList<u32> = PostingsList::from_values(after.to_vec());

    let mut result = Vec::new();
    let mut bc = before_list.head();
    let mut ac = after_list.head();

    while let (Some(b), Some(a)) = (bc, ac) {
        let bv = b.key();
        let av = a.key();

        if bv + 1 == av {
            result.push(av);
            bc = b.next();
            ac = a.next();
        } else if bv + 1 < av {
            bc = match b.skip() {
                Some(s) if s.key() + 1 <= av => Some(s),
                _ => b.next(),
            };
            ac = Some(a);
        } else {
            ac = match a.skip() {
                Some(s) if s.key() <= bv + 1 => Some(s),
                _ => a.next(),
            };
            bc = Some(b);
        }
    }

    result
}

/// Skip-aware outer walk over two positional postings lists, pairing
/// documents shared by both and reducing their position lists via
/// `merge_positions`. Grounded on
/// `original_source/phrasal_retrieval.py::merge_positional_indexes` (§4.5).
pub fn positional_adjacency_merge(
    before: &PostingsList<PositionalPosting>,
    after: &PostingsList<PositionalPosting>,
) -> PostingsList<PositionalPosting> {
    let mut result = Vec::new();
    let mut bc = before.head();
    let mut ac = after.head();

    while let (Some(b), Some(a)) = (bc, ac) {
        let bk = b.key();
        let ak = a.key();

        if bk == ak {
            let merged = merge_positions(&b.value().positions, &a.value().positions);
            if !merged.is_empty() {
                result.push(PositionalPosting::new(bk.clone(), merged));
            }
            bc = b.next();
            ac = a.next();
        } else if bk < ak {
            bc = match b.skip() {
                Some(s) if s.key() <= ak => Some(s),
                _ => b.next(),
            };
            ac = Some(a);
        } else {
            ac = match a.skip() {
                Some(s) if s.key() <= bk => Some(s),
                _ => a.next(),
            };
            bc = Some(b);
        }
    }

    PostingsList::from_values(result)
}
