use crate::postings::types::Keyed;

/// Minimum gap between consecutive skip points below which skipping isn't
/// worth the bookkeeping. Mirrors `SKIP_INTERVAL_THRESHOLD` in the reference
/// implementation's linked-list postings structure.
const SKIP_INTERVAL_THRESHOLD: usize = 3;

/// An ordered sequence of `T`, augmented with sparse forward skip pointers
/// (§3, §4.1). Skips are stored as a parallel array (`index -> target index`),
/// never as per-element heap allocation, and are rebuilt from scratch by
/// `build_skips` — they are a pure function of `len()`, so they are never
/// serialized (see the postings codec).
#[derive(Debug, Clone, Default)]
pub struct PostingsList<T> {
    values: Vec<T>,
    skips: Vec<Option<usize>>,
}

impl<T: Keyed> PostingsList<T> {
    pub fn new() -> Self {
        PostingsList {
            values: Vec::new(),
            skips: Vec::new(),
        }
    }

    pub fn from_values(values: Vec<T>) -> Self {
        let mut list = PostingsList {
            values,
            skips: Vec::new(),
        };
        list.build_skips();
        list
    }

    pub fn append(&mut self, value: T) {
        self.values.push(value);
        self.skips.clear();
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = T>) {
        self.values.extend(iter);
        self.skips.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Recompute the skip layout per the §3 construction rule: with `n = len`,
    /// `k = floor(sqrt(n))`; no skips if `k == 0`; `interval = (n - 1) / k`; no
    /// skips if `interval < SKIP_INTERVAL_THRESHOLD`; otherwise place skips at
    /// indices `0, interval, 2*interval, ..., k*interval`, each pointing
    /// forward by `interval`.
    pub fn build_skips(&mut self) {
        let n = self.values.len();
        self.skips = vec![None; n];

        let k = (n as f64).sqrt() as usize;
        if k == 0 {
            return;
        }
        let interval = (n - 1) / k;
        if interval < SKIP_INTERVAL_THRESHOLD {
            return;
        }

        for m in 0..=k {
            let idx = m * interval;
            if idx >= n {
                break;
            }
            let target = idx + interval;
            if target < n {
                self.skips[idx] = Some(target);
            }
        }
    }

    pub fn head(&self) -> Option<Cursor<'_, T>> {
        if self.values.is_empty() {
            None
        } else {
            Some(Cursor { list: self, index: 0 })
        }
    }
}

/// A lightweight, immutable handle into a `PostingsList`. Cursors borrow the
/// list; the list is never mutated while a cursor is live for the duration of
/// a merge, which the borrow checker enforces since `append`/`extend` need
/// `&mut self`.
#[derive(Clone, Copy)]
pub struct Cursor<'a, T> {
    list: &'a PostingsList<T>,
    index: usize,
}

impl<'a, T: Keyed> Cursor<'a, T> {
    pub fn value(&self) -> &'a T {
        &self.list.values[self.index]
    }

    pub fn key(&self) -> T::Key {
        self.value().key()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&self) -> Option<Cursor<'a, T>> {
        let next_index = self.index + 1;
        if next_index < self.list.values.len() {
            Some(Cursor { list: self.list, index: next_index })
        } else {
            None
        }
    }

    /// Follows the skip pointer at this position, if one was built.
    pub fn skip(&self) -> Option<Cursor<'a, T>> {
        self.list.skips.get(self.index).copied().flatten().map(|target| Cursor {
            list: self.list,
            index: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(values: Vec<u32>) -> PostingsList<u32> {
        PostingsList::from_values(values)
    }

    #[test]
    fn no_skips_below_threshold() {
        // n=6 -> k=2, interval=(6-1)/2=2 < 3, so no skips.
        let list = list_of((0..6).collect());
        assert!(list.skips.iter().all(|s| s.is_none()));
    }

    #[test]
    fn skips_placed_at_interval() {
        // n=11 -> k=3, interval=(11-1)/3=3.
        let list = list_of((0..11).collect());
        assert_eq!(list.skips[0], Some(3));
        assert_eq!(list.skips[3], Some(6));
        assert_eq!(list.skips[6], Some(9));
        assert_eq!(list.skips[9], None); // 9+3=12 is out of range
    }

    #[test]
    fn empty_list_has_no_skips() {
        let list: PostingsList<u32> = PostingsList::new();
        assert!(list.head().is_none());
    }

    #[test]
    fn cursor_walks_and_skips() {
        let list = list_of((0..11).collect());
        let head = list.head().unwrap();
        assert_eq!(head.key(), 0);
        let skipped = head.skip().unwrap();
        assert_eq!(skipped.key(), 3);
        let next = head.next().unwrap();
        assert_eq!(next.key(), 1);
    }
}
