//! Occurrence table: where each identity sits in the old collection.
//!
//! ```text
//! old:    [A, B, A, C, A]
//!
//! table:  A -> Many([0, 2, 4], next = 0)
//!         B -> Unique(1)
//!         C -> Unique(3)
//! ```
//!
//! Duplicates keep their positions in old order. Resolution pops them in the
//! same order, so the k-th new `A` pairs with the k-th old `A`.

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::id::DiffId;

// =============================================================================
// IndexCursor
// =============================================================================

/// FIFO cursor over every old position recorded for one identity.
///
/// Owned by value inside its table entry; popping advances `next` instead of
/// shifting the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCursor {
    indices: SmallVec<[usize; 4]>,
    next: usize,
}

impl IndexCursor {
    /// Start a cursor from the first two sightings of an identity.
    pub fn new(first: usize, second: usize) -> Self {
        Self {
            indices: smallvec![first, second],
            next: 0,
        }
    }

    /// Record one more old position.
    #[inline]
    pub fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    /// Take the next unconsumed position, oldest first.
    #[inline]
    pub fn pop(&mut self) -> Option<usize> {
        let index = self.indices.get(self.next).copied()?;
        self.next += 1;
        Some(index)
    }

    /// Number of positions not yet popped.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.indices.len() - self.next
    }

    /// All recorded positions, consumed or not.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

// =============================================================================
// Occurrence
// =============================================================================

/// How often an identity appeared in the old collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occurrence {
    /// Seen exactly once, at this position.
    Unique(usize),
    /// Seen two or more times.
    Many(IndexCursor),
}

impl Occurrence {
    fn record(&mut self, index: usize) {
        match self {
            Self::Unique(first) => {
                let first = *first;
                *self = Self::Many(IndexCursor::new(first, index));
            }
            Self::Many(cursor) => cursor.push(index),
        }
    }
}

// =============================================================================
// OccurrenceTable
// =============================================================================

/// Identity → old position(s), built in one pass over the old collection.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceTable {
    entries: FxHashMap<DiffId, Occurrence>,
}

impl OccurrenceTable {
    /// Build the table from `(old position, identity)` pairs.
    ///
    /// Positions must arrive in increasing order. Gaps are allowed: the
    /// sectioned diff leaves out items under deleted sections.
    pub fn build(old: impl IntoIterator<Item = (usize, DiffId)>) -> Self {
        let old = old.into_iter();
        let mut table = Self {
            entries: FxHashMap::with_capacity_and_hasher(old.size_hint().0, Default::default()),
        };
        for (index, id) in old {
            table.record(id, index);
        }
        table
    }

    /// Record one sighting of `id` at old position `index`.
    pub fn record(&mut self, id: DiffId, index: usize) {
        match self.entries.get_mut(&id) {
            Some(occurrence) => occurrence.record(index),
            None => {
                self.entries.insert(id, Occurrence::Unique(index));
            }
        }
    }

    /// Next old position that a new element with `id` could pair with.
    ///
    /// `Unique` entries are not consumed; the caller checks whether the
    /// position is already claimed. `Many` entries pop their cursor.
    pub fn candidate(&mut self, id: &DiffId) -> Option<usize> {
        match self.entries.get_mut(id)? {
            Occurrence::Unique(index) => Some(*index),
            Occurrence::Many(cursor) => cursor.pop(),
        }
    }

    pub fn get(&self, id: &DiffId) -> Option<&Occurrence> {
        self.entries.get(id)
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ids: &[&str]) -> OccurrenceTable {
        OccurrenceTable::build(ids.iter().enumerate().map(|(i, id)| (i, DiffId::new(id))))
    }

    #[test]
    fn test_unique_and_many() {
        let table = table(&["a", "b", "a", "c", "a"]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&DiffId::new("b")), Some(&Occurrence::Unique(1)));
        match table.get(&DiffId::new("a")) {
            Some(Occurrence::Many(cursor)) => assert_eq!(cursor.indices(), &[0, 2, 4]),
            other => panic!("expected Many, got {:?}", other),
        }
    }

    #[test]
    fn test_cursor_pops_fifo_then_exhausts() {
        let mut cursor = IndexCursor::new(3, 5);
        cursor.push(9);

        assert_eq!(cursor.remaining(), 3);
        assert_eq!(cursor.pop(), Some(3));
        assert_eq!(cursor.pop(), Some(5));
        assert_eq!(cursor.pop(), Some(9));
        assert_eq!(cursor.pop(), None);
        assert_eq!(cursor.pop(), None);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_candidate_unique_is_not_consumed() {
        let mut table = table(&["a"]);
        let id = DiffId::new("a");

        assert_eq!(table.candidate(&id), Some(0));
        assert_eq!(table.candidate(&id), Some(0));
    }

    #[test]
    fn test_candidate_many_is_consumed() {
        let mut table = table(&["x", "a", "a"]);
        let id = DiffId::new("a");

        assert_eq!(table.candidate(&id), Some(1));
        assert_eq!(table.candidate(&id), Some(2));
        assert_eq!(table.candidate(&id), None);
        assert_eq!(table.candidate(&DiffId::new("missing")), None);
    }

    #[test]
    fn test_build_with_gaps() {
        let table = OccurrenceTable::build([(2, DiffId::new("a")), (7, DiffId::new("a"))]);
        match table.get(&DiffId::new("a")) {
            Some(Occurrence::Many(cursor)) => assert_eq!(cursor.indices(), &[2, 7]),
            other => panic!("expected Many, got {:?}", other),
        }
    }
}
