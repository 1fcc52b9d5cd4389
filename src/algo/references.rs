//! Reference resolution: pair new positions with old positions.
//!
//! Walks the new collection once, asking the occurrence table for a
//! candidate old position per element. Claims are symmetric:
//!
//! ```text
//! old[i] == Some(j)  <=>  new[j] == Some(i)
//! ```

use crate::id::DiffId;

use super::occurrence::OccurrenceTable;

/// Bidirectional index pairing between the old and new collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    /// `old[i]`: new position matched to old position `i`.
    pub old: Vec<Option<usize>>,
    /// `new[j]`: old position matched to new position `j`.
    pub new: Vec<Option<usize>>,
}

impl References {
    /// Unmatched references for collections of the given lengths.
    pub fn unmatched(old_len: usize, new_len: usize) -> Self {
        Self {
            old: vec![None; old_len],
            new: vec![None; new_len],
        }
    }

    /// Pair `old_index` with `new_index` unless either side is taken or out
    /// of range.
    ///
    /// Returns whether the claim succeeded.
    pub fn claim(&mut self, old_index: usize, new_index: usize) -> bool {
        match (self.old.get(old_index), self.new.get(new_index)) {
            (Some(None), Some(None)) => {
                self.old[old_index] = Some(new_index);
                self.new[new_index] = Some(old_index);
                true
            }
            _ => false,
        }
    }

    /// Whether `old_index` is already paired. Out-of-range positions are not.
    #[inline]
    pub fn is_claimed(&self, old_index: usize) -> bool {
        self.new_of(old_index).is_some()
    }

    /// New position matched to `old_index`, if any.
    #[inline]
    pub fn new_of(&self, old_index: usize) -> Option<usize> {
        self.old.get(old_index).copied().flatten()
    }

    /// Old position matched to `new_index`, if any.
    #[inline]
    pub fn old_of(&self, new_index: usize) -> Option<usize> {
        self.new.get(new_index).copied().flatten()
    }

    /// Number of matched pairs.
    pub fn matched_count(&self) -> usize {
        self.old.iter().filter(|r| r.is_some()).count()
    }

    /// Whether every match is mirrored on the other side.
    pub fn is_symmetric(&self) -> bool {
        let forward = self
            .old
            .iter()
            .enumerate()
            .all(|(i, r)| r.is_none_or(|j| self.old_of(j) == Some(i)));
        let backward = self
            .new
            .iter()
            .enumerate()
            .all(|(j, r)| r.is_none_or(|i| self.new_of(i) == Some(j)));
        forward && backward
    }
}

/// Match new elements to old elements by identity.
///
/// `old` and `new` yield `(position, identity)` pairs in increasing position
/// order. Positions that are left out of either iterator stay unmatched;
/// positions at or beyond `old_len` / `new_len` never match.
pub fn resolve_references(
    old: impl IntoIterator<Item = (usize, DiffId)>,
    old_len: usize,
    new: impl IntoIterator<Item = (usize, DiffId)>,
    new_len: usize,
) -> References {
    let mut table = OccurrenceTable::build(old);
    let mut references = References::unmatched(old_len, new_len);

    for (new_index, id) in new {
        // An identity absent from the table is an insert candidate.
        if let Some(old_index) = table.candidate(&id) {
            references.claim(old_index, new_index);
        }
    }

    references
}
