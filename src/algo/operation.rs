//! Edit operations produced by a diff.

use std::fmt;

/// A single edit, generic over its position type.
///
/// Flat diffs use `usize`; sectioned item diffs use
/// [`ItemPath`](super::ItemPath). Source positions refer to the old
/// collection, targets to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation<I> {
    /// Element at this new position has no old counterpart.
    Insert(I),
    /// Element at this old position has no new counterpart.
    Delete(I),
    /// Matched element moves from old position to new position.
    Move(I, I),
    /// Matched element at this new position changed content.
    Update(I),
}

/// Discriminant of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Insert,
    Delete,
    Move,
    Update,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Update => "update",
        })
    }
}

impl<I> Operation<I> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Insert(_) => OperationKind::Insert,
            Self::Delete(_) => OperationKind::Delete,
            Self::Move(..) => OperationKind::Move,
            Self::Update(_) => OperationKind::Update,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete(_))
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move(..))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    /// Old-side position (Delete, Move source).
    pub fn source(&self) -> Option<&I> {
        match self {
            Self::Delete(source) | Self::Move(source, _) => Some(source),
            Self::Insert(_) | Self::Update(_) => None,
        }
    }

    /// New-side position (Insert, Update, Move target).
    pub fn target(&self) -> Option<&I> {
        match self {
            Self::Insert(target) | Self::Update(target) | Self::Move(_, target) => Some(target),
            Self::Delete(_) => None,
        }
    }

    /// Convert positions, mapping old-side and new-side positions separately.
    pub fn map<J>(self, mut source: impl FnMut(I) -> J, mut target: impl FnMut(I) -> J) -> Operation<J> {
        match self {
            Self::Insert(i) => Operation::Insert(target(i)),
            Self::Delete(i) => Operation::Delete(source(i)),
            Self::Move(from, to) => Operation::Move(source(from), target(to)),
            Self::Update(i) => Operation::Update(target(i)),
        }
    }
}

impl<I: fmt::Display> fmt::Display for Operation<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(i) => write!(f, "insert {i}"),
            Self::Delete(i) => write!(f, "delete {i}"),
            Self::Move(from, to) => write!(f, "move {from} -> {to}"),
            Self::Update(i) => write!(f, "update {i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides() {
        let op = Operation::Move(1, 4);
        assert_eq!(op.source(), Some(&1));
        assert_eq!(op.target(), Some(&4));
        assert_eq!(Operation::Delete(2).target(), None);
        assert_eq!(Operation::Insert(2).source(), None);
    }

    #[test]
    fn test_map_uses_side_specific_mapping() {
        let op = Operation::Move(1, 4).map(|i| i * 10, |i| i + 100);
        assert_eq!(op, Operation::Move(10, 104));

        let op = Operation::Update(3).map(|i| i * 10, |i| i + 100);
        assert_eq!(op, Operation::Update(103));
    }

    #[test]
    fn test_kind_and_display() {
        assert_eq!(Operation::Insert(0).kind(), OperationKind::Insert);
        assert!(Operation::<usize>::Move(0, 1).is_move());
        assert_eq!(Operation::Move(0, 2).to_string(), "move 0 -> 2");
        assert_eq!(OperationKind::Update.to_string(), "update");
    }
}
