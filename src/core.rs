//! Core traits: the identity & update contract.
//!
//! - [`Diffable`]: identity for matching, content comparison for updates
//! - [`Section`]: a diffable element holding an ordered list of items
//! - [`SectionMut`]: write access to those items, for in-memory application

use crate::id::DiffId;

// =============================================================================
// Diffable
// =============================================================================

/// An element that can take part in a diff.
///
/// `diff_id` must stay stable for the duration of one diff call. Identity
/// equality does not imply content equality: a matched pair whose
/// `should_update` returns `true` produces an `Update` operation.
///
/// # Example
///
/// ```
/// use section_diff::{DiffId, Diffable};
///
/// struct Row { key: u32, label: String }
///
/// impl Diffable for Row {
///     fn diff_id(&self) -> DiffId {
///         DiffId::from(self.key)
///     }
///
///     fn should_update(&self, other: &Self) -> bool {
///         self.label != other.label
///     }
/// }
/// ```
pub trait Diffable {
    /// Identity used to find candidate matches.
    fn diff_id(&self) -> DiffId;

    /// Whether `self` (new) differs in content from `other` (old).
    fn should_update(&self, other: &Self) -> bool;
}

impl<T: Diffable + ?Sized> Diffable for &T {
    #[inline]
    fn diff_id(&self) -> DiffId {
        (**self).diff_id()
    }

    #[inline]
    fn should_update(&self, other: &Self) -> bool {
        (**self).should_update(*other)
    }
}

impl<T: Diffable + ?Sized> Diffable for Box<T> {
    #[inline]
    fn diff_id(&self) -> DiffId {
        (**self).diff_id()
    }

    #[inline]
    fn should_update(&self, other: &Self) -> bool {
        (**self).should_update(&**other)
    }
}

// =============================================================================
// Sections
// =============================================================================

/// A diffable section that owns an ordered list of diffable items.
///
/// The section's own `should_update` should compare section-level content
/// (headers, footers) only. Item changes are reported at item level.
pub trait Section: Diffable {
    type Item: Diffable;

    fn items(&self) -> &[Self::Item];
}

/// Mutable item access, required to apply an operation set in memory.
pub trait SectionMut: Section {
    fn items_mut(&mut self) -> &mut Vec<Self::Item>;
}
