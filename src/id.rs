//! Identity values used to pair old and new elements.
//!
//! A [`DiffId`] only nominates *candidate* matches. Two elements sharing an
//! identity may still differ in content; that is what
//! [`Diffable::should_update`](crate::core::Diffable::should_update) decides.
//!
//! # Composite Identity
//!
//! Items inside sections are diffed as one flat sequence. Each item gets a
//! composite identity made of its section identity and its own identity:
//!
//! ```text
//! "fruits" + U+001F + "apple"  =>  "fruits\u{1f}apple"
//! ```
//!
//! The separator is [`COMPOSITE_SEPARATOR`]. Callers must not put it inside
//! their own identities; the engine does not check this, and a collision
//! silently merges two unrelated items into one identity.

use std::fmt;

use compact_str::{CompactString, ToCompactString};

/// Separator placed between a section identity and an item identity.
///
/// U+001F (INFORMATION SEPARATOR ONE) does not occur in printable
/// identifiers, keys or UUIDs.
pub const COMPOSITE_SEPARATOR: char = '\u{1f}';

// =============================================================================
// DiffId
// =============================================================================

/// Opaque identity of a diffable element.
///
/// # Memory Layout
///
/// - 24 bytes (inline `CompactString`)
/// - Identities up to 24 bytes never allocate
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DiffId(CompactString);

impl DiffId {
    /// Create an identity from any string-like value.
    #[inline]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(CompactString::new(id.as_ref()))
    }

    /// Join a section identity and an item identity.
    ///
    /// ```
    /// use section_diff::id::DiffId;
    ///
    /// let id = DiffId::composite(&DiffId::new("s"), &DiffId::new("i"));
    /// assert_eq!(id.split_composite(), Some(("s", "i")));
    /// ```
    pub fn composite(section: &DiffId, item: &DiffId) -> Self {
        let mut joined =
            CompactString::with_capacity(section.0.len() + COMPOSITE_SEPARATOR.len_utf8() + item.0.len());
        joined.push_str(&section.0);
        joined.push(COMPOSITE_SEPARATOR);
        joined.push_str(&item.0);
        Self(joined)
    }

    /// Split a composite identity back into `(section, item)`.
    ///
    /// Returns `None` for identities built without [`DiffId::composite`].
    pub fn split_composite(&self) -> Option<(&str, &str)> {
        self.0.split_once(COMPOSITE_SEPARATOR)
    }

    /// Borrow the identity as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DiffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.split_composite() {
            Some((section, item)) => write!(f, "DiffId({section:?}/{item:?})"),
            None => write!(f, "DiffId({:?})", self.as_str()),
        }
    }
}

impl fmt::Display for DiffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.split_composite() {
            Some((section, item)) => write!(f, "{section}/{item}"),
            None => f.write_str(self.as_str()),
        }
    }
}

impl AsRef<str> for DiffId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for DiffId {
    fn from(id: &str) -> Self {
        Self(CompactString::new(id))
    }
}

impl From<String> for DiffId {
    fn from(id: String) -> Self {
        Self(CompactString::from(id))
    }
}

impl From<&String> for DiffId {
    fn from(id: &String) -> Self {
        Self::from(id.as_str())
    }
}

impl From<CompactString> for DiffId {
    fn from(id: CompactString) -> Self {
        Self(id)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for DiffId {
                #[inline]
                fn from(id: $ty) -> Self {
                    Self(id.to_compact_string())
                }
            }
        )*
    };
}

impl_from_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

// =============================================================================
// Tests
// =============================================================================
