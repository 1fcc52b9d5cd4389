//! Sectioned (two-level) diff.
//!
//! Runs the flat diff twice:
//!
//! ```text
//! sections:  diff(old_sections, new_sections)          -> section ops + refs
//!                       |
//!                       v  gate
//! items:     diff(flatten(old), flatten(new), refs)    -> item ops
//! ```
//!
//! Items are flattened into one sequence per side, each with a composite
//! identity (section identity + item identity). The section references gate
//! the item pass:
//!
//! - items under a deleted section are never matched and emit no delete
//! - items under an inserted section are never matched and emit no insert
//! - a matched item whose section changed is always a move
//!
//! The section-level operation already covers the gated items. They still
//! count as deleted or inserted when measuring drift.

use std::fmt;

use tracing::debug;

use crate::core::{Diffable, Section};
use crate::id::DiffId;

use super::diff::{derive_operations, diff_with_config, DiffConfig, DiffResult, Rules};
use super::operation::Operation;
use super::references::{resolve_references, References};

// =============================================================================
// Positions
// =============================================================================

/// Position of an item inside a sectioned collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section: {}, item: {}", self.section, self.item)
    }
}

/// An item position plus its composite identity.
///
/// The identity is carried for logging and debugging; consumers address
/// items through `path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemPath {
    pub id: DiffId,
    pub path: IndexPath,
}

impl ItemPath {
    pub fn new(id: DiffId, section: usize, item: usize) -> Self {
        Self {
            id,
            path: IndexPath::new(section, item),
        }
    }

    #[inline]
    pub fn section(&self) -> usize {
        self.path.section
    }

    #[inline]
    pub fn item(&self) -> usize {
        self.path.item
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.id)
    }
}

/// Source (old) and target (new) of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Moved<T> {
    pub source: T,
    pub target: T,
}

// =============================================================================
// OperationSet
// =============================================================================

/// Sectioned diff output, partitioned by level and kind.
///
/// Section positions and item sources are old coordinates for deletes and
/// move sources, new coordinates for everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct OperationSet {
    pub section_insert: Vec<usize>,
    pub section_update: Vec<usize>,
    pub section_delete: Vec<usize>,
    pub section_move: Vec<Moved<usize>>,

    pub item_insert: Vec<ItemPath>,
    pub item_update: Vec<ItemPath>,
    pub item_delete: Vec<ItemPath>,
    pub item_move: Vec<Moved<ItemPath>>,
}

impl OperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition the two flat results.
    pub fn from_results(sections: DiffResult<usize>, items: DiffResult<ItemPath>) -> Self {
        let mut set = Self::new();

        for op in sections.operations {
            match op {
                Operation::Insert(index) => set.section_insert.push(index),
                Operation::Delete(index) => set.section_delete.push(index),
                Operation::Move(source, target) => set.section_move.push(Moved { source, target }),
                Operation::Update(index) => set.section_update.push(index),
            }
        }

        for op in items.operations {
            match op {
                Operation::Insert(path) => set.item_insert.push(path),
                Operation::Delete(path) => set.item_delete.push(path),
                Operation::Move(source, target) => set.item_move.push(Moved { source, target }),
                Operation::Update(path) => set.item_update.push(path),
            }
        }

        set
    }

    pub fn section_operation_count(&self) -> usize {
        self.section_insert.len() + self.section_update.len() + self.section_delete.len() + self.section_move.len()
    }

    pub fn item_operation_count(&self) -> usize {
        self.item_insert.len() + self.item_update.len() + self.item_delete.len() + self.item_move.len()
    }

    /// Total number of operations.
    pub fn len(&self) -> usize {
        self.section_operation_count() + self.item_operation_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Diff two sectioned collections with the default configuration.
pub fn diff_sections<S: Section>(old: &[S], new: &[S]) -> OperationSet {
    diff_sections_with_config(old, new, DiffConfig::default())
}

/// Diff two sectioned collections with a custom configuration.
pub fn diff_sections_with_config<S: Section>(old: &[S], new: &[S], config: DiffConfig) -> OperationSet {
    let sections = diff_with_config(old, new, config);
    let items = diff_items(old, new, &sections.references, config);
    let set = OperationSet::from_results(sections, items);

    debug!(
        old_sections = old.len(),
        new_sections = new.len(),
        section_ops = set.section_operation_count(),
        item_ops = set.item_operation_count(),
        "sectioned diff"
    );

    set
}

/// Item stage of the sectioned diff.
///
/// `sections` must be the references produced by diffing `old` against
/// `new` at section level.
pub fn diff_items<S: Section>(
    old: &[S],
    new: &[S],
    sections: &References,
    config: DiffConfig,
) -> DiffResult<ItemPath> {
    let old_items = flatten(old);
    let new_items = flatten(new);
    let rules = ItemRules {
        old: &old_items,
        new: &new_items,
        sections,
    };

    let references = resolve_references(
        old_items
            .iter()
            .enumerate()
            .filter(|&(index, _)| !rules.skip_old(index))
            .map(|(index, flat)| (index, flat.path.id.clone())),
        old_items.len(),
        new_items
            .iter()
            .enumerate()
            .filter(|&(index, _)| !rules.skip_new(index))
            .map(|(index, flat)| (index, flat.path.id.clone())),
        new_items.len(),
    );
    let operations = derive_operations(&references, &rules, config);

    DiffResult {
        operations,
        references,
    }
    .map(|index| old_items[index].path.clone(), |index| new_items[index].path.clone())
}

// =============================================================================
// Internals
// =============================================================================

struct FlatItem<'a, T> {
    path: ItemPath,
    item: &'a T,
}

fn flatten<S: Section>(sections: &[S]) -> Vec<FlatItem<'_, S::Item>> {
    let mut flat = Vec::with_capacity(sections.iter().map(|s| s.items().len()).sum());
    for (section_index, section) in sections.iter().enumerate() {
        let section_id = section.diff_id();
        for (item_index, item) in section.items().iter().enumerate() {
            flat.push(FlatItem {
                path: ItemPath::new(DiffId::composite(&section_id, &item.diff_id()), section_index, item_index),
                item,
            });
        }
    }
    flat
}

struct ItemRules<'a, 'b, T> {
    old: &'a [FlatItem<'b, T>],
    new: &'a [FlatItem<'b, T>],
    sections: &'a References,
}

impl<T: Diffable> Rules for ItemRules<'_, '_, T> {
    fn skip_old(&self, old: usize) -> bool {
        self.sections.new_of(self.old[old].path.section()).is_none()
    }

    fn skip_new(&self, new: usize) -> bool {
        self.sections.old_of(self.new[new].path.section()).is_none()
    }

    fn relocated(&self, old: usize, new: usize) -> bool {
        self.sections.old_of(self.new[new].path.section()) != Some(self.old[old].path.section())
    }

    fn should_update(&self, old: usize, new: usize) -> bool {
        self.new[new].item.should_update(self.old[old].item)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
        version: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Group {
        id: &'static str,
        title: &'static str,
        rows: Vec<Row>,
    }

    impl Diffable for Row {
        fn diff_id(&self) -> DiffId {
            DiffId::new(self.id)
        }

        fn should_update(&self, other: &Self) -> bool {
            self.version != other.version
        }
    }

    impl Diffable for Group {
        fn diff_id(&self) -> DiffId {
            DiffId::new(self.id)
        }

        fn should_update(&self, other: &Self) -> bool {
            self.title != other.title
        }
    }

    impl Section for Group {
        type Item = Row;

        fn items(&self) -> &[Row] {
            &self.rows
        }
    }

    fn group(id: &'static str, rows: &[&'static str]) -> Group {
        Group {
            id,
            title: id,
            rows: rows.iter().map(|&id| Row { id, version: 0 }).collect(),
        }
    }

    fn paths(items: &[ItemPath]) -> Vec<(usize, usize)> {
        items.iter().map(|p| (p.section(), p.item())).collect()
    }

    #[test]
    fn test_identical_sections() {
        let old = vec![group("s0", &["a", "b"]), group("s1", &["c"])];
        let set = diff_sections(&old, &old.clone());
        assert!(set.is_empty());
    }

    #[test]
    fn test_deleted_section_excludes_items() {
        let set = diff_sections(&[group("s0", &["i0", "i1"])], &[]);

        assert_eq!(set.section_delete, vec![0]);
        assert_eq!(set.item_operation_count(), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_inserted_section_excludes_items() {
        let set = diff_sections(&[group("s0", &["a"])], &[group("s0", &["a"]), group("s1", &["b", "c"])]);

        assert_eq!(set.section_insert, vec![1]);
        assert_eq!(set.item_operation_count(), 0);
    }

    #[test]
    fn test_item_insert_delete_within_section() {
        let set = diff_sections(&[group("s0", &["a", "b"])], &[group("s0", &["b", "c"])]);

        assert_eq!(paths(&set.item_delete), vec![(0, 0)]);
        assert_eq!(paths(&set.item_insert), vec![(0, 1)]);
        assert!(set.item_move.is_empty());
        assert_eq!(set.item_insert[0].id.split_composite(), Some(("s0", "c")));
    }

    #[test]
    fn test_item_across_distinct_sections_is_delete_and_insert() {
        let old = vec![group("s0", &["a", "b"]), group("s1", &["c"])];
        let new = vec![group("s0", &["b"]), group("s1", &["a", "c"])];
        let set = diff_sections(&old, &new);

        assert_eq!(paths(&set.item_delete), vec![(0, 0)]);
        assert_eq!(paths(&set.item_insert), vec![(1, 0)]);
        assert!(set.section_operation_count() == 0);
    }

    #[test]
    fn test_section_swap_moves_one_section() {
        let old = vec![group("s0", &["a"]), group("s1", &["b"])];
        let new = vec![group("s1", &["b"]), group("s0", &["a"])];
        let set = diff_sections(&old, &new);

        assert_eq!(set.section_move, vec![Moved { source: 0, target: 1 }]);
        assert!(set.section_insert.is_empty() && set.section_delete.is_empty());
        assert_eq!(set.item_move.len(), 1);
        assert_eq!(set.item_move[0].source.path, IndexPath::new(0, 0));
        assert_eq!(set.item_move[0].target.path, IndexPath::new(1, 0));
    }

    #[test]
    fn test_section_and_item_updates() {
        let old = vec![group("s0", &["a", "b"])];
        let mut new = old.clone();
        new[0].title = "renamed";
        new[0].rows[1].version = 3;
        let set = diff_sections(&old, &new);

        assert_eq!(set.section_update, vec![0]);
        assert_eq!(paths(&set.item_update), vec![(0, 1)]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_duplicate_section_forces_item_move() {
        // Both sections share the identity "s", so "a" matches across them.
        let old = vec![group("s", &["a"]), group("s", &[])];
        let new = vec![group("s", &[]), group("s", &["a"])];
        let set = diff_sections(&old, &new);

        assert_eq!(set.section_operation_count(), 0);
        assert_eq!(set.item_move.len(), 1);
        assert_eq!(set.item_move[0].source.path, IndexPath::new(0, 0));
        assert_eq!(set.item_move[0].target.path, IndexPath::new(1, 0));
    }

    #[test]
    fn test_inserted_duplicate_section_cannot_claim_items() {
        let old = vec![group("s", &["a"])];
        let new = vec![group("s", &[]), group("s", &["a"])];
        let set = diff_sections(&old, &new);

        assert_eq!(set.section_insert, vec![1]);
        assert_eq!(paths(&set.item_delete), vec![(0, 0)]);
        assert!(set.item_insert.is_empty());
    }

    #[test]
    fn test_diff_items_references_are_flat() {
        let old = vec![group("s0", &["a"]), group("s1", &["b", "c"])];
        let new = vec![group("s1", &["c", "b"])];
        let sections = diff_with_config(&old, &new, DiffConfig::default());
        let items = diff_items(&old, &new, &sections.references, DiffConfig::default());

        // flat old: [s0/a, s1/b, s1/c], flat new: [s1/c, s1/b]
        assert_eq!(items.references.old, vec![None, Some(1), Some(0)]);
        assert!(items.references.is_symmetric());
        assert!(items.operations.iter().all(|op| !op.is_delete()));
    }
}
