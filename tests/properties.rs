//! Property-based tests for flat and sectioned diffing.

use proptest::prelude::*;
use section_diff::{
    apply, apply_sections, diff_sections_with_config, diff_with_config, DiffConfig, DiffId, Diffable,
    Section, SectionMut,
};

// =============================================================================
// Test helpers
// =============================================================================

/// Element with a small identity space so duplicates are common.
#[derive(Clone, Debug, PartialEq)]
struct Cell {
    id: u8,
    value: u8,
}

impl Diffable for Cell {
    fn diff_id(&self) -> DiffId {
        DiffId::from(self.id)
    }

    fn should_update(&self, other: &Self) -> bool {
        self.value != other.value
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Block {
    id: u8,
    title: u8,
    cells: Vec<Cell>,
}

impl Diffable for Block {
    fn diff_id(&self) -> DiffId {
        DiffId::from(self.id)
    }

    fn should_update(&self, other: &Self) -> bool {
        self.title != other.title
    }
}

impl Section for Block {
    type Item = Cell;

    fn items(&self) -> &[Cell] {
        &self.cells
    }
}

impl SectionMut for Block {
    fn items_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }
}

fn cells(max_len: usize) -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec((0u8..6, 0u8..2).prop_map(|(id, value)| Cell { id, value }), 0..max_len)
}

fn blocks() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(
        (0u8..4, 0u8..2, cells(5)).prop_map(|(id, title, cells)| Block { id, title, cells }),
        0..5,
    )
}

fn configs() -> impl Strategy<Value = DiffConfig> {
    prop_oneof![Just(DiffConfig::default()), Just(DiffConfig::drift_only())]
}

fn is_strictly_increasing(values: &[usize]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

// =============================================================================
// Flat properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Applying the operations to old reproduces new
    #[test]
    fn flat_round_trip(old in cells(12), new in cells(12), config in configs()) {
        let result = diff_with_config(&old, &new, config);
        prop_assert_eq!(apply(&old, &new, &result.operations), Ok(new));
    }

    /// A collection diffed against itself yields nothing
    #[test]
    fn flat_identity_is_empty(old in cells(12)) {
        let result = diff_with_config(&old, &old, DiffConfig::default());
        prop_assert!(result.operations.is_empty());
    }

    /// Every old position is matched or deleted, every new one matched or inserted
    #[test]
    fn flat_conservation(old in cells(12), new in cells(12)) {
        let result = diff_with_config(&old, &new, DiffConfig::default());
        let stats = result.stats();

        prop_assert_eq!(stats.matched + stats.deleted, old.len());
        prop_assert_eq!(stats.matched + stats.inserted, new.len());
        prop_assert!(result.references.is_symmetric());
    }

    /// Deletes come first, in ascending old order
    #[test]
    fn flat_deletes_first(old in cells(12), new in cells(12)) {
        let result = diff_with_config(&old, &new, DiffConfig::default());
        let first_other = result
            .operations
            .iter()
            .position(|op| !op.is_delete())
            .unwrap_or(result.operations.len());

        prop_assert!(result.operations[first_other..].iter().all(|op| !op.is_delete()));
        let sources: Vec<usize> = result.operations[..first_other]
            .iter()
            .filter_map(|op| op.source().copied())
            .collect();
        prop_assert!(is_strictly_increasing(&sources));
    }

    /// Duplicates pair in first-in, first-out order
    #[test]
    fn flat_duplicates_pair_in_order(old in cells(12), new in cells(12)) {
        let result = diff_with_config(&old, &new, DiffConfig::default());

        for id in 0u8..6 {
            let paired: Vec<usize> = new
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.id == id)
                .filter_map(|(index, _)| result.references.new[index])
                .collect();
            let expected: Vec<usize> = old
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.id == id)
                .map(|(index, _)| index)
                .take(paired.len())
                .collect();
            prop_assert_eq!(paired, expected);
        }
    }

    /// Compaction only removes moves
    #[test]
    fn flat_compaction_never_adds_moves(old in cells(12), new in cells(12)) {
        let compacted = diff_with_config(&old, &new, DiffConfig::default()).stats();
        let raw = diff_with_config(&old, &new, DiffConfig::drift_only()).stats();

        prop_assert!(compacted.moved <= raw.moved);
        prop_assert_eq!(compacted.inserted, raw.inserted);
        prop_assert_eq!(compacted.deleted, raw.deleted);
        prop_assert_eq!(compacted.updated, raw.updated);
    }
}

// =============================================================================
// Sectioned properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Applying the operation set to old reproduces new, duplicates included
    #[test]
    fn sections_round_trip(old in blocks(), new in blocks(), config in configs()) {
        let set = diff_sections_with_config(&old, &new, config);
        prop_assert_eq!(apply_sections(&old, &new, &set), Ok(new));
    }

    /// Sections diffed against themselves yield nothing
    #[test]
    fn sections_identity_is_empty(old in blocks()) {
        let set = diff_sections_with_config(&old, &old, DiffConfig::default());
        prop_assert!(set.is_empty());
    }

    /// No item operation points into a section that is deleted or inserted
    #[test]
    fn sections_gate_items(old in blocks(), new in blocks()) {
        let set = diff_sections_with_config(&old, &new, DiffConfig::default());

        for path in &set.item_delete {
            prop_assert!(!set.section_delete.contains(&path.section()));
        }
        for path in set.item_insert.iter().chain(&set.item_update) {
            prop_assert!(!set.section_insert.contains(&path.section()));
        }
        for moved in &set.item_move {
            prop_assert!(!set.section_delete.contains(&moved.source.section()));
            prop_assert!(!set.section_insert.contains(&moved.target.section()));
        }
    }
}
