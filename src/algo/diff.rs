//! Flat Diff Algorithm
//!
//! Computes insert/delete/move/update operations between two ordered
//! collections of [`Diffable`] elements.
//!
//! # Algorithm
//!
//! 1. Build an occurrence table from the old collection
//! 2. Resolve references: pair each new position with an old one (or none)
//! 3. Delete pass: unmatched old positions, with running deleted offsets
//! 4. Placement pass: unmatched new positions are inserts; matched ones are
//!    moves when they drift from where deletes and inserts alone put them
//! 5. Optional move compaction (see below)
//!
//! # Positional Drift
//!
//! A matched pair `(old, new)` stays in place when
//!
//! ```text
//! old - deleted_before(old) + inserted_before(new) == new
//! ```
//!
//! Any other pair is reported as a `Move`. This is O(1) per element but can
//! flag both members of a swap.
//!
//! # Move Compaction
//!
//! With [`DiffConfig::compact_moves`] a second linear pass keeps a flagged
//! element in place when its old position sits strictly between the previous
//! stable element and the next drift-stable element. Stable elements stay
//! strictly increasing in old position, so the operations remain correct:
//!
//! ```text
//! old: [A, B, C]   new: [B, A, C]
//! drift only:      move A, move B
//! compacted:       move A
//! ```
//!
//! The result is still not a minimal move set.
//!
//! # Output Order
//!
//! All deletes in old order, then inserts/updates/moves in new order. A
//! moved and updated element emits `Update` before `Move`.
//!
//! # Complexity
//!
//! - Time: O(n + m)
//! - Space: O(n + m)

use tracing::trace;

use crate::core::Diffable;

use super::operation::{Operation, OperationKind};
use super::references::{resolve_references, References};

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for operation derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Run the move compaction pass after the drift test.
    /// Default: true
    pub compact_moves: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self { compact_moves: true }
    }
}

impl DiffConfig {
    /// Configuration with move compaction switched on or off.
    pub const fn new(compact_moves: bool) -> Self {
        Self { compact_moves }
    }

    /// Report every drifted element as moved.
    pub const fn drift_only() -> Self {
        Self { compact_moves: false }
    }
}

/// Operation counts of a diff.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Matched old/new pairs
    pub matched: usize,
    pub inserted: usize,
    pub deleted: usize,
    pub moved: usize,
    pub updated: usize,
}

impl DiffStats {
    /// Count operations by kind; `matched` comes from the references.
    pub fn from_parts<I>(operations: &[Operation<I>], references: &References) -> Self {
        let mut stats = Self {
            matched: references.matched_count(),
            ..Self::default()
        };
        for op in operations {
            match op.kind() {
                OperationKind::Insert => stats.inserted += 1,
                OperationKind::Delete => stats.deleted += 1,
                OperationKind::Move => stats.moved += 1,
                OperationKind::Update => stats.updated += 1,
            }
        }
        stats
    }

    /// Total number of operations.
    pub fn edit_count(&self) -> usize {
        self.inserted + self.deleted + self.moved + self.updated
    }

    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }
}

/// Result of a flat diff: operations plus the references they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct DiffResult<I> {
    /// Deletes in old order, then inserts/updates/moves in new order
    pub operations: Vec<Operation<I>>,
    pub references: References,
}

impl<I> DiffResult<I> {
    pub fn stats(&self) -> DiffStats {
        DiffStats::from_parts(&self.operations, &self.references)
    }

    /// Check if any operation was produced
    pub fn has_changes(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Convert operation positions; references are left as they are.
    pub fn map<J>(self, mut source: impl FnMut(I) -> J, mut target: impl FnMut(I) -> J) -> DiffResult<J> {
        DiffResult {
            operations: self
                .operations
                .into_iter()
                .map(|op| op.map(&mut source, &mut target))
                .collect(),
            references: self.references,
        }
    }

    pub fn operations_of(&self, kind: OperationKind) -> impl Iterator<Item = &Operation<I>> {
        self.operations.iter().filter(move |op| op.kind() == kind)
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Diff two collections with the default configuration.
///
/// # Example
///
/// ```
/// use section_diff::{diff, DiffId, Diffable, Operation};
///
/// #[derive(PartialEq)]
/// struct Row(&'static str);
///
/// impl Diffable for Row {
///     fn diff_id(&self) -> DiffId { DiffId::new(self.0) }
///     fn should_update(&self, other: &Self) -> bool { self != other }
/// }
///
/// let old = [Row("a"), Row("b"), Row("c")];
/// let new = [Row("b"), Row("a"), Row("c")];
///
/// let result = diff(&old, &new);
/// assert_eq!(result.operations, vec![Operation::Move(0, 1)]);
/// ```
pub fn diff<D: Diffable>(old: &[D], new: &[D]) -> DiffResult<usize> {
    diff_with_config(old, new, DiffConfig::default())
}

/// Diff two collections with a custom configuration.
pub fn diff_with_config<D: Diffable>(old: &[D], new: &[D], config: DiffConfig) -> DiffResult<usize> {
    let references = resolve_references(
        old.iter().map(Diffable::diff_id).enumerate(),
        old.len(),
        new.iter().map(Diffable::diff_id).enumerate(),
        new.len(),
    );
    let operations = derive_operations(&references, &FlatRules { old, new }, config);

    trace!(
        old = old.len(),
        new = new.len(),
        matched = references.matched_count(),
        operations = operations.len(),
        "flat diff"
    );

    DiffResult { operations, references }
}

/// Diff and map positions into caller-defined types.
///
/// `source` maps old positions (Delete, Move source); `target` maps new
/// positions (Insert, Update, Move target).
pub fn diff_with<D, I>(
    old: &[D],
    new: &[D],
    config: DiffConfig,
    source: impl FnMut(usize) -> I,
    target: impl FnMut(usize) -> I,
) -> DiffResult<I>
where
    D: Diffable,
{
    diff_with_config(old, new, config).map(source, target)
}

// =============================================================================
// Operation Derivation
// =============================================================================

/// Hooks that let the sectioned diff reuse the flat passes.
pub(crate) trait Rules {
    /// Old position removed along with its deleted parent: counted as
    /// deleted, not emitted.
    fn skip_old(&self, _old: usize) -> bool {
        false
    }

    /// New position added along with its inserted parent: counted as
    /// inserted, not emitted.
    fn skip_new(&self, _new: usize) -> bool {
        false
    }

    /// Matched pair that must move regardless of drift.
    fn relocated(&self, _old: usize, _new: usize) -> bool {
        false
    }

    fn should_update(&self, old: usize, new: usize) -> bool;
}

struct FlatRules<'a, D> {
    old: &'a [D],
    new: &'a [D],
}

impl<D: Diffable> Rules for FlatRules<'_, D> {
    #[inline]
    fn should_update(&self, old: usize, new: usize) -> bool {
        self.new[new].should_update(&self.old[old])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Skipped,
    Inserted,
    Stable(usize),
    Moved { old: usize, forced: bool },
}

/// Run the delete and placement passes over resolved references.
pub(crate) fn derive_operations<R: Rules>(
    references: &References,
    rules: &R,
    config: DiffConfig,
) -> Vec<Operation<usize>> {
    let mut operations = Vec::new();
    let deleted_offsets = record_deletes(references, rules, &mut operations);

    let mut placements = place(references, rules, &deleted_offsets);
    if config.compact_moves {
        compact_moves(&mut placements);
    }

    for (new_index, placement) in placements.into_iter().enumerate() {
        match placement {
            Placement::Skipped => {}
            Placement::Inserted => operations.push(Operation::Insert(new_index)),
            Placement::Stable(old_index) => {
                if rules.should_update(old_index, new_index) {
                    operations.push(Operation::Update(new_index));
                }
            }
            Placement::Moved { old: old_index, .. } => {
                if rules.should_update(old_index, new_index) {
                    operations.push(Operation::Update(new_index));
                }
                operations.push(Operation::Move(old_index, new_index));
            }
        }
    }

    operations
}

/// Emit deletes; returns, per old position, how many deletes precede it.
fn record_deletes<R: Rules>(
    references: &References,
    rules: &R,
    operations: &mut Vec<Operation<usize>>,
) -> Vec<usize> {
    let mut deleted_offsets = vec![0; references.old.len()];
    let mut deleted = 0;

    for (old_index, reference) in references.old.iter().enumerate() {
        deleted_offsets[old_index] = deleted;
        if rules.skip_old(old_index) {
            deleted += 1;
            continue;
        }
        if reference.is_none() {
            operations.push(Operation::Delete(old_index));
            deleted += 1;
        }
    }

    deleted_offsets
}

fn place<R: Rules>(references: &References, rules: &R, deleted_offsets: &[usize]) -> Vec<Placement> {
    let mut inserted = 0;

    references
        .new
        .iter()
        .enumerate()
        .map(|(new_index, reference)| {
            if rules.skip_new(new_index) {
                inserted += 1;
                return Placement::Skipped;
            }
            match *reference {
                None => {
                    inserted += 1;
                    Placement::Inserted
                }
                Some(old_index) => {
                    let forced = rules.relocated(old_index, new_index);
                    // deleted_offsets[old_index] <= old_index, never underflows
                    let expected = old_index - deleted_offsets[old_index] + inserted;
                    if forced || expected != new_index {
                        Placement::Moved { old: old_index, forced }
                    } else {
                        Placement::Stable(old_index)
                    }
                }
            }
        })
        .collect()
}

/// Keep drifted elements in place when they fit between stable neighbours.
fn compact_moves(placements: &mut [Placement]) {
    // next_anchor[j]: old position of the first drift-stable element after j
    let mut next_anchor = vec![None; placements.len()];
    let mut upcoming = None;
    for (new_index, placement) in placements.iter().enumerate().rev() {
        next_anchor[new_index] = upcoming;
        if let Placement::Stable(old_index) = *placement {
            upcoming = Some(old_index);
        }
    }

    let mut previous: Option<usize> = None;
    for (placement, next) in placements.iter_mut().zip(next_anchor) {
        match *placement {
            Placement::Stable(old_index) => previous = Some(old_index),
            Placement::Moved { old: old_index, forced: false }
                if previous.is_none_or(|p| p < old_index) && next.is_none_or(|n| old_index < n) =>
            {
                *placement = Placement::Stable(old_index);
                previous = Some(old_index);
            }
            _ => {}
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
