//! section-diff - Identity-based diffing for flat and sectioned lists
//!
//! ## Core Concepts
//!
//! **Identity, not content**: Elements implement [`Diffable`]. Two elements
//! with the same [`DiffId`] are the same element; `should_update` decides
//! whether its content changed.
//!
//! **Linear passes**: No LCS. Old and new positions are paired through an
//! occurrence table, then deletes, inserts, moves and updates fall out of
//! two linear walks (see [`algo`]).
//!
//! ## Modules
//! - `core`: Element traits (`Diffable`, `Section`, `SectionMut`)
//! - `id`: Identity type (`DiffId`)
//! - `algo`: Flat and sectioned diff algorithms
//! - `apply`: Replay operations onto an old collection
//! - `plan`: Phase-ordered batch plans and snapshot reconciliation
//! - `error`: Apply errors
//!
//! ## Usage
//!
//! ```
//! use section_diff::{diff, DiffId, Diffable, Operation};
//!
//! #[derive(Clone, PartialEq)]
//! struct Row {
//!     key: u32,
//!     label: &'static str,
//! }
//!
//! impl Diffable for Row {
//!     fn diff_id(&self) -> DiffId {
//!         DiffId::from(self.key)
//!     }
//!
//!     fn should_update(&self, other: &Self) -> bool {
//!         self.label != other.label
//!     }
//! }
//!
//! let old = [Row { key: 1, label: "one" }, Row { key: 2, label: "two" }];
//! let new = [Row { key: 2, label: "zwei" }, Row { key: 3, label: "three" }];
//!
//! let result = diff(&old, &new);
//! assert_eq!(
//!     result.operations,
//!     vec![Operation::Delete(0), Operation::Update(0), Operation::Insert(1)]
//! );
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Element traits: Diffable, Section, SectionMut
pub mod core;

/// Identity for diffing
pub mod id;

/// Algorithms: occurrence table, references, flat and sectioned diff
pub mod algo;

/// Replaying operations
pub mod apply;

/// Batch plans and reconciliation
pub mod plan;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Core traits
pub use crate::core::{Diffable, Section, SectionMut};

// Identity
pub use id::{DiffId, COMPOSITE_SEPARATOR};

// Algorithms
pub use algo::{
    diff, diff_batch, diff_items, diff_sections, diff_sections_with_config, diff_with,
    diff_with_config, DiffConfig, DiffResult, DiffStats, IndexPath, ItemPath, Moved, Operation,
    OperationKind, OperationSet, References,
};

// Apply
pub use apply::{apply, apply_sections};

// Plan
pub use plan::{
    BatchPlan, BatchStep, BatchTarget, Phase, ReconcileConfig, Reconciler, Reconciliation,
    ReloadReason,
};

// Error types
pub use error::{ApplyError, ApplyResult, Position};

// =============================================================================
// Tests
// =============================================================================
