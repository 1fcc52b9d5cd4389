//! Prelude module for common imports.
//!
//! ```
//! use section_diff::prelude::*;
//! ```

// Core traits
pub use crate::core::{Diffable, Section, SectionMut};

// Identity
pub use crate::id::DiffId;

// Algorithms
pub use crate::algo::{
    diff, diff_batch, diff_sections, diff_sections_with_config, diff_with_config, DiffConfig, DiffResult,
    DiffStats, IndexPath, ItemPath, Moved, Operation, OperationKind, OperationSet,
};

// Apply
pub use crate::apply::{apply, apply_sections};

// Plan
pub use crate::plan::{BatchPlan, BatchStep, BatchTarget, Phase, ReconcileConfig, Reconciler, Reconciliation};

// Error
pub use crate::error::{ApplyError, ApplyResult};
