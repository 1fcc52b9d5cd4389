//! Diff algorithms.
//!
//! - `occurrence`: identity → old position(s), duplicates in FIFO order
//! - `references`: old ↔ new pairing
//! - `diff`: flat operation derivation (delete, insert, move, update)
//! - `sections`: two-level diff over sections and their items
//! - `batch`: many independent diffs, optionally in parallel

mod batch;
mod diff;
mod occurrence;
mod operation;
mod references;
mod sections;

pub use batch::diff_batch;
pub use diff::{diff, diff_with, diff_with_config, DiffConfig, DiffResult, DiffStats};
pub use occurrence::{IndexCursor, Occurrence, OccurrenceTable};
pub use operation::{Operation, OperationKind};
pub use references::{resolve_references, References};
pub use sections::{
    diff_items, diff_sections, diff_sections_with_config, IndexPath, ItemPath, Moved, OperationSet,
};
