//! Error types for section-diff.
//!
//! Diffing itself cannot fail. Errors only come from applying operations to
//! collections that do not match the ones the operations were computed from.

use thiserror::Error;

use crate::algo::IndexPath;

/// Where an out-of-range or conflicting position was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Section(usize),
    Item(IndexPath),
    Element(usize),
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Section(index) => write!(f, "section {index}"),
            Self::Item(path) => write!(f, "item ({path})"),
            Self::Element(index) => write!(f, "element {index}"),
        }
    }
}

/// Errors that can occur while applying operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// A delete or move source does not exist in the old collection
    #[error("source {position} out of range (old length {len})")]
    SourceOutOfRange {
        /// Offending position
        position: Position,
        /// Length of the old collection (or section)
        len: usize,
    },

    /// An insert, update or move target does not exist in the new collection
    #[error("target {position} out of range (new length {len})")]
    TargetOutOfRange {
        /// Offending position
        position: Position,
        /// Length of the new collection (or section)
        len: usize,
    },

    /// The same old position is deleted or moved away twice
    #[error("source {0} removed more than once")]
    DuplicateSource(Position),

    /// The same new position is filled by more than one insert or move
    #[error("target {0} filled more than once")]
    DuplicateTarget(Position),

    /// Surviving old elements do not fill the remaining new slots
    #[error("{survivors} surviving element(s) for {slots} open slot(s){}", format_scope(.section))]
    SurvivorMismatch {
        /// Old elements that were neither deleted nor moved
        survivors: usize,
        /// New slots not taken by inserts or move targets
        slots: usize,
        /// New section being rebuilt, for item-level mismatches
        section: Option<usize>,
    },

    /// An item operation targets a section that is inserted wholesale
    #[error("item target ({0}) lies in an inserted section")]
    TargetInInsertedSection(IndexPath),
}

fn format_scope(section: &Option<usize>) -> String {
    match section {
        Some(index) => format!(" in section {index}"),
        None => String::new(),
    }
}

/// Result type alias for applying operations.
pub type ApplyResult<T> = Result<T, ApplyError>;
