//! Batch plans and snapshot reconciliation for list layers.
//!
//! A list view cannot take an [`OperationSet`] as is: deletes must land
//! before inserts, sections must exist before items move into them, and
//! reloads address the final layout. [`BatchPlan`] fixes that order:
//!
//! ```text
//! Phase::Delete            delete sections, delete items
//! Phase::SectionPlacement  insert sections, move section ...
//! Phase::ItemPlacement     insert items, move item ...
//! Phase::Reload            reload items, reload sections
//! ```
//!
//! [`Reconciler`] owns the current and staged snapshots of a list and turns
//! each staged snapshot into a plan. The list layer itself only implements
//! [`BatchTarget`].

use std::fmt;

use tracing::{debug, trace};

use crate::algo::{diff_sections_with_config, DiffConfig, IndexPath, ItemPath, OperationSet};
use crate::core::Section;

/// Default maximum number of operations before falling back to a full reload.
const DEFAULT_MAX_OPERATIONS: usize = 2000;

// =============================================================================
// Phases & Steps
// =============================================================================

/// One batched update round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Delete,
    SectionPlacement,
    ItemPlacement,
    Reload,
}

impl Phase {
    /// All phases, in execution order.
    pub const ALL: [Phase; 4] = [Self::Delete, Self::SectionPlacement, Self::ItemPlacement, Self::Reload];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Delete => "delete",
            Self::SectionPlacement => "section-placement",
            Self::ItemPlacement => "item-placement",
            Self::Reload => "reload",
        })
    }
}

/// A single list-layer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStep {
    DeleteSections(Vec<usize>),
    DeleteItems(Vec<IndexPath>),
    InsertSections(Vec<usize>),
    MoveSection { source: usize, target: usize },
    InsertItems(Vec<IndexPath>),
    MoveItem { source: IndexPath, target: IndexPath },
    ReloadItems(Vec<IndexPath>),
    ReloadSections(Vec<usize>),
}

// =============================================================================
// BatchPlan
// =============================================================================

/// Operation set sequenced into four phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct BatchPlan {
    pub delete: Vec<BatchStep>,
    pub section_placement: Vec<BatchStep>,
    pub item_placement: Vec<BatchStep>,
    pub reload: Vec<BatchStep>,
}

impl BatchPlan {
    /// Sequence an operation set; empty steps are left out.
    pub fn from_operations(set: &OperationSet) -> Self {
        let mut plan = Self::default();

        if !set.section_delete.is_empty() {
            plan.delete.push(BatchStep::DeleteSections(set.section_delete.clone()));
        }
        if !set.item_delete.is_empty() {
            plan.delete.push(BatchStep::DeleteItems(item_paths(&set.item_delete)));
        }

        if !set.section_insert.is_empty() {
            plan.section_placement
                .push(BatchStep::InsertSections(set.section_insert.clone()));
        }
        plan.section_placement.extend(set.section_move.iter().map(|moved| BatchStep::MoveSection {
            source: moved.source,
            target: moved.target,
        }));

        if !set.item_insert.is_empty() {
            plan.item_placement.push(BatchStep::InsertItems(item_paths(&set.item_insert)));
        }
        plan.item_placement.extend(set.item_move.iter().map(|moved| BatchStep::MoveItem {
            source: moved.source.path,
            target: moved.target.path,
        }));

        if !set.item_update.is_empty() {
            plan.reload.push(BatchStep::ReloadItems(item_paths(&set.item_update)));
        }
        if !set.section_update.is_empty() {
            plan.reload.push(BatchStep::ReloadSections(set.section_update.clone()));
        }

        plan
    }

    pub fn steps(&self, phase: Phase) -> &[BatchStep] {
        match phase {
            Phase::Delete => &self.delete,
            Phase::SectionPlacement => &self.section_placement,
            Phase::ItemPlacement => &self.item_placement,
            Phase::Reload => &self.reload,
        }
    }

    /// Non-empty phases in execution order.
    pub fn phases(&self) -> impl Iterator<Item = (Phase, &[BatchStep])> {
        Phase::ALL
            .into_iter()
            .map(|phase| (phase, self.steps(phase)))
            .filter(|(_, steps)| !steps.is_empty())
    }

    pub fn step_count(&self) -> usize {
        self.delete.len() + self.section_placement.len() + self.item_placement.len() + self.reload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_count() == 0
    }
}

fn item_paths(items: &[ItemPath]) -> Vec<IndexPath> {
    items.iter().map(|item| item.path).collect()
}

// =============================================================================
// BatchTarget
// =============================================================================

/// Interface implemented by the list layer that displays the sections.
///
/// `perform` is called once per non-empty phase, in order; an implementation
/// typically wraps the steps in one batched update of its widget.
pub trait BatchTarget {
    type Error;

    fn perform(&mut self, phase: Phase, steps: &[BatchStep]) -> Result<(), Self::Error>;

    /// Discard everything and redraw from the current snapshot.
    fn reload_all(&mut self) -> Result<(), Self::Error>;
}

// =============================================================================
// Reconciler
// =============================================================================

/// Configuration for snapshot reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileConfig {
    pub diff: DiffConfig,
    /// Maximum number of operations before fallback to full reload.
    /// Default: 2000
    pub max_operations: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            diff: DiffConfig::default(),
            max_operations: DEFAULT_MAX_OPERATIONS,
        }
    }
}

impl ReconcileConfig {
    /// Configuration with an explicit diff setup and operation limit.
    pub fn new(diff: DiffConfig, max_operations: usize) -> Self {
        Self { diff, max_operations }
    }

    /// Never fall back to a full reload.
    pub fn unbounded() -> Self {
        Self {
            max_operations: usize::MAX,
            ..Self::default()
        }
    }
}

/// Outcome of reconciling a staged snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing to compare against, too many operations, or a failed batch
    FullReload { reason: ReloadReason },
    /// Staged snapshot equals the current one
    Unchanged,
    Batched(BatchPlan),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadReason {
    /// No staged snapshot to diff against
    NothingStaged,
    /// Operation count exceeded `ReconcileConfig::max_operations`
    TooManyOperations(usize),
    /// An earlier batch failed, so the list layer state is unknown
    TargetFailed,
}

impl fmt::Display for ReloadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingStaged => f.write_str("nothing staged"),
            Self::TooManyOperations(count) => write!(f, "{count} operations exceed limit"),
            Self::TargetFailed => f.write_str("previous batch failed"),
        }
    }
}

/// Owns the current and staged snapshots of a sectioned list.
///
/// The first staged snapshot becomes current directly; later ones are diffed
/// against the current snapshot by [`Reconciler::reconcile`].
#[derive(Debug, Clone)]
pub struct Reconciler<S> {
    current: Vec<S>,
    staged: Option<Vec<S>>,
    initialized: bool,
    /// Set when a target call failed; the next reconcile reloads everything.
    desynchronized: bool,
    config: ReconcileConfig,
}

impl<S: Section> Default for Reconciler<S> {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}

impl<S: Section> Reconciler<S> {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            current: Vec::new(),
            staged: None,
            initialized: false,
            desynchronized: false,
            config,
        }
    }

    /// Snapshot the list layer is currently showing.
    pub fn current(&self) -> &[S] {
        &self.current
    }

    pub fn staged(&self) -> Option<&[S]> {
        self.staged.as_deref()
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Stage the next snapshot. Replaces any snapshot staged earlier.
    pub fn stage(&mut self, sections: Vec<S>) {
        if self.initialized {
            self.staged = Some(sections);
        } else {
            self.current = sections;
            self.initialized = true;
        }
    }

    /// Diff the staged snapshot against the current one and make it current.
    ///
    /// After a failed [`drive`](Self::drive) the list layer state is unknown:
    /// the staged snapshot (if any) becomes current without diffing and a
    /// single full reload is requested.
    pub fn reconcile(&mut self) -> Reconciliation {
        if self.desynchronized {
            self.desynchronized = false;
            if let Some(staged) = self.staged.take() {
                self.current = staged;
            }
            debug!("reconcile: previous batch failed, full reload");
            return Reconciliation::FullReload {
                reason: ReloadReason::TargetFailed,
            };
        }

        let Some(staged) = self.staged.take() else {
            debug!("reconcile: nothing staged, full reload");
            return Reconciliation::FullReload {
                reason: ReloadReason::NothingStaged,
            };
        };

        let set = diff_sections_with_config(&self.current, &staged, self.config.diff);
        self.current = staged;

        if set.is_empty() {
            trace!("reconcile: unchanged");
            return Reconciliation::Unchanged;
        }
        if set.len() > self.config.max_operations {
            debug!(
                operations = set.len(),
                limit = self.config.max_operations,
                "reconcile: too many operations, full reload"
            );
            return Reconciliation::FullReload {
                reason: ReloadReason::TooManyOperations(set.len()),
            };
        }

        let plan = BatchPlan::from_operations(&set);
        debug!(
            section_ops = set.section_operation_count(),
            item_ops = set.item_operation_count(),
            steps = plan.step_count(),
            "reconcile: batched"
        );
        Reconciliation::Batched(plan)
    }

    /// Reconcile and drive `target` through the result.
    ///
    /// When the target fails, the error is returned and the reconciler is
    /// marked desynchronized: the next reconcile requests a full reload of
    /// the current snapshot instead of diffing against it.
    pub fn drive<T: BatchTarget>(&mut self, target: &mut T) -> Result<Reconciliation, T::Error> {
        let reconciliation = self.reconcile();
        let outcome = match &reconciliation {
            Reconciliation::FullReload { reason } => {
                debug!(%reason, "full reload");
                target.reload_all()
            }
            Reconciliation::Unchanged => Ok(()),
            Reconciliation::Batched(plan) => plan.phases().try_for_each(|(phase, steps)| {
                trace!(%phase, steps = steps.len(), "perform phase");
                target.perform(phase, steps)
            }),
        };

        match outcome {
            Ok(()) => Ok(reconciliation),
            Err(err) => {
                debug!("target failed, next reconcile reloads");
                self.desynchronized = true;
                Err(err)
            }
        }
    }

    /// Whether the last drive failed and a full reload is pending.
    pub fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }
}

// =============================================================================
// Tests
// =============================================================================
