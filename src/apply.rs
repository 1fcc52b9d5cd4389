//! In-memory application of diff operations.
//!
//! Operations use batch semantics, like a list view's batched updates:
//! deletes and move sources are old positions, inserts, move targets and
//! updates are new positions. Applying proceeds in phases:
//!
//! ```text
//! 1. delete       remove deleted sections / items
//! 2. sections     place inserted and moved sections
//! 3. items        place inserted and moved items
//! 4. reload       replace updated items, then updated sections
//! ```
//!
//! Old elements that are neither deleted nor moved keep their relative order
//! and fill whatever new slots the inserts and move targets left open.
//! Inserted and updated values are cloned from the new collection.

use crate::algo::{IndexPath, Operation, OperationSet};
use crate::core::SectionMut;
use crate::error::{ApplyError, ApplyResult, Position};

// =============================================================================
// Flat
// =============================================================================

/// Apply flat operations computed from `old` and `new`.
///
/// Returns a collection equal to `new` when `operations` came from diffing
/// these two collections.
pub fn apply<T: Clone>(old: &[T], new: &[T], operations: &[Operation<usize>]) -> ApplyResult<Vec<T>> {
    let mut removed = vec![false; old.len()];
    let mut slots: Vec<Option<T>> = vec![None; new.len()];
    let mut updates = Vec::new();

    for op in operations {
        match *op {
            Operation::Delete(source) => mark_removed(&mut removed, source, Position::Element(source))?,
            Operation::Insert(target) => {
                let value = new_element(new, target)?;
                place(&mut slots, target, value, Position::Element(target))?;
            }
            Operation::Move(source, target) => {
                mark_removed(&mut removed, source, Position::Element(source))?;
                place(&mut slots, target, old[source].clone(), Position::Element(target))?;
            }
            Operation::Update(target) => updates.push((target, new_element(new, target)?)),
        }
    }

    let survivors = old
        .iter()
        .zip(&removed)
        .filter(|&(_, &gone)| !gone)
        .map(|(value, _)| value.clone());
    let mut result = fill_open_slots(slots, survivors, None)?;

    for (target, value) in updates {
        result[target] = value;
    }

    Ok(result)
}

// =============================================================================
// Sectioned
// =============================================================================

/// Where a new section comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Inserted,
    Old(usize),
}

/// Apply a sectioned operation set computed from `old` and `new`.
pub fn apply_sections<S>(old: &[S], new: &[S], set: &OperationSet) -> ApplyResult<Vec<S>>
where
    S: SectionMut + Clone,
    S::Item: Clone,
{
    // Phase 1: deletes
    let mut removed_sections = vec![false; old.len()];
    for &index in &set.section_delete {
        mark_removed(&mut removed_sections, index, Position::Section(index))?;
    }
    let mut removed_items: Vec<Vec<bool>> = old.iter().map(|s| vec![false; s.items().len()]).collect();
    for path in &set.item_delete {
        remove_item(&mut removed_items, path.path)?;
    }

    // Phase 2: section placement
    let mut section_slots: Vec<Option<Origin>> = vec![None; new.len()];
    for &index in &set.section_insert {
        place(&mut section_slots, index, Origin::Inserted, Position::Section(index))?;
    }
    for moved in &set.section_move {
        mark_removed(&mut removed_sections, moved.source, Position::Section(moved.source))?;
        place(
            &mut section_slots,
            moved.target,
            Origin::Old(moved.source),
            Position::Section(moved.target),
        )?;
    }
    let survivors = (0..old.len()).filter(|&index| !removed_sections[index]).map(Origin::Old);
    let origins = fill_open_slots(section_slots, survivors, None)?;

    // Phase 3: item placement
    let mut item_slots: Vec<Vec<Option<S::Item>>> = new.iter().map(|s| vec![None; s.items().len()]).collect();
    for path in &set.item_insert {
        let value = new_item(new, path.path)?;
        place_item(&mut item_slots, &origins, path.path, value)?;
    }
    for moved in &set.item_move {
        let source = moved.source.path;
        remove_item(&mut removed_items, source)?;
        let value = old[source.section].items()[source.item].clone();
        place_item(&mut item_slots, &origins, moved.target.path, value)?;
    }

    let mut result = Vec::with_capacity(new.len());
    for (section_index, (origin, slots)) in origins.into_iter().zip(item_slots).enumerate() {
        match origin {
            Origin::Inserted => result.push(new[section_index].clone()),
            Origin::Old(old_index) => {
                let source = &old[old_index];
                let survivors = source
                    .items()
                    .iter()
                    .zip(&removed_items[old_index])
                    .filter(|&(_, &gone)| !gone)
                    .map(|(item, _)| item.clone());
                let items = fill_open_slots(slots, survivors, Some(section_index))?;

                let mut section = source.clone();
                *section.items_mut() = items;
                result.push(section);
            }
        }
    }

    // Phase 4: reloads
    for path in &set.item_update {
        let value = new_item(new, path.path)?;
        result[path.section()].items_mut()[path.item()] = value;
    }
    for &index in &set.section_update {
        result[index] = new_element(new, index).map_err(|_| ApplyError::TargetOutOfRange {
            position: Position::Section(index),
            len: new.len(),
        })?;
    }

    Ok(result)
}

// =============================================================================
// Helpers
// =============================================================================

fn mark_removed(removed: &mut [bool], index: usize, position: Position) -> ApplyResult<()> {
    let len = removed.len();
    match removed.get_mut(index) {
        None => Err(ApplyError::SourceOutOfRange { position, len }),
        Some(true) => Err(ApplyError::DuplicateSource(position)),
        Some(flag) => {
            *flag = true;
            Ok(())
        }
    }
}

fn place<T>(slots: &mut [Option<T>], index: usize, value: T, position: Position) -> ApplyResult<()> {
    let len = slots.len();
    match slots.get_mut(index) {
        None => Err(ApplyError::TargetOutOfRange { position, len }),
        Some(Some(_)) => Err(ApplyError::DuplicateTarget(position)),
        Some(slot) => {
            *slot = Some(value);
            Ok(())
        }
    }
}

/// Fill the open slots with survivors, in order.
fn fill_open_slots<T>(
    slots: Vec<Option<T>>,
    survivors: impl Iterator<Item = T>,
    section: Option<usize>,
) -> ApplyResult<Vec<T>> {
    let survivors: Vec<T> = survivors.collect();
    let open = slots.iter().filter(|slot| slot.is_none()).count();
    let mismatch = ApplyError::SurvivorMismatch {
        survivors: survivors.len(),
        slots: open,
        section,
    };
    if survivors.len() != open {
        return Err(mismatch);
    }

    let mut survivors = survivors.into_iter();
    slots
        .into_iter()
        .map(|slot| slot.or_else(|| survivors.next()))
        .collect::<Option<Vec<T>>>()
        .ok_or(mismatch)
}

fn new_element<T: Clone>(new: &[T], index: usize) -> ApplyResult<T> {
    new.get(index).cloned().ok_or(ApplyError::TargetOutOfRange {
        position: Position::Element(index),
        len: new.len(),
    })
}

fn new_item<S>(new: &[S], path: IndexPath) -> ApplyResult<S::Item>
where
    S: SectionMut,
    S::Item: Clone,
{
    let section = new.get(path.section).ok_or(ApplyError::TargetOutOfRange {
        position: Position::Section(path.section),
        len: new.len(),
    })?;
    section.items().get(path.item).cloned().ok_or(ApplyError::TargetOutOfRange {
        position: Position::Item(path),
        len: section.items().len(),
    })
}

fn remove_item(removed: &mut [Vec<bool>], path: IndexPath) -> ApplyResult<()> {
    let len = removed.len();
    let section = removed.get_mut(path.section).ok_or(ApplyError::SourceOutOfRange {
        position: Position::Section(path.section),
        len,
    })?;
    mark_removed(section, path.item, Position::Item(path))
}

fn place_item<T>(
    slots: &mut [Vec<Option<T>>],
    origins: &[Origin],
    path: IndexPath,
    value: T,
) -> ApplyResult<()> {
    match origins.get(path.section) {
        None => Err(ApplyError::TargetOutOfRange {
            position: Position::Section(path.section),
            len: origins.len(),
        }),
        Some(Origin::Inserted) => Err(ApplyError::TargetInInsertedSection(path)),
        Some(Origin::Old(_)) => place(&mut slots[path.section], path.item, value, Position::Item(path)),
    }
}

// =============================================================================
// Tests
// =============================================================================
