//! Translation and workspace overlay of container children.
//!
//! Overlays substitute rows in place. The skeleton fetched from the store
//! fixes count and order; an overlay can only replace a row or, through a
//! delete placeholder, remove it.

use std::collections::{HashMap, HashSet};

use crate::record::{Record, RecordId, Slot, WorkspaceId};

/// A child row together with the slot it renders in.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub record: Record,
    pub slot: Slot,
}

impl Placed {
    fn at_own_slot(record: Record) -> Self {
        Self {
            slot: record.slot,
            record,
        }
    }
}

/// Children that need no translation overlay.
pub fn untranslated(base: Vec<Record>) -> Vec<Placed> {
    base.into_iter().map(Placed::at_own_slot).collect()
}

/// Replace each default-language row with its translation, if there is one.
///
/// Translations take the slot of the row they replace, so the translated
/// grid always mirrors the default-language grid.
pub fn overlay_translations(skeleton: Vec<Record>, overlays: Vec<Record>) -> Vec<Placed> {
    let mut by_parent: HashMap<RecordId, Record> = HashMap::with_capacity(overlays.len());
    for overlay in overlays {
        by_parent
            .entry(overlay.translation_parent_id)
            .or_insert(overlay);
    }

    skeleton
        .into_iter()
        .map(|default| {
            let slot = default.slot;
            let record = by_parent.remove(&default.id).unwrap_or(default);
            Placed { record, slot }
        })
        .collect()
}

/// Replace each row with its draft in the active workspace, if there is one.
///
/// A draft may move its row to another slot, never to another position.
pub fn overlay_workspace(current: Vec<Placed>, drafts: Vec<Record>) -> Vec<Placed> {
    let mut by_live: HashMap<RecordId, Record> = HashMap::with_capacity(drafts.len());
    for draft in drafts {
        by_live.entry(draft.live_version_id).or_insert(draft);
    }

    current
        .into_iter()
        .map(|placed| match by_live.remove(&placed.record.id) {
            Some(draft) => Placed::at_own_slot(draft),
            None => placed,
        })
        .collect()
}

/// Whether an overlaid row may be rendered in `workspace_id`.
///
/// Delete placeholders never render. Live-table rows owned by a workspace
/// (new or moved records not yet published) only render inside it.
pub fn is_visible(record: &Record, workspace_id: WorkspaceId) -> bool {
    if record.version_state.is_delete_placeholder() {
        return false;
    }
    !(record.is_live_version() && record.workspace_id != 0 && record.workspace_id != workspace_id)
}

/// Drop invisible rows and any second row standing for the same live child.
pub fn finalize(placed: Vec<Placed>, workspace_id: WorkspaceId) -> Vec<Placed> {
    let mut seen = HashSet::with_capacity(placed.len());
    placed
        .into_iter()
        .filter(|entry| is_visible(&entry.record, workspace_id))
        .filter(|entry| seen.insert(entry.record.live_id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::VersionState;

    fn child(id: RecordId, slot: Slot, sort_order: i64) -> Record {
        Record::new(id, 5, "text").in_container(10, slot, sort_order)
    }

    fn ids(placed: &[Placed]) -> Vec<RecordId> {
        placed.iter().map(|entry| entry.record.id).collect()
    }

    #[test]
    fn translation_replaces_in_place() {
        let skeleton = vec![child(20, 1, 1), child(21, 1, 2)];
        let overlays = vec![child(30, 1, 9).translation_of(20, 2)];

        let placed = overlay_translations(skeleton, overlays);
        assert_eq!(ids(&placed), vec![30, 21]);
    }

    #[test]
    fn translation_takes_default_slot() {
        let skeleton = vec![child(20, 1, 1)];
        let overlays = vec![child(30, 4, 1).translation_of(20, 2)];

        let placed = overlay_translations(skeleton, overlays);
        assert_eq!(placed[0].slot, 1);
        assert_eq!(placed[0].record.id, 30);
    }

    #[test]
    fn first_translation_wins() {
        let skeleton = vec![child(20, 1, 1)];
        let overlays = vec![
            child(30, 1, 1).translation_of(20, 2),
            child(31, 1, 1).translation_of(20, 2),
        ];

        assert_eq!(ids(&overlay_translations(skeleton, overlays)), vec![30]);
    }

    #[test]
    fn orphan_translation_is_ignored() {
        let skeleton = vec![child(20, 1, 1)];
        let overlays = vec![child(35, 1, 1).translation_of(99, 2)];

        assert_eq!(ids(&overlay_translations(skeleton, overlays)), vec![20]);
    }

    #[test]
    fn draft_replaces_live_row() {
        let current = untranslated(vec![child(20, 1, 1), child(21, 1, 2)]);
        let drafts = vec![child(40, 2, 7).draft_of(20, 7)];

        let placed = overlay_workspace(current, drafts);
        assert_eq!(ids(&placed), vec![40, 21]);
        assert_eq!(placed[0].slot, 2);
    }

    #[test]
    fn delete_placeholder_is_dropped() {
        let current = untranslated(vec![child(20, 1, 1), child(21, 1, 2)]);
        let drafts = vec![child(41, 1, 2)
            .draft_of(21, 7)
            .with_state(VersionState::DeletePlaceholder)];

        let placed = finalize(overlay_workspace(current, drafts), 7);
        assert_eq!(ids(&placed), vec![20]);
    }

    #[test]
    fn foreign_workspace_placeholders_are_hidden() {
        let mut placeholder = child(25, 1, 3).with_state(VersionState::NewPlaceholder);
        placeholder.workspace_id = 8;

        let placed = untranslated(vec![child(20, 1, 1), placeholder]);
        assert_eq!(ids(&finalize(placed.clone(), 0)), vec![20]);
        assert_eq!(ids(&finalize(placed, 8)), vec![20, 25]);
    }

    #[test]
    fn same_live_child_is_emitted_once() {
        let draft = child(40, 1, 1).draft_of(20, 7);
        let placed = vec![
            Placed::at_own_slot(child(20, 1, 1)),
            Placed::at_own_slot(draft),
        ];

        assert_eq!(ids(&finalize(placed, 7)), vec![20]);
    }
}
