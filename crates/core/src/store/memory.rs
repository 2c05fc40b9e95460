use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{RecordStore, RecordWriter, StoreError};
use crate::record::{LanguageId, Record, RecordChange, RecordId, WorkspaceId};

/// In-process store over a `BTreeMap`, with the same filtering and ordering
/// rules as the SQL adapter.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<BTreeMap<RecordId, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            rows: RwLock::new(records.into_iter().map(|record| (record.id, record)).collect()),
        }
    }

    /// Insert or replace a row.
    pub fn insert(&self, record: Record) -> Result<(), StoreError> {
        self.write()?.insert(record.id, record);
        Ok(())
    }

    /// Raw row lookup, including soft-deleted rows.
    pub fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<RecordId, Record>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<RecordId, Record>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn select(&self, predicate: impl Fn(&Record) -> bool) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|record| !record.deleted && predicate(record))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        Ok(self.read()?.get(&id).filter(|record| !record.deleted).cloned())
    }

    async fn fetch_translation_parent(
        &self,
        record: &Record,
    ) -> Result<Option<Record>, StoreError> {
        if record.translation_parent_id == 0 {
            return Ok(None);
        }
        self.fetch_by_id(record.translation_parent_id).await
    }

    async fn fetch_children(
        &self,
        parent_container_id: RecordId,
        language_id: LanguageId,
    ) -> Result<Vec<Record>, StoreError> {
        let mut children = self.select(|record| {
            record.parent_container_id == parent_container_id
                && record.language_id == language_id
                && record.live_version_id == 0
        })?;
        children.sort_by_key(|record| (record.sort_order, record.id));
        Ok(children)
    }

    async fn fetch_translation_overlays(
        &self,
        base: &[Record],
        language_id: LanguageId,
    ) -> Result<Vec<Record>, StoreError> {
        let ids: BTreeSet<RecordId> = base.iter().map(|record| record.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(|record| {
            ids.contains(&record.translation_parent_id)
                && record.language_id == language_id
                && record.live_version_id == 0
        })
    }

    async fn fetch_workspace_overlays(
        &self,
        base: &[Record],
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Record>, StoreError> {
        let ids: BTreeSet<RecordId> = base.iter().map(|record| record.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(|record| {
            ids.contains(&record.live_version_id) && record.workspace_id == workspace_id
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}

#[async_trait]
impl RecordWriter for MemoryStore {
    async fn apply_change(&self, id: RecordId, change: &RecordChange) -> Result<bool, StoreError> {
        let mut rows = self.write()?;
        let Some(record) = rows.get_mut(&id).filter(|record| !record.deleted) else {
            return Ok(false);
        };
        if let Some(parent) = change.parent_container_id {
            record.parent_container_id = parent;
        }
        if let Some(slot) = change.slot {
            record.slot = slot;
        }
        if let Some(sort_order) = change.sort_order {
            record.sort_order = sort_order;
        }
        Ok(true)
    }

    async fn fetch_workspace_versions(&self, live_id: RecordId) -> Result<Vec<Record>, StoreError> {
        if live_id == 0 {
            return Ok(Vec::new());
        }
        self.select(|record| record.live_version_id == live_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::VersionState;

    fn store() -> MemoryStore {
        let mut hidden = Record::new(23, 5, "text").in_container(10, 1, 0);
        hidden.deleted = true;
        MemoryStore::with_records([
            Record::new(10, 5, "two-columns"),
            Record::new(21, 5, "text").in_container(10, 1, 2),
            Record::new(20, 5, "text").in_container(10, 1, 1),
            Record::new(22, 5, "text").in_container(10, 2, 1),
            hidden,
            Record::new(30, 5, "text").in_container(10, 1, 1).translation_of(20, 2),
            Record::new(41, 5, "text")
                .in_container(10, 1, 2)
                .draft_of(21, 7)
                .with_state(VersionState::DeletePlaceholder),
            Record::new(42, 5, "text").in_container(10, 1, 1).draft_of(20, 8),
        ])
    }

    #[tokio::test]
    async fn children_are_live_sorted_and_not_deleted() {
        let store = store();
        let children = store.fetch_children(10, 0).await.unwrap();
        let ids: Vec<_> = children.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![20, 22, 21]);
    }

    #[tokio::test]
    async fn deleted_rows_are_invisible_by_id() {
        let store = store();
        assert!(store.fetch_by_id(23).await.unwrap().is_none());
        assert!(store.get(23).unwrap().is_some());
    }

    #[tokio::test]
    async fn translation_overlays_match_parent_and_language() {
        let store = store();
        let base = store.fetch_children(10, 0).await.unwrap();
        let overlays = store.fetch_translation_overlays(&base, 2).await.unwrap();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].id, 30);
        assert!(store.fetch_translation_overlays(&base, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn workspace_overlays_match_workspace() {
        let store = store();
        let base = store.fetch_children(10, 0).await.unwrap();
        let overlays = store.fetch_workspace_overlays(&base, 7).await.unwrap();
        let ids: Vec<_> = overlays.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![41]);
    }

    #[tokio::test]
    async fn empty_base_short_circuits() {
        let store = store();
        assert!(store.fetch_workspace_overlays(&[], 7).await.unwrap().is_empty());
        assert!(store.fetch_translation_overlays(&[], 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apply_change_updates_only_given_fields() {
        let store = store();
        let applied = store
            .apply_change(21, &RecordChange { slot: Some(2), ..RecordChange::default() })
            .await
            .unwrap();
        assert!(applied);
        let row = store.get(21).unwrap().unwrap();
        assert_eq!((row.parent_container_id, row.slot, row.sort_order), (10, 2, 2));

        assert!(!store.apply_change(999, &RecordChange::parent(10)).await.unwrap());
    }

    #[tokio::test]
    async fn workspace_versions_span_workspaces() {
        let store = store();
        let versions = store.fetch_workspace_versions(20).await.unwrap();
        assert_eq!(versions.iter().map(|r| r.id).collect::<Vec<_>>(), vec![42]);
        assert!(store.fetch_workspace_versions(0).await.unwrap().is_empty());
    }
}
