//! Record store ports.
//!
//! The resolver only ever reads through [`RecordStore`]. Writes go through
//! the narrower [`RecordWriter`], used by the update path and the
//! consistency repair hook.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::record::{LanguageId, Record, RecordChange, RecordId, WorkspaceId};

pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

/// Failures of the underlying storage. "No rows" is never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("row {id} is malformed: {reason}")]
    InvalidRow { id: RecordId, reason: String },
}

/// Read-only access to the flat content table.
///
/// Soft-deleted rows are invisible to every operation.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one row by id, whatever its language or workspace.
    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<Record>, StoreError>;

    /// Resolve `translation_parent_id` to the default-language row.
    async fn fetch_translation_parent(&self, record: &Record)
        -> Result<Option<Record>, StoreError>;

    /// Live rows of one container in one language, `sort_order` ascending.
    async fn fetch_children(
        &self,
        parent_container_id: RecordId,
        language_id: LanguageId,
    ) -> Result<Vec<Record>, StoreError>;

    /// Live rows in `language_id` translating any of `base`.
    async fn fetch_translation_overlays(
        &self,
        base: &[Record],
        language_id: LanguageId,
    ) -> Result<Vec<Record>, StoreError>;

    /// Drafts in `workspace_id` of any of `base`.
    async fn fetch_workspace_overlays(
        &self,
        base: &[Record],
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Record>, StoreError>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Write access used by the update path and the repair hook.
///
/// Writes are not subject to workspace restrictions.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// Apply `change` to row `id`. Returns `false` if no such row exists.
    async fn apply_change(&self, id: RecordId, change: &RecordChange) -> Result<bool, StoreError>;

    /// All drafts of a live row, across workspaces.
    async fn fetch_workspace_versions(&self, live_id: RecordId) -> Result<Vec<Record>, StoreError>;
}

pub(crate) fn record_ids(records: &[Record]) -> Vec<RecordId> {
    records.iter().map(|record| record.id).collect()
}
