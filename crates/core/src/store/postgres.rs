use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use super::{record_ids, RecordStore, RecordWriter, StoreError};
use crate::record::{LanguageId, Record, RecordChange, RecordId, VersionState, WorkspaceId};

const COLUMNS: &str = "id, page_id, record_type, header, parent_container_id, slot, sort_order, \
     language_id, translation_parent_id, live_version_id, workspace_id, version_state, \
     deleted, content";

/// Database row representation of a content record.
#[derive(Debug, Clone, FromRow)]
struct RecordRow {
    id: i64,
    page_id: i64,
    record_type: String,
    header: String,
    parent_container_id: i64,
    slot: i32,
    sort_order: i64,
    language_id: i32,
    translation_parent_id: i64,
    live_version_id: i64,
    workspace_id: i32,
    version_state: i16,
    deleted: bool,
    content: Value,
}

impl TryFrom<RecordRow> for Record {
    type Error = StoreError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let version_state =
            VersionState::from_code(row.version_state).ok_or_else(|| StoreError::InvalidRow {
                id: row.id,
                reason: format!("unknown version state {}", row.version_state),
            })?;
        Ok(Record {
            id: row.id,
            page_id: row.page_id,
            record_type: row.record_type,
            header: row.header,
            parent_container_id: row.parent_container_id,
            slot: row.slot,
            sort_order: row.sort_order,
            language_id: row.language_id,
            translation_parent_id: row.translation_parent_id,
            live_version_id: row.live_version_id,
            workspace_id: row.workspace_id,
            version_state,
            deleted: row.deleted,
            content: row.content,
        })
    }
}

fn into_records(rows: Vec<RecordRow>) -> Result<Vec<Record>, StoreError> {
    rows.into_iter().map(Record::try_from).collect()
}

/// `content_records` table on PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM content_records WHERE id = $1 AND NOT deleted");
        sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Record::try_from)
            .transpose()
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
        let sql = format!(
            "SELECT {COLUMNS} FROM content_records \
             WHERE parent_container_id = $1 AND language_id = $2 \
               AND live_version_id = 0 AND NOT deleted \
             ORDER BY sort_order ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(parent_container_id)
            .bind(language_id)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }

    async fn fetch_translation_overlays(
        &self,
        base: &[Record],
        language_id: LanguageId,
    ) -> Result<Vec<Record>, StoreError> {
        let ids = record_ids(base);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM content_records \
             WHERE translation_parent_id = ANY($1) AND language_id = $2 \
               AND live_version_id = 0 AND NOT deleted \
             ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(ids)
            .bind(language_id)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }

    async fn fetch_workspace_overlays(
        &self,
        base: &[Record],
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Record>, StoreError> {
        let ids = record_ids(base);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM content_records \
             WHERE live_version_id = ANY($1) AND workspace_id = $2 AND NOT deleted \
             ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(ids)
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordWriter for PgRecordStore {
    async fn apply_change(&self, id: RecordId, change: &RecordChange) -> Result<bool, StoreError> {
        if change.is_empty() {
            let exists = self.fetch_by_id(id).await?.is_some();
            return Ok(exists);
        }
        let result = sqlx::query(
            "UPDATE content_records SET \
                 parent_container_id = COALESCE($2, parent_container_id), \
                 slot = COALESCE($3, slot), \
                 sort_order = COALESCE($4, sort_order) \
             WHERE id = $1 AND NOT deleted",
        )
        .bind(id)
        .bind(change.parent_container_id)
        .bind(change.slot)
        .bind(change.sort_order)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_workspace_versions(&self, live_id: RecordId) -> Result<Vec<Record>, StoreError> {
        if live_id == 0 {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM content_records \
             WHERE live_version_id = $1 AND NOT deleted ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(live_id)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(version_state: i16) -> RecordRow {
        RecordRow {
            id: 41,
            page_id: 5,
            record_type: "text".to_string(),
            header: "Teaser".to_string(),
            parent_container_id: 10,
            slot: 1,
            sort_order: 2,
            language_id: 0,
            translation_parent_id: 0,
            live_version_id: 21,
            workspace_id: 7,
            version_state,
            deleted: false,
            content: Value::Null,
        }
    }

    #[test]
    fn decode_row_into_record() {
        let record = Record::try_from(row(2)).unwrap();
        assert_eq!(record.version_state, VersionState::DeletePlaceholder);
        assert_eq!(record.live_id(), 21);
        assert_eq!(record.workspace_id, 7);
    }

    #[test]
    fn reject_unknown_version_state() {
        let err = Record::try_from(row(42)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRow { id: 41, .. }));
    }
}
