//! Partial record updates and the batches handed to post-commit listeners.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{RecordId, Slot, WorkspaceId};

/// Name of the flat content table.
pub const CONTENT_TABLE: &str = "content_records";

/// Fields an update may set. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_container_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl RecordChange {
    pub fn parent(parent_container_id: RecordId) -> Self {
        Self {
            parent_container_id: Some(parent_container_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parent_container_id.is_none() && self.slot.is_none() && self.sort_order.is_none()
    }
}

/// A set of row updates committed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatch {
    #[serde(default = "default_table")]
    pub table: String,
    /// Workspace of the editor that issued the batch.
    #[serde(default)]
    pub workspace_id: WorkspaceId,
    pub rows: BTreeMap<RecordId, RecordChange>,
}

fn default_table() -> String {
    CONTENT_TABLE.to_string()
}

impl UpdateBatch {
    pub fn for_content(workspace_id: WorkspaceId) -> Self {
        Self {
            table: default_table(),
            workspace_id,
            rows: BTreeMap::new(),
        }
    }

    pub fn with_row(mut self, id: RecordId, change: RecordChange) -> Self {
        self.rows.insert(id, change);
        self
    }
}
