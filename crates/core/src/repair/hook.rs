//! Keeps drafts attached to the same container as their live row.
//!
//! Invoked after an update batch has been committed. Its writes are best
//! effort: failures are reported, never raised, and never undo the batch.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::record::{RecordChange, RecordId, UpdateBatch, CONTENT_TABLE};
use crate::store::RecordWriter;

/// A parent reference copied from a live row onto one of its drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Propagation {
    pub live_id: RecordId,
    pub draft_id: RecordId,
    pub parent_container_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairFailure {
    pub record_id: RecordId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub propagated: Vec<Propagation>,
    pub failed: Vec<RepairFailure>,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone)]
pub struct RepairHook {
    writer: Arc<dyn RecordWriter>,
}

impl RepairHook {
    pub fn new(writer: Arc<dyn RecordWriter>) -> Self {
        Self { writer }
    }

    /// Post-commit callback for `batch`.
    ///
    /// Rows of the content table that received a new parent container pass
    /// it on to every draft of theirs that still points elsewhere. Updates
    /// on the draft side skip workspace restrictions.
    pub async fn on_records_updated(&self, batch: &UpdateBatch) -> RepairReport {
        let mut report = RepairReport::default();
        if batch.table != CONTENT_TABLE {
            return report;
        }

        for (&live_id, change) in &batch.rows {
            let Some(parent) = change.parent_container_id.filter(|parent| *parent > 0) else {
                continue;
            };

            let drafts = match self.writer.fetch_workspace_versions(live_id).await {
                Ok(drafts) => drafts,
                Err(err) => {
                    warn!(record = live_id, error = %err, "Cannot load workspace versions");
                    report.failed.push(RepairFailure {
                        record_id: live_id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for draft in drafts
                .into_iter()
                .filter(|draft| draft.id != live_id && draft.parent_container_id != parent)
            {
                match self
                    .writer
                    .apply_change(draft.id, &RecordChange::parent(parent))
                    .await
                {
                    Ok(true) => {
                        debug!(live = live_id, draft = draft.id, parent, "Parent propagated to draft");
                        report.propagated.push(Propagation {
                            live_id,
                            draft_id: draft.id,
                            parent_container_id: parent,
                        });
                    }
                    Ok(false) => debug!(draft = draft.id, "Draft vanished before repair"),
                    Err(err) => {
                        warn!(live = live_id, draft = draft.id, error = %err, "Parent propagation failed");
                        report.failed.push(RepairFailure {
                            record_id: draft.id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        report
    }
}
