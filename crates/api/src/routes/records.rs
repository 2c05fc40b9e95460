use std::collections::BTreeMap;

use axum::{extract::State, routing::post, Json, Router};
use content_containers_core::record::{RecordId, UpdateBatch, CONTENT_TABLE};
use content_containers_core::RepairReport;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Record update routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/records/update", post(update_records))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RowFailure {
    record_id: RecordId,
    reason: String,
}

#[derive(Debug, Serialize)]
struct UpdateResponse {
    updated: Vec<RecordId>,
    failed: Vec<RowFailure>,
    repair: RepairReport,
}

/// Apply a batch of row changes, then run the repair hook on the rows that
/// were written.
///
/// Rows are written one by one. A failing row is reported and does not stop
/// the rest, so every committed reparenting still reaches its drafts. The
/// hook's outcome is reported too but never turns the update into an error.
async fn update_records(
    State(state): State<AppState>,
    Json(batch): Json<UpdateBatch>,
) -> ApiResult<Json<UpdateResponse>> {
    if batch.table != CONTENT_TABLE {
        return Err(ApiError::BadRequest(format!(
            "unsupported table `{}`",
            batch.table
        )));
    }

    let mut applied = UpdateBatch {
        table: batch.table.clone(),
        workspace_id: batch.workspace_id,
        rows: BTreeMap::new(),
    };
    let mut failed = Vec::new();
    for (&id, change) in &batch.rows {
        match state.writer().apply_change(id, change).await {
            Ok(true) => {
                applied.rows.insert(id, change.clone());
            }
            Ok(false) => tracing::debug!(record = id, "Update skipped, no such row"),
            Err(err) => {
                tracing::warn!(record = id, error = %err, "Row update failed");
                failed.push(RowFailure {
                    record_id: id,
                    reason: err.to_string(),
                });
            }
        }
    }

    let repair = state.repair_hook().on_records_updated(&applied).await;
    if !repair.is_clean() {
        tracing::warn!(failed = repair.failed.len(), "Repair hook left drafts unsynchronised");
    }

    Ok(Json(UpdateResponse {
        updated: applied.rows.keys().copied().collect(),
        failed,
        repair,
    }))
}
