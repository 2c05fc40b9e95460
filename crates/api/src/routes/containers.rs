use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use content_containers_core::record::{LanguageId, RecordId, Slot, WorkspaceId};
use content_containers_core::registry::GridColumn;
use content_containers_core::{Container, ContainerRegistry, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_CHILDREN_KEY: &str = "children";

/// Container resolution routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/containers/{id}", get(show_container))
        .route("/v1/containers/{id}/slots/{slot}", get(slot_children))
}

#[derive(Debug, Default, Deserialize)]
struct ResolveParams {
    /// Active workspace; 0 is live.
    #[serde(default)]
    workspace: WorkspaceId,
    /// Key the child list is returned under.
    #[serde(rename = "as")]
    as_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerSummary {
    uid: RecordId,
    requested_id: RecordId,
    live_root_id: RecordId,
    page_id: RecordId,
    record_type: String,
    language_id: LanguageId,
    workspace_id: WorkspaceId,
    connected_translation: bool,
    language_editable: bool,
    columns: Vec<GridColumn>,
}

impl ContainerSummary {
    fn new(container: &Container, registry: &ContainerRegistry) -> Self {
        Self {
            uid: container.uid(),
            requested_id: container.record().id,
            live_root_id: container.live_root_id(),
            page_id: container.page_id(),
            record_type: container.record_type().to_string(),
            language_id: container.language_id(),
            workspace_id: container.workspace_id(),
            connected_translation: container.is_connected_translation(),
            language_editable: container.is_language_editable(),
            columns: registry
                .available_columns(container.record_type())
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

/// A child as handed to a renderer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChildView {
    #[serde(flatten)]
    record: Record,
    /// Id the renderer loads the element by.
    render_source: RecordId,
}

impl From<Record> for ChildView {
    fn from(record: Record) -> Self {
        Self {
            render_source: record.render_source_id(),
            record,
        }
    }
}

async fn show_container(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Query(params): Query<ResolveParams>,
) -> ApiResult<Json<ContainerSummary>> {
    let container = state
        .container_factory(params.workspace)
        .build_container(id)
        .await?;
    Ok(Json(ContainerSummary::new(&container, state.registry())))
}

/// Children of one slot. A container that does not exist renders as an
/// empty list so the surrounding page still renders.
async fn slot_children(
    State(state): State<AppState>,
    Path((id, slot)): Path<(RecordId, Slot)>,
    Query(params): Query<ResolveParams>,
) -> ApiResult<Json<Value>> {
    let factory = state.container_factory(params.workspace);
    let children = match factory.build_container(id).await {
        Ok(container) => factory.children_for_slot(&container, slot).await?,
        Err(err) if err.renders_empty() => {
            tracing::debug!(container = id, error = %err, "Rendering container as empty");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };

    let children: Vec<ChildView> = children.into_iter().map(ChildView::from).collect();
    let key = params
        .as_key
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| DEFAULT_CHILDREN_KEY.to_string());

    let mut body = Map::new();
    body.insert(key, serde_json::to_value(children)?);
    Ok(Json(Value::Object(body)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use std::sync::Arc;

    use crate::routes::test_support::{get_json, state, state_from, store, FaultyStore};

    fn ids(list: &Value) -> Vec<i64> {
        list.as_array()
            .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn container_summary() {
        let (status, body) = get_json(state(), "/v1/containers/12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["uid"], 10);
        assert_eq!(body["requestedId"], 12);
        assert_eq!(body["languageId"], 2);
        assert_eq!(body["connectedTranslation"], true);
        assert_eq!(body["languageEditable"], false);
        assert_eq!(body["columns"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn missing_container_is_404() {
        let (status, body) = get_json(state(), "/v1/containers/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "notFound");
    }

    #[tokio::test]
    async fn live_slot_children() {
        let (status, body) = get_json(state(), "/v1/containers/10/slots/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["children"]), vec![20, 21]);
        assert_eq!(body["children"][0]["renderSource"], 20);
    }

    #[tokio::test]
    async fn translated_slot_children() {
        let (_, body) = get_json(state(), "/v1/containers/12/slots/1").await;
        assert_eq!(ids(&body["children"]), vec![30, 21]);
    }

    #[tokio::test]
    async fn workspace_deletion_is_hidden() {
        let (_, body) = get_json(state(), "/v1/containers/10/slots/1?workspace=7").await;
        assert_eq!(ids(&body["children"]), vec![20]);
    }

    #[tokio::test]
    async fn custom_output_key() {
        let (_, body) = get_json(state(), "/v1/containers/10/slots/1?as=columnLeft").await;
        assert_eq!(ids(&body["columnLeft"]), vec![20, 21]);
        assert!(body.get("children").is_none());
    }

    #[tokio::test]
    async fn missing_container_renders_empty() {
        let (status, body) = get_json(state(), "/v1/containers/999/slots/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["children"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn undeclared_slot_is_bad_request() {
        let (status, body) = get_json(state(), "/v1/containers/10/slots/7").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "badRequest");
    }

    #[tokio::test]
    async fn unavailable_store_is_500_not_empty() {
        let store = store();
        let faulty = Arc::new(FaultyStore::new(store.clone()));
        let (status, body) =
            get_json(state_from(faulty, store), "/v1/containers/10/slots/1").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "storeUnavailable");
        assert!(body.get("children").is_none());
    }
}
