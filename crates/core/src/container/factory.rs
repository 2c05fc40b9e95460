use std::sync::Arc;

use tracing::debug;

use super::error::ContainerError;
use super::model::Container;
use super::overlay::{self, Placed};
use crate::record::{Record, RecordId, Slot, WorkspaceId};
use crate::registry::ContainerRegistry;
use crate::store::RecordStore;

/// Builds containers and their child lists for one request.
///
/// Nothing is cached: every call reads the store again so editorial changes
/// show up immediately.
#[derive(Clone)]
pub struct ContainerFactory {
    store: Arc<dyn RecordStore>,
    registry: Arc<ContainerRegistry>,
    workspace_id: WorkspaceId,
}

impl ContainerFactory {
    pub fn new(
        store: Arc<dyn RecordStore>,
        registry: Arc<ContainerRegistry>,
        workspace_id: WorkspaceId,
    ) -> Self {
        Self {
            store,
            registry,
            workspace_id,
        }
    }

    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Resolve the authoritative root of container `id`.
    ///
    /// A translated root is connected when its default-language original
    /// still exists; otherwise it is a free-standing translation with its
    /// own children.
    pub async fn build_container(&self, id: RecordId) -> Result<Container, ContainerError> {
        let record = self
            .store
            .fetch_by_id(id)
            .await?
            .ok_or(ContainerError::NotFound(id))?;

        let default_record = if record.is_translation() {
            self.store.fetch_translation_parent(&record).await?
        } else {
            None
        };

        let container = Container::new(record, default_record, self.workspace_id);
        debug!(
            container = id,
            live_root = container.live_root_id(),
            language = container.language_id(),
            connected = container.is_connected_translation(),
            "Container resolved"
        );
        Ok(container)
    }

    /// Ordered children rendered in `slot`, with overlays applied.
    pub async fn children_for_slot(
        &self,
        container: &Container,
        slot: Slot,
    ) -> Result<Vec<Record>, ContainerError> {
        if !self.registry.is_valid_slot(container.record_type(), slot) {
            return Err(ContainerError::InvalidSlot {
                record_type: container.record_type().to_string(),
                slot,
            });
        }

        let children: Vec<Record> = self
            .children(container)
            .await?
            .into_iter()
            .filter(|placed| placed.slot == slot)
            .map(|placed| placed.record)
            .collect();

        debug!(
            container = container.uid(),
            slot,
            count = children.len(),
            "Children resolved"
        );
        Ok(children)
    }

    /// Every child of the container across all slots, in display order.
    pub async fn children(&self, container: &Container) -> Result<Vec<Placed>, ContainerError> {
        let parent = container.live_root_id();
        let language = container.language_id();

        let current = if container.is_connected_translation() {
            let skeleton = self.store.fetch_children(parent, 0).await?;
            let translations = self
                .store
                .fetch_translation_overlays(&skeleton, language)
                .await?;
            overlay::overlay_translations(skeleton, translations)
        } else {
            overlay::untranslated(self.store.fetch_children(parent, language).await?)
        };

        // Overlay with the workspace the container was built in.
        let workspace = container.workspace_id();
        let current = if workspace != 0 {
            let rows: Vec<Record> = current.iter().map(|placed| placed.record.clone()).collect();
            let drafts = self
                .store
                .fetch_workspace_overlays(&rows, workspace)
                .await?;
            overlay::overlay_workspace(current, drafts)
        } else {
            current
        };

        Ok(overlay::finalize(current, workspace))
    }
}
