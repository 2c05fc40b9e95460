use std::sync::Arc;

use content_containers_core::{
    ContainerFactory, ContainerRegistry, RecordStore, RecordWriter, RepairHook,
};
use content_containers_core::record::WorkspaceId;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Everything inside is read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn RecordStore>,
    writer: Arc<dyn RecordWriter>,
    registry: Arc<ContainerRegistry>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        writer: Arc<dyn RecordWriter>,
        registry: Arc<ContainerRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(InnerState {
                store,
                writer,
                registry,
            }),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    pub fn writer(&self) -> &dyn RecordWriter {
        self.inner.writer.as_ref()
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.inner.registry
    }

    /// Request-scoped factory resolving against `workspace_id`.
    pub fn container_factory(&self, workspace_id: WorkspaceId) -> ContainerFactory {
        ContainerFactory::new(
            Arc::clone(&self.inner.store),
            Arc::clone(&self.inner.registry),
            workspace_id,
        )
    }

    pub fn repair_hook(&self) -> RepairHook {
        RepairHook::new(Arc::clone(&self.inner.writer))
    }
}
