//! Shared test content: container 10 on page 5 with two children in slot 1.

use std::sync::Arc;

use crate::record::{Record, VersionState};
use crate::registry::{ContainerConfiguration, ContainerRegistry, GridColumn};
use crate::store::MemoryStore;

pub const CONTAINER_TYPE: &str = "two-columns";

pub fn registry() -> Arc<ContainerRegistry> {
    let mut registry = ContainerRegistry::new();
    registry
        .register(
            ContainerConfiguration::new(CONTAINER_TYPE, "Two columns").with_row(vec![
                GridColumn::new("left", 1),
                GridColumn::new("right", 2),
            ]),
        )
        .expect("fixture registry is valid");
    Arc::new(registry)
}

pub fn text(id: i64, slot: i32, sort_order: i64) -> Record {
    Record::new(id, 5, "text")
        .in_container(10, slot, sort_order)
        .with_header(format!("Text {id}"))
}

/// Root 10 with children 20 and 21 in slot 1 and child 22 in slot 2.
pub fn base_records() -> Vec<Record> {
    vec![
        Record::new(10, 5, CONTAINER_TYPE),
        text(20, 1, 1),
        text(21, 1, 2),
        text(22, 2, 1),
    ]
}

pub fn store_with(extra: impl IntoIterator<Item = Record>) -> Arc<MemoryStore> {
    let store = MemoryStore::with_records(base_records());
    for record in extra {
        store.insert(record).expect("memory store accepts fixtures");
    }
    Arc::new(store)
}

/// Draft of `live` in workspace 7 marking it for deletion.
pub fn delete_placeholder(id: i64, live: &Record) -> Record {
    let mut draft = live.clone();
    draft.id = id;
    draft.live_version_id = live.id;
    draft.workspace_id = 7;
    draft.version_state = VersionState::DeletePlaceholder;
    draft
}
