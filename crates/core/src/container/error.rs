use thiserror::Error;

use crate::record::{RecordId, Slot};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ContainerError {
    /// The root id does not resolve to any record. Callers render nothing.
    #[error("container record {0} not found")]
    NotFound(RecordId),

    /// The slot is not part of the container type's grid.
    #[error("slot {slot} is not declared for container type `{record_type}`")]
    InvalidSlot { record_type: String, slot: Slot },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContainerError {
    /// Whether the caller should degrade to an empty content area.
    pub fn renders_empty(&self) -> bool {
        matches!(self, ContainerError::NotFound(_))
    }
}
