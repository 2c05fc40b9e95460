//! Resolution of content containers over a flat, versioned, multi-language
//! record table.
//!
//! - [`record`]: the row model and partial updates
//! - [`store`]: read/write ports with PostgreSQL and in-memory adapters
//! - [`registry`]: container types and their slot grids
//! - [`container`]: root resolution and per-slot child overlay
//! - [`repair`]: post-commit parent propagation from live rows to drafts

pub mod container;
pub mod record;
pub mod registry;
pub mod repair;
pub mod store;

pub use container::{Container, ContainerError, ContainerFactory};
pub use record::{Record, RecordChange, UpdateBatch, VersionState};
pub use registry::ContainerRegistry;
pub use repair::{RepairHook, RepairReport};
pub use store::{MemoryStore, PgRecordStore, RecordStore, RecordWriter, StoreError};
