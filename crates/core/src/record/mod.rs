pub mod change;
pub mod model;
pub mod version;

pub use change::{RecordChange, UpdateBatch, CONTENT_TABLE};
pub use model::{LanguageId, Record, RecordId, Slot, WorkspaceId};
pub use version::VersionState;
