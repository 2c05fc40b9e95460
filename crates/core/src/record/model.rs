use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::version::VersionState;

pub type RecordId = i64;
pub type LanguageId = i32;
pub type WorkspaceId = i32;
pub type Slot = i32;

/// One row of the flat content table.
///
/// Zero is the "unset" sentinel for every reference field:
/// `parent_container_id = 0` means the row is not inside a container,
/// `translation_parent_id = 0` marks a default-language row and
/// `live_version_id = 0` marks the live row itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub page_id: RecordId,
    pub record_type: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub parent_container_id: RecordId,
    #[serde(default)]
    pub slot: Slot,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub language_id: LanguageId,
    #[serde(default)]
    pub translation_parent_id: RecordId,
    #[serde(default)]
    pub live_version_id: RecordId,
    #[serde(default)]
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub version_state: VersionState,
    #[serde(default)]
    pub deleted: bool,
    /// Body fields, passed through to the renderer untouched.
    #[serde(default)]
    pub content: Value,
}

impl Record {
    pub fn new(id: RecordId, page_id: RecordId, record_type: impl Into<String>) -> Self {
        Self {
            id,
            page_id,
            record_type: record_type.into(),
            header: String::new(),
            parent_container_id: 0,
            slot: 0,
            sort_order: 0,
            language_id: 0,
            translation_parent_id: 0,
            live_version_id: 0,
            workspace_id: 0,
            version_state: VersionState::Normal,
            deleted: false,
            content: Value::Null,
        }
    }

    pub fn is_live_version(&self) -> bool {
        self.live_version_id == 0
    }

    pub fn is_translation(&self) -> bool {
        self.translation_parent_id != 0
    }

    /// Id of the live row this record stands for.
    pub fn live_id(&self) -> RecordId {
        if self.live_version_id != 0 {
            self.live_version_id
        } else {
            self.id
        }
    }

    /// Id a renderer loads to draw this record. Drafts are rendered through
    /// their live id so the host applies its own version overlay.
    pub fn render_source_id(&self) -> RecordId {
        self.live_id()
    }

    // Builder-style setters, mostly used to assemble fixtures.

    pub fn in_container(mut self, parent: RecordId, slot: Slot, sort_order: i64) -> Self {
        self.parent_container_id = parent;
        self.slot = slot;
        self.sort_order = sort_order;
        self
    }

    pub fn translation_of(mut self, default_id: RecordId, language: LanguageId) -> Self {
        self.translation_parent_id = default_id;
        self.language_id = language;
        self
    }

    pub fn in_language(mut self, language: LanguageId) -> Self {
        self.language_id = language;
        self
    }

    pub fn draft_of(mut self, live_id: RecordId, workspace: WorkspaceId) -> Self {
        self.live_version_id = live_id;
        self.workspace_id = workspace;
        self
    }

    pub fn with_state(mut self, state: VersionState) -> Self {
        self.version_state = state;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}
