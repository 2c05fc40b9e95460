use crate::record::{LanguageId, Record, RecordId, WorkspaceId};

/// A resolved container root. Built fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    record: Record,
    default_record: Option<Record>,
    language_id: LanguageId,
    workspace_id: WorkspaceId,
}

impl Container {
    pub(crate) fn new(
        record: Record,
        default_record: Option<Record>,
        workspace_id: WorkspaceId,
    ) -> Self {
        Self {
            language_id: record.language_id,
            record,
            default_record,
            workspace_id,
        }
    }

    /// The record the container was requested by.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// The record children hang off: the default-language original of a
    /// connected translation, otherwise the requested record.
    pub fn container_record(&self) -> &Record {
        self.default_record.as_ref().unwrap_or(&self.record)
    }

    /// Parent key of the children. Child rows always reference the live id.
    pub fn live_root_id(&self) -> RecordId {
        self.container_record().live_id()
    }

    pub fn uid(&self) -> RecordId {
        self.container_record().id
    }

    pub fn page_id(&self) -> RecordId {
        self.container_record().page_id
    }

    pub fn record_type(&self) -> &str {
        &self.container_record().record_type
    }

    pub fn language_id(&self) -> LanguageId {
        self.language_id
    }

    /// Workspace active when the container was built.
    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    pub fn is_connected_translation(&self) -> bool {
        self.default_record.is_some()
    }

    /// Connected translations follow the default-language layout and cannot
    /// be rearranged on their own.
    pub fn is_language_editable(&self) -> bool {
        self.language_id == 0 || !self.is_connected_translation()
    }
}
