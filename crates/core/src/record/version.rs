//! Workspace version states of a content row.
//!
//! Persisted as a `SMALLINT`:
//! - `-1` version row of a record created inside a workspace
//! - `0` ordinary row
//! - `1` live-table placeholder of a record created inside a workspace
//! - `2` pending deletion
//! - `3` live-table placeholder of a pending move
//! - `4` version row pointing at a pending move

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VersionState {
    NewPlaceholderVersion,
    #[default]
    Normal,
    NewPlaceholder,
    DeletePlaceholder,
    MovePlaceholder,
    MovePointer,
}

impl VersionState {
    /// Decode the persisted state code. Unknown codes yield `None`.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            -1 => Some(VersionState::NewPlaceholderVersion),
            0 => Some(VersionState::Normal),
            1 => Some(VersionState::NewPlaceholder),
            2 => Some(VersionState::DeletePlaceholder),
            3 => Some(VersionState::MovePlaceholder),
            4 => Some(VersionState::MovePointer),
            _ => None,
        }
    }

    pub fn code(self) -> i16 {
        match self {
            VersionState::NewPlaceholderVersion => -1,
            VersionState::Normal => 0,
            VersionState::NewPlaceholder => 1,
            VersionState::DeletePlaceholder => 2,
            VersionState::MovePlaceholder => 3,
            VersionState::MovePointer => 4,
        }
    }

    /// Rows in this state never reach rendered output.
    pub fn is_delete_placeholder(self) -> bool {
        matches!(self, VersionState::DeletePlaceholder)
    }

    /// Live-table rows that only exist on behalf of a workspace.
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            VersionState::NewPlaceholder
                | VersionState::DeletePlaceholder
                | VersionState::MovePlaceholder
        )
    }
}
