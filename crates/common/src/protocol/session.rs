// Message contract between the management UI and the engine.
//
// Incoming messages are a closed tagged union decoded at the boundary;
// anything that does not match the command set is rejected, never trusted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Pattern, StoredPattern, Tier};

/// A pattern paired with its target tier, as sent by the editor UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScopedPattern {
    pub scope: Tier,
    #[serde(flatten)]
    pub pattern: StoredPattern,
}

/// UI -> engine commands for a management session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SessionCommand {
    /// The UI finished booting and wants the initial pattern push.
    Ready,

    /// Create a fresh pattern in `scope`.
    Create { scope: Tier },

    /// Upsert an edited pattern into its tier.
    Save { pattern: ScopedPattern },

    /// Delete a pattern after user confirmation.
    Delete { id: String, scope: Tier },

    /// Load a pattern into the host search panel. `pattern` carries unsaved
    /// in-flight edits and takes precedence over the stored entry.
    Load {
        id: String,
        scope: Tier,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<StoredPattern>,
    },
}

/// Reference to a pattern by identity, used to auto-select after a refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatternRef {
    pub id: String,
    pub scope: Tier,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Engine -> UI events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    /// Full refresh of both pattern lists, with an optional auto-select.
    Patterns {
        workspace: Vec<Pattern>,
        user: Vec<Pattern>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select_pattern: Option<PatternRef>,
    },

    /// A user-facing notification.
    Notice { level: NoticeLevel, message: String },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed session message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl SessionCommand {
    /// Decode a raw UI message against the closed command set.
    pub fn decode(raw: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(raw)?)
    }
}
