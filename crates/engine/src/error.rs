// Engine error taxonomy.
//
// Cancellation is deliberately absent: a user declining a prompt is a normal
// outcome carried by dedicated result variants, not an error.

use patternstore_common::types::Tier;
use thiserror::Error;

/// Failures from the settings bridge. Fatal to the enclosing operation;
/// nothing in the engine retries.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings document is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode settings document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Failures from repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed id does not exist in the addressed tier.
    #[error("no pattern with id `{id}` in {tier} settings")]
    NotFound { id: String, tier: Tier },

    /// Another pattern in the same tier already holds the requested label.
    #[error("a pattern named `{label}` already exists in {tier} settings")]
    DuplicateLabel { label: String, tier: Tier },

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
