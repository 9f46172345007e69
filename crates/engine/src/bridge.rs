// Settings bridge: the two tier-scoped documents patterns persist in.
//
// Global document: `~/.patternstore/settings.json`
// Workspace document: `<workspace>/.patternstore/settings.json`

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use patternstore_common::types::{StoredPattern, Tier};
use serde_json::{Map, Value};

use crate::error::BridgeError;

/// Key-value document store with two independent documents, one per tier.
///
/// Reading an unset key yields an empty list; a write replaces the tier's
/// whole list. Writes are atomic from the engine's point of view.
pub trait SettingsBridge: Send + Sync {
    fn read_scope(&self, tier: Tier) -> Result<Vec<StoredPattern>, BridgeError>;
    fn write_scope(&self, tier: Tier, patterns: &[StoredPattern]) -> Result<(), BridgeError>;
}

impl<B: SettingsBridge + ?Sized> SettingsBridge for std::sync::Arc<B> {
    fn read_scope(&self, tier: Tier) -> Result<Vec<StoredPattern>, BridgeError> {
        (**self).read_scope(tier)
    }

    fn write_scope(&self, tier: Tier, patterns: &[StoredPattern]) -> Result<(), BridgeError> {
        (**self).write_scope(tier, patterns)
    }
}

const SETTINGS_DIR: &str = ".patternstore";
const SETTINGS_FILE: &str = "settings.json";

/// File-backed bridge storing each tier's list as a JSON array under the
/// tier's settings key inside a JSON object document. Unrelated keys in the
/// document are preserved across writes.
#[derive(Debug, Clone)]
pub struct JsonSettingsBridge {
    global_path: PathBuf,
    workspace_path: PathBuf,
}

impl JsonSettingsBridge {
    pub fn new(global_path: impl Into<PathBuf>, workspace_path: impl Into<PathBuf>) -> Self {
        Self { global_path: global_path.into(), workspace_path: workspace_path.into() }
    }

    /// Bridge over the default document locations. `None` if the home
    /// directory cannot be determined.
    #[must_use]
    pub fn resolve(workspace_root: &Path) -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::new(
            home.join(SETTINGS_DIR).join(SETTINGS_FILE),
            workspace_root.join(SETTINGS_DIR).join(SETTINGS_FILE),
        ))
    }

    fn path_for(&self, tier: Tier) -> &Path {
        match tier {
            Tier::Global => &self.global_path,
            Tier::Workspace => &self.workspace_path,
        }
    }

    fn read_document(path: &Path) -> Result<Map<String, Value>, BridgeError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Map::new());
            }
            Err(error) => return Err(BridgeError::Io(error)),
        };
        serde_json::from_str(&contents).map_err(BridgeError::Decode)
    }

    fn write_document(path: &Path, document: &Map<String, Value>) -> Result<(), BridgeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(document).map_err(BridgeError::Encode)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl SettingsBridge for JsonSettingsBridge {
    fn read_scope(&self, tier: Tier) -> Result<Vec<StoredPattern>, BridgeError> {
        let document = Self::read_document(self.path_for(tier))?;
        match document.get(tier.settings_key()) {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(BridgeError::Decode),
        }
    }

    fn write_scope(&self, tier: Tier, patterns: &[StoredPattern]) -> Result<(), BridgeError> {
        let path = self.path_for(tier);
        let mut document = Self::read_document(path)?;
        let value = serde_json::to_value(patterns).map_err(BridgeError::Encode)?;
        document.insert(tier.settings_key().to_string(), value);
        Self::write_document(path, &document)
    }
}

/// In-process bridge for tests and embedders that own persistence.
#[derive(Debug, Default)]
pub struct MemoryBridge {
    scopes: Mutex<HashMap<Tier, Vec<StoredPattern>>>,
}

impl MemoryBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a tier's contents directly, bypassing the repository.
    pub fn seed(&self, tier: Tier, patterns: Vec<StoredPattern>) {
        self.lock().insert(tier, patterns);
    }

    /// Current contents of a tier, as the next read would observe them.
    #[must_use]
    pub fn snapshot(&self, tier: Tier) -> Vec<StoredPattern> {
        self.lock().get(&tier).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Tier, Vec<StoredPattern>>> {
        self.scopes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsBridge for MemoryBridge {
    fn read_scope(&self, tier: Tier) -> Result<Vec<StoredPattern>, BridgeError> {
        Ok(self.snapshot(tier))
    }

    fn write_scope(&self, tier: Tier, patterns: &[StoredPattern]) -> Result<(), BridgeError> {
        self.lock().insert(tier, patterns.to_vec());
        Ok(())
    }
}
