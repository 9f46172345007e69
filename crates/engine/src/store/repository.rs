// Pattern repository: owns identifier assignment, id backfill on read, and
// the four mutating operations.
//
// Every mutation re-reads its tier fresh under a per-tier lock before
// computing the write, so at most one writer is in flight per tier within
// this process. Concurrent edits to the settings documents by external
// processes remain best-effort last-write-wins.

use std::collections::HashSet;

use patternstore_common::types::{Pattern, StoredPattern, Tier};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::bridge::SettingsBridge;
use crate::error::StoreError;

/// Base name for auto-generated pattern labels.
const NEW_PATTERN_LABEL: &str = "New Pattern";

/// Patterns from both tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternLists {
    pub workspace: Vec<Pattern>,
    pub global: Vec<Pattern>,
}

impl PatternLists {
    /// All patterns in aggregate order: workspace entries, then global.
    pub fn ordered(&self) -> impl Iterator<Item = (Tier, &Pattern)> {
        self.workspace
            .iter()
            .map(|p| (Tier::Workspace, p))
            .chain(self.global.iter().map(|p| (Tier::Global, p)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workspace.len() + self.global.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workspace.is_empty() && self.global.is_empty()
    }
}

pub struct PatternRepository<B> {
    bridge: B,
    global_lock: Mutex<()>,
    workspace_lock: Mutex<()>,
}

impl<B: SettingsBridge> PatternRepository<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge, global_lock: Mutex::new(()), workspace_lock: Mutex::new(()) }
    }

    fn lock_for(&self, tier: Tier) -> &Mutex<()> {
        match tier {
            Tier::Global => &self.global_lock,
            Tier::Workspace => &self.workspace_lock,
        }
    }

    /// Read both tiers, workspace first. Records missing an id are assigned
    /// one and the corrected tier document is written back before returning,
    /// so ids are stable across reads.
    pub async fn list_all(&self) -> Result<PatternLists, StoreError> {
        let workspace = self.list_tier(Tier::Workspace).await?;
        let global = self.list_tier(Tier::Global).await?;
        Ok(PatternLists { workspace, global })
    }

    /// Read one tier with id backfill.
    pub async fn list_tier(&self, tier: Tier) -> Result<Vec<Pattern>, StoreError> {
        let _guard = self.lock_for(tier).lock().await;
        self.read_tier_locked(tier)
    }

    /// True iff some pattern in `tier` has exactly this label (case-sensitive).
    pub async fn exists(&self, label: &str, tier: Tier) -> Result<bool, StoreError> {
        Ok(self.list_tier(tier).await?.iter().any(|p| p.label == label))
    }

    /// Look up a pattern by id.
    pub async fn find(&self, tier: Tier, id: &str) -> Result<Option<Pattern>, StoreError> {
        Ok(self.list_tier(tier).await?.into_iter().find(|p| p.id == id))
    }

    /// Create a fresh pattern with an unused auto-generated label, prepend it
    /// to the tier's list, and persist.
    pub async fn create(&self, tier: Tier) -> Result<Pattern, StoreError> {
        let _guard = self.lock_for(tier).lock().await;
        let mut patterns = self.read_tier_locked(tier)?;
        let pattern = Pattern {
            id: new_id(),
            label: next_label(&patterns),
            find: String::new(),
            replace: None,
            flags: Default::default(),
            files_to_include: None,
            files_to_exclude: None,
        };
        patterns.insert(0, pattern.clone());
        self.persist(tier, &patterns)?;
        info!(%tier, label = %pattern.label, "pattern created");
        Ok(pattern)
    }

    /// Upsert a pattern into `tier`: an id already present in the tier is
    /// replaced in place (position preserved), anything else is inserted at
    /// the front, with a fresh id when the draft carries none. An unmatched
    /// id is an insert, never an error.
    pub async fn save(&self, tier: Tier, draft: StoredPattern) -> Result<Pattern, StoreError> {
        let _guard = self.lock_for(tier).lock().await;
        let mut patterns = self.read_tier_locked(tier)?;

        let id = match draft.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => new_id(),
        };
        let pattern = draft.into_pattern(id);

        match patterns.iter().position(|p| p.id == pattern.id) {
            Some(index) => {
                patterns[index] = pattern.clone();
                debug!(%tier, id = %pattern.id, index, "pattern updated in place");
            }
            None => patterns.insert(0, pattern.clone()),
        }

        self.persist(tier, &patterns)?;
        info!(%tier, label = %pattern.label, "pattern saved");
        Ok(pattern)
    }

    /// Change only the label of the pattern with `id`.
    pub async fn rename(&self, tier: Tier, id: &str, new_label: &str) -> Result<(), StoreError> {
        let _guard = self.lock_for(tier).lock().await;
        let mut patterns = self.read_tier_locked(tier)?;

        let Some(index) = patterns.iter().position(|p| p.id == id) else {
            return Err(StoreError::NotFound { id: id.to_string(), tier });
        };
        // The pattern being renamed is excluded, so renaming to its own
        // current label is a no-op success.
        if patterns.iter().any(|p| p.label == new_label && p.id != id) {
            return Err(StoreError::DuplicateLabel { label: new_label.to_string(), tier });
        }

        patterns[index].label = new_label.to_string();
        self.persist(tier, &patterns)?;
        info!(%tier, id, label = new_label, "pattern renamed");
        Ok(())
    }

    /// Remove the pattern with `id`, returning its label so the caller can
    /// report what was deleted.
    pub async fn delete(&self, tier: Tier, id: &str) -> Result<String, StoreError> {
        let _guard = self.lock_for(tier).lock().await;
        let mut patterns = self.read_tier_locked(tier)?;

        let Some(index) = patterns.iter().position(|p| p.id == id) else {
            return Err(StoreError::NotFound { id: id.to_string(), tier });
        };
        let removed = patterns.remove(index);
        self.persist(tier, &patterns)?;
        info!(%tier, label = %removed.label, "pattern deleted");
        Ok(removed.label)
    }

    fn read_tier_locked(&self, tier: Tier) -> Result<Vec<Pattern>, StoreError> {
        let stored = self.bridge.read_scope(tier)?;
        let (patterns, backfilled) = assign_missing_ids(stored);
        if backfilled > 0 {
            info!(%tier, backfilled, "assigned ids to patterns missing one");
            self.persist(tier, &patterns)?;
        }
        Ok(patterns)
    }

    fn persist(&self, tier: Tier, patterns: &[Pattern]) -> Result<(), StoreError> {
        let stored: Vec<StoredPattern> = patterns.iter().map(Pattern::to_stored).collect();
        self.bridge.write_scope(tier, &stored)?;
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn assign_missing_ids(stored: Vec<StoredPattern>) -> (Vec<Pattern>, usize) {
    let mut backfilled = 0;
    let patterns = stored
        .into_iter()
        .map(|record| {
            let id = match record.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => id.to_string(),
                None => {
                    backfilled += 1;
                    new_id()
                }
            };
            record.into_pattern(id)
        })
        .collect();
    (patterns, backfilled)
}

/// First unused auto-label: "New Pattern", then "New Pattern 2", "New
/// Pattern 3", ... skipping any suffix already taken in the tier.
fn next_label(patterns: &[Pattern]) -> String {
    let used: HashSet<&str> = patterns.iter().map(|p| p.label.as_str()).collect();
    if !used.contains(NEW_PATTERN_LABEL) {
        return NEW_PATTERN_LABEL.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{NEW_PATTERN_LABEL} {n}");
        if !used.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}
