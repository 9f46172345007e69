// Core domain types shared across all patternstore crates.

use serde::{Deserialize, Serialize};

/// Storage tier for a pattern: user-wide or project-local.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Global,
    Workspace,
}

impl Tier {
    /// Both tiers in aggregate order: workspace entries come first.
    pub const ALL: [Self; 2] = [Self::Workspace, Self::Global];

    /// Key the tier's pattern list is stored under in its settings document.
    #[must_use]
    pub fn settings_key(self) -> &'static str {
        match self {
            Self::Global => "savedPatterns",
            Self::Workspace => "workspacePatterns",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Workspace => write!(f, "workspace"),
        }
    }
}

/// Search flags for a pattern. All default to off.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternFlags {
    pub is_regex: bool,
    pub is_case_sensitive: bool,
    pub match_whole_word: bool,
    pub is_multiline: bool,
}

/// A pattern as persisted in a tier's settings document.
///
/// `id` is absent in hand-authored documents and in documents written before
/// ids existed; the repository backfills it on first read. The owning tier is
/// derived from which document the record was read from, never stored on the
/// record itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub find: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
    #[serde(default)]
    pub flags: PatternFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_to_include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_to_exclude: Option<String>,
}

impl StoredPattern {
    /// Promote to the runtime form under `id`, discarding any id the stored
    /// record may have carried.
    #[must_use]
    pub fn into_pattern(self, id: String) -> Pattern {
        Pattern {
            id,
            label: self.label,
            find: self.find,
            replace: self.replace,
            flags: self.flags,
            files_to_include: self.files_to_include,
            files_to_exclude: self.files_to_exclude,
        }
    }
}

/// A pattern with its stable runtime identity.
///
/// `id` is opaque: unique within its tier, assigned once, retained across
/// edits, and never reused after a delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub find: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
    #[serde(default)]
    pub flags: PatternFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_to_include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_to_exclude: Option<String>,
}

impl Pattern {
    /// The persisted form of this pattern.
    #[must_use]
    pub fn to_stored(&self) -> StoredPattern {
        StoredPattern {
            id: Some(self.id.clone()),
            label: self.label.clone(),
            find: self.find.clone(),
            replace: self.replace.clone(),
            flags: self.flags,
            files_to_include: self.files_to_include.clone(),
            files_to_exclude: self.files_to_exclude.clone(),
        }
    }

    /// True when the pattern carries a non-empty replacement. A missing,
    /// empty, or whitespace-only replace text means a find-only pattern.
    #[must_use]
    pub fn has_replace(&self) -> bool {
        self.replace.as_deref().is_some_and(|r| !r.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_settings_keys() {
        assert_eq!(Tier::Global.settings_key(), "savedPatterns");
        assert_eq!(Tier::Workspace.settings_key(), "workspacePatterns");
    }

    #[test]
    fn tier_display_and_serde_agree() {
        assert_eq!(Tier::Global.to_string(), "global");
        assert_eq!(Tier::Workspace.to_string(), "workspace");
        assert_eq!(serde_json::to_string(&Tier::Global).unwrap(), "\"global\"");
        assert_eq!(serde_json::to_string(&Tier::Workspace).unwrap(), "\"workspace\"");
    }

    #[test]
    fn stored_pattern_parses_hand_authored_json() {
        // Minimal hand-authored record: no id, no replace, no globs, partial flags.
        let raw = r#"{"label": "Quotes", "find": "'", "flags": {"isRegex": true}}"#;
        let stored: StoredPattern = serde_json::from_str(raw).unwrap();
        assert!(stored.id.is_none());
        assert_eq!(stored.label, "Quotes");
        assert_eq!(stored.find, "'");
        assert!(stored.replace.is_none());
        assert!(stored.flags.is_regex);
        assert!(!stored.flags.is_case_sensitive);
        assert!(stored.files_to_include.is_none());
    }

    #[test]
    fn stored_pattern_omits_absent_fields_on_write() {
        let stored = StoredPattern {
            label: "Quotes".into(),
            find: "'".into(),
            ..StoredPattern::default()
        };
        let json = serde_json::to_value(&stored).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("replace"));
        assert!(!obj.contains_key("filesToInclude"));
        assert!(obj.contains_key("flags"));
    }

    #[test]
    fn pattern_round_trips_through_stored_form() {
        let pattern = Pattern {
            id: "abc-123".into(),
            label: "Quotes".into(),
            find: "'".into(),
            replace: Some("\"".into()),
            flags: PatternFlags { is_regex: true, ..PatternFlags::default() },
            files_to_include: Some("src/**/*.rs".into()),
            files_to_exclude: None,
        };
        let stored = pattern.to_stored();
        assert_eq!(stored.id.as_deref(), Some("abc-123"));
        let back = stored.into_pattern("abc-123".into());
        assert_eq!(back, pattern);
    }

    #[test]
    fn into_pattern_discards_stale_stored_id() {
        let stored = StoredPattern {
            id: Some("old".into()),
            label: "x".into(),
            ..StoredPattern::default()
        };
        let pattern = stored.into_pattern("new".into());
        assert_eq!(pattern.id, "new");
    }

    #[test]
    fn has_replace_treats_blank_as_find_only() {
        let mut pattern = Pattern {
            id: "p".into(),
            label: "x".into(),
            find: "foo".into(),
            replace: None,
            flags: PatternFlags::default(),
            files_to_include: None,
            files_to_exclude: None,
        };
        assert!(!pattern.has_replace());
        pattern.replace = Some(String::new());
        assert!(!pattern.has_replace());
        pattern.replace = Some("   ".into());
        assert!(!pattern.has_replace());
        pattern.replace = Some("bar".into());
        assert!(pattern.has_replace());
    }

    #[test]
    fn flags_serialize_camel_case() {
        let flags = PatternFlags { match_whole_word: true, ..PatternFlags::default() };
        let json = serde_json::to_value(flags).unwrap();
        assert_eq!(json["matchWholeWord"], true);
        assert_eq!(json["isRegex"], false);
    }
}
