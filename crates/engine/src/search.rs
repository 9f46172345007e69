// Search invocation adapter: maps a resolved pattern onto the host's
// "find in files" command arguments, and the load-into-search flow.

use patternstore_common::types::Pattern;
use serde::Serialize;
use tracing::info;

use crate::resolver::{resolve_placeholders, Resolution};
use crate::ui::PromptUi;

/// Argument record for the host's find-in-files command.
///
/// `replace` is present only when the pattern carries a non-empty
/// replacement: an omitted field leaves the host in find-only mode, which is
/// a different UI state from an explicit empty replacement.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchInvocation {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
    pub trigger_search: bool,
    pub is_regex: bool,
    pub is_case_sensitive: bool,
    pub match_whole_word: bool,
    pub preserve_case: bool,
    pub files_to_include: String,
    pub files_to_exclude: String,
}

/// Host command that opens the search panel with the given parameters.
/// Fire-and-forget; no return value is consumed.
#[allow(async_fn_in_trait)]
pub trait SearchHost: Send + Sync {
    async fn open_search(&self, invocation: SearchInvocation);
}

/// Build the invocation record for an already-resolved pattern. Pure
/// mapping, no failure modes. The search is never auto-triggered so the
/// user can review it first.
#[must_use]
pub fn invocation_for(pattern: &Pattern) -> SearchInvocation {
    SearchInvocation {
        query: pattern.find.clone(),
        replace: if pattern.has_replace() { pattern.replace.clone() } else { None },
        trigger_search: false,
        is_regex: pattern.flags.is_regex,
        is_case_sensitive: pattern.flags.is_case_sensitive,
        match_whole_word: pattern.flags.match_whole_word,
        preserve_case: false,
        files_to_include: pattern.files_to_include.clone().unwrap_or_default(),
        files_to_exclude: pattern.files_to_exclude.clone().unwrap_or_default(),
    }
}

/// Outcome of a load-into-search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Cancelled,
}

/// Resolve a pattern's placeholders and hand the invocation to the search
/// host. Find and replace resolve in a single batch; cancellation leaves
/// the host untouched.
pub async fn load_pattern<U: PromptUi, H: SearchHost>(
    ui: &U,
    host: &H,
    pattern: &Pattern,
) -> LoadOutcome {
    let has_replace = pattern.has_replace();
    let mut texts = vec![pattern.find.clone()];
    if has_replace {
        texts.push(pattern.replace.clone().unwrap_or_default());
    }

    let resolved = match resolve_placeholders(ui, &texts).await {
        Resolution::Done(resolved) => resolved,
        Resolution::Cancelled => return LoadOutcome::Cancelled,
    };

    let mut resolved_pattern = pattern.clone();
    let mut parts = resolved.into_iter();
    resolved_pattern.find = parts.next().unwrap_or_default();
    if has_replace {
        resolved_pattern.replace = parts.next();
    }

    host.open_search(invocation_for(&resolved_pattern)).await;
    info!(label = %pattern.label, "pattern loaded into search");
    LoadOutcome::Loaded
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::{SearchHost, SearchInvocation};

    /// Records every invocation the engine hands to the host.
    #[derive(Default)]
    pub struct RecordingHost {
        pub invocations: Mutex<Vec<SearchInvocation>>,
    }

    impl RecordingHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }

        pub fn last(&self) -> Option<SearchInvocation> {
            self.invocations.lock().unwrap().last().cloned()
        }
    }

    impl SearchHost for RecordingHost {
        async fn open_search(&self, invocation: SearchInvocation) {
            self.invocations.lock().unwrap().push(invocation);
        }
    }
}

#[cfg(test)]
mod tests {
    use patternstore_common::types::PatternFlags;

    use super::test_support::RecordingHost;
    use super::*;
    use crate::ui::test_support::ScriptedUi;

    fn pattern(find: &str, replace: Option<&str>) -> Pattern {
        Pattern {
            id: "p-1".into(),
            label: "Test".into(),
            find: find.into(),
            replace: replace.map(str::to_string),
            flags: PatternFlags::default(),
            files_to_include: None,
            files_to_exclude: None,
        }
    }

    #[test]
    fn replace_is_omitted_for_empty_or_blank_text() {
        assert_eq!(invocation_for(&pattern("foo", None)).replace, None);
        assert_eq!(invocation_for(&pattern("foo", Some(""))).replace, None);
        assert_eq!(invocation_for(&pattern("foo", Some("   "))).replace, None);
        assert_eq!(invocation_for(&pattern("foo", Some("x"))).replace, Some("x".into()));
    }

    #[test]
    fn replace_field_disappears_from_the_wire_when_omitted() {
        let json = serde_json::to_value(invocation_for(&pattern("foo", Some("  ")))).unwrap();
        assert!(json.get("replace").is_none());

        let json = serde_json::to_value(invocation_for(&pattern("foo", Some("x")))).unwrap();
        assert_eq!(json["replace"], "x");
    }

    #[test]
    fn invocation_copies_flags_and_fixes_the_rest() {
        let mut p = pattern("needle", Some("thread"));
        p.flags = PatternFlags {
            is_regex: true,
            is_case_sensitive: true,
            match_whole_word: true,
            is_multiline: true,
        };
        p.files_to_include = Some("src/**".into());

        let invocation = invocation_for(&p);
        assert_eq!(invocation.query, "needle");
        assert!(invocation.is_regex);
        assert!(invocation.is_case_sensitive);
        assert!(invocation.match_whole_word);
        assert!(!invocation.trigger_search);
        assert!(!invocation.preserve_case);
        assert_eq!(invocation.files_to_include, "src/**");
        assert_eq!(invocation.files_to_exclude, "");
    }

    #[test]
    fn invocation_wire_shape_is_camel_case() {
        let json = serde_json::to_value(invocation_for(&pattern("q", None))).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("triggerSearch"));
        assert!(obj.contains_key("isCaseSensitive"));
        assert!(obj.contains_key("filesToInclude"));
        assert_eq!(json["triggerSearch"], false);
        assert_eq!(json["preserveCase"], false);
    }

    #[tokio::test]
    async fn load_resolves_find_and_replace_in_one_batch() {
        let ui = ScriptedUi::new().answer_text(Some("42"));
        let host = RecordingHost::new();
        let p = pattern("find ${prompt:n}", Some("replace ${prompt:n}"));

        let outcome = load_pattern(&ui, &host, &p).await;

        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(ui.text_prompt_count(), 1);
        let invocation = host.last().unwrap();
        assert_eq!(invocation.query, "find 42");
        assert_eq!(invocation.replace.as_deref(), Some("replace 42"));
    }

    #[tokio::test]
    async fn cancelled_resolution_never_reaches_the_host() {
        let ui = ScriptedUi::new().answer_text(None);
        let host = RecordingHost::new();
        let p = pattern("${prompt:x}", None);

        let outcome = load_pattern(&ui, &host, &p).await;

        assert_eq!(outcome, LoadOutcome::Cancelled);
        assert_eq!(host.count(), 0);
    }

    #[tokio::test]
    async fn find_only_pattern_resolves_only_the_find_text() {
        let ui = ScriptedUi::new().answer_text(Some("v"));
        let host = RecordingHost::new();
        // Blank replace is find-only; its placeholder must not prompt.
        let p = pattern("${prompt:a}", Some("  "));

        load_pattern(&ui, &host, &p).await;

        assert_eq!(ui.text_prompt_count(), 1);
        let invocation = host.last().unwrap();
        assert_eq!(invocation.query, "v");
        assert_eq!(invocation.replace, None);
    }
}
