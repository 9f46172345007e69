// Placeholder resolution for `${prompt:name}` tokens in find/replace text.
//
// Find and replace resolve in one batch so a name used in both fields
// prompts the user exactly once and reuses the answer.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::ui::{PromptUi, TextPrompt};

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{prompt:([^}]+)\}").expect("placeholder regex is valid"))
}

/// Outcome of placeholder resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every placeholder substituted; same order and positions as the input.
    Done(Vec<String>),
    /// The user cancelled a prompt. Nothing was substituted and no further
    /// prompts were shown.
    Cancelled,
}

/// Distinct placeholder names across all texts, in first-appearance order.
#[must_use]
pub fn placeholder_names(texts: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for text in texts {
        for capture in placeholder_re().captures_iter(text) {
            let name = capture[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Prompt once per distinct placeholder name, then substitute every
/// occurrence in every text. Cancelling any prompt aborts the whole batch.
pub async fn resolve_placeholders<U: PromptUi>(ui: &U, texts: &[String]) -> Resolution {
    let mut values: HashMap<String, String> = HashMap::new();
    for name in placeholder_names(texts) {
        let request = TextPrompt::new(format!("Value for {name}")).with_placeholder(&name);
        match ui.prompt_text(request).await {
            Some(value) => {
                values.insert(name, value);
            }
            None => return Resolution::Cancelled,
        }
    }

    let resolved = texts
        .iter()
        .map(|text| {
            placeholder_re()
                .replace_all(text, |caps: &Captures<'_>| {
                    // Unreachable after a successful prompt pass; empty keeps
                    // the substitution total.
                    values.get(&caps[1]).cloned().unwrap_or_default()
                })
                .into_owned()
        })
        .collect();
    Resolution::Done(resolved)
}
