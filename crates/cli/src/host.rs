// Terminal-backed prompt host and search sink.
//
// Prompts go to stderr so stdout stays clean for command output; EOF on
// stdin cancels the prompt.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::Context;
use patternstore_engine::bridge::JsonSettingsBridge;
use patternstore_engine::search::{SearchHost, SearchInvocation};
use patternstore_engine::store::PatternRepository;
use patternstore_engine::ui::{Choice, PromptUi, TextPrompt};

use crate::output::{self, OutputFormat};

/// Repository over the default settings documents for `workspace_root`.
pub fn open_repository(
    workspace_root: &Path,
) -> anyhow::Result<PatternRepository<JsonSettingsBridge>> {
    let bridge = JsonSettingsBridge::resolve(workspace_root)
        .context("could not determine a home directory for global settings")?;
    tracing::debug!(workspace_root = %workspace_root.display(), "settings bridge resolved");
    Ok(PatternRepository::new(bridge))
}

/// Line-oriented prompt host over stdin/stderr.
pub struct TerminalUi;

impl TerminalUi {
    fn read_line() -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl PromptUi for TerminalUi {
    // A terminal has no editor selection.
    async fn selected_text(&self) -> Option<String> {
        None
    }

    async fn prompt_text(&self, request: TextPrompt) -> Option<String> {
        let mut err = io::stderr().lock();
        loop {
            match (&request.initial, &request.placeholder) {
                (Some(initial), _) => {
                    let _ = write!(err, "{} [{initial}]: ", request.prompt);
                }
                (None, Some(placeholder)) => {
                    let _ = write!(err, "{} ({placeholder}): ", request.prompt);
                }
                (None, None) => {
                    let _ = write!(err, "{}: ", request.prompt);
                }
            }
            let _ = err.flush();

            let mut input = Self::read_line()?;
            if input.is_empty() {
                if let Some(initial) = &request.initial {
                    input = initial.clone();
                }
            }
            match request.validate.and_then(|validate| validate(&input)) {
                Some(message) => {
                    let _ = writeln!(err, "{message}");
                }
                None => return Some(input),
            }
        }
    }

    async fn prompt_choice(&self, placeholder: &str, choices: &[Choice]) -> Option<usize> {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{placeholder}:");
        for (n, choice) in choices.iter().enumerate() {
            let _ = writeln!(err, "  {}. {} — {}", n + 1, choice.label, choice.description);
        }
        loop {
            let _ = write!(err, "Choice [1-{}]: ", choices.len());
            let _ = err.flush();
            let input = Self::read_line()?;
            if input.is_empty() {
                return None;
            }
            match input.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Some(n - 1),
                _ => {
                    let _ = writeln!(err, "Enter a number between 1 and {}", choices.len());
                }
            }
        }
    }

    async fn confirm(&self, message: &str, affirmative: &str) -> bool {
        let mut err = io::stderr().lock();
        let _ = write!(err, "{message} [{affirmative}/cancel] (y/N): ");
        let _ = err.flush();
        matches!(
            Self::read_line().as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        )
    }
}

/// Search sink that prints the invocation to stdout instead of opening an
/// editor panel.
pub struct InvocationPrinter {
    format: OutputFormat,
}

impl InvocationPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl SearchHost for InvocationPrinter {
    async fn open_search(&self, invocation: SearchInvocation) {
        let _ = output::print_output(self.format, &invocation, format_invocation);
    }
}

fn format_invocation(invocation: &SearchInvocation) -> String {
    let mut lines = vec![format!("find:    {}", invocation.query)];
    if let Some(replace) = &invocation.replace {
        lines.push(format!("replace: {replace}"));
    }
    let mut flags = Vec::new();
    if invocation.is_regex {
        flags.push("regex");
    }
    if invocation.is_case_sensitive {
        flags.push("case-sensitive");
    }
    if invocation.match_whole_word {
        flags.push("whole-word");
    }
    if !flags.is_empty() {
        lines.push(format!("flags:   {}", flags.join(", ")));
    }
    if !invocation.files_to_include.is_empty() {
        lines.push(format!("include: {}", invocation.files_to_include));
    }
    if !invocation.files_to_exclude.is_empty() {
        lines.push(format!("exclude: {}", invocation.files_to_exclude));
    }
    lines.join("\n")
}

/// True when stdin is interactive; prompting a pipe would hang or misread
/// piped data as answers.
pub fn stdin_is_interactive() -> bool {
    io::stdin().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(query: &str, replace: Option<&str>) -> SearchInvocation {
        SearchInvocation {
            query: query.into(),
            replace: replace.map(str::to_string),
            trigger_search: false,
            is_regex: false,
            is_case_sensitive: false,
            match_whole_word: false,
            preserve_case: false,
            files_to_include: String::new(),
            files_to_exclude: String::new(),
        }
    }

    #[test]
    fn find_only_invocation_renders_one_line() {
        assert_eq!(format_invocation(&invocation("needle", None)), "find:    needle");
    }

    #[test]
    fn full_invocation_lists_flags_and_globs() {
        let mut inv = invocation("a", Some("b"));
        inv.is_regex = true;
        inv.match_whole_word = true;
        inv.files_to_include = "src/**".into();

        let text = format_invocation(&inv);
        assert!(text.contains("replace: b"));
        assert!(text.contains("flags:   regex, whole-word"));
        assert!(text.contains("include: src/**"));
        assert!(!text.contains("exclude:"));
    }

    #[test]
    fn repository_opens_against_the_workspace_root() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(open_repository(dir.path()).is_ok());
    }
}
