// `patternstore ls` — list saved patterns from both tiers.

use std::path::Path;

use clap::Args;
use patternstore_common::types::Pattern;
use serde::Serialize;

use crate::commands::block_on;
use crate::host::open_repository;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct LsArgs {
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LsResult {
    pub workspace: Vec<Pattern>,
    pub user: Vec<Pattern>,
}

pub fn run(workspace_root: &Path, args: LsArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    let repo = open_repository(workspace_root)?;

    match block_on(repo.list_all()) {
        Ok(lists) => {
            let result = LsResult { workspace: lists.workspace, user: lists.global };
            output::print_output(format, &result, format_human)?;
            Ok(())
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            Err(error.into())
        }
    }
}

fn format_human(result: &LsResult) -> String {
    if result.workspace.is_empty() && result.user.is_empty() {
        return "No patterns yet.".into();
    }

    let mut lines = Vec::new();
    lines.push(format!("{} pattern(s)", result.workspace.len() + result.user.len()));
    for (section, patterns) in [("Workspace", &result.workspace), ("User", &result.user)] {
        if patterns.is_empty() {
            continue;
        }
        lines.push(format!("{section}:"));
        for p in patterns {
            lines.push(format!("  {} — {}", p.label, preview(&p.find)));
        }
    }
    lines.join("\n")
}

fn preview(find: &str) -> String {
    let mut text: String = find.chars().take(60).collect();
    if find.chars().count() > 60 {
        text.push('\u{2026}');
    }
    text.replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use patternstore_common::types::PatternFlags;

    use super::*;

    fn pattern(label: &str, find: &str) -> Pattern {
        Pattern {
            id: format!("id-{label}"),
            label: label.into(),
            find: find.into(),
            replace: None,
            flags: PatternFlags::default(),
            files_to_include: None,
            files_to_exclude: None,
        }
    }

    #[test]
    fn human_format_sections_by_tier() {
        let result = LsResult {
            workspace: vec![pattern("W", "workspace find")],
            user: vec![pattern("G", "global find")],
        };
        let text = format_human(&result);
        assert!(text.contains("2 pattern(s)"));
        assert!(text.contains("Workspace:"));
        assert!(text.contains("  W — workspace find"));
        assert!(text.contains("User:"));
        assert!(text.contains("  G — global find"));
    }

    #[test]
    fn human_format_empty_store() {
        let result = LsResult { workspace: vec![], user: vec![] };
        assert_eq!(format_human(&result), "No patterns yet.");
    }

    #[test]
    fn human_format_skips_empty_sections() {
        let result = LsResult { workspace: vec![], user: vec![pattern("G", "g")] };
        let text = format_human(&result);
        assert!(!text.contains("Workspace:"));
        assert!(text.contains("User:"));
    }

    #[test]
    fn preview_truncates_and_escapes_newlines() {
        assert_eq!(preview("a\nb"), "a\\nb");
        let long = "x".repeat(80);
        let text = preview(&long);
        assert!(text.ends_with('\u{2026}'));
        assert_eq!(text.chars().count(), 61);
    }
}
