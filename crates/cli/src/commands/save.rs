// `patternstore save` — save a pattern from command-line arguments.

use std::path::Path;

use clap::Args;
use patternstore_common::types::{Pattern, PatternFlags, StoredPattern, Tier};
use patternstore_engine::error::StoreError;
use patternstore_engine::ui::validate_label;

use crate::commands::{block_on, ScopeArg};
use crate::host::open_repository;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Pattern name. Saving under an existing name in the same tier
    /// overwrites that entry in place.
    pub label: String,

    /// Search text. May contain `${prompt:name}` placeholders.
    #[arg(long)]
    find: String,

    /// Replacement text. Omit for a find-only pattern.
    #[arg(long)]
    replace: Option<String>,

    /// Treat the search text as a regular expression.
    #[arg(long)]
    regex: bool,

    /// Match case.
    #[arg(long)]
    case_sensitive: bool,

    /// Match whole words only.
    #[arg(long)]
    whole_word: bool,

    /// Multiline matching.
    #[arg(long)]
    multiline: bool,

    /// Glob of files to include.
    #[arg(long, value_name = "GLOB")]
    include: Option<String>,

    /// Glob of files to exclude.
    #[arg(long, value_name = "GLOB")]
    exclude: Option<String>,

    /// Tier to save into.
    #[arg(long, value_enum, default_value = "workspace")]
    scope: ScopeArg,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

pub fn run(workspace_root: &Path, args: SaveArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    if let Some(message) = validate_label(&args.label) {
        output::print_error(format, "INVALID_LABEL", &message);
        anyhow::bail!("{message}");
    }

    let repo = open_repository(workspace_root)?;
    let tier: Tier = args.scope.into();

    match block_on(save_pattern(&repo, tier, &args)) {
        Ok(saved) => {
            output::print_output(format, &saved, |p| format_human(p, tier))?;
            Ok(())
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            Err(error.into())
        }
    }
}

async fn save_pattern<B: patternstore_engine::bridge::SettingsBridge>(
    repo: &patternstore_engine::store::PatternRepository<B>,
    tier: Tier,
    args: &SaveArgs,
) -> Result<Pattern, StoreError> {
    // An existing entry with this label keeps its id and position.
    let existing_id = repo
        .list_tier(tier)
        .await?
        .into_iter()
        .find(|p| p.label == args.label)
        .map(|p| p.id);

    let draft = StoredPattern {
        id: existing_id,
        label: args.label.clone(),
        find: args.find.clone(),
        replace: args.replace.clone(),
        flags: PatternFlags {
            is_regex: args.regex,
            is_case_sensitive: args.case_sensitive,
            match_whole_word: args.whole_word,
            is_multiline: args.multiline,
        },
        files_to_include: args.include.clone(),
        files_to_exclude: args.exclude.clone(),
    };
    repo.save(tier, draft).await
}

fn format_human(pattern: &Pattern, tier: Tier) -> String {
    format!("Saved \"{}\" to {} settings", pattern.label, tier)
}
