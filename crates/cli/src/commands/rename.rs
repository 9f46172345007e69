// `patternstore rename` — change a pattern's name.

use std::path::Path;

use clap::Args;
use patternstore_common::types::Tier;
use serde::Serialize;

use crate::commands::{block_on, resolve_selector, ScopeArg};
use crate::host::open_repository;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Pattern name or id.
    pub selector: String,

    /// New name.
    pub new_label: String,

    /// Restrict the lookup to one tier.
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameResult {
    pub id: String,
    pub from: String,
    pub to: String,
    pub scope: Tier,
}

pub fn run(workspace_root: &Path, args: RenameArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    let repo = open_repository(workspace_root)?;
    let scope = args.scope.map(Tier::from);

    match block_on(rename_pattern(&repo, scope, &args.selector, &args.new_label)) {
        Ok(Some(result)) => {
            output::print_output(format, &result, format_human)?;
            Ok(())
        }
        Ok(None) => {
            let message = format!("no pattern matching `{}`", args.selector);
            output::print_error(format, "NOT_FOUND", &message);
            anyhow::bail!("{message}");
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            Err(error.into())
        }
    }
}

async fn rename_pattern<B: patternstore_engine::bridge::SettingsBridge>(
    repo: &patternstore_engine::store::PatternRepository<B>,
    scope: Option<Tier>,
    selector: &str,
    new_label: &str,
) -> Result<Option<RenameResult>, patternstore_engine::error::StoreError> {
    let Some((tier, pattern)) = resolve_selector(repo, scope, selector).await? else {
        return Ok(None);
    };
    repo.rename(tier, &pattern.id, new_label).await?;
    Ok(Some(RenameResult {
        id: pattern.id,
        from: pattern.label,
        to: new_label.to_string(),
        scope: tier,
    }))
}

fn format_human(result: &RenameResult) -> String {
    format!("Renamed \"{}\" to \"{}\" in {} settings", result.from, result.to, result.scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_format_shows_both_names() {
        let result = RenameResult {
            id: "x".into(),
            from: "Old".into(),
            to: "New".into(),
            scope: Tier::Global,
        };
        assert_eq!(format_human(&result), "Renamed \"Old\" to \"New\" in global settings");
    }
}
