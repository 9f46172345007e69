// `patternstore rm` — delete a pattern.

use std::path::Path;

use clap::Args;
use patternstore_common::types::Tier;
use patternstore_engine::ui::PromptUi;
use serde::Serialize;

use crate::commands::{block_on, resolve_selector, ScopeArg};
use crate::host::{open_repository, stdin_is_interactive, TerminalUi};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Pattern name or id.
    pub selector: String,

    /// Restrict the lookup to one tier.
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Delete without asking for confirmation.
    #[arg(long, short = 'y')]
    yes: bool,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RmResult {
    pub id: String,
    pub label: String,
    pub scope: Tier,
}

pub fn run(workspace_root: &Path, args: RmArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    let repo = open_repository(workspace_root)?;
    let scope = args.scope.map(Tier::from);

    let found = match block_on(resolve_selector(&repo, scope, &args.selector)) {
        Ok(Some(found)) => found,
        Ok(None) => {
            let message = format!("no pattern matching `{}`", args.selector);
            output::print_error(format, "NOT_FOUND", &message);
            anyhow::bail!("{message}");
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            return Err(error.into());
        }
    };
    let (tier, pattern) = found;

    if !args.yes {
        if !stdin_is_interactive() {
            let message = "refusing to delete without --yes when stdin is not a terminal";
            output::print_error(format, "CONFIRM_REQUIRED", message);
            anyhow::bail!("{message}");
        }
        let message = format!("Delete pattern \"{}\"?", pattern.label);
        if !block_on(TerminalUi.confirm(&message, "Delete")) {
            return Ok(());
        }
    }

    match block_on(repo.delete(tier, &pattern.id)) {
        Ok(label) => {
            let result = RmResult { id: pattern.id, label, scope: tier };
            output::print_output(format, &result, format_human)?;
            Ok(())
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            Err(error.into())
        }
    }
}

fn format_human(result: &RmResult) -> String {
    format!("Deleted \"{}\" from {} settings", result.label, result.scope)
}
