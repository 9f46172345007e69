// `patternstore manage` — interactively rename or delete patterns.

use std::path::Path;

use clap::Args;
use patternstore_engine::commands::{manage_patterns_interactive, ManageFlowOutcome};
use serde::Serialize;

use crate::commands::block_on;
use crate::host::{open_repository, stdin_is_interactive, TerminalUi};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ManageArgs {
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ManageResult {
    Renamed { from: String, to: String },
    Deleted { label: String },
    Cancelled,
}

pub fn run(workspace_root: &Path, args: ManageArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    if !stdin_is_interactive() {
        let message = "manage is interactive and needs a terminal";
        output::print_error(format, "CONFIRM_REQUIRED", message);
        anyhow::bail!("{message}");
    }
    let repo = open_repository(workspace_root)?;

    match block_on(manage_patterns_interactive(&repo, &TerminalUi)) {
        Ok(ManageFlowOutcome::Renamed { from, to }) => {
            output::print_output(format, &ManageResult::Renamed { from, to }, format_human)?;
            Ok(())
        }
        Ok(ManageFlowOutcome::Deleted(label)) => {
            output::print_output(format, &ManageResult::Deleted { label }, format_human)?;
            Ok(())
        }
        Ok(ManageFlowOutcome::NoPatterns) => {
            output::print_error(format, "NOT_FOUND", "No patterns yet.");
            Ok(())
        }
        Ok(ManageFlowOutcome::Cancelled) => {
            output::print_output(format, &ManageResult::Cancelled, format_human)?;
            Ok(())
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            Err(error.into())
        }
    }
}

fn format_human(result: &ManageResult) -> String {
    match result {
        ManageResult::Renamed { from, to } => format!("Renamed \"{from}\" to \"{to}\""),
        ManageResult::Deleted { label } => format!("Deleted \"{label}\""),
        ManageResult::Cancelled => "Cancelled.".into(),
    }
}
