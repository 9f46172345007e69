// `patternstore load` — resolve a pattern's placeholders and print the
// search invocation.

use std::path::Path;

use clap::Args;
use patternstore_common::types::Tier;
use patternstore_engine::commands::{load_pattern_interactive, LoadFlowOutcome};
use patternstore_engine::search::{self, LoadOutcome};

use crate::commands::{block_on, resolve_selector, ScopeArg};
use crate::host::{open_repository, stdin_is_interactive, InvocationPrinter, TerminalUi};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Pattern name or id. Omit to pick interactively.
    pub selector: Option<String>,

    /// Restrict the lookup to one tier.
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

pub fn run(workspace_root: &Path, args: LoadArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    let repo = open_repository(workspace_root)?;
    let scope = args.scope.map(Tier::from);
    let host = InvocationPrinter::new(format);

    let Some(selector) = &args.selector else {
        if !stdin_is_interactive() {
            let message = "interactive pattern selection needs a terminal; pass a name or id";
            output::print_error(format, "CONFIRM_REQUIRED", message);
            anyhow::bail!("{message}");
        }
        return match block_on(load_pattern_interactive(&repo, &TerminalUi, &host)) {
            Ok(LoadFlowOutcome::Loaded(_) | LoadFlowOutcome::Cancelled) => Ok(()),
            Ok(LoadFlowOutcome::NoPatterns) => {
                output::print_error(format, "NOT_FOUND", "No patterns yet.");
                Ok(())
            }
            Err(error) => {
                output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
                Err(error.into())
            }
        };
    };

    let found = match block_on(resolve_selector(&repo, scope, selector)) {
        Ok(Some(found)) => found,
        Ok(None) => {
            let message = format!("no pattern matching `{selector}`");
            output::print_error(format, "NOT_FOUND", &message);
            anyhow::bail!("{message}");
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            return Err(error.into());
        }
    };
    let (_, pattern) = found;

    // Placeholder prompts come from the terminal; cancelling one exits
    // without printing an invocation.
    match block_on(search::load_pattern(&TerminalUi, &host, &pattern)) {
        LoadOutcome::Loaded | LoadOutcome::Cancelled => Ok(()),
    }
}
