// `patternstore new` — create a blank pattern with an auto-generated name.

use std::path::Path;

use clap::Args;
use patternstore_common::types::Pattern;

use crate::commands::{block_on, ScopeArg};
use crate::host::open_repository;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Tier to create the pattern in.
    #[arg(long, value_enum, default_value = "workspace")]
    scope: ScopeArg,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

pub fn run(workspace_root: &Path, args: NewArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    let repo = open_repository(workspace_root)?;
    let tier = args.scope.into();

    match block_on(repo.create(tier)) {
        Ok(pattern) => {
            output::print_output(format, &pattern, |p| format_human(p, args.scope))?;
            Ok(())
        }
        Err(error) => {
            output::print_error(format, "STORE_ERROR", &format!("{error:#}"));
            Err(error.into())
        }
    }
}

fn format_human(pattern: &Pattern, scope: ScopeArg) -> String {
    let tier: patternstore_common::types::Tier = scope.into();
    format!("Created \"{}\" in {} settings ({})", pattern.label, tier, pattern.id)
}

#[cfg(test)]
mod tests {
    use patternstore_common::types::PatternFlags;

    use super::*;

    #[test]
    fn human_format_names_the_tier() {
        let pattern = Pattern {
            id: "abc".into(),
            label: "New Pattern".into(),
            find: String::new(),
            replace: None,
            flags: PatternFlags::default(),
            files_to_include: None,
            files_to_exclude: None,
        };
        let text = format_human(&pattern, ScopeArg::Global);
        assert!(text.contains("\"New Pattern\""));
        assert!(text.contains("global settings"));
        assert!(text.contains("abc"));
    }
}
