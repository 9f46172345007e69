// CLI subcommand dispatch.

use std::future::Future;
use std::path::Path;

use clap::{Subcommand, ValueEnum};
use patternstore_common::types::{Pattern, Tier};
use patternstore_engine::bridge::SettingsBridge;
use patternstore_engine::error::StoreError;
use patternstore_engine::store::PatternRepository;

pub mod load;
pub mod ls;
pub mod manage;
pub mod new;
pub mod rename;
pub mod rm;
pub mod save;

#[derive(Subcommand)]
pub enum Command {
    /// List saved patterns from both tiers
    Ls(ls::LsArgs),
    /// Create a blank pattern with an auto-generated name
    New(new::NewArgs),
    /// Save a pattern from command-line arguments
    Save(save::SaveArgs),
    /// Rename a pattern
    Rename(rename::RenameArgs),
    /// Delete a pattern
    Rm(rm::RmArgs),
    /// Resolve a pattern's placeholders and print the search invocation
    Load(load::LoadArgs),
    /// Interactively rename or delete patterns
    Manage(manage::ManageArgs),
}

pub fn run(workspace_root: &Path, cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Ls(args) => ls::run(workspace_root, args),
        Command::New(args) => new::run(workspace_root, args),
        Command::Save(args) => save::run(workspace_root, args),
        Command::Rename(args) => rename::run(workspace_root, args),
        Command::Rm(args) => rm::run(workspace_root, args),
        Command::Load(args) => load::run(workspace_root, args),
        Command::Manage(args) => manage::run(workspace_root, args),
    }
}

/// Tier selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Workspace settings (`<workspace>/.patternstore/settings.json`)
    Workspace,
    /// Global settings (`~/.patternstore/settings.json`)
    Global,
}

impl From<ScopeArg> for Tier {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Workspace => Tier::Workspace,
            ScopeArg::Global => Tier::Global,
        }
    }
}

pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime should build")
        .block_on(future)
}

/// Find a pattern by label first, then by id. Without an explicit scope the
/// workspace tier is searched before global, matching the aggregate order.
pub(crate) async fn resolve_selector<B: SettingsBridge>(
    repo: &PatternRepository<B>,
    scope: Option<Tier>,
    selector: &str,
) -> Result<Option<(Tier, Pattern)>, StoreError> {
    let tiers: Vec<Tier> = match scope {
        Some(tier) => vec![tier],
        None => vec![Tier::Workspace, Tier::Global],
    };

    let mut lists = Vec::with_capacity(tiers.len());
    for tier in tiers {
        lists.push((tier, repo.list_tier(tier).await?));
    }

    for (tier, patterns) in &lists {
        if let Some(pattern) = patterns.iter().find(|p| p.label == selector) {
            return Ok(Some((*tier, pattern.clone())));
        }
    }
    for (tier, patterns) in &lists {
        if let Some(pattern) = patterns.iter().find(|p| p.id == selector) {
            return Ok(Some((*tier, pattern.clone())));
        }
    }
    Ok(None)
}
