// patternstore CLI entry point.

use std::path::PathBuf;

use clap::Parser;

mod commands;
mod host;
mod output;

#[derive(Parser)]
#[command(name = "patternstore", about = "Saved find/replace patterns")]
struct Cli {
    /// Workspace root for workspace-scoped patterns.
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    workspace_root: PathBuf,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::run(&cli.workspace_root, cli.command)
}
