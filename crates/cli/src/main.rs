mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "notegraph", version, about = "Live graph index over a markdown vault")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    /// Vault root override; also read from NOTEGRAPH_VAULT
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// Build the index once and print a summary
    Reindex,

    /// Show backlinks and outgoing links for a note
    Links(LinksArgs),

    /// List links whose targets resolve to nothing
    Broken(BrokenArgs),

    /// Print vault statistics
    Stats(FormatArgs),

    /// Evaluate index and vault health
    Health(FormatArgs),

    /// Keep the index live, rebuilding on file changes, until interrupted
    Watch,
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct LinksArgs {
    /// Vault-relative note path (e.g. "projects/plan.md")
    pub note: String,

    /// Show only backlinks
    #[arg(long)]
    pub backlinks: bool,

    /// Show only outgoing links
    #[arg(long)]
    pub outlinks: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BrokenArgs {
    /// Limit search to a folder prefix (e.g. "daily/")
    #[arg(long)]
    pub folder: Option<String>,

    /// Maximum number of results to return
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Number of results to skip, for pagination
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    #[arg(long)]
    pub json: bool,
}

fn main() {
    let cli = Cli::parse();

    let vault_override = cli
        .vault
        .or_else(|| std::env::var_os("NOTEGRAPH_VAULT").map(PathBuf::from));

    match cli.command {
        Commands::Doctor => {
            cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref(), vault_override)
        }
        Commands::Reindex => {
            cmd::reindex::run(cli.config.as_deref(), cli.profile.as_deref(), vault_override)
        }
        Commands::Links(args) => cmd::links::run(
            cli.config.as_deref(),
            cli.profile.as_deref(),
            vault_override,
            args,
        ),
        Commands::Broken(args) => cmd::broken::run(
            cli.config.as_deref(),
            cli.profile.as_deref(),
            vault_override,
            args,
        ),
        Commands::Stats(args) => cmd::stats::run(
            cli.config.as_deref(),
            cli.profile.as_deref(),
            vault_override,
            args,
        ),
        Commands::Health(args) => cmd::health::run(
            cli.config.as_deref(),
            cli.profile.as_deref(),
            vault_override,
            args,
        ),
        Commands::Watch => {
            cmd::watch::run(cli.config.as_deref(), cli.profile.as_deref(), vault_override)
        }
    }
}
