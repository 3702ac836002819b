use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use mediashare_core::VERSION;

/// Mediashare - share MediaInfo reports behind expiring, optionally password-protected links
#[derive(Parser)]
#[command(name = "mediashare")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the share database
    #[arg(short, long, global = true, env = "MEDIASHARE_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the share database and a default config file
    Init(InitArgs),

    /// Share a report and print its link id
    Create(CreateArgs),

    /// Print the content of a share
    Fetch(FetchArgs),

    /// Show share metadata without revealing content
    Info(InfoArgs),

    /// Delete a share before it expires
    Delete(DeleteArgs),

    /// Purge expired shares once
    Reap(ReapArgs),

    /// Run the periodic purge loop until interrupted
    Reaper(ReaperArgs),

    /// Check database integrity
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the database will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// File to share ("-" or omitted reads stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Share this text instead of reading a file
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Lifetime (e.g., "24h", "1d"); defaults to the configured lifetime
    #[arg(short, long, value_name = "DURATION")]
    pub lifetime: Option<String>,

    /// Protect the share with a password typed at a prompt
    #[arg(long)]
    pub password_prompt: bool,

    /// Do not protect the share even if MEDIASHARE_PASSWORD is set
    #[arg(long, conflicts_with = "password_prompt")]
    pub no_password: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `fetch` command
#[derive(Args)]
pub struct FetchArgs {
    /// Share id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print a structured summary of the MediaInfo report instead of the raw text
    #[arg(long)]
    pub summary: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Prompt for the password up front
    #[arg(long)]
    pub password_prompt: bool,

    /// Never prompt; fail if a password is needed and MEDIASHARE_PASSWORD is unset
    #[arg(long, conflicts_with = "password_prompt")]
    pub no_input: bool,
}

/// Arguments for the `info` command
#[derive(Args)]
pub struct InfoArgs {
    /// Share id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Share id
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `reap` command
#[derive(Args)]
pub struct ReapArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `reaper` command
#[derive(Args)]
pub struct ReaperArgs {
    /// Time between sweeps (e.g., "1h", "10m"); defaults to the configured interval
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}
