use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod santactl;
mod server;
mod utils;

use cmd::{ExecArgs, GetArgs, ListArgs};
use config::{ConfigArgs, Settings};

/// santa-mcp - MCP server for santactl
///
///   santa-mcp serve
///   santa-mcp list <tools|prompts> [--json]
///   santa-mcp get  <tool|prompt> NAME [--json]
///   santa-mcp exec TOOL [--param k=v ...] [--param-file F] [--json]
///
/// Global flags / env:
///   -v / -vv            Increase verbosity (logs go to stderr; RUST_LOG overrides)
///   -q / --quiet        Errors only
///   --santactl PATH     SANTACTL_PATH       (default /usr/local/bin/santactl)
///   --elevate-with CMD  SANTA_MCP_ELEVATE   (default sudo)
///   --config FILE       SANTA_MCP_CONFIG    (JSON or YAML)
///
/// Examples:
///   santa-mcp serve
///   santa-mcp exec santactl_fileinfo --param file_path=/usr/bin/yes
///   santa-mcp exec santactl_sync --param clean_sync=true --elevate-with "sudo -n"
#[derive(Parser, Debug)]
#[command(
    name = "santa-mcp",
    version,
    about = "MCP server exposing santactl tools and prompts",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve MCP over stdio
    Serve,

    /// List tools or prompts
    List(ListArgs),

    /// Show one tool or prompt in detail
    Get(GetArgs),

    /// Run a tool locally and print its result
    Exec(ExecArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // No ANSI while serving: stderr is often captured into client log files.
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level, !matches!(cli.command, Commands::Serve));

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(&cli.config)?;
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Commands::Serve => cmd::execute_serve(&settings),
        Commands::List(args) => cmd::execute_list(args),
        Commands::Get(args) => cmd::execute_get(args, &settings),
        Commands::Exec(args) => cmd::execute_exec(args, &settings),
    }
}
