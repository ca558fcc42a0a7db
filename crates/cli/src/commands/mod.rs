//! CLI command definitions and execution
//!
//! Each command parses its target, resolves the remote to a [`DiskFs`]
//! through the backend registry, and reports errors as exit codes.

use clap::{Parser, Subcommand};
use yd_core::{
    ConfigManager, DiskFs, Error, Registry, RemoteConfig, RemoteManager, RemoteTarget,
    parse_target,
};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod cat;
pub mod completions;
mod ls;
mod mkdir;
mod put;
mod remote;
mod rm;
mod stat;

/// yd - Yandex Disk command-line client
///
/// Targets are written as `remote[:path]`, where the path is relative to
/// the root directory configured for the remote.
#[derive(Parser, Debug)]
#[command(name = "yd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configured remotes
    #[command(subcommand)]
    Remote(remote::RemoteCommands),

    /// List files below a remote root
    Ls(ls::LsArgs),

    /// Upload a local file
    Put(put::PutArgs),

    /// Write a file's contents to stdout
    Cat(cat::CatArgs),

    /// Show file metadata
    Stat(stat::StatArgs),

    /// Delete files permanently
    Rm(rm::RmArgs),

    /// Create a remote's root directory and its parents
    Mkdir(mkdir::MkdirArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let defaults = ConfigManager::new()
        .and_then(|manager| manager.load())
        .map(|config| config.defaults)
        .unwrap_or_default();

    let output_config = OutputConfig {
        json: cli.json || defaults.output == "json",
        no_color: cli.no_color || defaults.color == "never",
        no_progress: cli.no_progress || !defaults.progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Remote(cmd) => remote::execute(cmd, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Cat(args) => cat::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Mkdir(args) => mkdir::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Registry of the backends linked into this binary
pub fn registry() -> yd_core::Result<Registry> {
    let mut registry = Registry::new();
    yd_yandex::register(&mut registry)?;
    Ok(registry)
}

/// Print an error and map it to an exit code
pub(crate) fn report(formatter: &Formatter, error: &Error) -> ExitCode {
    formatter.error(&error.to_string());
    ExitCode::from(error)
}

pub(crate) fn parse(target: &str, formatter: &Formatter) -> Result<RemoteTarget, ExitCode> {
    parse_target(target).map_err(|e| report(formatter, &e))
}

pub(crate) fn load_remote(name: &str, formatter: &Formatter) -> Result<RemoteConfig, ExitCode> {
    let manager = RemoteManager::new().map_err(|e| {
        formatter.error(&format!("Failed to load remotes: {e}"));
        ExitCode::GeneralError
    })?;
    manager.get(name).map_err(|e| report(formatter, &e))
}

pub(crate) fn build_fs(remote: &RemoteConfig, formatter: &Formatter) -> Result<DiskFs, ExitCode> {
    registry()
        .and_then(|registry| registry.new_fs(remote))
        .map_err(|e| report(formatter, &e))
}

/// Resolve a target's remote to an adapter
pub(crate) fn open_fs(target: &RemoteTarget, formatter: &Formatter) -> Result<DiskFs, ExitCode> {
    let remote = load_remote(&target.remote, formatter)?;
    build_fs(&remote, formatter)
}

/// Reject targets that name the remote root where a file is expected
pub(crate) fn require_file(target: &RemoteTarget, formatter: &Formatter) -> Result<(), ExitCode> {
    if target.is_root() {
        formatter.error(&format!(
            "Target '{target}' names a remote root. Use format: remote:path"
        ));
        return Err(ExitCode::UsageError);
    }
    Ok(())
}
