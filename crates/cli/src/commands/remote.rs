//! Remote management commands
//!
//! A remote is a named Yandex Disk account: its OAuth token and the root
//! directory the adapter is scoped to.

use clap::Subcommand;
use serde::Serialize;
use yd_core::RemoteConfig;
use yd_core::RemoteManager;
use yd_core::remote::{DEFAULT_BACKEND, DEFAULT_CHECKERS, DEFAULT_PAGE_SIZE};

use super::{registry, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// Add or update a remote
    Set(SetArgs),

    /// List all configured remotes
    List(ListArgs),

    /// Remove a remote
    Remove(RemoveArgs),
}

/// Arguments for the `remote set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Remote name (e.g., "disk", "backup")
    pub name: String,

    /// OAuth token as JSON, e.g. '{"access_token":"..."}'
    #[arg(env = "YD_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Directory on the disk the remote is scoped to
    #[arg(long, default_value = "")]
    pub root: String,

    /// Storage backend
    #[arg(long, default_value = DEFAULT_BACKEND)]
    pub backend: String,

    /// API endpoint override
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Entries requested per listing page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Listed objects buffered ahead of the consumer
    #[arg(long, default_value_t = DEFAULT_CHECKERS)]
    pub checkers: usize,

    /// Deadline for each remote call, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show backend and tuning details
    #[arg(short, long)]
    pub long: bool,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the remote to remove
    pub name: String,
}

#[derive(Serialize)]
struct RemoteListOutput {
    remotes: Vec<RemoteInfo>,
}

/// Remote information for output, without the token
#[derive(Debug, Serialize)]
struct RemoteInfo {
    name: String,
    backend: String,
    root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    page_size: u32,
    checkers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

impl From<&RemoteConfig> for RemoteInfo {
    fn from(remote: &RemoteConfig) -> Self {
        Self {
            name: remote.name.clone(),
            backend: remote.backend.clone(),
            root: remote.root.clone(),
            endpoint: remote.endpoint.clone(),
            page_size: remote.page_size,
            checkers: remote.checkers,
            timeout_ms: remote.timeout_ms,
        }
    }
}

#[derive(Serialize)]
struct RemoteOperationOutput {
    success: bool,
    remote: String,
    message: String,
}

/// Execute a remote subcommand
pub async fn execute(cmd: RemoteCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match RemoteManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            formatter.error(&format!("Failed to load remotes: {e}"));
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        RemoteCommands::Set(args) => execute_set(args, &manager, &formatter),
        RemoteCommands::List(args) => execute_list(args, &manager, &formatter),
        RemoteCommands::Remove(args) => execute_remove(args, &manager, &formatter),
    }
}

/// Build a remote from `remote set` arguments
fn remote_from_args(args: SetArgs) -> Result<RemoteConfig, String> {
    if args.name.is_empty() {
        return Err("Remote name cannot be empty".to_string());
    }
    if args.page_size == 0 {
        return Err("Page size must be at least 1".to_string());
    }
    if args.checkers == 0 {
        return Err("Checkers must be at least 1".to_string());
    }

    let mut remote = RemoteConfig::new(args.name, args.token);
    remote.backend = args.backend;
    remote.root = args.root;
    remote.endpoint = args.endpoint;
    remote.page_size = args.page_size;
    remote.checkers = args.checkers;
    remote.timeout_ms = args.timeout_ms;
    Ok(remote)
}

fn execute_set(args: SetArgs, manager: &RemoteManager, formatter: &Formatter) -> ExitCode {
    let remote = match remote_from_args(args) {
        Ok(remote) => remote,
        Err(msg) => {
            formatter.error(&msg);
            return ExitCode::UsageError;
        }
    };

    if let Err(e) = registry().and_then(|registry| registry.get(&remote.backend).map(|_| ())) {
        return report(formatter, &e);
    }

    let name = remote.name.clone();
    match manager.set(remote) {
        Ok(()) => {
            let message = format!("Remote '{name}' configured successfully");
            if formatter.is_json() {
                formatter.json(&RemoteOperationOutput {
                    success: true,
                    remote: name,
                    message,
                });
            } else {
                formatter.success(&message);
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, &e),
    }
}

fn execute_list(args: ListArgs, manager: &RemoteManager, formatter: &Formatter) -> ExitCode {
    let remotes = match manager.list() {
        Ok(remotes) => remotes,
        Err(e) => return report(formatter, &e),
    };

    if formatter.is_json() {
        formatter.json(&RemoteListOutput {
            remotes: remotes.iter().map(RemoteInfo::from).collect(),
        });
    } else if remotes.is_empty() {
        formatter.println("No remotes configured.");
    } else {
        for remote in &remotes {
            let root = format!("/{}", remote.root.trim_matches('/'));
            if args.long {
                formatter.println(&format!(
                    "{:<12} {:<8} {} (page size: {}, checkers: {})",
                    remote.name, remote.backend, root, remote.page_size, remote.checkers
                ));
            } else {
                formatter.println(&format!("{:<12} {}", remote.name, root));
            }
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, manager: &RemoteManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            let message = format!("Remote '{}' removed successfully", args.name);
            if formatter.is_json() {
                formatter.json(&RemoteOperationOutput {
                    success: true,
                    remote: args.name,
                    message,
                });
            } else {
                formatter.success(&message);
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, &e),
    }
}
