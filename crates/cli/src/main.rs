//! yd - Yandex Disk command-line client
//!
//! Lists, uploads, downloads and deletes files on Yandex Disk remotes
//! configured in ~/.config/ydisk/config.toml.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ydisk_cli::commands::{self, Cli};
use ydisk_cli::exit_code::ExitCode;

/// Log filter used with `--debug`
const DEBUG_FILTER: &str = "warn,yd_core=debug,yd_yandex=debug,ydisk_cli=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so `yd cat` output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = tokio::select! {
        code = commands::execute(cli) => code,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            ExitCode::Interrupted
        }
    };

    std::process::exit(exit_code.as_i32());
}
