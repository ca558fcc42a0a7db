//! rm command - Delete files permanently
//!
//! Deleted files bypass the disk's trash and cannot be restored.

use clap::Args;
use serde::Serialize;
use yd_core::Error;

use super::{open_fs, parse, report, require_file};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Delete files
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Files to delete (remote:path)
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Ignore files that do not exist
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    deleted: Vec<String>,
    failed: usize,
}

/// Execute the rm command
///
/// Every target is attempted; the exit code reflects the last failure.
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let mut deleted = Vec::new();
    let mut failed = 0;
    let mut exit_code = ExitCode::Success;

    for raw in &args.targets {
        let target = match parse(raw, &formatter) {
            Ok(target) => target,
            Err(code) => {
                failed += 1;
                exit_code = code;
                continue;
            }
        };
        if let Err(code) = require_file(&target, &formatter) {
            failed += 1;
            exit_code = code;
            continue;
        }
        let fs = match open_fs(&target, &formatter) {
            Ok(fs) => fs,
            Err(code) => {
                failed += 1;
                exit_code = code;
                continue;
            }
        };

        match fs.remove(&fs.new_object(&target.path)).await {
            Ok(()) => {
                formatter.success(&format!("Removed {target}"));
                deleted.push(target.to_string());
            }
            Err(Error::NotFound(_)) if args.force => {
                formatter.warning(&format!("Skipped missing {target}"));
            }
            Err(e) => {
                failed += 1;
                exit_code = report(&formatter, &e);
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&RmOutput { deleted, failed });
    }
    exit_code
}
