//! stat command - Show file metadata

use clap::Args;
use serde::Serialize;
use yd_core::Object;

use super::{open_fs, parse, report, require_file};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show file metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// File (remote:path)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    target: String,
    disk_path: String,
    object: Object,
}

impl std::fmt::Display for StatOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name      : {}", self.target)?;
        writeln!(f, "Disk path : {}", self.disk_path)?;
        if let Some(size) = self.object.size() {
            writeln!(
                f,
                "Size      : {} ({size} bytes)",
                humansize::format_size(size, humansize::BINARY)
            )?;
        }
        if let Some(modified) = self.object.mod_time() {
            writeln!(f, "Modified  : {}", modified.strftime("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        write!(f, "MD5       : {}", self.object.md5().unwrap_or("-"))
    }
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse(&args.target, &formatter) {
        Ok(target) => target,
        Err(code) => return code,
    };
    if let Err(code) = require_file(&target, &formatter) {
        return code;
    }
    let fs = match open_fs(&target, &formatter) {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.stat(&target.path).await {
        Ok(object) => {
            formatter.output(&StatOutput {
                target: target.to_string(),
                disk_path: fs.remote_path(&target.path),
                object,
            });
            ExitCode::Success
        }
        Err(e) => report(&formatter, &e),
    }
}
