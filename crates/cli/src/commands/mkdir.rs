//! mkdir command - Create a remote's root directory
//!
//! With a path, the directory below the configured root is created instead.
//! Every missing parent is created first.

use clap::Args;
use serde::Serialize;

use super::{build_fs, load_remote, parse, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a directory
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Target (remote[:path])
    pub target: String,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    status: &'static str,
    disk_path: String,
    directories: usize,
}

/// Execute the mkdir command
pub async fn execute(args: MkdirArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse(&args.target, &formatter) {
        Ok(target) => target,
        Err(code) => return code,
    };
    let mut remote = match load_remote(&target.remote, &formatter) {
        Ok(remote) => remote,
        Err(code) => return code,
    };
    remote.root = scoped_root(&remote.root, &target.path);

    let fs = match build_fs(&remote, &formatter) {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    if let Err(e) = fs.mkdir_root().await {
        return report(&formatter, &e);
    }

    let output = MkdirOutput {
        status: "success",
        disk_path: fs.disk_root().to_string(),
        directories: fs.dir_cache().len(),
    };
    if formatter.is_json() {
        formatter.json(&output);
    } else {
        formatter.success(&format!("Directory {} is ready", output.disk_path));
    }
    ExitCode::Success
}

/// Root of the remote extended by a path below it
fn scoped_root(root: &str, path: &str) -> String {
    let root = root.trim_matches('/');
    let path = path.trim_matches('/');
    match (root.is_empty(), path.is_empty()) {
        (_, true) => root.to_string(),
        (true, false) => path.to_string(),
        (false, false) => format!("{root}/{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_root() {
        assert_eq!(scoped_root("backup", ""), "backup");
        assert_eq!(scoped_root("", "photos/2024/"), "photos/2024");
        assert_eq!(scoped_root("/backup/", "photos"), "backup/photos");
        assert_eq!(scoped_root("", ""), "");
    }
}
