//! ls command - List files below a remote root
//!
//! Objects are printed as the background listing delivers them. A path
//! after the remote name narrows the output to that subdirectory.

use clap::Args;
use futures::StreamExt;
use serde::Serialize;
use yd_core::Object;

use super::{open_fs, parse, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List files
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Target (remote[:path])
    pub target: String,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    items: Vec<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    total_objects: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl Summary {
    fn add(&mut self, object: &Object) {
        self.total_objects += 1;
        self.total_size_bytes += object.size().unwrap_or(0);
    }

    fn finish(mut self) -> Self {
        self.total_size_human = humansize::format_size(self.total_size_bytes, humansize::BINARY);
        self
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse(&args.target, &formatter) {
        Ok(target) => target,
        Err(code) => return code,
    };
    let fs = match open_fs(&target, &formatter) {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    let prefix = dir_prefix(&target.path);
    let mut listing = fs.list();
    let mut items = Vec::new();
    let mut summary = Summary::default();

    while let Some(object) = listing.next().await {
        if !object.remote().starts_with(&prefix) {
            continue;
        }
        summary.add(&object);
        if formatter.is_json() {
            items.push(object);
        } else {
            formatter.println(&format_line(&object));
        }
    }

    if let Err(e) = listing.finish().await {
        return report(&formatter, &e);
    }

    let summary = summary.finish();
    if formatter.is_json() {
        formatter.json(&LsOutput {
            items,
            summary: args.summarize.then_some(summary),
        });
    } else if args.summarize {
        formatter.println(&format!(
            "\nTotal: {} objects, {}",
            summary.total_objects, summary.total_size_human
        ));
    }

    ExitCode::Success
}

/// Listing prefix for a path below the root; empty lists everything
fn dir_prefix(path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        String::new()
    } else {
        format!("{path}/")
    }
}

fn format_line(object: &Object) -> String {
    let date = object
        .mod_time()
        .map(|t| t.strftime("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| " ".repeat(19));
    let size = humansize::format_size(object.size().unwrap_or(0), humansize::BINARY);
    format!("[{date}] {size:>10} {}", object.remote())
}

#[cfg(test)]
mod tests {
    use super::*;
    use yd_core::ResourceInfo;

    #[test]
    fn test_dir_prefix() {
        assert_eq!(dir_prefix(""), "");
        assert_eq!(dir_prefix("photos"), "photos/");
        assert_eq!(dir_prefix("/photos/2024/"), "photos/2024/");
    }

    #[test]
    fn test_format_line() {
        let mut info = ResourceInfo::file("disk:/r/a.txt", 2048);
        info.modified = Some("2024-03-01T12:30:00+00:00".to_string());
        let object = Object::with_info("a.txt", &info);

        let line = format_line(&object);
        assert!(line.starts_with("[2024-03-01 12:30:00]"));
        assert!(line.contains("2 KiB"));
        assert!(line.ends_with(" a.txt"));
    }

    #[test]
    fn test_summary_totals() {
        let mut summary = Summary::default();
        summary.add(&Object::with_info("a", &ResourceInfo::file("disk:/a", 1024)));
        summary.add(&Object::with_info("b", &ResourceInfo::file("disk:/b", 1024)));

        let summary = summary.finish();
        assert_eq!(summary.total_objects, 2);
        assert_eq!(summary.total_size_bytes, 2048);
        assert_eq!(summary.total_size_human, "2 KiB");
    }
}
