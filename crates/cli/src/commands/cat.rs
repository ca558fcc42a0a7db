//! cat command - Write a file's contents to stdout

use clap::Args;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use super::{open_fs, parse, report, require_file};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Display file contents
#[derive(Args, Debug)]
pub struct CatArgs {
    /// File (remote:path)
    pub target: String,
}

/// Execute the cat command
pub async fn execute(args: CatArgs, output_config: OutputConfig) -> ExitCode {
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

    let object = fs.new_object(&target.path);
    let mut body = match fs.open(&object).await {
        Ok(body) => body,
        Err(e) => return report(&formatter, &e),
    };

    // Raw bytes, not through the formatter
    let mut stdout = tokio::io::stdout();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return report(&formatter, &e),
        };
        if let Err(e) = stdout.write_all(&chunk).await {
            formatter.error(&format!("Failed to write to stdout: {e}"));
            return ExitCode::GeneralError;
        }
    }

    if let Err(e) = stdout.flush().await {
        formatter.error(&format!("Failed to write to stdout: {e}"));
        return ExitCode::GeneralError;
    }
    ExitCode::Success
}
