//! put command - Upload a local file
//!
//! Parent directories below the remote root are created before the upload.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::Args;
use futures::{StreamExt, TryStreamExt, stream};
use jiff::Timestamp;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use yd_core::{ByteStream, Error, RemoteTarget};

use super::{open_fs, parse, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Read size for upload bodies
const CHUNK_SIZE: usize = 256 * 1024;

/// Upload a local file
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub source: PathBuf,

    /// Destination (remote:path); a trailing '/' keeps the file name
    pub target: String,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: u64,
    size_human: String,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let metadata = match tokio::fs::metadata(&args.source).await {
        Ok(metadata) => metadata,
        Err(e) => return report(&formatter, &Error::Io(e)),
    };
    if !metadata.is_file() {
        formatter.error(&format!("Source is not a file: {}", args.source.display()));
        return ExitCode::UsageError;
    }

    let target = match parse(&args.target, &formatter) {
        Ok(target) => target,
        Err(code) => return code,
    };
    let name = match destination_name(&target, &args.source) {
        Some(name) => name,
        None => {
            formatter.error(&format!("Cannot derive a file name from {}", args.source.display()));
            return ExitCode::UsageError;
        }
    };

    let fs = match open_fs(&target, &formatter) {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    let file = match tokio::fs::File::open(&args.source).await {
        Ok(file) => file,
        Err(e) => return report(&formatter, &Error::Io(e)),
    };

    let size = metadata.len();
    let mod_time = metadata
        .modified()
        .ok()
        .and_then(|t| Timestamp::try_from(t).ok())
        .unwrap_or_else(Timestamp::now);

    let progress = ProgressBar::new(&output_config, size);
    let body = file_stream(file, progress.clone());
    let (object, result) = fs.put(body, &name, mod_time, size).await;
    progress.finish_and_clear();

    if let Err(e) = result {
        return report(&formatter, &e);
    }

    let source = args.source.display().to_string();
    let target = format!("{}:{}", target.remote, object.remote());
    let size_human = humansize::format_size(size, humansize::BINARY);
    if formatter.is_json() {
        formatter.json(&PutOutput {
            status: "success",
            source,
            target,
            size_bytes: size,
            size_human,
        });
    } else {
        formatter.println(&format!("{source} -> {target} ({size_human})"));
    }
    ExitCode::Success
}

/// Object name for an upload; a root or directory target takes the source file name
fn destination_name(target: &RemoteTarget, source: &Path) -> Option<String> {
    if target.path.is_empty() || target.path.ends_with('/') {
        let file_name = source.file_name()?.to_string_lossy();
        Some(format!("{}{file_name}", target.path))
    } else {
        Some(target.path.clone())
    }
}

/// Stream a file in chunks, advancing the progress bar as they are read
fn file_stream(file: tokio::fs::File, progress: ProgressBar) -> ByteStream {
    stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let n = file.read(&mut buf).await.map_err(Error::Io)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok::<_, Error>(Some((Bytes::from(buf), file)))
    })
    .inspect_ok(move |chunk| progress.inc(chunk.len() as u64))
    .boxed()
}
