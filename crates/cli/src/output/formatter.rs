//! Output formatter for human-readable and JSON output

use serde::Serialize;

use super::OutputConfig;

/// Kind of a one-line status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Done,
    Failed,
    Skipped,
}

impl Status {
    fn symbol(self) -> char {
        match self {
            Status::Done => '✓',
            Status::Failed => '✗',
            Status::Skipped => '⚠',
        }
    }

    /// ANSI foreground color code
    fn color(self) -> u8 {
        match self {
            Status::Done => 32,
            Status::Failed => 31,
            Status::Skipped => 33,
        }
    }
}

/// Formatter for CLI output
///
/// In JSON mode every result is a single JSON document on stdout and errors
/// are JSON objects on stderr, without colors. Quiet mode silences
/// everything except errors.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Status line for `message`, colored when the terminal allows it
    fn status_line(&self, status: Status, message: &str) -> String {
        let symbol = status.symbol();
        if self.colors_enabled() {
            format!("\x1b[{}m{symbol}\x1b[0m {message}", status.color())
        } else {
            format!("{symbol} {message}")
        }
    }

    /// Whether informational output is printed at all
    fn chatty(&self) -> bool {
        !self.config.quiet && !self.config.json
    }

    /// Output a value: JSON in JSON mode, its Display form otherwise
    pub fn output<T: Serialize + std::fmt::Display>(&self, value: &T) {
        match (self.config.quiet, self.config.json) {
            (true, _) => {}
            (false, true) => self.json(value),
            (false, false) => println!("{value}"),
        }
    }

    /// Report a completed action; silent in JSON and quiet mode
    pub fn success(&self, message: &str) {
        if self.chatty() {
            println!("{}", self.status_line(Status::Done, message));
        }
    }

    /// Report an action that was skipped; silent in JSON and quiet mode
    pub fn warning(&self, message: &str) {
        if self.chatty() {
            eprintln!("{}", self.status_line(Status::Skipped, message));
        }
    }

    /// Report a failure on stderr, in every mode
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_text(message));
    }

    fn error_text(&self, message: &str) -> String {
        if self.config.json {
            serde_json::to_string_pretty(&serde_json::json!({ "error": message }))
                .unwrap_or_else(|_| message.to_string())
        } else {
            self.status_line(Status::Failed, message)
        }
    }

    /// Print `value` as pretty JSON on stdout
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a plain line unless quiet
    pub fn println(&self, message: &str) {
        if !self.config.quiet {
            println!("{message}");
        }
    }
}
