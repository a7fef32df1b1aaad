//! User-visible notifications.
//!
//! Every notice is also emitted as a `tracing` event, so the log file keeps
//! a record of what the user was told.

use std::sync::Mutex;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// A single notification as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

/// Sink for short human-readable messages.
pub trait Notifier {
    fn notify(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

fn trace_notice(level: Level, message: &str) {
    match level {
        Level::Info => tracing::info!(notice = %message),
        Level::Warn => tracing::warn!(notice = %message),
        Level::Error => tracing::error!(notice = %message),
    }
}

/// Prints notices to the terminal: info to stdout, the rest to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    /// Suppress info notices (used for `--json` output).
    pub quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: Level, message: &str) {
        trace_notice(level, message);
        match level {
            Level::Info if self.quiet => {}
            Level::Info => println!("  {message}"),
            Level::Warn => eprintln!("  ! {message}"),
            Level::Error => eprintln!("  x {message}"),
        }
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices received so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Messages at `level`, oldest first.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        trace_notice(level, message);
        let notice = Notice {
            level,
            message: message.to_string(),
        };
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
