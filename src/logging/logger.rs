//! Console and file logger backed by `tracing`.
use std::path::PathBuf;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET, STATUS_TARGET};
use super::types::{Log, Status};
use super::utils::log_file_path;

/// Implement the single-message methods of [`Log`] by delegating to inherent
/// methods of the same name on the implementing type.
///
/// `status` is **not** included because its signature differs from the
/// `fn(&self, &str)` pattern shared by the other methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger used by every command.
///
/// Events go to whatever subscriber is installed; with
/// [`init_subscriber`](super::subscriber::init_subscriber) they reach the
/// console and `$XDG_CACHE_HOME/homesick/<command>.log`. Without a subscriber
/// (as in integration tests) they are discarded.
#[derive(Debug, Default)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// Only remembers where the log file lives; the file itself is created by
    /// [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Log a labeled status line.
    pub fn status(&self, status: Status, label: &str, msg: &str) {
        tracing::info!(
            target: STATUS_TARGET,
            status = status.as_str(),
            label,
            "{msg}"
        );
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn status(&self, status: Status, label: &str, msg: &str) {
        self.status(status, label, msg);
    }
}
