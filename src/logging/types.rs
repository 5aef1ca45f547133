//! Core logging types: status tones and the [`Log`] trait.

/// Tone of a labeled status line.
///
/// Each tone maps to a color on the console; the log file records the label
/// and message only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Something was created or changed (`symlink`, `mkdir`, `git clone`).
    Change,
    /// Nothing needed doing (`identical`, `exists`).
    Noop,
    /// The operator's attention is needed (`conflict`).
    Conflict,
}

impl Status {
    /// Stable name used as the `status` field on tracing events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Noop => "noop",
            Self::Conflict => "conflict",
        }
    }

    /// Inverse of [`as_str`](Self::as_str); unknown names map to `Change`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "noop" => Self::Noop,
            "conflict" => Self::Conflict,
            _ => Self::Change,
        }
    }

    /// ANSI color escape for this tone.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Change => "\x1b[92m",
            Self::Noop => "\x1b[94m",
            Self::Conflict => "\x1b[91m",
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards everything to `tracing`; the
/// link applier and commands take `&dyn Log` so they stay independent of the
/// subscriber that is installed.
pub trait Log {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Log a labeled status line such as `symlink  ~/.bashrc`.
    fn status(&self, status: Status, label: &str, msg: &str);
}
