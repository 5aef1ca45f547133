//! Domain-specific error types for castle management.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors ([`CastleError`], [`ExecError`]) while
//! command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! ```text
//! CastleError   resolution, discovery, link application
//! ExecError     external programs: git, the editor, a shell
//! ```
//!
//! Conflicts found while linking are not errors; they are resolved through a
//! [`ConflictResolver`](crate::link::ConflictResolver).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the castle registry, declaration reader, linkable
/// discovery and link applier.
#[derive(Error, Debug)]
pub enum CastleError {
    /// The name does not resolve to a castle under the repository root.
    #[error("castle '{name}' does not exist")]
    NotFound {
        /// The name that failed to resolve.
        name: String,
    },

    /// A filesystem read or write failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The filesystem is in a state the linker cannot reason about safely.
    #[error("inconsistent filesystem at {}: {reason}", path.display())]
    FatalInconsistency {
        /// Path whose state is inconsistent.
        path: PathBuf,
        /// Human-readable explanation.
        reason: String,
    },
}

impl CastleError {
    /// Build an [`CastleError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`CastleError::NotFound`] for `name`.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Errors raised when running an external program (git, the editor, a shell).
#[derive(Error, Debug)]
pub enum ExecError {
    /// The command ran and exited non-zero.
    ///
    /// `stderr` carries the trimmed standard error of the process, or the
    /// exit status when nothing was written to standard error.
    #[error("{command} failed: {stderr}")]
    CommandFailed {
        /// Command line that was run (e.g. `git pull`).
        command: String,
        /// Trimmed standard error, or the exit status.
        stderr: String,
    },

    /// The program is not installed, or a path given for it does not exist.
    #[error("{program} not found: is it installed and on PATH?")]
    ProgramNotFound {
        /// Program name as given.
        program: String,
    },

    /// The command could not be started at all.
    #[error("failed to execute {command}: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    // -----------------------------------------------------------------------
    // CastleError
    // -----------------------------------------------------------------------

    #[test]
    fn not_found_display() {
        let e = CastleError::not_found("dotfiles");
        assert_eq!(e.to_string(), "castle 'dotfiles' does not exist");
    }

    #[test]
    fn io_display_includes_path() {
        let e = CastleError::io(
            "/repos/dotfiles/.homesick_subdir",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(e.to_string().contains("/repos/dotfiles/.homesick_subdir"));
        assert!(e.to_string().contains("permission denied"));
    }

    #[test]
    fn io_has_source() {
        use std::error::Error as StdError;
        let e = CastleError::io("/x", io::Error::other("boom"));
        assert!(e.source().is_some());
    }

    #[test]
    fn fatal_inconsistency_display() {
        let e = CastleError::FatalInconsistency {
            path: PathBuf::from("/home/user/.config"),
            reason: "exists but is not a directory".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "inconsistent filesystem at /home/user/.config: exists but is not a directory"
        );
    }

    // -----------------------------------------------------------------------
    // ExecError
    // -----------------------------------------------------------------------

    #[test]
    fn command_failed_display() {
        let e = ExecError::CommandFailed {
            command: "git pull".to_string(),
            stderr: "fatal: not a git repository".to_string(),
        };
        assert_eq!(e.to_string(), "git pull failed: fatal: not a git repository");
    }

    #[test]
    fn program_not_found_display() {
        let e = ExecError::ProgramNotFound {
            program: "git".to_string(),
        };
        assert_eq!(e.to_string(), "git not found: is it installed and on PATH?");
    }

    // -----------------------------------------------------------------------
    // Send + Sync bounds and anyhow conversion
    // -----------------------------------------------------------------------

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<CastleError>();
        assert_send_sync::<ExecError>();
    }

    #[test]
    fn castle_error_downcasts_through_anyhow() {
        let err: anyhow::Error = CastleError::not_found("private").into();
        assert!(matches!(
            err.downcast_ref::<CastleError>(),
            Some(CastleError::NotFound { .. })
        ));
    }
}
