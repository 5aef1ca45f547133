//! Version control, delegated to the `git` executable.
//!
//! The castle and link modules never touch git; only command handlers hold a
//! [`Vcs`], which keeps them testable with a mock.
pub mod diff;

pub use diff::{FileDiff, GitFileDiff};

use std::path::Path;

use crate::error::ExecError;
use crate::exec;

/// Version-control operations used by the command layer.
///
/// Every method runs in the given working directory. Failures carry the
/// tool's trimmed standard error.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    /// Clone `uri` into `dest`, recursing into submodules.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the clone fails.
    fn clone_repository(&self, uri: &str, dest: &Path) -> Result<(), ExecError>;

    /// Pull the current branch.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the pull fails.
    fn pull(&self, path: &Path) -> Result<(), ExecError>;

    /// Push the current branch.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the push fails.
    fn push(&self, path: &Path) -> Result<(), ExecError>;

    /// URL of the `origin` remote.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if no `origin` is configured.
    fn remote_url(&self, path: &Path) -> Result<String, ExecError>;

    /// Commit all tracked changes. An empty `message` opens the editor.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the commit fails.
    fn commit_all(&self, path: &Path, message: &str) -> Result<(), ExecError>;

    /// Show uncommitted changes on the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if git fails.
    fn diff(&self, path: &Path) -> Result<(), ExecError>;

    /// Show the working tree status on the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if git fails.
    fn status(&self, path: &Path) -> Result<(), ExecError>;

    /// Initialise a repository.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if git fails.
    fn init(&self, path: &Path) -> Result<(), ExecError>;

    /// Value of a git config `key`, or an empty string when it is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if git fails for any other reason.
    fn config_get(&self, path: &Path, key: &str) -> Result<String, ExecError>;

    /// Whether a remote called `name` has a URL configured.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`config_get`](Self::config_get).
    fn remote_exists(&self, path: &Path, name: &str) -> Result<bool, ExecError>;

    /// Add a remote.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if git fails.
    fn remote_add(&self, path: &Path, name: &str, url: &str) -> Result<(), ExecError>;
}

/// [`Vcs`] backed by the `git` command-line tool.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl Vcs for GitCli {
    fn clone_repository(&self, uri: &str, dest: &Path) -> Result<(), ExecError> {
        let dest = dest.to_string_lossy();
        let args = [
            "clone",
            "-q",
            "--config",
            "push.default=upstream",
            "--recursive",
            uri,
            dest.as_ref(),
        ];
        exec::run_streaming(Path::new("."), "git", &args)
    }

    fn pull(&self, path: &Path) -> Result<(), ExecError> {
        exec::run_in(path, "git", &["pull"]).map(|_| ())
    }

    fn push(&self, path: &Path) -> Result<(), ExecError> {
        exec::run_streaming(path, "git", &["push"])
    }

    fn remote_url(&self, path: &Path) -> Result<String, ExecError> {
        let result = exec::run_in(path, "git", &["config", "remote.origin.url"])?;
        Ok(result.stdout.trim().to_string())
    }

    fn commit_all(&self, path: &Path, message: &str) -> Result<(), ExecError> {
        if message.is_empty() {
            exec::run_streaming(path, "git", &["commit", "-a"])
        } else {
            exec::run_streaming(path, "git", &["commit", "-a", "-m", message])
        }
    }

    fn diff(&self, path: &Path) -> Result<(), ExecError> {
        exec::run_streaming(path, "git", &["diff"])
    }

    fn status(&self, path: &Path) -> Result<(), ExecError> {
        exec::run_streaming(path, "git", &["status"])
    }

    fn init(&self, path: &Path) -> Result<(), ExecError> {
        exec::run_in(path, "git", &["init"]).map(|_| ())
    }

    fn config_get(&self, path: &Path, key: &str) -> Result<String, ExecError> {
        let result = exec::run_in_unchecked(path, "git", &["config", key])?;
        // `git config` exits 1 without output when the key is unset.
        let stderr = result.stderr.trim();
        match result.code {
            Some(0) => Ok(result.stdout.trim().to_string()),
            Some(1) if stderr.is_empty() => Ok(String::new()),
            code => Err(ExecError::CommandFailed {
                command: format!("git config {key}"),
                stderr: if stderr.is_empty() {
                    code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit {c}"))
                } else {
                    stderr.to_string()
                },
            }),
        }
    }

    fn remote_exists(&self, path: &Path, name: &str) -> Result<bool, ExecError> {
        let url = self.config_get(path, &format!("remote.{name}.url"))?;
        Ok(!url.is_empty())
    }

    fn remote_add(&self, path: &Path, name: &str, url: &str) -> Result<(), ExecError> {
        exec::run_in(path, "git", &["remote", "add", name, url]).map(|_| ())
    }
}
