//! Textual comparison of two files, shown from the conflict prompt.
use std::path::Path;

use crate::error::ExecError;
use crate::exec;

/// Produces a unified diff between two files.
#[cfg_attr(test, mockall::automock)]
pub trait FileDiff {
    /// Diff `old` against `new`. An empty string means the contents match.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] if the diff tool cannot run or fails.
    fn diff_files(&self, old: &Path, new: &Path) -> Result<String, ExecError>;
}

/// [`FileDiff`] using `git diff --no-index`, which works outside any
/// repository.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFileDiff;

impl FileDiff for GitFileDiff {
    fn diff_files(&self, old: &Path, new: &Path) -> Result<String, ExecError> {
        let old = old.to_string_lossy();
        let new = new.to_string_lossy();
        let args = [
            "diff",
            "--no-index",
            "--no-color",
            "--",
            old.as_ref(),
            new.as_ref(),
        ];
        let result = exec::run_in_unchecked(Path::new("."), "git", &args)?;
        // Exit status 1 means "files differ".
        match result.code {
            Some(0 | 1) => Ok(result.stdout),
            _ => Err(ExecError::CommandFailed {
                command: "git diff --no-index".to_string(),
                stderr: result.stderr.trim().to_string(),
            }),
        }
    }
}
