//! Thin wrappers around [`std::process::Command`].
//!
//! Three flavours are provided:
//!
//! - [`run_in`] captures stdout and stderr (used for queries such as
//!   `git config`);
//! - [`run_streaming`] lets the child talk to the terminal on stdin/stdout
//!   but captures stderr so that a failure can be reported with its message;
//! - [`run_interactive`] hands the whole terminal to the child (editor,
//!   shell, `exec`) and reports its exit status.
//!
//! Programs are looked up with the `which` crate before spawning, so a
//! missing tool is reported as [`ExecError::ProgramNotFound`].
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use crate::error::ExecError;

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited successfully.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Render `program args...` for error messages.
fn label(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Locate `program` on `PATH`. A program given as a path is resolved
/// relative to `dir`, the directory it will run in.
fn resolve(dir: &Path, program: &str) -> Result<PathBuf, ExecError> {
    which::which_in(program, std::env::var_os("PATH"), dir).map_err(|_| {
        ExecError::ProgramNotFound {
            program: program.to_string(),
        }
    })
}

/// Build a [`Command`] for `program` running in `dir`.
fn command(dir: &Path, program: &str, args: &[&str]) -> Result<Command, ExecError> {
    let mut cmd = Command::new(resolve(dir, program)?);
    cmd.args(args).current_dir(dir);
    Ok(cmd)
}

/// Run `cmd`, mapping a spawn failure into [`ExecError::Spawn`].
fn output(mut cmd: Command, label: &str) -> Result<ExecResult, ExecError> {
    cmd.output()
        .map(ExecResult::from)
        .map_err(|source| ExecError::Spawn {
            command: label.to_string(),
            source,
        })
}

/// Turn a non-zero exit into [`ExecError::CommandFailed`], preferring the
/// child's stderr as the error detail.
fn check(result: ExecResult, label: String) -> Result<ExecResult, ExecError> {
    if result.success {
        return Ok(result);
    }
    let stderr = result.stderr.trim();
    let detail = if stderr.is_empty() {
        result
            .code
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit {c}"))
    } else {
        stderr.to_string()
    };
    Err(ExecError::CommandFailed {
        command: label,
        stderr: detail,
    })
}

/// Run a command in `dir` with captured output. Fails if it exits non-zero.
///
/// # Errors
///
/// Returns [`ExecError::ProgramNotFound`] or [`ExecError::Spawn`] if the
/// program cannot be started and [`ExecError::CommandFailed`] on a non-zero
/// exit.
pub fn run_in(dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
    let mut cmd = command(dir, program, args)?;
    cmd.stdin(Stdio::null());
    let label = label(program, args);
    check(output(cmd, &label)?, label)
}

/// Run a command in `dir` with captured output, allowing failure.
///
/// # Errors
///
/// Returns [`ExecError::ProgramNotFound`] or [`ExecError::Spawn`] if the
/// program cannot be started.
pub fn run_in_unchecked(
    dir: &Path,
    program: &str,
    args: &[&str],
) -> Result<ExecResult, ExecError> {
    let mut cmd = command(dir, program, args)?;
    cmd.stdin(Stdio::null());
    output(cmd, &label(program, args))
}

/// Run a command in `dir` with stdin and stdout attached to the terminal.
///
/// Standard error is captured so that it can become the error detail when
/// the command fails.
///
/// # Errors
///
/// Returns [`ExecError::ProgramNotFound`] or [`ExecError::Spawn`] if the
/// program cannot be started and [`ExecError::CommandFailed`] on a non-zero
/// exit.
pub fn run_streaming(dir: &Path, program: &str, args: &[&str]) -> Result<(), ExecError> {
    let mut cmd = command(dir, program, args)?;
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped());
    let label = label(program, args);
    check(output(cmd, &label)?, label).map(|_| ())
}

/// Run a command in `dir` with the terminal fully attached and return its
/// exit status. A non-zero exit is not an error here.
///
/// # Errors
///
/// Returns [`ExecError::ProgramNotFound`] or [`ExecError::Spawn`] if the
/// program cannot be started.
pub fn run_interactive(dir: &Path, program: &str, args: &[&str]) -> Result<ExitStatus, ExecError> {
    command(dir, program, args)?
        .status()
        .map_err(|source| ExecError::Spawn {
            command: label(program, args),
            source,
        })
}

/// Check if a program is available on PATH.
#[must_use]
pub fn which(program: &str) -> bool {
    which::which(program).is_ok()
}
