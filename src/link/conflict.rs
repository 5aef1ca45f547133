//! Conflict resolution for the link applier.
//!
//! The applier asks a [`ConflictResolver`] what to do whenever a destination
//! is occupied by something other than the expected symlink. The terminal
//! prompt is one resolver; `--force`, `--skip` and tests use [`Always`].
//!
//! Whether the operator has chosen "all" is a [`RunState`] value that the
//! applier threads through its loop via [`transition`].
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::vcs::FileDiff;

/// What to do with one conflicting destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Replace the destination with the symlink.
    Overwrite,
    /// Leave the destination alone.
    Skip,
    /// Replace this destination and every later conflict in the run.
    OverwriteAll,
    /// Stop processing; links already made stay in place.
    Quit,
}

/// One parsed line of prompt input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// A final answer.
    Decide(Decision),
    /// Show the differences and ask again.
    Diff,
    /// Show the legend and ask again.
    Help,
}

impl Response {
    /// Parse an answer. Anything unrecognised, including an empty line,
    /// means overwrite.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "n" | "N" => Self::Decide(Decision::Skip),
            "a" | "A" => Self::Decide(Decision::OverwriteAll),
            "q" | "Q" => Self::Decide(Decision::Quit),
            "d" | "D" => Self::Diff,
            "h" | "H" => Self::Help,
            _ => Self::Decide(Decision::Overwrite),
        }
    }
}

/// Per-run resolution mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    /// Ask about every conflict.
    #[default]
    Normal,
    /// The operator chose "all": overwrite without asking.
    AllYes,
}

/// What the applier does with the current entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Replace the destination.
    Apply,
    /// Leave the destination alone and continue.
    Skip,
    /// Stop the run.
    Stop,
}

/// Apply `decision` in `state`. [`RunState::AllYes`] is sticky.
#[must_use]
pub const fn transition(state: RunState, decision: Decision) -> (Step, RunState) {
    match decision {
        Decision::Overwrite => (Step::Apply, state),
        Decision::Skip => (Step::Skip, state),
        Decision::OverwriteAll => (Step::Apply, RunState::AllYes),
        Decision::Quit => (Step::Stop, state),
    }
}

/// Decides the fate of a conflicting destination.
pub trait ConflictResolver {
    /// `existing` is the occupied destination; `candidate` is the castle
    /// file that would be linked there.
    ///
    /// # Errors
    ///
    /// Returns an error if no decision can be obtained (for example when
    /// input ends).
    fn decide(&mut self, existing: &Path, candidate: &Path) -> Result<Decision>;
}

/// A resolver that always answers the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Always(pub Decision);

impl ConflictResolver for Always {
    fn decide(&mut self, _existing: &Path, _candidate: &Path) -> Result<Decision> {
        Ok(self.0)
    }
}

const HELP: &str = "\
\tY - yes, overwrite
\tn - no, do not overwrite
\ta - all, overwrite this and all other
\tq - quit, abort
\td - diff, show the differences between old and new
\th - help, show this help
";

/// Interactive resolver reading one line per question.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    differ: Box<dyn FileDiff>,
}

impl<R, W> std::fmt::Debug for TerminalPrompt<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalPrompt").finish_non_exhaustive()
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Create a prompt that reads answers from `input`, writes questions to
    /// `output` and shows differences with `differ`.
    pub fn new(input: R, output: W, differ: Box<dyn FileDiff>) -> Self {
        Self {
            input,
            output,
            differ,
        }
    }

    /// Diff the castle's file (old) against what is in the home (new).
    fn show_diff(&mut self, existing: &Path, candidate: &Path) -> std::io::Result<()> {
        match self.differ.diff_files(candidate, existing) {
            Ok(text) if text.is_empty() => writeln!(self.output, "file contents are identical"),
            Ok(text) => write!(self.output, "{text}"),
            Err(e) => writeln!(self.output, "failed to diff files: {e}"),
        }
    }
}

impl<R: BufRead, W: Write> ConflictResolver for TerminalPrompt<R, W> {
    fn decide(&mut self, existing: &Path, candidate: &Path) -> Result<Decision> {
        loop {
            write!(
                self.output,
                "Overwrite {}? (enter 'h' for help) [Ynaqdh] ",
                existing.display()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read answer")?;
            if read == 0 {
                anyhow::bail!("no answer for {}: end of input", existing.display());
            }

            match Response::parse(&line) {
                Response::Decide(decision) => return Ok(decision),
                Response::Diff => self.show_diff(existing, candidate)?,
                Response::Help => writeln!(self.output, "{HELP}")?,
            }
        }
    }
}
