//! Applying a castle to a target home directory.
//!
//! [`link_castle`] first makes sure every declared subdirectory exists as a
//! real directory, then walks the castle's linkables in discovery order:
//!
//! - a destination that already links to its source is **identical** and
//!   left alone;
//! - an empty destination is linked;
//! - anything else is a **conflict** handed to a [`ConflictResolver`],
//!   unless the operator already chose "all" in this run.
//!
//! Failing to replace one destination is logged and counted; the rest of the
//! castle is still processed. An unreadable symlink, a declared
//! subdirectory occupied by a non-directory, or one that resolves back into
//! the castle through a symlinked parent aborts the run.
pub mod conflict;

pub use conflict::{
    Always, ConflictResolver, Decision, Response, RunState, Step, TerminalPrompt, transition,
};

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::castle::Castle;
use crate::castle::linkables::compute_linkables;
use crate::castle::subdirs::read_declarations;
use crate::error::CastleError;
use crate::logging::{Log, Status};
use crate::resources::fs::resolves_within;
use crate::resources::{
    Applicable as _, DirectoryResource, Resource as _, ResourceChange, ResourceState,
    SymlinkResource,
};

/// Outcome of one [`link_castle`] run.
///
/// In a dry run the counts describe what would have happened.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Symlinks created or replaced.
    pub linked: usize,
    /// Destinations that already pointed at their source.
    pub identical: usize,
    /// Conflicts left untouched.
    pub skipped: usize,
    /// Destinations that could not be replaced.
    pub failed: usize,
    /// The operator quit before every entry was processed.
    pub aborted: bool,
    /// Declared subdirectories created in the target home.
    pub created_dirs: Vec<PathBuf>,
}

impl LinkReport {
    /// One-line summary for the end of a run.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} linked, {} identical, {} skipped, {} failed",
            self.linked, self.identical, self.skipped, self.failed
        )
    }
}

/// Outcome of one [`unlink_castle`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnlinkReport {
    /// Symlinks removed.
    pub removed: usize,
    /// Destinations left alone because they were not our symlinks.
    pub skipped: usize,
    /// Symlinks that could not be removed.
    pub failed: usize,
}

/// Link every linkable of `castle` into `target_home`.
///
/// # Errors
///
/// Returns [`CastleError`] (inside [`anyhow::Error`]) when discovery fails,
/// when a declared subdirectory cannot be created, is occupied by a
/// non-directory or resolves into the castle itself, or when a destination
/// cannot be inspected. Also fails if
/// `resolver` cannot produce a decision. Individual link failures are
/// counted in [`LinkReport::failed`] instead.
pub fn link_castle(
    castle: &Castle,
    target_home: &Path,
    resolver: &mut dyn ConflictResolver,
    log: &dyn Log,
    dry_run: bool,
) -> Result<LinkReport> {
    let declarations = read_declarations(castle)?;
    let linkables = compute_linkables(castle)?;
    log.debug(&format!(
        "{} declared subdirectories, {} linkables",
        declarations.len(),
        linkables.len()
    ));

    let home = castle.home();
    for subdir in declarations.iter().filter(|d| !d.is_empty()) {
        let dir = target_home.join(subdir);
        if resolves_within(&dir, &home)? {
            return Err(CastleError::FatalInconsistency {
                path: dir,
                reason: format!(
                    "resolves into castle '{}' through a symlinked parent",
                    castle.name()
                ),
            }
            .into());
        }
    }

    let mut report = LinkReport::default();

    for subdir in declarations.iter().filter(|d| !d.is_empty()) {
        let dir = DirectoryResource::new(target_home.join(subdir));
        match dir.current_state()? {
            ResourceState::Correct => log.status(Status::Noop, "exists", &dir.description()),
            ResourceState::Invalid { reason } => {
                return Err(CastleError::FatalInconsistency {
                    path: dir.path,
                    reason,
                }
                .into());
            }
            ResourceState::Missing | ResourceState::Incorrect { .. } => {
                if dry_run {
                    log.dry_run(&format!("would mkdir {}", dir.description()));
                } else {
                    dir.apply()?;
                    log.status(Status::Change, "mkdir", &dir.description());
                }
                report.created_dirs.push(dir.path);
            }
        }
    }

    let mut state = RunState::Normal;

    for relative in &linkables {
        let link = SymlinkResource::new(home.join(relative), target_home.join(relative));

        let step = match link.current_state()? {
            ResourceState::Correct => {
                log.status(Status::Noop, "identical", &link.source.display().to_string());
                report.identical += 1;
                continue;
            }
            ResourceState::Missing => Step::Apply,
            ResourceState::Incorrect { current } | ResourceState::Invalid { reason: current } => {
                log.status(
                    Status::Conflict,
                    "conflict",
                    &format!("{} exists ({current})", link.target.display()),
                );
                if dry_run {
                    log.dry_run(&format!("would ask before replacing {}", link.target.display()));
                    report.skipped += 1;
                    continue;
                }
                if state == RunState::AllYes {
                    Step::Apply
                } else {
                    let decision = resolver.decide(&link.target, &link.source)?;
                    let (step, next) = transition(state, decision);
                    state = next;
                    step
                }
            }
        };

        match step {
            Step::Skip => {
                log.status(Status::Noop, "skip", &link.target.display().to_string());
                report.skipped += 1;
            }
            Step::Stop => {
                log.warn("quit: remaining entries left untouched");
                report.aborted = true;
                break;
            }
            Step::Apply if dry_run => {
                log.dry_run(&format!("would link {}", link.description()));
                report.linked += 1;
            }
            Step::Apply => match link.apply() {
                Ok(_) => {
                    log.status(
                        Status::Change,
                        "symlink",
                        &format!("{} to {}", link.source.display(), link.target.display()),
                    );
                    report.linked += 1;
                }
                Err(e @ CastleError::FatalInconsistency { .. }) => return Err(e.into()),
                Err(e) => {
                    log.error(&format!("failed to link {}: {e}", link.target.display()));
                    report.failed += 1;
                }
            },
        }
    }

    log.info(&report.summary());
    Ok(report)
}

/// Remove the symlinks that `castle` placed in `target_home`.
///
/// Only destinations that are symlinks to the castle's own files are
/// removed. Declared subdirectories stay in place.
///
/// # Errors
///
/// Returns [`CastleError`] when discovery fails or a destination cannot be
/// inspected. Failures removing individual links are counted instead.
pub fn unlink_castle(
    castle: &Castle,
    target_home: &Path,
    log: &dyn Log,
    dry_run: bool,
) -> Result<UnlinkReport, CastleError> {
    let home = castle.home();
    let mut report = UnlinkReport::default();

    for relative in compute_linkables(castle)? {
        let link = SymlinkResource::new(home.join(&relative), target_home.join(&relative));
        let target = link.target.display().to_string();

        if dry_run {
            if link.current_state()? == ResourceState::Correct {
                log.dry_run(&format!("would unlink {target}"));
                report.removed += 1;
            } else {
                report.skipped += 1;
            }
            continue;
        }

        match link.remove() {
            Ok(ResourceChange::Applied) => {
                log.status(Status::Change, "unlink", &target);
                report.removed += 1;
            }
            Ok(ResourceChange::AlreadyCorrect) => {
                log.debug(&format!("not linked: {target}"));
                report.skipped += 1;
            }
            Ok(ResourceChange::Skipped { reason }) => {
                log.status(Status::Noop, "skip", &format!("{target} ({reason})"));
                report.skipped += 1;
            }
            Err(e @ CastleError::FatalInconsistency { .. }) => return Err(e),
            Err(e) => {
                log.error(&format!("failed to unlink {target}: {e}"));
                report.failed += 1;
            }
        }
    }

    log.info(&format!(
        "{} unlinked, {} skipped, {} failed",
        report.removed, report.skipped, report.failed
    ));
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod testing {
    use std::path::Path;

    use anyhow::Result;

    use super::{ConflictResolver, Decision};

    /// Resolver that answers overwrite after turning the conflicting entry's
    /// parent directory into a plain file, so replacing the entry fails.
    pub(crate) struct BreakParent;

    impl ConflictResolver for BreakParent {
        fn decide(&mut self, existing: &Path, _candidate: &Path) -> Result<Decision> {
            let parent = existing.parent().unwrap();
            std::fs::remove_dir_all(parent)?;
            std::fs::write(parent, "")?;
            Ok(Decision::Overwrite)
        }
    }
}
