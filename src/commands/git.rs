//! Commands that hand a castle to git: commit, diff, status, push and pull.
use anyhow::{Context as _, Result};

use crate::cli::{CommitOpts, PullOpts};
use crate::logging::{Log, Status};
use crate::vcs::Vcs;

use super::CommandSetup;

/// Commit all changes in a castle. Message words are joined with spaces;
/// without a message git opens the editor.
///
/// # Errors
///
/// Returns an error if the castle does not exist or the commit fails.
pub fn commit(setup: &CommandSetup, vcs: &dyn Vcs, opts: &CommitOpts, log: &dyn Log) -> Result<()> {
    let castle = setup.castle(opts.castle.as_deref())?;
    let message = opts.message.join(" ");

    if setup.dry_run {
        log.dry_run(&format!("would commit all changes in '{}'", castle.name()));
        return Ok(());
    }

    log.status(Status::Change, "git commit all", castle.name());
    vcs.commit_all(castle.path(), &message)
        .context("failed to commit")
}

/// Show uncommitted changes in a castle.
///
/// # Errors
///
/// Returns an error if the castle does not exist or git fails.
pub fn diff(setup: &CommandSetup, vcs: &dyn Vcs, name: Option<&str>, log: &dyn Log) -> Result<()> {
    let castle = setup.castle(name)?;
    log.status(Status::Change, "git diff", castle.name());
    vcs.diff(castle.path()).context("failed to diff")
}

/// Show the working tree status of a castle.
///
/// # Errors
///
/// Returns an error if the castle does not exist or git fails.
pub fn status(setup: &CommandSetup, vcs: &dyn Vcs, name: Option<&str>, log: &dyn Log) -> Result<()> {
    let castle = setup.castle(name)?;
    log.status(
        Status::Change,
        "git status",
        &format!("{} for castle '{}'", castle.path().display(), castle.name()),
    );
    vcs.status(castle.path()).context("failed to get status")
}

/// Push a castle.
///
/// # Errors
///
/// Returns an error if the castle does not exist or the push fails.
pub fn push(setup: &CommandSetup, vcs: &dyn Vcs, name: Option<&str>, log: &dyn Log) -> Result<()> {
    let castle = setup.castle(name)?;
    if setup.dry_run {
        log.dry_run(&format!("would push castle '{}'", castle.name()));
        return Ok(());
    }
    log.status(Status::Change, "git push", castle.name());
    vcs.push(castle.path()).context("failed to push castle")
}

/// Pull one castle, or all of them with `--all`.
///
/// Every selected castle is attempted; failures are logged and the command
/// fails at the end if any castle could not be updated.
///
/// # Errors
///
/// Returns an error if the castle cannot be resolved or any pull failed.
pub fn pull(setup: &CommandSetup, vcs: &dyn Vcs, opts: &PullOpts, log: &dyn Log) -> Result<()> {
    let castles = if opts.all {
        setup.all_castles()?
    } else {
        vec![setup.castle(opts.castle.as_deref())?]
    };

    let mut failed = 0usize;
    for castle in &castles {
        let remote = match vcs.remote_url(castle.path()) {
            Ok(url) => url,
            Err(e) => {
                log.error(&format!(
                    "failed to get remote for castle '{}': {e}",
                    castle.name()
                ));
                failed += 1;
                continue;
            }
        };

        if setup.dry_run {
            log.dry_run(&format!("would pull {remote} into castle '{}'", castle.name()));
            continue;
        }

        log.status(
            Status::Change,
            "git pull",
            &format!("{remote} to castle '{}'", castle.name()),
        );
        if let Err(e) = vcs.pull(castle.path()) {
            log.error(&format!("failed to update castle '{}': {e}", castle.name()));
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} castle(s) failed to update");
    }
    Ok(())
}
