//! Link and unlink commands.
use anyhow::Result;

use crate::cli::LinkOpts;
use crate::link::{
    self, Always, ConflictResolver, Decision, LinkReport, TerminalPrompt, UnlinkReport,
};
use crate::logging::Log;
use crate::vcs::GitFileDiff;

use super::CommandSetup;

/// Run the link command, prompting on the terminal unless `--force` or
/// `--skip` decides every conflict up front.
///
/// # Errors
///
/// Returns an error if linking stops on a fatal inconsistency or any link
/// failed.
pub fn run(setup: &CommandSetup, opts: &LinkOpts, log: &dyn Log) -> Result<()> {
    let mut resolver: Box<dyn ConflictResolver> = if opts.force {
        Box::new(Always(Decision::OverwriteAll))
    } else if opts.skip {
        Box::new(Always(Decision::Skip))
    } else {
        Box::new(TerminalPrompt::new(
            std::io::stdin().lock(),
            std::io::stdout(),
            Box::new(GitFileDiff),
        ))
    };
    run_with(setup, opts.castle.as_deref(), resolver.as_mut(), log).map(|_| ())
}

/// Link castle `name` into the home directory using `resolver` for conflicts.
///
/// # Errors
///
/// Returns an error if the castle does not exist, linking stops on a fatal
/// inconsistency, or any individual link failed.
pub fn run_with(
    setup: &CommandSetup,
    name: Option<&str>,
    resolver: &mut dyn ConflictResolver,
    log: &dyn Log,
) -> Result<LinkReport> {
    let castle = setup.castle(name)?;
    log.stage(&format!("Linking castle '{}'", castle.name()));

    let report = link::link_castle(
        &castle,
        &setup.settings.home,
        resolver,
        log,
        setup.dry_run,
    )?;
    if report.failed > 0 {
        anyhow::bail!("{} link(s) failed", report.failed);
    }
    Ok(report)
}

/// Remove castle `name`'s symlinks from the home directory.
///
/// # Errors
///
/// Returns an error if the castle does not exist or any link could not be
/// removed.
pub fn unlink(setup: &CommandSetup, name: Option<&str>, log: &dyn Log) -> Result<()> {
    unlink_report(setup, name, log).map(|_| ())
}

fn unlink_report(setup: &CommandSetup, name: Option<&str>, log: &dyn Log) -> Result<UnlinkReport> {
    let castle = setup.castle(name)?;
    log.stage(&format!("Unlinking castle '{}'", castle.name()));

    let report = link::unlink_castle(&castle, &setup.settings.home, log, setup.dry_run)?;
    if report.failed > 0 {
        anyhow::bail!("{} link(s) could not be removed", report.failed);
    }
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::castle::testing::{Fixture, touch};
    use crate::commands::testing::setup;
    use crate::link::testing::BreakParent;
    use crate::logging::Logger;

    #[test]
    fn force_overwrites_conflicts() {
        let fx = Fixture::new();
        touch(&fx.target_home().join(".file1"));
        let opts = LinkOpts {
            castle: Some("private".to_string()),
            force: true,
            skip: false,
        };
        run(&setup(&fx, false), &opts, &Logger::default()).unwrap();
        assert!(
            fx.target_home()
                .join(".file1")
                .symlink_metadata()
                .unwrap()
                .is_symlink()
        );
    }

    #[test]
    fn skip_keeps_conflicts() {
        let fx = Fixture::new();
        touch(&fx.target_home().join(".file1"));
        let opts = LinkOpts {
            castle: Some("private".to_string()),
            force: false,
            skip: true,
        };
        run(&setup(&fx, false), &opts, &Logger::default()).unwrap();
        assert!(
            !fx.target_home()
                .join(".file1")
                .symlink_metadata()
                .unwrap()
                .is_symlink()
        );
        assert!(
            fx.target_home()
                .join(".file2")
                .symlink_metadata()
                .unwrap()
                .is_symlink()
        );
    }

    #[test]
    fn default_castle_is_linked() {
        let fx = Fixture::new();
        let report = run_with(
            &setup(&fx, false),
            None,
            &mut Always(Decision::Skip),
            &Logger::default(),
        )
        .unwrap();
        assert_eq!(report.linked, 6);
    }

    #[test]
    fn failed_link_fails_the_command() {
        let fx = Fixture::new();
        touch(&fx.target_home().join(".dir2/.file2"));

        let err = run_with(
            &setup(&fx, false),
            None,
            &mut BreakParent,
            &Logger::default(),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "1 link(s) failed");
        assert!(
            fx.target_home()
                .join(".dir3/.subdir1/.file2")
                .symlink_metadata()
                .unwrap()
                .is_symlink()
        );
    }

    #[test]
    fn unknown_castle_fails() {
        let fx = Fixture::new();
        let result = run_with(
            &setup(&fx, false),
            Some("nogit"),
            &mut Always(Decision::Skip),
            &Logger::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn unlink_after_link_restores_empty_home() {
        let fx = Fixture::new();
        let setup = setup(&fx, false);
        run_with(&setup, Some("private"), &mut Always(Decision::Overwrite), &Logger::default())
            .unwrap();
        let report = unlink_report(&setup, Some("private"), &Logger::default()).unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(std::fs::read_dir(fx.target_home()).unwrap().count(), 0);
    }
}
