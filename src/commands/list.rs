//! Commands that print castle information: `list` and `show-path`.
use std::io::Write;

use anyhow::Result;

use crate::logging::Log;
use crate::vcs::Vcs;

use super::CommandSetup;

/// Print every castle with its `origin` URL, one per line.
///
/// A castle whose remote cannot be read is reported and skipped.
///
/// # Errors
///
/// Returns an error if the repository root cannot be read or `out` fails.
pub fn run(setup: &CommandSetup, vcs: &dyn Vcs, out: &mut dyn Write, log: &dyn Log) -> Result<()> {
    let castles = setup.all_castles()?;
    let width = castles.iter().map(|c| c.name().len()).max().unwrap_or(0);

    for castle in &castles {
        match vcs.remote_url(castle.path()) {
            Ok(url) => writeln!(out, "{:<width$}  {url}", castle.name())?,
            Err(e) => log.error(&format!(
                "{}: failed to get remote uri: {e}",
                castle.name()
            )),
        }
    }
    Ok(())
}

/// Print the absolute path of a castle.
///
/// # Errors
///
/// Returns an error if the castle does not exist or `out` fails.
pub fn show_path(setup: &CommandSetup, name: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let castle = setup.castle(name)?;
    writeln!(out, "{}", castle.path().display())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::castle::testing::Fixture;
    use crate::commands::testing::setup;
    use crate::error::ExecError;
    use crate::logging::Logger;
    use crate::vcs::MockVcs;

    #[test]
    fn lists_castles_with_remotes() {
        let fx = Fixture::new();
        let mut vcs = MockVcs::new();
        vcs.expect_remote_url().returning(|path| {
            let name = path.file_name().unwrap().to_string_lossy();
            Ok(format!("https://github.com/alice/{name}.git"))
        });

        let mut out = Vec::new();
        run(&setup(&fx, false), &vcs, &mut out, &Logger::default()).unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        dotfiles  https://github.com/alice/dotfiles.git
        private   https://github.com/alice/private.git
        ");
    }

    #[test]
    fn castle_without_remote_is_skipped() {
        let fx = Fixture::new();
        let mut vcs = MockVcs::new();
        vcs.expect_remote_url().returning(|path| {
            if path.ends_with("private") {
                Err(ExecError::CommandFailed {
                    command: "git config remote.origin.url".to_string(),
                    stderr: "exit 1".to_string(),
                })
            } else {
                Ok("git@example.com:dotfiles.git".to_string())
            }
        });

        let mut out = Vec::new();
        run(&setup(&fx, false), &vcs, &mut out, &Logger::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "dotfiles  git@example.com:dotfiles.git\n"
        );
    }

    #[test]
    fn empty_root_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixture::new();
        let mut setup = setup(&fx, false);
        setup.registry = crate::castle::CastleRegistry::new(dir.path().join("none"));
        let mut vcs = MockVcs::new();
        vcs.expect_remote_url().never();

        let mut out = Vec::new();
        run(&setup, &vcs, &mut out, &Logger::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn show_path_prints_castle_root() {
        let fx = Fixture::new();
        let mut out = Vec::new();
        show_path(&setup(&fx, false), Some("private"), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", fx.registry().root().join("private").display())
        );
    }

    #[test]
    fn show_path_unknown_castle_fails() {
        let fx = Fixture::new();
        let mut out = Vec::new();
        assert!(show_path(&setup(&fx, false), Some("nogit"), &mut out).is_err());
        assert!(out.is_empty());
    }
}
