//! Interactive commands: open the editor or a shell in a castle root.
use anyhow::{Context as _, Result};

use crate::castle::Castle;
use crate::exec;
use crate::logging::{Log, Status};

use super::CommandSetup;

/// Open the configured editor on the castle root.
///
/// The editor comes from the config file or `$EDITOR` and may carry its own
/// arguments (`code --wait`).
///
/// # Errors
///
/// Returns an error if no editor is configured, the castle does not exist,
/// or the editor fails.
pub fn editor(setup: &CommandSetup, name: Option<&str>, log: &dyn Log) -> Result<()> {
    let editor = setup
        .settings
        .editor
        .as_deref()
        .context("no editor configured: set $EDITOR or `editor` in the config file")?;
    let castle = setup.castle(name)?;
    let root = castle.path().to_string_lossy();

    let mut words = editor.split_whitespace();
    let program = words.next().context("the configured editor is blank")?;
    let mut args: Vec<&str> = words.collect();
    args.push(&root);

    log.status(
        Status::Change,
        program,
        &format!("opening castle '{}'", castle.name()),
    );
    interactive(setup, &castle, program, &args, log)
}

/// Start `$SHELL` in the castle root.
///
/// # Errors
///
/// Returns an error if `$SHELL` is unset, the castle does not exist, or the
/// shell cannot be started.
pub fn shell(setup: &CommandSetup, name: Option<&str>, log: &dyn Log) -> Result<()> {
    let shell = setup
        .settings
        .shell
        .as_deref()
        .context("the $SHELL environment variable must be set to use this command")?;
    let castle = setup.castle(name)?;

    log.status(
        Status::Change,
        "shell",
        &format!(
            "opening a new shell in {}; exit it to return",
            castle.path().display()
        ),
    );
    interactive(setup, &castle, shell, &[], log)
}

fn interactive(
    setup: &CommandSetup,
    castle: &Castle,
    program: &str,
    args: &[&str],
    log: &dyn Log,
) -> Result<()> {
    if setup.dry_run {
        log.dry_run(&format!("would run {program} in {}", castle.path().display()));
        return Ok(());
    }
    let status = exec::run_interactive(castle.path(), program, args)?;
    if !status.success() {
        anyhow::bail!("{program} exited with {status}");
    }
    Ok(())
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::castle::testing::Fixture;
    use crate::commands::testing::setup;
    use crate::logging::Logger;

    #[test]
    fn editor_is_required() {
        let fx = Fixture::new();
        let err = editor(&setup(&fx, false), None, &Logger::default()).unwrap_err();
        assert!(err.to_string().contains("no editor configured"));
    }

    #[test]
    fn editor_receives_castle_root() {
        let fx = Fixture::new();
        let mut setup = setup(&fx, false);
        // `test -d <root>` succeeds only when the root is passed last.
        setup.settings.editor = Some("test -d".to_string());
        editor(&setup, Some("private"), &Logger::default()).unwrap();
    }

    #[test]
    fn failing_editor_is_an_error() {
        let fx = Fixture::new();
        let mut setup = setup(&fx, false);
        setup.settings.editor = Some("false --ignored".to_string());
        let err = editor(&setup, None, &Logger::default()).unwrap_err();
        assert!(err.to_string().starts_with("false exited with"));
    }

    #[test]
    fn shell_requires_shell_variable() {
        let fx = Fixture::new();
        assert!(shell(&setup(&fx, false), None, &Logger::default()).is_err());
    }

    #[test]
    fn shell_runs_in_castle() {
        let fx = Fixture::new();
        let mut setup = setup(&fx, false);
        setup.settings.shell = Some("true".to_string());
        shell(&setup, Some("private"), &Logger::default()).unwrap();
    }

    #[test]
    fn dry_run_starts_nothing() {
        let fx = Fixture::new();
        let mut setup = setup(&fx, true);
        setup.settings.editor = Some("homesick-no-such-editor".to_string());
        editor(&setup, None, &Logger::default()).unwrap();
    }
}
