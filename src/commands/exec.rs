//! Command: run an arbitrary program in castle roots.
use anyhow::Result;

use crate::castle::Castle;
use crate::exec;
use crate::logging::{Log, Status};

use super::CommandSetup;

/// Run `command` in the root of castle `name`.
///
/// # Errors
///
/// Returns an error if the castle does not exist or the program cannot be
/// started. A non-zero exit of the program is only reported.
pub fn run(setup: &CommandSetup, name: &str, command: &[String], log: &dyn Log) -> Result<()> {
    let castle = setup.castle(Some(name))?;
    exec_in(&castle, command, setup.dry_run, log)
}

/// Run `command` in the root of every castle, in name order.
///
/// # Errors
///
/// Returns an error if the repository root cannot be read or the program
/// cannot be started.
pub fn run_all(setup: &CommandSetup, command: &[String], log: &dyn Log) -> Result<()> {
    for castle in setup.all_castles()? {
        exec_in(&castle, command, setup.dry_run, log)?;
    }
    Ok(())
}

fn exec_in(castle: &Castle, command: &[String], dry_run: bool, log: &dyn Log) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        anyhow::bail!("no command given");
    };
    let line = command.join(" ");

    if dry_run {
        log.dry_run(&format!("would run '{line}' in castle '{}'", castle.name()));
        return Ok(());
    }

    log.status(
        Status::Change,
        "exec",
        &format!("{line} in castle '{}'", castle.name()),
    );
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let status = exec::run_interactive(castle.path(), program, &args)?;
    if !status.success() {
        log.warn(&format!("'{line}' exited with {status}"));
    }
    Ok(())
}
