//! `homesick` binary entry point.
use std::io::Write as _;

use anyhow::Result;
use clap::Parser;

use homesick::cli::{Cli, Command};
use homesick::commands::{self, CommandSetup};
use homesick::config::Environment;
use homesick::logging::{self, Logger};
use homesick::vcs::GitCli;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match &args.command {
        Command::Version => {
            writeln!(std::io::stdout().lock(), "{}", commands::version::line())?;
            return Ok(());
        }
        Command::Completions(opts) => {
            commands::completions::run(opts.shell, &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = Logger::new(name);
    if let Some(path) = log.log_path() {
        log.debug(&format!("log file: {}", path.display()));
    }

    let setup = CommandSetup::init(&args.global, &Environment::from_process(), &log)?;
    commands::dispatch(&args.command, &setup, &GitCli, &log)
}
