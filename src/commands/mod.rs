//! Subcommand handlers and the setup they share.
pub mod clone;
pub mod completions;
pub mod exec;
pub mod generate;
pub mod git;
pub mod link;
pub mod list;
pub mod open;
pub mod track;
pub mod version;

use std::io::Write;

use anyhow::Result;

use crate::castle::{Castle, CastleRegistry};
use crate::cli::{Command, GlobalOpts};
use crate::config::{Environment, Overrides, Settings};
use crate::logging::Log;
use crate::vcs::Vcs;

/// Shared state produced by the common command setup sequence.
///
/// Resolves settings from flags, environment and the config file, and opens
/// the castle registry, so that each command does not repeat the
/// boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved home, repository root, default castle, editor and shell.
    pub settings: Settings,
    /// Castles below `settings.repos`.
    pub registry: CastleRegistry,
    /// Report changes instead of making them.
    pub dry_run: bool,
}

impl CommandSetup {
    /// Resolve settings and open the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// config file fails to parse.
    pub fn init(global: &GlobalOpts, env: &Environment, log: &dyn Log) -> Result<Self> {
        let overrides = Overrides {
            home: global.home.clone(),
            repos: global.repos.clone(),
        };
        let settings = Settings::resolve(&overrides, env)?;
        log.debug(&format!("home: {}", settings.home.display()));
        log.debug(&format!("repos: {}", settings.repos.display()));
        Ok(Self::new(settings, global.dry_run))
    }

    /// Build a setup from already resolved settings.
    #[must_use]
    pub fn new(settings: Settings, dry_run: bool) -> Self {
        Self {
            registry: CastleRegistry::new(settings.repos.clone()),
            settings,
            dry_run,
        }
    }

    /// Resolve `name`, or the default castle when it is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the castle does not exist.
    pub fn castle(&self, name: Option<&str>) -> Result<Castle> {
        Ok(self.registry.resolve(self.settings.castle_name(name))?)
    }

    /// Every castle under the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository root cannot be read.
    pub fn all_castles(&self) -> Result<Vec<Castle>> {
        Ok(self.registry.list_all()?)
    }
}

/// Run a parsed subcommand.
///
/// `version` and `completions` need no setup and are handled by the binary
/// before settings are resolved; they are accepted here too.
///
/// # Errors
///
/// Returns whatever error the selected command reports.
pub fn dispatch(
    command: &Command,
    setup: &CommandSetup,
    vcs: &dyn Vcs,
    log: &dyn Log,
) -> Result<()> {
    let stdout = std::io::stdout();
    match command {
        Command::Clone(opts) => clone::run(setup, vcs, opts, log),
        Command::Commit(opts) => git::commit(setup, vcs, opts, log),
        Command::Diff(opts) => git::diff(setup, vcs, opts.castle.as_deref(), log),
        Command::Exec(opts) => exec::run(setup, &opts.castle, &opts.command, log),
        Command::ExecAll(opts) => exec::run_all(setup, &opts.command, log),
        Command::Generate(opts) => generate::run(setup, vcs, &opts.path, log),
        Command::Link(opts) => link::run(setup, opts, log),
        Command::List => list::run(setup, vcs, &mut stdout.lock(), log),
        Command::Open(opts) => open::editor(setup, opts.castle.as_deref(), log),
        Command::Pull(opts) => git::pull(setup, vcs, opts, log),
        Command::Push(opts) => git::push(setup, vcs, opts.castle.as_deref(), log),
        Command::Shell(opts) => open::shell(setup, opts.castle.as_deref(), log),
        Command::ShowPath(opts) => {
            list::show_path(setup, opts.castle.as_deref(), &mut stdout.lock())
        }
        Command::Status(opts) => git::status(setup, vcs, opts.castle.as_deref(), log),
        Command::Track(opts) => track::run(setup, &opts.file, opts.castle.as_deref(), log),
        Command::Unlink(opts) => link::unlink(setup, opts.castle.as_deref(), log),
        Command::Version => {
            writeln!(stdout.lock(), "{}", version::line())?;
            Ok(())
        }
        Command::Completions(opts) => {
            completions::run(opts.shell, &mut stdout.lock());
            Ok(())
        }
    }
}

/// Fixtures shared by the command tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::CommandSetup;
    use crate::castle::testing::Fixture;
    use crate::config::{DEFAULT_CASTLE, Settings};

    /// A setup whose home and repository root live inside `fx`.
    pub(crate) fn setup(fx: &Fixture, dry_run: bool) -> CommandSetup {
        CommandSetup::new(
            Settings {
                home: fx.target_home(),
                repos: fx.registry().root().to_path_buf(),
                default_castle: DEFAULT_CASTLE.to_string(),
                editor: None,
                shell: None,
            },
            dry_run,
        )
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::testing::setup;
    use super::*;
    use crate::castle::testing::Fixture;
    use crate::error::CastleError;
    use crate::logging::Logger;

    #[test]
    fn castle_defaults_to_configured_name() {
        let fx = Fixture::new();
        let setup = setup(&fx, false);
        assert_eq!(setup.castle(None).unwrap().name(), "dotfiles");
        assert_eq!(setup.castle(Some("private")).unwrap().name(), "private");
    }

    #[test]
    fn unknown_castle_is_not_found() {
        let fx = Fixture::new();
        let err = setup(&fx, false).castle(Some("nogit")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CastleError>(),
            Some(CastleError::NotFound { .. })
        ));
    }

    #[test]
    fn init_applies_global_overrides() {
        let fx = Fixture::new();
        let global = GlobalOpts {
            dry_run: true,
            home: Some(fx.target_home()),
            repos: Some(fx.registry().root().to_path_buf()),
        };
        let env = Environment {
            xdg_config_home: Some(fx.tmp.path().join("xdg")),
            ..Environment::default()
        };
        let setup = CommandSetup::init(&global, &env, &Logger::default()).unwrap();
        assert!(setup.dry_run);
        assert_eq!(setup.registry.root(), fx.registry().root());
        let names: Vec<String> = setup
            .all_castles()
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, ["dotfiles", "private"]);
    }
}
