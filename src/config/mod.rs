//! Runtime settings: the optional config file, environment variables and
//! command-line overrides, merged into one [`Settings`] value.
//!
//! Precedence for the repository root is `--repos`, then `HOMESICK_REPOS`,
//! then `repos` from the config file, then `<home>/.homesick/repos`.
pub mod toml_loader;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Castle used when a command's castle argument is omitted.
pub const DEFAULT_CASTLE: &str = "dotfiles";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Repository root; a leading `~/` is expanded against the target home.
    pub repos: Option<String>,
    /// Castle used when none is named on the command line.
    pub default_castle: Option<String>,
    /// Editor for `open`; wins over `$EDITOR`.
    pub editor: Option<String>,
}

/// Snapshot of the environment variables that influence settings.
///
/// Taken once in `main` so that resolution is a pure function of its inputs.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    /// `HOME`, or `USERPROFILE` when `HOME` is unset.
    pub home: Option<PathBuf>,
    /// `HOMESICK_REPOS`.
    pub repos: Option<PathBuf>,
    /// `XDG_CONFIG_HOME`.
    pub xdg_config_home: Option<PathBuf>,
    /// `EDITOR`.
    pub editor: Option<String>,
    /// `SHELL`.
    pub shell: Option<String>,
}

impl Environment {
    /// Read the current process environment. Empty values count as unset.
    #[must_use]
    pub fn from_process() -> Self {
        let var = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty());
        let string = |key: &str| var(key).and_then(|v| v.into_string().ok());
        Self {
            home: var("HOME").or_else(|| var("USERPROFILE")).map(PathBuf::from),
            repos: var("HOMESICK_REPOS").map(PathBuf::from),
            xdg_config_home: var("XDG_CONFIG_HOME").map(PathBuf::from),
            editor: string("EDITOR"),
            shell: string("SHELL"),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `--home`
    pub home: Option<PathBuf>,
    /// `--repos`
    pub repos: Option<PathBuf>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target home directory that castles are linked into.
    pub home: PathBuf,
    /// Directory holding one subdirectory per castle.
    pub repos: PathBuf,
    /// Castle used when a command omits its castle argument.
    pub default_castle: String,
    /// Editor command for `open`, if any.
    pub editor: Option<String>,
    /// Shell for `shell`, if any.
    pub shell: Option<String>,
}

impl Settings {
    /// Resolve settings from the command line, the environment and the
    /// config file found via [`config_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined or the config
    /// file exists but cannot be read or parsed.
    pub fn resolve(overrides: &Overrides, env: &Environment) -> Result<Self> {
        let home = overrides
            .home
            .clone()
            .or_else(|| env.home.clone())
            .context("cannot determine home directory. Use --home or set HOME")?;
        let home = std::path::absolute(&home)
            .with_context(|| format!("resolving home directory {}", home.display()))?;

        let file: FileConfig = toml_loader::load_config(&config_path(&home, env))?;
        Ok(Self::merge(home, file, overrides, env))
    }

    /// Apply precedence rules to already-loaded inputs.
    fn merge(home: PathBuf, file: FileConfig, overrides: &Overrides, env: &Environment) -> Self {
        let repos = overrides
            .repos
            .clone()
            .or_else(|| env.repos.clone())
            .or_else(|| file.repos.as_deref().map(|raw| expand_home(raw, &home)))
            .unwrap_or_else(|| home.join(".homesick").join("repos"));

        Self {
            repos,
            default_castle: file
                .default_castle
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_CASTLE.to_string()),
            editor: file.editor.or_else(|| env.editor.clone()),
            shell: env.shell.clone(),
            home,
        }
    }

    /// Return `name`, or the default castle when it is `None`.
    #[must_use]
    pub fn castle_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        name.unwrap_or(&self.default_castle)
    }
}

/// Location of `config.toml`: `$XDG_CONFIG_HOME/homesick/config.toml`, or
/// `<home>/.config/homesick/config.toml`.
#[must_use]
pub fn config_path(home: &Path, env: &Environment) -> PathBuf {
    env.xdg_config_home
        .clone()
        .unwrap_or_else(|| home.join(".config"))
        .join("homesick")
        .join("config.toml")
}

/// Expand a leading `~` or `~/` against `home`.
fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    raw.strip_prefix("~/")
        .map_or_else(|| PathBuf::from(raw), |rest| home.join(rest))
}
