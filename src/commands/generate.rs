//! Command: create a new, empty castle.
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::logging::{Log, Status};
use crate::resources::{Applicable as _, DirectoryResource, ResourceChange};
use crate::vcs::Vcs;

use super::CommandSetup;

/// Create a castle at `path`: the directory, a git repository, an `origin`
/// remote on GitHub when `github.user` is configured, and `home/`.
///
/// Each step is skipped when its result already exists.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or git fails.
pub fn run(setup: &CommandSetup, vcs: &dyn Vcs, path: &Path, log: &dyn Log) -> Result<()> {
    let path = std::path::absolute(path)
        .with_context(|| format!("resolving {}", path.display()))?;

    if setup.dry_run {
        log.dry_run(&format!("would generate castle at {}", path.display()));
        return Ok(());
    }

    create_dir(&path, log)?;

    if path.join(".git").exists() {
        log.status(Status::Noop, "git init", "already initialized");
    } else {
        log.status(Status::Change, "git init", &path.display().to_string());
        vcs.init(&path).context("failed to git init")?;
    }

    let user = vcs.config_get(&path, "github.user")?;
    if !user.is_empty() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let url = format!("https://github.com/{user}/{name}.git");

        if vcs.remote_exists(&path, "origin")? {
            log.status(Status::Noop, "git remote", "origin already exists");
        } else {
            log.status(Status::Change, "git remote", &format!("add origin {url}"));
            vcs.remote_add(&path, "origin", &url)
                .context("failed to add remote")?;
        }
    }

    create_dir(&path.join("home"), log)
}

fn create_dir(path: &Path, log: &dyn Log) -> Result<()> {
    let dir = DirectoryResource::new(path.to_path_buf());
    match dir.apply()? {
        ResourceChange::Applied => log.status(Status::Change, "create", &dir.description()),
        _ => log.status(Status::Noop, "exist", &dir.description()),
    }
    Ok(())
}
