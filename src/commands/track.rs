//! Command: start tracking a file from the home directory in a castle.
use std::path::{Component, Path};

use anyhow::{Context as _, Result};

use crate::castle::SUBDIR_FILE;
use crate::castle::subdirs::append_declaration;
use crate::logging::{Log, Status};
use crate::resources::{Applicable as _, SymlinkResource};

use super::CommandSetup;

/// Move `file` into the castle's `home/` tree and link it back.
///
/// A nested file (`.config/foo/bar`) also gets its parent directory declared
/// in `.homesick_subdir`, so that later links create the parent as a real
/// directory and link only the tracked entry.
///
/// # Errors
///
/// Returns an error if the castle does not exist, `file` is outside the home
/// directory, is already a symlink, is already present in the castle, or
/// cannot be moved.
pub fn run(setup: &CommandSetup, file: &Path, name: Option<&str>, log: &dyn Log) -> Result<()> {
    let castle = setup.castle(name)?;
    let home = &setup.settings.home;

    let absolute = std::path::absolute(file)
        .with_context(|| format!("resolving {}", file.display()))?;
    let relative = absolute
        .strip_prefix(home)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .with_context(|| {
            format!(
                "{} is not inside the home directory {}",
                absolute.display(),
                home.display()
            )
        })?
        .to_path_buf();

    let meta = std::fs::symlink_metadata(&absolute)
        .with_context(|| format!("cannot track {}", absolute.display()))?;
    if meta.file_type().is_symlink() {
        anyhow::bail!("{} is already a symlink", absolute.display());
    }

    let destination = castle.home().join(&relative);
    if destination.symlink_metadata().is_ok() {
        anyhow::bail!(
            "{} is already tracked in castle '{}'",
            relative.display(),
            castle.name()
        );
    }

    let declaration = relative
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(slash_path);

    if setup.dry_run {
        log.dry_run(&format!(
            "would move {} into castle '{}'",
            absolute.display(),
            castle.name()
        ));
        if let Some(decl) = &declaration {
            log.dry_run(&format!("would declare {decl} in {SUBDIR_FILE}"));
        }
        return Ok(());
    }

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::rename(&absolute, &destination).with_context(|| {
        format!(
            "moving {} to {}",
            absolute.display(),
            destination.display()
        )
    })?;
    log.status(
        Status::Change,
        "move",
        &format!("{} to {}", absolute.display(), destination.display()),
    );

    SymlinkResource::new(destination.clone(), absolute.clone()).apply()?;
    log.status(
        Status::Change,
        "symlink",
        &format!("{} to {}", destination.display(), absolute.display()),
    );

    if let Some(decl) = declaration
        && append_declaration(&castle, &decl)?
    {
        log.status(Status::Change, "subdir", &format!("{decl} in {SUBDIR_FILE}"));
    }
    Ok(())
}

/// Render a relative path with `/` separators, as the declaration file
/// stores it on every platform.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
