//! Discovery of the paths a castle links into the target home.
//!
//! Top-level entries of `home/` are linked as a whole, except those that
//! contain a declared subdirectory; declared subdirectories have their own
//! immediate entries linked instead.
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::Castle;
use super::subdirs::read_declarations;
use crate::error::CastleError;

/// `true` iff `path` equals a non-empty leading prefix of
/// `candidate_ancestor`, compared component by component.
///
/// A path is its own ancestor: `path_is_ancestor_of(a, a)` holds for any
/// non-empty `a`.
///
/// ```
/// use std::path::Path;
/// use homesick::castle::linkables::path_is_ancestor_of;
///
/// assert!(path_is_ancestor_of(Path::new(".local/share"), Path::new(".local")));
/// assert!(!path_is_ancestor_of(Path::new(".local/share"), Path::new(".bashrc")));
/// ```
#[must_use]
pub fn path_is_ancestor_of(candidate_ancestor: &Path, path: &Path) -> bool {
    candidate_ancestor
        .ancestors()
        .filter(|prefix| !prefix.as_os_str().is_empty())
        .any(|prefix| prefix == path)
}

/// List the immediate entries of `directory`, relative to `base`, ordered by
/// file name.
///
/// An entry is dropped when it is an ancestor of (or equal to) any of the
/// `excluded` paths. A missing `directory` yields nothing.
///
/// # Errors
///
/// Returns [`CastleError::Io`] if `directory` exists but cannot be listed,
/// and [`CastleError::FatalInconsistency`] if it is not below `base`.
pub fn scan(
    directory: &Path,
    base: &Path,
    excluded: &[String],
) -> Result<Vec<PathBuf>, CastleError> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CastleError::io(directory, e)),
    };
    let mut names = entries
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<Vec<OsString>, _>>()
        .map_err(|e| CastleError::io(directory, e))?;
    names.sort();

    let mut found = Vec::with_capacity(names.len());
    for name in names {
        let full = directory.join(&name);
        let relative = full
            .strip_prefix(base)
            .map_err(|_| CastleError::FatalInconsistency {
                path: full.clone(),
                reason: format!("not below {}", base.display()),
            })?;
        if excluded
            .iter()
            .any(|ex| path_is_ancestor_of(Path::new(ex), relative))
        {
            continue;
        }
        found.push(relative.to_path_buf());
    }
    Ok(found)
}

/// Compute every linkable path of `castle`, relative to its `home/`.
///
/// Top-level entries come first, then the entries of each declared
/// subdirectory in declaration order. Blank declarations are ignored.
///
/// # Errors
///
/// Propagates errors from [`read_declarations`] and [`scan`].
pub fn compute_linkables(castle: &Castle) -> Result<Vec<PathBuf>, CastleError> {
    let declarations = read_declarations(castle)?;
    let home = castle.home();

    let mut linkables = scan(&home, &home, &declarations)?;
    for subdir in declarations.iter().filter(|d| !d.is_empty()) {
        linkables.extend(scan(&home.join(subdir), &home, &declarations)?);
    }
    Ok(linkables)
}
