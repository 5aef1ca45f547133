//! File-system helpers shared by resources.
use std::io::ErrorKind;
use std::path::Path;

use crate::error::CastleError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns [`CastleError::Io`] if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), CastleError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| CastleError::io(parent, e))?;
    }
    Ok(())
}

/// Remove whatever is at `path`: a file, a symlink (without following it,
/// dangling ones included) or a whole directory tree.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns [`CastleError::Io`] if the entry exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<(), CastleError> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(CastleError::io(path, e)),
    };

    let result = if meta.file_type().is_symlink() {
        remove_symlink(path, &meta)
    } else if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| CastleError::io(path, e))
}

/// `true` when `path`, with every symlink on the way resolved, lies inside
/// `root`.
///
/// A `path` that does not exist yet is judged by its nearest existing
/// ancestor, since creating it would create it wherever that ancestor
/// resolves to. A missing `root` contains nothing.
///
/// # Errors
///
/// Returns [`CastleError::Io`] if resolving fails for a reason other than a
/// missing entry.
pub fn resolves_within(path: &Path, root: &Path) -> Result<bool, CastleError> {
    let root = match std::fs::canonicalize(root) {
        Ok(root) => root,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(CastleError::io(root, e)),
    };
    for ancestor in path.ancestors().filter(|a| !a.as_os_str().is_empty()) {
        match std::fs::canonicalize(ancestor) {
            Ok(resolved) => return Ok(resolved.starts_with(&root)),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CastleError::io(ancestor, e)),
        }
    }
    Ok(false)
}

/// `true` when `a` and `b` both exist and resolve to the same entry.
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Remove a symlink. Directory symlinks on Windows need `remove_dir`.
fn remove_symlink(path: &Path, meta: &std::fs::Metadata) -> std::io::Result<()> {
    if is_dir_like(meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// `symlink_metadata().is_dir()` is `false` for directory symlinks on
/// Windows, so check the raw `FILE_ATTRIBUTE_DIRECTORY` bit there.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        let _ = meta;
        false
    }
}
