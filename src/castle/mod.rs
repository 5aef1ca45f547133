//! Castles: git repositories of dotfiles under a repository root.
//!
//! A castle is a directory `<root>/<name>` that contains a `.git` entry. Its
//! `home/` subtree mirrors the target home directory and its optional
//! `.homesick_subdir` file declares directories whose entries are linked one
//! by one (see [`subdirs`] and [`linkables`]).
pub mod linkables;
pub mod subdirs;

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::CastleError;

/// Name of the per-castle subdirectory declaration file.
pub const SUBDIR_FILE: &str = ".homesick_subdir";

/// A resolved castle. Only [`CastleRegistry::resolve`] creates these, so a
/// `Castle` always names a directory that had a `.git` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Castle {
    name: String,
    path: PathBuf,
}

impl Castle {
    /// Directory name under the repository root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the castle root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `home/` tree whose contents are linked into the target home.
    #[must_use]
    pub fn home(&self) -> PathBuf {
        self.path.join("home")
    }

    /// Path of the `.homesick_subdir` declaration file.
    #[must_use]
    pub fn subdir_file(&self) -> PathBuf {
        self.path.join(SUBDIR_FILE)
    }
}

/// Enumerates and resolves castles below a repository root.
#[derive(Debug, Clone)]
pub struct CastleRegistry {
    root: PathBuf,
}

impl CastleRegistry {
    /// Create a registry for `root`. The directory need not exist.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to a castle.
    ///
    /// # Errors
    ///
    /// Returns [`CastleError::NotFound`] if `name` is empty, is not a single
    /// plain path component, or `<root>/<name>/.git` does not exist, and
    /// [`CastleError::Io`] if the existence check fails for another reason.
    pub fn resolve(&self, name: &str) -> Result<Castle, CastleError> {
        if !is_plain_name(name) {
            return Err(CastleError::not_found(name));
        }

        let path = self.root.join(name);
        let marker = path.join(".git");
        match std::fs::metadata(&marker) {
            Ok(_) => {}
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Err(CastleError::not_found(name));
            }
            Err(e) => return Err(CastleError::io(marker, e)),
        }

        let path = std::path::absolute(&path).map_err(|e| CastleError::io(&path, e))?;
        Ok(Castle {
            name: name.to_string(),
            path,
        })
    }

    /// Every valid castle under the root, ordered by name.
    ///
    /// Directories that do not resolve (no `.git`, non-UTF-8 names) are
    /// skipped silently. A missing root yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`CastleError::Io`] if the root exists but cannot be read.
    pub fn list_all(&self) -> Result<Vec<Castle>, CastleError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CastleError::io(&self.root, e)),
        };

        let mut castles = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CastleError::io(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if let Ok(castle) = self.resolve(&name) {
                castles.push(castle);
            }
        }
        castles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(castles)
    }
}

/// `true` when `name` is exactly one normal path component.
pub(crate) fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if *c == *name
    )
}
