//! Symlink resource.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::fs::{ensure_parent_dir, remove_existing, same_entry};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::CastleError;

/// A symlink at `target` that should point to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The castle file or directory the link points to.
    pub source: PathBuf,
    /// Where the link lives in the target home.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Remove `target` only if it is a symlink to `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CastleError::Io`] if the link cannot be removed and
    /// [`CastleError::FatalInconsistency`] if it cannot be read.
    pub fn remove(&self) -> Result<ResourceChange, CastleError> {
        match self.current_state()? {
            ResourceState::Correct => {
                remove_existing(&self.target)?;
                Ok(ResourceChange::Applied)
            }
            ResourceState::Missing => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Incorrect { current } | ResourceState::Invalid { reason: current } => {
                Ok(ResourceChange::Skipped { reason: current })
            }
        }
    }

    /// A `target` that is not itself a symlink but resolves to `source`
    /// through a symlinked parent.
    fn reaches_source(&self) -> bool {
        std::fs::symlink_metadata(&self.target).is_ok_and(|meta| !meta.file_type().is_symlink())
            && same_entry(&self.target, &self.source)
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    /// Replace anything at `target` (recursively for a real directory) with
    /// a symlink to `source`.
    ///
    /// Refuses with [`CastleError::FatalInconsistency`] when `target` is the
    /// source itself seen through a symlinked parent directory.
    fn apply(&self) -> Result<ResourceChange, CastleError> {
        if self.reaches_source() {
            return Err(CastleError::FatalInconsistency {
                path: self.target.clone(),
                reason: format!(
                    "resolves to {} through a symlinked parent",
                    self.source.display()
                ),
            });
        }
        remove_existing(&self.target)?;
        ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)
            .map_err(|e| CastleError::io(&self.target, e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    /// Classify `target` without following it.
    ///
    /// A symlink whose target cannot be read is a
    /// [`CastleError::FatalInconsistency`].
    fn current_state(&self) -> Result<ResourceState, CastleError> {
        let meta = match std::fs::symlink_metadata(&self.target) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ResourceState::Missing),
            Err(e) => return Err(CastleError::io(&self.target, e)),
        };

        if !meta.file_type().is_symlink() {
            let current = if meta.is_dir() {
                "target is a directory"
            } else {
                "target is a regular file"
            };
            return Ok(ResourceState::Incorrect {
                current: current.to_string(),
            });
        }

        let existing =
            std::fs::read_link(&self.target).map_err(|e| CastleError::FatalInconsistency {
                path: self.target.clone(),
                reason: format!("cannot read symlink: {e}"),
            })?;
        if paths_equal(&existing, &self.source) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("points to {}", existing.display()),
            })
        }
    }
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}
