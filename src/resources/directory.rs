//! Directory resource: a real directory that must exist at a path.
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::CastleError;

/// A directory that should exist at `path`.
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    /// Directory path.
    pub path: PathBuf,
}

impl DirectoryResource {
    /// Create a new directory resource.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Applicable for DirectoryResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange, CastleError> {
        match self.current_state()? {
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Invalid { reason } => Err(CastleError::FatalInconsistency {
                path: self.path.clone(),
                reason,
            }),
            ResourceState::Missing | ResourceState::Incorrect { .. } => {
                std::fs::create_dir_all(&self.path)
                    .map_err(|e| CastleError::io(&self.path, e))?;
                Ok(ResourceChange::Applied)
            }
        }
    }
}

impl Resource for DirectoryResource {
    /// Inspect `path` without following symlinks: a symlink or file there is
    /// [`ResourceState::Invalid`].
    fn current_state(&self) -> Result<ResourceState, CastleError> {
        match std::fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Ok(ResourceState::Correct),
            Ok(_) => Ok(ResourceState::Invalid {
                reason: "exists but is not a directory".to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ResourceState::Missing),
            Err(e) => Err(CastleError::io(&self.path, e)),
        }
    }
}
