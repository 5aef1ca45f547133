//! Idempotent resource primitives (check + apply pattern).
//!
//! The link applier drives two kinds of resource: a [`SymlinkResource`] per
//! linkable and a [`DirectoryResource`] per declared subdirectory. Both
//! report their state without side effects so that dry runs and conflict
//! detection share the same code path as real runs.
pub mod directory;
pub mod fs;
pub mod symlink;

pub use directory::DirectoryResource;
pub use symlink::SymlinkResource;

use crate::error::CastleError;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Bring the resource to its desired state, replacing whatever is there.
    ///
    /// # Errors
    ///
    /// Returns [`CastleError::Io`] if the filesystem change fails.
    fn apply(&self) -> Result<ResourceChange, CastleError>;
}

/// State of a resource on disk.
///
/// # Examples
///
/// ```
/// use homesick::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "points to /elsewhere".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the resource's path.
    Missing,
    /// The resource exists and matches the desired state.
    Correct,
    /// Something else occupies the path; applying would replace it.
    Incorrect {
        /// What currently occupies the path.
        current: String,
    },
    /// The path is occupied in a way that must not be replaced.
    Invalid {
        /// Why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying or removing a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The filesystem was changed.
    Applied,
    /// Already in the desired state; nothing was done.
    AlreadyCorrect,
    /// Left alone.
    Skipped {
        /// Why nothing was done.
        reason: String,
    },
}

/// A resource that can inspect its own state.
pub trait Resource: Applicable {
    /// Check the current state of the resource without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`CastleError::Io`] if the path cannot be inspected and
    /// [`CastleError::FatalInconsistency`] if what is there cannot be
    /// interpreted (for example an unreadable symlink).
    fn current_state(&self) -> Result<ResourceState, CastleError>;
}
