//! Command: clone a repository as a new castle.
use anyhow::{Context as _, Result};

use crate::castle::is_plain_name;
use crate::cli::CloneOpts;
use crate::logging::{Log, Status};
use crate::vcs::Vcs;

use super::CommandSetup;

/// Expand `user/repo` into a GitHub HTTPS URL. Other URIs pass through.
#[must_use]
pub fn expand_uri(uri: &str) -> String {
    if is_github_shorthand(uri) {
        format!("https://github.com/{uri}.git")
    } else {
        uri.to_string()
    }
}

/// Castle name derived from a repository URI: the last path segment without
/// a trailing `.git`.
#[must_use]
pub fn castle_name_for(uri: &str) -> String {
    let last = uri
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default();
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

fn is_github_shorthand(uri: &str) -> bool {
    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    };
    matches!(uri.split_once('/'), Some((user, repo)) if valid(user) && valid(repo))
}

/// Run the clone command.
///
/// An existing destination is reported and left alone.
///
/// # Errors
///
/// Returns an error if no castle name can be derived, the repository root
/// cannot be created, or the clone fails.
pub fn run(setup: &CommandSetup, vcs: &dyn Vcs, opts: &CloneOpts, log: &dyn Log) -> Result<()> {
    let uri = expand_uri(&opts.uri);
    let name = opts
        .name
        .clone()
        .unwrap_or_else(|| castle_name_for(&uri));
    if !is_plain_name(&name) {
        anyhow::bail!("invalid castle name '{name}' for {uri}");
    }

    let root = setup.registry.root();
    let dest = root.join(&name);
    if dest.symlink_metadata().is_ok() {
        log.status(Status::Noop, "exist", &dest.display().to_string());
        return Ok(());
    }

    if setup.dry_run {
        log.dry_run(&format!("would clone {uri} to {}", dest.display()));
        return Ok(());
    }

    std::fs::create_dir_all(root)
        .with_context(|| format!("creating repository root {}", root.display()))?;
    log.status(
        Status::Change,
        "git clone",
        &format!("{uri} to {}", dest.display()),
    );
    vcs.clone_repository(&uri, &dest)
        .with_context(|| format!("failed to clone '{uri}'"))?;
    Ok(())
}
