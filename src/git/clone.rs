use anyhow::{Context, Result};
use std::path::Path;

/// What `mirror_repo` did with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// Destination already existed and was left untouched
    AlreadyPresent,
    Cloned,
}

/// Ensure a local working copy of `url` exists at `target`.
///
/// Only the existence of `target` is checked: a partial or unrelated
/// directory at that path is treated as an existing mirror.
pub fn mirror_repo(url: &str, target: &Path) -> Result<MirrorOutcome> {
    if target.exists() {
        tracing::info!("Repo already cloned at {}", target.display());
        return Ok(MirrorOutcome::AlreadyPresent);
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tracing::info!("Cloning {} into {}", url, target.display());
    git2::Repository::clone(url, target).with_context(|| format!("Failed to clone {url}"))?;
    tracing::info!("Clone complete: {}", target.display());
    Ok(MirrorOutcome::Cloned)
}
