use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walk `root` depth-first and return every regular file whose extension
/// (with its leading dot, compared case-sensitively) is in `extensions`.
///
/// Entries that cannot be listed abort the walk.
pub fn select_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;

        // Links are not descended into, but a link to a regular file counts as one
        let is_file = if entry.path_is_symlink() {
            std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file())
        } else {
            entry.file_type().is_file()
        };
        if !is_file {
            continue;
        }

        let path = entry.path();
        if !has_allowed_extension(path, extensions) {
            continue;
        }

        tracing::info!("adding {} to indexed docs", path.display());
        files.push(entry.into_path());
    }

    Ok(files)
}

/// True when the file extension of `path`, prefixed with a dot, is one of `extensions`.
pub fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.strip_prefix('.') == Some(ext))
}
