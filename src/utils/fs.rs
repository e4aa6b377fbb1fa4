//! Filesystem helpers for the publish step.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use jwalk::WalkDir;

/// Remove `dir` if present, then create it empty.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

/// Copy a file or a directory tree to `dst`. Returns the number of files copied.
pub fn copy_recursive(src: &Path, dst: &Path) -> Result<usize> {
    if src.is_file() {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst).with_context(|| format!("Failed to copy {}", src.display()))?;
        return Ok(1);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).sort(true).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        let relative = path.strip_prefix(src).unwrap_or(&path);
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(&path, &target).with_context(|| format!("Failed to copy {}", path.display()))?;
            copied += 1;
        }
    }
    Ok(copied)
}
