//! Path normalization.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// Deleted files cannot be canonicalized, so watch events for them keep
/// the path notify reported.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative_becomes_absolute() {
        assert!(normalize_path(Path::new("relative/path/file.txt")).is_absolute());
    }

    #[test]
    fn test_normalize_path_missing_absolute_kept() {
        let path = Path::new("/definitely/missing/post.md");
        assert_eq!(normalize_path(path), path);
    }

    #[test]
    fn test_normalize_path_resolves_dots() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("content")).unwrap();
        let dotted = temp.path().join("content/../content");
        assert_eq!(normalize_path(&dotted), normalize_path(&temp.path().join("content")));
    }
}
