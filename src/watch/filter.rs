//! Paths the watcher never reports.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error;

/// Check if path is a temp/backup file (editor artifacts)
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
        || name == "4913"
}

/// Compiled `[watch].ignore` patterns, matched against root-relative paths.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl IgnoreSet {
    /// Invalid patterns are reported and skipped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    error!("watch"; "invalid ignore pattern `{}`: {}", p.as_ref(), e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// `relative` must be relative to the project root.
    pub fn is_ignored(&self, relative: &Path) -> bool {
        // `**/x` should also match `x` at the root
        let anchored = Path::new("/").join(relative);
        self.patterns.iter().any(|p| {
            p.matches_path_with(relative, MATCH_OPTIONS)
                || p.matches_path_with(&anchored, MATCH_OPTIONS)
        })
    }
}
