//! URL to filesystem path resolution.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use percent_encoding::percent_decode_str;

use crate::error;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Files under the root that are never served (`[serve].deny`).
///
/// Hidden segments (`.env`, `.venv/`, `.git/`) are refused regardless of
/// the configured patterns.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    patterns: Vec<Pattern>,
}

impl DenyList {
    /// Invalid patterns are reported and skipped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    error!("serve"; "invalid deny pattern `{}`: {}", p.as_ref(), e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// `relative` must be relative to the served root.
    pub fn is_denied(&self, relative: &Path) -> bool {
        let segment_denied = relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                name.starts_with('.')
                    || self
                        .patterns
                        .iter()
                        .any(|p| p.matches_with(&name, MATCH_OPTIONS))
            }
            _ => false,
        });

        segment_denied
            || self
                .patterns
                .iter()
                .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
    }
}

/// Resolve URL to filesystem path, handling index.html for directories.
///
/// Returns `None` for anything outside `serve_root`, including symlinks
/// that point elsewhere, and for anything `deny` refuses.
pub fn resolve_path(url: &str, serve_root: &Path, deny: &DenyList) -> Option<PathBuf> {
    let clean = normalize_url(url);

    // Reject paths with suspicious patterns early
    if clean.split('/').any(|segment| segment == "..") || deny.is_denied(Path::new(&clean)) {
        return None;
    }

    let root = serve_root.canonicalize().ok()?;
    let local = serve_root.join(&clean);

    [local.clone(), local.join("index.html"), serve_root.join(format!("{clean}.html"))]
        .into_iter()
        .filter_map(|candidate| candidate.canonicalize().ok())
        // Canonical form exposes symlinks that escape the root or hide a denied target
        .find(|candidate| {
            candidate
                .strip_prefix(&root)
                .is_ok_and(|relative| !deny.is_denied(relative))
                && candidate.is_file()
        })
}

/// Normalize URL: decode, strip query string and fragment, trim slashes
fn normalize_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    decoded.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("index.html"), "home").unwrap();
        fs::create_dir_all(root.join("blog/my post")).unwrap();
        fs::write(root.join("blog/my post/index.html"), "post").unwrap();
        fs::write(root.join("about.html"), "about").unwrap();
        temp
    }

    fn resolve(url: &str, root: &Path) -> Option<PathBuf> {
        resolve_path(url, root, &DenyList::default())
    }

    fn default_deny() -> DenyList {
        DenyList::new(&crate::config::ServeConfig::default().deny)
    }

    #[test]
    fn test_root_and_directory_index() {
        let temp = site();
        let root = temp.path();
        assert!(resolve("/", root).unwrap().ends_with("index.html"));
        assert!(resolve("/blog/my%20post/", root).unwrap().ends_with("my post/index.html"));
    }

    #[test]
    fn test_secrets_under_root_not_served() {
        let temp = site();
        let root = temp.path();
        fs::write(root.join(".env"), "PY_EXECUTABLE=/opt/py\nTOKEN=secret").unwrap();
        fs::write(root.join(".env.local"), "TOKEN=secret").unwrap();
        fs::write(root.join("config.yaml"), "runtime:\n  python: /opt/py\n").unwrap();
        fs::write(root.join("conductor.toml"), "[serve]\nport = 5173\n").unwrap();
        fs::create_dir_all(root.join(".venv/bin")).unwrap();
        fs::write(root.join(".venv/bin/activate"), "export").unwrap();
        fs::create_dir_all(root.join("certs")).unwrap();
        fs::write(root.join("certs/dev.pem"), "key").unwrap();
        let deny = default_deny();

        for url in [
            "/.env",
            "/.env.local",
            "/%2eenv",
            "/config.yaml",
            "/conductor.toml",
            "/.venv/bin/activate",
            "/certs/dev.pem",
        ] {
            assert_eq!(resolve_path(url, root, &deny), None, "{url} was served");
        }
        assert!(resolve_path("/", root, &deny).unwrap().ends_with("index.html"));
        assert!(resolve_path("/about", root, &deny).unwrap().ends_with("about.html"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_denied_file_not_served() {
        let temp = site();
        let root = temp.path();
        fs::write(root.join(".env"), "TOKEN=secret").unwrap();
        std::os::unix::fs::symlink(root.join(".env"), root.join("env.txt")).unwrap();

        assert_eq!(resolve_path("/env.txt", root, &default_deny()), None);
    }

    #[test]
    fn test_deny_list_patterns() {
        let deny = DenyList::new(&["secrets/**", "*.key", "[bad"]);
        assert!(deny.is_denied(Path::new("secrets/api/token.txt")));
        assert!(deny.is_denied(Path::new("nested/dir/server.key")));
        assert!(deny.is_denied(Path::new("blog/.hidden/index.html")));
        assert!(!deny.is_denied(Path::new("blog/secrets.html")));
        assert!(!deny.is_denied(Path::new("")));
    }

    #[test]
    fn test_query_and_extensionless_html() {
        let temp = site();
        assert!(resolve("/about?ref=nav", temp.path()).unwrap().ends_with("about.html"));
    }

    #[test]
    fn test_traversal_rejected() {
        let temp = site();
        assert!(resolve("/../etc/passwd", temp.path()).is_none());
        assert!(resolve("/blog/%2e%2e/%2e%2e/secret", temp.path()).is_none());
    }

    #[test]
    fn test_missing_file() {
        let temp = site();
        assert!(resolve("/nope.css", temp.path()).is_none());
    }
}
