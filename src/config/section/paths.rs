//! `[paths]` section configuration.
//!
//! All paths are relative to the project root.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! settings = "config.yaml"          # Site settings read by the renderer
//! content = "content"               # Per-page sources (targeted rebuilds)
//! templates = "templates"           # Shared layouts (full rebuilds)
//! styles = "assets/css"             # Stylesheet sources
//! entry = "src/main.py"             # Renderer entry point
//! venv = ".venv"                    # Dependency environment
//! requirements = "requirements.txt" # Dependency manifest
//! dotenv = ".env"                   # Environment overrides
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Project layout, relative to the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub settings: PathBuf,
    pub content: PathBuf,
    pub templates: PathBuf,
    pub styles: PathBuf,
    pub entry: PathBuf,
    pub venv: PathBuf,
    pub requirements: PathBuf,
    pub dotenv: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            settings: "config.yaml".into(),
            content: "content".into(),
            templates: "templates".into(),
            styles: "assets/css".into(),
            entry: "src/main.py".into(),
            venv: ".venv".into(),
            requirements: "requirements.txt".into(),
            dotenv: ".env".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::test_parse_config;

    #[test]
    fn test_paths_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.settings, Path::new("config.yaml"));
        assert_eq!(config.paths.styles, Path::new("assets/css"));
        assert_eq!(config.paths.entry, Path::new("src/main.py"));
    }

    #[test]
    fn test_paths_override() {
        let config = test_parse_config("[paths]\ncontent = \"pages\"\nentry = \"build.py\"");
        assert_eq!(config.paths.content, Path::new("pages"));
        assert_eq!(config.paths.entry, Path::new("build.py"));
        // untouched fields keep defaults
        assert_eq!(config.paths.templates, Path::new("templates"));
    }
}
