//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! ignore = ["**/.venv/**", "**/dist/**"]
//! ```
//!
//! Patterns are matched against root-relative paths. The default list skips
//! files the renderer itself writes so that a rebuild never triggers another.

use serde::{Deserialize, Serialize};

/// File watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Glob patterns for paths that never produce watch events.
    pub ignore: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        let ignore = [
            "**/assets/css/generated.daisyui.css",
            "**/assets/css/generated.fonts.css",
            "**/assets/css/syntax.css",
            "**/.venv/**",
            "**/dist/**",
            "**/index.html",
            "**/sitemap.xml",
            "**/blog/**",
            "**/posts/**",
            "**/tags/**",
            "**/.git/**",
            "**/node_modules/**",
            "**/__pycache__/**",
        ];
        Self {
            ignore: ignore.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}
