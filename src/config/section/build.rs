//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! out_dir = "dist"
//! publish = ["index.html", "sitemap.xml", "blog", "posts", "tags", "assets"]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Production build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory for the published site (relative to root).
    pub out_dir: PathBuf,

    /// Root-relative entries copied into `out_dir` after rendering.
    pub publish: Vec<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let publish = ["index.html", "sitemap.xml", "blog", "posts", "tags", "assets"];
        Self {
            out_dir: "dist".into(),
            publish: publish.iter().map(PathBuf::from).collect(),
        }
    }
}
