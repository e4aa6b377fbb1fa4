//! `[images]` section configuration.
//!
//! ```toml
//! [images]
//! enable = true
//! input = "assets/images"
//! output = "assets/images-processed"
//! max_width = 1920
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Background image preprocessing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub enable: bool,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Wider images are downscaled to this width.
    pub max_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            enable: true,
            input: "assets/images".into(),
            output: "assets/images-processed".into(),
            max_width: 1920,
        }
    }
}
