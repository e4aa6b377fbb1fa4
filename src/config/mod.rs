//! Configuration management.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/     # `conductor.toml` section definitions
//! ├── settings     # Site settings (`config.yaml`), never fatal
//! ├── env          # `.env` loading
//! ├── error        # ConfigError
//! └── mod.rs       # ConductorConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                       |
//! |-------------|-----------------------------------------------|
//! | `[paths]`   | Project layout, renderer entry, environment   |
//! | `[runtime]` | Override variable and default runtime command |
//! | `[serve]`   | Development server (port, interface, watch)   |
//! | `[watch]`   | Ignore patterns for the file watcher          |
//! | `[build]`   | Production output directory and publish list  |
//! | `[images]`  | Background image preprocessing                |

mod env;
mod error;
pub mod section;
mod settings;

pub use env::load_dotenv;
pub use error::ConfigError;
pub use section::{BuildConfig, ImagesConfig, PathsConfig, RuntimeConfig, ServeConfig, WatchConfig};
pub use settings::Settings;

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `conductor.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConductorConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub images: ImagesConfig,
}

impl ConductorConfig {
    /// Load configuration from CLI arguments.
    ///
    /// The config file is optional: without one every section uses its
    /// defaults. CLI options are applied last.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = Self::resolve_root(cli)?;
        let config_path = if cli.config.is_absolute() {
            cli.config.clone()
        } else {
            root.join(&cli.config)
        };

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "{} not found, using defaults", config_path.display());
            Self::default()
        };

        config.config_path = config_path;
        config.set_root(&root);
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Resolve the project root: `--root` if given, otherwise the cwd.
    fn resolve_root(cli: &Cli) -> Result<PathBuf> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let root = match &cli.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => cwd,
        };
        Ok(crate::utils::path::normalize_path(&root))
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("config"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    /// Apply command-specific CLI overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        if let Commands::Serve {
            interface,
            port,
            watch,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    fn update_option<T: Clone>(target: &mut T, value: Option<&T>) {
        if let Some(v) = value {
            *target = v.clone();
        }
    }

    /// Reject values that would break invariants downstream.
    fn validate(&self) -> Result<()> {
        if self.runtime.default.trim().is_empty() {
            return Err(
                ConfigError::Validation("`runtime.default` must not be empty".into()).into(),
            );
        }
        if self.runtime.env_var.trim().is_empty() {
            return Err(
                ConfigError::Validation("`runtime.env_var` must not be empty".into()).into(),
            );
        }
        if self.paths.entry.as_os_str().is_empty() {
            return Err(ConfigError::Validation("`paths.entry` must not be empty".into()).into());
        }
        Ok(())
    }

    // ========================================================================
    // path helpers
    // ========================================================================

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root_join(&self.paths.settings)
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.root_join(&self.paths.venv)
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.root_join(&self.paths.requirements)
    }

    pub fn dotenv_path(&self) -> PathBuf {
        self.root_join(&self.paths.dotenv)
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root_join(&self.build.out_dir)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ConductorConfig {
    let (parsed, ignored) = ConductorConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at `root` with default sections.
#[cfg(test)]
pub fn test_config_at(root: &Path) -> ConductorConfig {
    let mut config = ConductorConfig::default();
    config.set_root(root);
    config.config_path = root.join("conductor.toml");
    config
}

// ============================================================================
// tests
// ============================================================================
