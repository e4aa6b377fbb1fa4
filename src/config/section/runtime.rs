//! `[runtime]` section configuration.
//!
//! ```toml
//! [runtime]
//! env_var = "PY_EXECUTABLE"   # Override variable checked first
//! default = "python3"         # Used when nothing else resolves
//! ```

use serde::{Deserialize, Serialize};

/// Renderer runtime discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Environment variable naming the runtime executable.
    pub env_var: String,

    /// Fallback command name.
    pub default: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            env_var: "PY_EXECUTABLE".into(),
            default: "python3".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_runtime_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.runtime.env_var, "PY_EXECUTABLE");
        assert_eq!(config.runtime.default, "python3");
    }

    #[test]
    fn test_runtime_override() {
        let config = test_parse_config("[runtime]\ndefault = \"python3.12\"");
        assert_eq!(config.runtime.default, "python3.12");
        assert_eq!(config.runtime.env_var, "PY_EXECUTABLE");
    }
}
