//! Site settings (`config.yaml`).
//!
//! The settings document belongs to the renderer; the orchestrator only
//! peeks at the runtime fields. Reading it must never abort a build, so every
//! failure collapses to an empty mapping after being logged. Nothing is
//! cached: each [`Settings::load`] re-reads the file, which is what makes
//! live reconfiguration in serve mode possible.

use std::path::Path;

use serde_yaml::{Mapping, Value};

/// An immutable view over the parsed settings document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings(Mapping);

impl Settings {
    /// Read and parse the settings file, logging and degrading to empty on error.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                crate::error!("config"; "unable to read {}: {}", display_name(path), e);
                return Self::default();
            }
        };

        match Self::parse(&content) {
            Ok(settings) => settings,
            Err(e) => {
                crate::error!("config"; "unable to parse {}: {}", display_name(path), e);
                Self::default()
            }
        }
    }

    /// Parse settings from YAML text.
    ///
    /// An empty document, or a document whose root is not a mapping, yields
    /// empty settings.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(content)?;
        Ok(match value {
            Value::Mapping(map) => Self(map),
            _ => Self::default(),
        })
    }

    /// Look up a nested value by key path (e.g. `["runtime", "python"]`).
    pub fn get(&self, keys: &[&str]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_mapping()?.get(*key)?;
        }
        Some(current)
    }

    /// Look up a string value, trimmed. Non-strings and blank strings are `None`.
    pub fn get_str(&self, keys: &[&str]) -> Option<&str> {
        self.get(keys)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_nested_runtime() {
        let settings = Settings::parse("runtime:\n  python: \" /opt/py/bin/python \"\n").unwrap();
        assert_eq!(settings.get_str(&["runtime", "python"]), Some("/opt/py/bin/python"));
        assert_eq!(settings.get_str(&["runtime", "interpreter"]), None);
    }

    #[test]
    fn test_blank_and_non_string_values_ignored() {
        let settings = Settings::parse("python: \"   \"\npython_executable: 3\n").unwrap();
        assert_eq!(settings.get_str(&["python"]), None);
        assert_eq!(settings.get_str(&["python_executable"]), None);
    }

    #[test]
    fn test_non_mapping_root_is_empty() {
        assert!(Settings::parse("").unwrap().is_empty());
        assert!(Settings::parse("just a string").unwrap().is_empty());
        assert!(Settings::parse("- a\n- b").unwrap().is_empty());
    }

    #[test]
    fn test_path_through_scalar_is_none() {
        let settings = Settings::parse("runtime: python3\n").unwrap();
        assert_eq!(settings.get_str(&["runtime", "python"]), None);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&temp.path().join("config.yaml"));
        assert!(settings.is_empty());
    }

    #[test]
    fn test_load_invalid_yaml_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "runtime: [unclosed").unwrap();
        assert!(Settings::load(&path).is_empty());
    }

    #[test]
    fn test_load_rereads_each_call() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");

        std::fs::write(&path, "python: a\n").unwrap();
        assert_eq!(Settings::load(&path).get_str(&["python"]), Some("a"));

        std::fs::write(&path, "python: b\n").unwrap();
        assert_eq!(Settings::load(&path).get_str(&["python"]), Some("b"));
    }
}
