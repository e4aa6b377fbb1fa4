//! Renderer runtime discovery.
//!
//! Precedence, first non-empty wins:
//!
//! 1. the override environment variable (`PY_EXECUTABLE` by default)
//! 2. the local environment's interpreter, if it exists on disk
//! 3. site settings: `runtime.python_executable`, `runtime.python`,
//!    `runtime.interpreter`, `python_executable`, `python`
//! 4. the configured default command (`python3`)

use std::path::{Path, PathBuf};

use crate::config::{ConductorConfig, Settings};

/// Settings key paths consulted in order.
const SETTINGS_KEYS: [&[&str]; 5] = [
    &["runtime", "python_executable"],
    &["runtime", "python"],
    &["runtime", "interpreter"],
    &["python_executable"],
    &["python"],
];

/// Resolves the runtime path used to launch the renderer.
#[derive(Debug, Clone)]
pub struct RuntimeLocator {
    env_var: String,
    local_runtime: PathBuf,
    settings_path: PathBuf,
    default: String,
}

impl RuntimeLocator {
    pub fn new(config: &ConductorConfig) -> Self {
        Self {
            env_var: config.runtime.env_var.clone(),
            local_runtime: venv_executable(&config.venv_dir(), "python"),
            settings_path: config.settings_path(),
            default: config.runtime.default.trim().to_string(),
        }
    }

    /// Resolve from the live process environment and settings file.
    ///
    /// Never fails and never returns an empty string.
    pub fn resolve(&self) -> String {
        let env_override = std::env::var(&self.env_var).ok();
        self.resolve_with(env_override.as_deref(), || Settings::load(&self.settings_path))
    }

    /// Resolve with an explicit override value.
    ///
    /// Settings are only read when neither the override nor the local
    /// environment applies.
    pub fn resolve_with(
        &self,
        env_override: Option<&str>,
        settings: impl FnOnce() -> Settings,
    ) -> String {
        if let Some(value) = env_override.map(str::trim).filter(|v| !v.is_empty()) {
            return value.to_string();
        }

        if self.local_runtime.exists() {
            return self.local_runtime.to_string_lossy().into_owned();
        }

        let settings = settings();
        SETTINGS_KEYS
            .iter()
            .find_map(|keys| settings.get_str(keys))
            .map_or_else(|| self.default.clone(), str::to_string)
    }

    /// Interpreter path inside the local environment.
    pub fn local_runtime(&self) -> &Path {
        &self.local_runtime
    }
}

/// Path to an executable inside a virtual environment.
pub fn venv_executable(venv: &Path, name: &str) -> PathBuf {
    #[cfg(windows)]
    {
        venv.join("Scripts").join(format!("{name}.exe"))
    }
    #[cfg(not(windows))]
    {
        venv.join("bin").join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use tempfile::TempDir;

    fn locator(temp: &TempDir) -> RuntimeLocator {
        RuntimeLocator::new(&test_config_at(temp.path()))
    }

    fn settings(yaml: &str) -> Settings {
        Settings::parse(yaml).unwrap()
    }

    fn create_local_runtime(temp: &TempDir) -> PathBuf {
        let python = venv_executable(&temp.path().join(".venv"), "python");
        std::fs::create_dir_all(python.parent().unwrap()).unwrap();
        std::fs::write(&python, "").unwrap();
        python
    }

    const ALL_SETTINGS: &str = "\
runtime:
  python_executable: /a
  python: /b
  interpreter: /c
python_executable: /d
python: /e
";

    #[test]
    fn test_env_override_wins() {
        let temp = TempDir::new().unwrap();
        create_local_runtime(&temp);
        let resolved = locator(&temp).resolve_with(Some(" /opt/py "), || settings(ALL_SETTINGS));
        assert_eq!(resolved, "/opt/py");
    }

    #[test]
    fn test_blank_env_override_is_absent() {
        let temp = TempDir::new().unwrap();
        let resolved = locator(&temp).resolve_with(Some("   "), || settings(ALL_SETTINGS));
        assert_eq!(resolved, "/a");
    }

    #[test]
    fn test_local_runtime_beats_settings() {
        let temp = TempDir::new().unwrap();
        let python = create_local_runtime(&temp);
        let resolved = locator(&temp).resolve_with(None, || settings(ALL_SETTINGS));
        assert_eq!(resolved, python.to_string_lossy());
    }

    #[test]
    fn test_local_runtime_skips_settings_read() {
        let temp = TempDir::new().unwrap();
        create_local_runtime(&temp);
        locator(&temp).resolve_with(None, || panic!("settings must not be read"));
    }

    #[test]
    fn test_settings_precedence_chain() {
        let temp = TempDir::new().unwrap();
        let locator = locator(&temp);

        // Drop the winning key one at a time; the next one must take over.
        let lines: Vec<&str> = ALL_SETTINGS.lines().collect();
        let cases = [
            (ALL_SETTINGS.to_string(), "/a"),
            (lines.iter().filter(|l| !l.contains("/a")).copied().collect::<Vec<_>>().join("\n"), "/b"),
            ("runtime:\n  interpreter: /c\npython_executable: /d\npython: /e".to_string(), "/c"),
            ("python_executable: /d\npython: /e".to_string(), "/d"),
            ("python: /e".to_string(), "/e"),
        ];

        for (yaml, expected) in cases {
            assert_eq!(locator.resolve_with(None, || settings(&yaml)), expected, "{yaml}");
        }
    }

    #[test]
    fn test_blank_settings_values_fall_through() {
        let temp = TempDir::new().unwrap();
        let yaml = "runtime:\n  python_executable: \"  \"\n  python: \"\"\npython: /e\n";
        assert_eq!(locator(&temp).resolve_with(None, || settings(yaml)), "/e");
    }

    #[test]
    fn test_default_when_everything_absent() {
        let temp = TempDir::new().unwrap();
        assert_eq!(locator(&temp).resolve_with(None, Settings::default), "python3");
        assert_eq!(locator(&temp).resolve_with(Some(""), Settings::default), "python3");
    }

    #[test]
    fn test_precedence_matrix() {
        for env_set in [false, true] {
            for local_present in [false, true] {
                for settings_present in [false, true] {
                    let temp = TempDir::new().unwrap();
                    let python = local_present.then(|| create_local_runtime(&temp));
                    let yaml = if settings_present { "python: /from-settings" } else { "" };

                    let resolved = locator(&temp)
                        .resolve_with(env_set.then_some("/from-env"), || settings(yaml));

                    let expected = if env_set {
                        "/from-env".to_string()
                    } else if let Some(python) = python {
                        python.to_string_lossy().into_owned()
                    } else if settings_present {
                        "/from-settings".to_string()
                    } else {
                        "python3".to_string()
                    };
                    assert_eq!(resolved, expected);
                }
            }
        }
    }

    #[test]
    fn test_resolve_reads_settings_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.yaml"), "runtime:\n  python: /srv/py\n").unwrap();

        let mut config = test_config_at(temp.path());
        config.runtime.env_var = "CONDUCTOR_TEST_LOCATOR_UNSET".into();
        assert_eq!(RuntimeLocator::new(&config).resolve(), "/srv/py");
    }
}
