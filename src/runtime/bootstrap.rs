//! Dependency environment bootstrap.
//!
//! Creates the virtual environment once, then (re)installs the declared
//! dependencies on every call. Each step is best-effort: failures are logged
//! and never reach the caller.

use std::path::{Path, PathBuf};

use super::locator::venv_executable;
use super::runner::{CommandRunner, Invocation, runtime_argv};
use crate::config::ConductorConfig;
use crate::utils::exec::PIP_FILTER;
use crate::{error, log};

/// Ensures the renderer's dependency environment exists and is installed.
#[derive(Debug, Clone)]
pub struct EnvBootstrapper {
    root: PathBuf,
    venv: PathBuf,
    requirements: PathBuf,
}

impl EnvBootstrapper {
    pub fn new(config: &ConductorConfig) -> Self {
        Self {
            root: config.get_root().to_path_buf(),
            venv: config.venv_dir(),
            requirements: config.requirements_path(),
        }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.venv.exists()
    }

    /// Create the environment if missing, then install dependencies.
    ///
    /// `runtime` is switched to the new environment's interpreter only when
    /// creation succeeds. A failed creation skips installation.
    pub fn ensure(&self, runner: &dyn CommandRunner, runtime: &mut String) {
        if !self.is_bootstrapped() {
            log!("env"; "creating python virtual environment...");
            if let Err(e) = runner.run(&self.create_invocation(runtime)) {
                error!("env"; "failed to create virtual environment: {:#}", e);
                return;
            }
            *runtime = self.venv_python().to_string_lossy().into_owned();
            log!("env"; "using {}", runtime);
        }

        log!("env"; "installing python dependencies...");
        if let Err(e) = runner.run(&self.install_invocation()) {
            error!("env"; "failed to install python dependencies: {:#}", e);
        }
    }

    /// `<runtime> -m venv <dir>`
    fn create_invocation(&self, runtime: &str) -> Invocation {
        Invocation::new(runtime_argv(runtime))
            .arg("-m")
            .arg("venv")
            .arg(self.venv.to_string_lossy())
            .cwd(&self.root)
            .stream("env")
    }

    /// `<venv>/bin/pip install -r <requirements>`
    fn install_invocation(&self) -> Invocation {
        let pip = venv_executable(&self.venv, "pip");
        Invocation::new(vec![pip.to_string_lossy().into_owned()])
            .arg("install")
            .arg("-r")
            .arg(self.requirements.to_string_lossy())
            .cwd(&self.root)
            .stream("env")
            .filter(&PIP_FILTER)
    }

    fn venv_python(&self) -> PathBuf {
        venv_executable(&self.venv, "python")
    }

    pub fn venv_dir(&self) -> &Path {
        &self.venv
    }
}
