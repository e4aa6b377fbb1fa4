//! Renderer invocation.
//!
//! The renderer is an opaque program: `<runtime> <entry> [mode flags]`,
//! run from the project root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use rustc_hash::FxHashMap;

use super::runner::{CommandRunner, Invocation, runtime_argv};
use crate::config::ConductorConfig;

/// What the renderer should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// Regenerate the whole site.
    Full,
    /// Regenerate the output of a single content file.
    File(PathBuf),
    /// Only produce derived stylesheets (theme, fonts, syntax).
    Styles,
    /// Remove generated files from the project root.
    Clean,
}

impl RenderMode {
    /// Mode flags appended after the entry point.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Full => Vec::new(),
            Self::File(path) => vec!["--file".into(), path.to_string_lossy().into_owned()],
            Self::Styles => vec!["--generate-styles".into()],
            Self::Clean => vec!["--clean".into()],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "full build",
            Self::File(_) => "file build",
            Self::Styles => "style generation",
            Self::Clean => "cleanup",
        }
    }
}

/// Which top-level command the renderer runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// One-shot production build; start hook failures abort.
    Production,
    /// Interactive dev server; every failure is logged and recovered.
    Serve,
}

impl BuildMode {
    /// Value of `CONDUCTOR_MODE` passed to the renderer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "build",
            Self::Serve => "serve",
        }
    }

    #[inline]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Builds and runs renderer invocations.
#[derive(Debug, Clone)]
pub struct Renderer {
    root: PathBuf,
    entry: PathBuf,
}

impl Renderer {
    pub fn new(config: &ConductorConfig) -> Self {
        Self {
            root: config.get_root().to_path_buf(),
            entry: config.paths.entry.clone(),
        }
    }

    /// `<runtime> <entry> [flags]` with `CONDUCTOR_*` variables set.
    pub fn invocation(&self, runtime: &str, render: &RenderMode, mode: BuildMode) -> Invocation {
        let mut invocation = Invocation::new(runtime_argv(runtime))
            .arg(self.entry.to_string_lossy())
            .cwd(&self.root);
        for (key, value) in self.env_vars(mode) {
            invocation = invocation.env(key, value);
        }
        for arg in render.args() {
            invocation = invocation.arg(arg);
        }
        invocation
    }

    fn env_vars(&self, mode: BuildMode) -> FxHashMap<&'static str, String> {
        let mut vars = FxHashMap::default();
        vars.insert("CONDUCTOR_ROOT", self.root.to_string_lossy().into_owned());
        vars.insert("CONDUCTOR_MODE", mode.as_str().to_string());
        vars
    }

    /// Run the renderer synchronously, returning its trimmed stdout.
    pub fn run(
        &self,
        runner: &dyn CommandRunner,
        runtime: &str,
        render: &RenderMode,
        mode: BuildMode,
    ) -> Result<String> {
        runner
            .run(&self.invocation(runtime, render, mode))
            .with_context(|| format!("renderer {} failed", render.label()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Warn when a runtime names neither an existing file nor a `PATH` program.
pub fn check_runtime(runtime: &str) {
    let Some(program) = runtime_argv(runtime).into_iter().next() else {
        return;
    };
    if Path::new(&program).is_file() || which::which(&program).is_ok() {
        return;
    }
    crate::log!("env"; "runtime `{}` not found on PATH", program);
}
