//! Subprocess seam.
//!
//! Every external process the orchestrator starts (renderer passes,
//! environment creation, dependency install) is described as an
//! [`Invocation`] and executed by a [`CommandRunner`]. Production code uses
//! [`SystemRunner`]; tests substitute a recorder.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::utils::exec::{Cmd, FilterRule};

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
    /// Forward output live through a PTY instead of capturing it.
    pub stream: bool,
    /// Log prefix for forwarded output.
    pub label: &'static str,
    pub filter: Option<&'static FilterRule>,
}

impl Invocation {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            cwd: None,
            envs: Vec::new(),
            stream: false,
            label: "run",
            filter: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn stream(mut self, label: &'static str) -> Self {
        self.stream = true;
        self.label = label;
        self
    }

    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Command line as typed in a shell, for logs.
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

/// Executes invocations, returning trimmed stdout on success.
///
/// A non-zero exit status or a spawn failure is an `Err`.
pub trait CommandRunner: Send {
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        crate::debug!("exec"; "{}", invocation.display());

        let (program, args) = invocation
            .argv
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("empty command line for `{}`", invocation.label))?;
        let mut cmd = Cmd::new(program)
            .args(args)
            .envs(invocation.envs.iter().map(|(k, v)| (k, v)))
            .pty(invocation.stream)
            .label(invocation.label);
        if let Some(dir) = &invocation.cwd {
            cmd = cmd.cwd(dir);
        }
        if let Some(filter) = invocation.filter {
            cmd = cmd.filter(filter);
        }

        let output = cmd.run()?;
        if invocation.stream {
            // already forwarded line by line
            return Ok(String::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Split a runtime string into argv.
///
/// `~` is expanded first. A string naming an existing file is kept whole so
/// paths containing spaces survive; anything else is split on whitespace,
/// which lets wrappers like `uv run python` work.
pub fn runtime_argv(runtime: &str) -> Vec<String> {
    let expanded = shellexpand::tilde(runtime.trim()).into_owned();
    if Path::new(&expanded).is_file() {
        return vec![expanded];
    }
    expanded.split_whitespace().map(str::to_string).collect()
}
