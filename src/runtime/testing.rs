//! Test doubles for the subprocess seam.

use std::sync::Arc;

use anyhow::{Result, bail};
use parking_lot::Mutex;

use super::runner::{CommandRunner, Invocation};

type Predicate = Arc<dyn Fn(&Invocation) -> bool + Send + Sync>;

/// Records every invocation; fails the ones matching a predicate.
///
/// Clones share the same log, so a test can keep one handle while the
/// orchestrator owns another.
#[derive(Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
    fail: Option<Predicate>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: None,
        }
    }

    pub fn fail_when(mut self, predicate: impl Fn(&Invocation) -> bool + Send + Sync + 'static) -> Self {
        self.fail = Some(Arc::new(predicate));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Only the mode flags (everything after the entry point) of renderer calls.
    pub fn render_modes(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|inv| {
                let entry = inv.argv.iter().position(|a| a.ends_with("main.py"))?;
                Some(inv.argv[entry + 1..].to_vec())
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        self.calls.lock().push(invocation.clone());
        if let Some(fail) = &self.fail
            && fail(invocation)
        {
            bail!("`{}` exited with status 1", invocation.display());
        }
        Ok(String::new())
    }
}
