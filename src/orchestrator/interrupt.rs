//! Interrupt cleanup.
//!
//! The process handler is installed once at startup. Cleanup callbacks are
//! attached separately and only the first one sticks, so re-running setup
//! code never leads to a second cleanup per interrupt.

use std::sync::OnceLock;

use anyhow::Result;

type Cleanup = Box<dyn Fn() + Send + Sync>;

/// One-shot cleanup registry.
pub struct Interrupt {
    cleanup: OnceLock<Cleanup>,
}

/// Registry used by the process interrupt handler.
pub static INTERRUPT: Interrupt = Interrupt::new();

impl Interrupt {
    pub const fn new() -> Self {
        Self {
            cleanup: OnceLock::new(),
        }
    }

    /// Store `cleanup` unless one is already attached. Returns whether it was stored.
    pub fn attach(&self, cleanup: impl Fn() + Send + Sync + 'static) -> bool {
        let attached = self.cleanup.set(Box::new(cleanup)).is_ok();
        if !attached {
            crate::debug!("interrupt"; "cleanup already attached");
        }
        attached
    }

    /// Run the attached cleanup, if any. Returns whether one ran.
    pub fn fire(&self) -> bool {
        match self.cleanup.get() {
            Some(cleanup) => {
                cleanup();
                true
            }
            None => false,
        }
    }

    /// Install the Ctrl+C handler: run cleanup, then exit with status 0.
    pub fn install(&'static self) -> Result<()> {
        ctrlc::set_handler(move || {
            crate::logger::status_detach();
            crate::log!("clean"; "interrupted");
            self.fire();
            std::process::exit(0);
        })
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}
