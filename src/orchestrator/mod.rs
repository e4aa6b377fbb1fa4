//! Build orchestration.
//!
//! The [`Orchestrator`] owns all session state (resolved runtime, readiness)
//! and is only ever touched from the [`TaskQueue`] worker, so renderer
//! invocations never overlap.
//!
//! ```text
//! start hook ─┐
//! watch event ┼─> TaskQueue ─> Orchestrator ─> Renderer ─> CommandRunner
//! interrupt ──┘                     └─> ReloadNotifier (after each successful build)
//! ```
//!
//! # Modules
//!
//! - `dispatch` - watch event classification and rebuilds
//! - `styles` - derived stylesheet generation
//! - `lifecycle` - start and close hooks
//! - `queue` - serialized task execution
//! - `interrupt` - one-shot interrupt cleanup

mod dispatch;
mod interrupt;
mod lifecycle;
mod queue;
mod styles;

pub use dispatch::WatchRules;
#[cfg(test)]
pub use dispatch::{Action, classify};
pub use interrupt::INTERRUPT;
#[cfg(test)]
pub use interrupt::Interrupt;
pub use queue::TaskQueue;

use std::sync::Arc;

use anyhow::Result;

use crate::config::ConductorConfig;
use crate::reload::ReloadNotifier;
use crate::runtime::{
    BuildMode, CommandRunner, EnvBootstrapper, RenderMode, Renderer, RuntimeLocator, check_runtime,
};

/// Orchestrator session.
pub struct Orchestrator {
    mode: BuildMode,
    locator: RuntimeLocator,
    bootstrapper: EnvBootstrapper,
    renderer: Renderer,
    rules: WatchRules,
    runner: Box<dyn CommandRunner>,
    notifier: Arc<dyn ReloadNotifier>,
    /// Runtime used for every renderer invocation.
    runtime: String,
    /// Set by the first successful build; gates watch events.
    ready: bool,
}

impl Orchestrator {
    pub fn new(
        config: &ConductorConfig,
        mode: BuildMode,
        runner: Box<dyn CommandRunner>,
        notifier: Arc<dyn ReloadNotifier>,
    ) -> Self {
        let locator = RuntimeLocator::new(config);
        let runtime = locator.resolve();
        crate::log!("config"; "using runtime: {}", runtime);
        check_runtime(&runtime);

        Self {
            mode,
            locator,
            bootstrapper: EnvBootstrapper::new(config),
            renderer: Renderer::new(config),
            rules: WatchRules::new(config),
            runner,
            notifier,
            runtime,
            ready: false,
        }
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Create the environment if needed and install dependencies.
    pub fn ensure_environment(&mut self) {
        self.bootstrapper.ensure(self.runner.as_ref(), &mut self.runtime);
    }

    /// Re-resolve the runtime, bootstrapping again only when it changed.
    pub fn refresh_runtime(&mut self) {
        let resolved = self.locator.resolve();
        if resolved == self.runtime {
            crate::debug!("config"; "runtime unchanged: {}", resolved);
            return;
        }

        crate::log!("config"; "runtime updated to: {}", resolved);
        check_runtime(&resolved);
        self.runtime = resolved;
        self.ensure_environment();
    }

    fn render(&self, render: &RenderMode) -> Result<String> {
        self.renderer
            .run(self.runner.as_ref(), &self.runtime, render, self.mode)
    }
}
