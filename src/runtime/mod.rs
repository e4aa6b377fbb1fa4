//! Renderer runtime: discovery, environment bootstrap and invocation.
//!
//! ```text
//! RuntimeLocator ──> runtime path ──> Renderer ──> CommandRunner ──> child process
//!                                  └─> EnvBootstrapper ─┘
//! ```

mod bootstrap;
mod locator;
mod renderer;
mod runner;
#[cfg(test)]
pub mod testing;

pub use bootstrap::EnvBootstrapper;
pub use locator::RuntimeLocator;
#[cfg(test)]
pub use locator::venv_executable;
pub use renderer::{BuildMode, RenderMode, Renderer, check_runtime};
#[cfg(test)]
pub use runner::Invocation;
pub use runner::{CommandRunner, SystemRunner};
