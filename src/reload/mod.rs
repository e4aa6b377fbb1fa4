//! Live reload channel.
//!
//! ```text
//! Orchestrator --ReloadNotifier--> ReloadHandle --> WsActor --> browsers
//! ```
//!
//! # Modules
//!
//! - `message` - JSON messages sent to clients
//! - `notifier` - `ReloadNotifier` trait and its implementations
//! - `server` - WebSocket listener with port retry
//! - `ws` - actor owning client connections

mod message;
mod notifier;
mod server;
mod ws;

#[cfg(test)]
pub use notifier::testing;
pub use notifier::{NoopNotifier, ReloadHandle, ReloadNotifier};
pub use server::ReloadServer;
