//! Configuration section definitions.
//!
//! Each module corresponds to a section in `conductor.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `paths`   | `[paths]`    | Project layout (content, templates, ...) |
//! | `runtime` | `[runtime]`  | Renderer runtime discovery               |
//! | `serve`   | `[serve]`    | Development server                       |
//! | `watch`   | `[watch]`    | Watcher ignore patterns                  |
//! | `build`   | `[build]`    | Production publish step                  |
//! | `images`  | `[images]`   | Background image preprocessing           |

mod build;
mod images;
mod paths;
mod runtime;
mod serve;
mod watch;

pub use build::BuildConfig;
pub use images::ImagesConfig;
pub use paths::PathsConfig;
pub use runtime::RuntimeConfig;
pub use serve::ServeConfig;
pub use watch::WatchConfig;
