//! File watcher.
//!
//! ```text
//! notify --> from_notify --> temp/ignore filter --> callback (one call per event)
//! ```
//!
//! Events are forwarded as they arrive. There is no debouncing: a save that
//! touches three files produces three callbacks.

mod event;
mod filter;

pub use event::{WatchEvent, WatchKind, from_notify};
pub use filter::{IgnoreSet, is_temp_file};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::ConductorConfig;
use crate::utils::path::normalize_path;

/// Keeps the underlying watcher alive; dropping it stops event delivery.
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
}

impl FsWatcher {
    /// Watch the project root recursively.
    pub fn start<F>(config: &ConductorConfig, on_event: F) -> Result<Self>
    where
        F: Fn(WatchEvent) + Send + 'static,
    {
        let root = config.get_root().to_path_buf();
        let ignore = IgnoreSet::new(&config.watch.ignore);
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        for event in accept(&root, &ignore, &event) {
                            crate::debug!("watch"; "{} {}", event.kind.as_str(), event.path.display());
                            on_event(event);
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        crate::log!("watch"; "watching {}", config.get_root().display());
        Ok(Self { _watcher: watcher })
    }
}

/// Map one raw event and drop everything the orchestrator should not see.
fn accept(root: &Path, ignore: &IgnoreSet, event: &notify::Event) -> Vec<WatchEvent> {
    from_notify(event)
        .into_iter()
        .filter(|e| !is_temp_file(&e.path))
        .map(|e| WatchEvent::new(e.kind, normalize_path(&e.path)))
        .filter(|e| {
            let relative = relative_to(root, &e.path);
            !ignore.is_ignored(&relative)
        })
        .collect()
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
