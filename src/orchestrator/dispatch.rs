//! Watch event classification and rebuilds.
//!
//! Rules are evaluated independently and their actions concatenated, so one
//! event may trigger more than one rebuild (a deleted template rebuilds
//! twice). Only a settings change short-circuits.
//!
//! | Event                                  | Actions              |
//! |----------------------------------------|----------------------|
//! | settings file, any kind                | `Reconfigure` (only) |
//! | template, change                       | `Full`               |
//! | content, change                        | `Single(path)`       |
//! | content or template, add / unlink      | `Full`               |
//! | stylesheet source, change              | `Full`               |
//! | anything, unlink                       | `Full`               |

use std::path::{Path, PathBuf};

use smallvec::SmallVec;

use super::Orchestrator;
use crate::config::ConductorConfig;
use crate::logger::{status_error, status_success};
use crate::runtime::RenderMode;
use crate::watch::{WatchEvent, WatchKind};

/// Rebuild step selected for a watch event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-resolve runtime, regenerate styles, then rebuild everything.
    Reconfigure,
    /// Rebuild everything.
    Full,
    /// Rebuild one content file.
    Single(PathBuf),
}

/// Absolute paths that classification keys on.
#[derive(Debug, Clone)]
pub struct WatchRules {
    settings: PathBuf,
    content: PathBuf,
    templates: PathBuf,
    styles: PathBuf,
}

impl WatchRules {
    pub fn new(config: &ConductorConfig) -> Self {
        Self {
            settings: config.settings_path(),
            content: config.root_join(&config.paths.content),
            templates: config.root_join(&config.paths.templates),
            styles: config.root_join(&config.paths.styles),
        }
    }

    fn is_settings(&self, path: &Path) -> bool {
        path == self.settings
    }

    /// Strictly inside `dir`; the directory itself does not count.
    fn is_under(path: &Path, dir: &Path) -> bool {
        path != dir && path.starts_with(dir)
    }
}

/// Actions for one event, in execution order.
///
/// Directories match by absolute prefix under the project root, not by
/// substring: `notes/content/x.md` is not content, and `notes/config.yaml`
/// is not the settings file.
pub fn classify(event: &WatchEvent, rules: &WatchRules) -> SmallVec<[Action; 2]> {
    let mut actions = SmallVec::new();
    let path = event.path.as_path();

    if rules.is_settings(path) {
        actions.push(Action::Reconfigure);
        return actions;
    }

    let in_templates = WatchRules::is_under(path, &rules.templates);
    let in_content = WatchRules::is_under(path, &rules.content);

    if in_templates || in_content {
        match event.kind {
            WatchKind::Change if in_templates => actions.push(Action::Full),
            WatchKind::Change => actions.push(Action::Single(path.to_path_buf())),
            WatchKind::Add | WatchKind::Unlink => actions.push(Action::Full),
        }
    }
    if event.kind == WatchKind::Change && WatchRules::is_under(path, &rules.styles) {
        actions.push(Action::Full);
    }
    if event.kind == WatchKind::Unlink {
        actions.push(Action::Full);
    }

    actions
}

impl Orchestrator {
    /// Handle one watch event. Ignored until the first successful build.
    pub fn handle_watch_event(&mut self, event: &WatchEvent) {
        if !self.ready {
            crate::debug!("watch"; "not ready, ignoring {} {}", event.kind.as_str(), event.path.display());
            return;
        }

        for action in classify(event, &self.rules) {
            match action {
                Action::Reconfigure => {
                    self.refresh_runtime();
                    self.regenerate_styles();
                    self.build(None);
                }
                Action::Full => {
                    self.build(None);
                }
                Action::Single(path) => {
                    self.build(Some(&path));
                }
            }
        }
    }

    /// Run the renderer for everything or for one file.
    ///
    /// Failures are logged and swallowed. Success marks the session ready
    /// and tells clients to reload. Returns whether the build succeeded.
    pub fn build(&mut self, target: Option<&Path>) -> bool {
        let render = target.map_or(RenderMode::Full, |p| RenderMode::File(p.to_path_buf()));
        let subject = target.map_or_else(|| "site".to_string(), |p| p.display().to_string());

        match self.render(&render) {
            Ok(output) => {
                if !output.is_empty() {
                    crate::log!("build"; "{}", output);
                }
                self.ready = true;
                self.notifier.full_reload();
                status_success(&format!("rebuilt {subject}"));
                true
            }
            Err(e) => {
                crate::error!("build"; "script failed to update: {:#}", e);
                status_error(&format!("failed to rebuild {subject}"), "");
                false
            }
        }
    }
}
