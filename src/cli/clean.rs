//! `conductor clean`.

use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::ConductorConfig,
    orchestrator::Orchestrator,
    reload::NoopNotifier,
    runtime::{BuildMode, SystemRunner},
};

/// Ask the renderer to remove its generated files.
pub fn clean_site(config: &ConductorConfig) -> Result<()> {
    let mut orchestrator = Orchestrator::new(
        config,
        BuildMode::Production,
        Box::new(SystemRunner),
        Arc::new(NoopNotifier),
    );
    orchestrator.on_close();
    Ok(())
}
