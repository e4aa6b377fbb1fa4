//! Start and close hooks.

use anyhow::Result;

use super::Orchestrator;
use crate::runtime::RenderMode;

impl Orchestrator {
    /// Bootstrap, regenerate styles, then render the full site twice.
    ///
    /// In production a failed render aborts the build. In serve mode each
    /// render goes through [`Orchestrator::build`], which logs failures and
    /// leaves the session not ready.
    pub fn on_build_start(&mut self) -> Result<()> {
        self.ensure_environment();
        self.regenerate_styles();

        crate::log!("build"; "generating static files...");
        for _ in 0..2 {
            if self.mode().is_production() {
                let output = self.render(&RenderMode::Full).inspect_err(|e| {
                    crate::error!("build"; "failed to generate static files: {:#}", e);
                })?;
                if !output.is_empty() {
                    crate::log!("build"; "{}", output);
                }
            } else {
                self.build(None);
            }
        }
        Ok(())
    }

    /// Remove generated files from the project root. Never fails.
    pub fn on_close(&mut self) {
        crate::log!("clean"; "cleaning up build files...");
        match self.render(&RenderMode::Clean) {
            Ok(output) if !output.is_empty() => crate::log!("clean"; "{}", output),
            Ok(_) => {}
            Err(e) => crate::error!("clean"; "cleanup script failed: {:#}", e),
        }
    }
}
