use super::Orchestrator;
use crate::runtime::RenderMode;

impl Orchestrator {
    /// Produce derived stylesheets. Never fails the caller.
    pub fn regenerate_styles(&mut self) {
        match self.render(&RenderMode::Styles) {
            Ok(output) if !output.is_empty() => crate::log!("styles"; "{}", output),
            Ok(_) => {}
            Err(e) => crate::error!("styles"; "failed to generate theme/font CSS: {:#}", e),
        }
    }
}
