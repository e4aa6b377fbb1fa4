//! `.env` loading.

use std::path::Path;

use crate::{debug, error};

/// Load `KEY=value` pairs from a dotenv file into the process environment.
///
/// Variables already present in the environment win. A missing file is not
/// an error; a malformed one is logged and skipped.
pub fn load_dotenv(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => debug!("env"; "loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => error!("config"; "unable to load {}: {}", path.display(), e),
    }
}
