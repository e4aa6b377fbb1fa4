//! Shared utilities.

pub mod exec;
pub mod fs;
pub mod mime;
pub mod path;
