//! Project-level settings: log level and which files count as values
//! documents.

mod config;

pub use config::{LOG_LEVEL_ENV, ServerConfig, ValuesFileRole, ValuesFilesConfig};
