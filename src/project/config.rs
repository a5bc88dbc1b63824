//! Client-supplied settings.
//!
//! Deserialised from the camelCase JSON an editor sends, every field
//! optional:
//!
//! ```json
//! { "logLevel": "debug", "valuesFiles": { "mainValuesFile": "values.yaml" } }
//! ```

use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Environment variable that forces debug logging.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub log_level: String,
    pub values_files: ValuesFilesConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            values_files: ValuesFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Level filter for the host's subscriber, honouring `LOG_LEVEL=debug`.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level_filter_with(std::env::var(LOG_LEVEL_ENV).ok().as_deref())
    }

    fn log_level_filter_with(&self, env_level: Option<&str>) -> LevelFilter {
        if env_level == Some("debug") {
            return LevelFilter::DEBUG;
        }
        match self.log_level.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(err) => {
                tracing::warn!(level = %self.log_level, error = %err, "invalid log level, using info");
                LevelFilter::INFO
            }
        }
    }
}

/// Which files in a chart directory are values documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValuesFilesConfig {
    pub main_values_file: String,
    pub additional_values_files_glob_pattern: String,
    /// Values used only for linting; never a definition target.
    pub lint_overlay_values_file: String,
}

impl Default for ValuesFilesConfig {
    fn default() -> Self {
        Self {
            main_values_file: "values.yaml".to_string(),
            additional_values_files_glob_pattern: "values*.yaml".to_string(),
            lint_overlay_values_file: "values.lint.yaml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValuesFileRole {
    Main,
    Additional,
}

impl ValuesFilesConfig {
    /// Role of a file, judged by its name. `None` for non-values files.
    pub fn role_of(&self, file_name: &str) -> Option<ValuesFileRole> {
        if file_name == self.main_values_file {
            return Some(ValuesFileRole::Main);
        }
        if file_name == self.lint_overlay_values_file {
            return None;
        }
        match Pattern::new(&self.additional_values_files_glob_pattern) {
            Ok(pattern) if pattern.matches(file_name) => Some(ValuesFileRole::Additional),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    pattern = %self.additional_values_files_glob_pattern,
                    error = %err,
                    "invalid additional values glob"
                );
                None
            }
        }
    }

    /// [`role_of`](Self::role_of) for the last path segment of a URI.
    pub fn role_of_uri(&self, uri: &str) -> Option<ValuesFileRole> {
        let file_name = uri.rsplit('/').next().unwrap_or(uri);
        self.role_of(file_name)
    }
}
