//! # Application Configuration
//!
//! Runtime settings read from the process environment at startup.
//!
//! | variable           | meaning                                   | default          |
//! |--------------------|-------------------------------------------|------------------|
//! | `KONZA_EXPORT_DIR` | folder receiving exported files           | home directory   |
//! | `KONZA_LOG`        | tracing filter directive                  | `info`           |
//! | `KONZA_ENV`        | `production` or `development`             | `production`     |
//! | `DEBUG_PROD`       | `true` turns on diagnostics in production | `false`          |

use std::collections::HashMap;
use std::path::PathBuf;

pub const EXPORT_DIR_VAR: &str = "KONZA_EXPORT_DIR";
pub const LOG_FILTER_VAR: &str = "KONZA_LOG";
pub const ENVIRONMENT_VAR: &str = "KONZA_ENV";
pub const DEBUG_PROD_VAR: &str = "DEBUG_PROD";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the home directory; set KONZA_EXPORT_DIR")]
    HomeDirectoryUnavailable,
    #[error("Invalid KONZA_ENV value '{0}', expected 'production' or 'development'")]
    InvalidEnvironment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(AppEnvironment::Production),
            "development" | "dev" => Ok(AppEnvironment::Development),
            _ => Err(ConfigError::InvalidEnvironment(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Folder that `ExportToHomeFolder` writes into
    pub export_dir: PathBuf,
    pub log_filter: String,
    pub environment: AppEnvironment,
    pub debug_prod: bool,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars, dirs::home_dir())
    }

    /// Build a configuration from an explicit variable map.
    ///
    /// `home_dir` is the fallback export folder when `KONZA_EXPORT_DIR` is unset.
    pub fn from_vars(
        vars: &HashMap<String, String>,
        home_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let export_dir = match non_empty(EXPORT_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => home_dir.ok_or(ConfigError::HomeDirectoryUnavailable)?,
        };

        let environment = match non_empty(ENVIRONMENT_VAR) {
            Some(value) => AppEnvironment::parse(&value)?,
            None => AppEnvironment::Production,
        };

        Ok(Self {
            export_dir,
            log_filter: non_empty(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            environment,
            debug_prod: non_empty(DEBUG_PROD_VAR).as_deref() == Some("true"),
        })
    }

    /// Configuration rooted at an explicit export folder (useful for testing)
    pub fn with_export_dir(export_dir: PathBuf) -> Self {
        Self {
            export_dir,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            environment: AppEnvironment::Production,
            debug_prod: false,
        }
    }

    /// Development diagnostics are on in development builds or when forced with `DEBUG_PROD`
    pub fn is_debug_enabled(&self) -> bool {
        self.environment == AppEnvironment::Development || self.debug_prod
    }
}
