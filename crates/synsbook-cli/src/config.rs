//! Runtime configuration, resolved from flags and the environment.
//!
//! Each setting can come from a command-line flag or its environment variable
//! (a `.env` file in the working directory is loaded first):
//!
//! | flag | variable | default |
//! |------|----------|---------|
//! | `--timezone` | `SYNSBOOK_TIMEZONE` | `Europe/Copenhagen` |
//! | `--registry` | `SYNSBOOK_REGISTRY` | none |
//! | `--log-level` | `SYNSBOOK_LOG_LEVEL` | `warn` |

use std::path::PathBuf;

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use slot_engine::FixtureRegistry;
use thiserror::Error;

pub const DEFAULT_TIMEZONE: &str = "Europe/Copenhagen";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("No vehicle registry configured; pass --registry or set SYNSBOOK_REGISTRY")]
    MissingRegistry,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Timezone the inspection centre keeps its opening hours in.
    pub timezone: Tz,
    pub registry_path: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    pub fn new(
        timezone: &str,
        registry_path: Option<PathBuf>,
        log_level: String,
    ) -> Result<Self, ConfigError> {
        let timezone: Tz = timezone
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self {
            timezone,
            registry_path,
            log_level,
        })
    }

    /// The current wall-clock time at the centre.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    pub fn registry(&self) -> anyhow::Result<FixtureRegistry> {
        let path = self
            .registry_path
            .as_ref()
            .ok_or(ConfigError::MissingRegistry)?;
        Ok(FixtureRegistry::from_path(path)?)
    }
}
