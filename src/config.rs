use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Engine-level constants
pub const ENGINE_NAME: &str = "symptom-safety";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version tag of the built-in red-flag catalog.
pub const CATALOG_VERSION: &str = "2026.1";

/// Unacknowledged disclaimers older than this are not reported as issues.
pub const DEFAULT_DISCLAIMER_WINDOW_DAYS: i64 = 7;
pub const MAX_DISCLAIMER_WINDOW_DAYS: i64 = 3650;

pub fn default_log_filter() -> &'static str {
    "symptom_safety=info,safety_check=info"
}

/// Install the global fmt subscriber. `RUST_LOG` wins over the default filter.
///
/// Only binaries call this; the library never installs a subscriber itself.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Points removed from 100 per qualifying event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeductionWeights {
    pub unacknowledged_disclaimer: u32,
    pub inappropriate_response: u32,
    pub missing_critical_response: u32,
    pub unconsented_share: u32,
}

impl Default for DeductionWeights {
    fn default() -> Self {
        Self {
            unacknowledged_disclaimer: 5,
            inappropriate_response: 10,
            missing_critical_response: 15,
            unconsented_share: 20,
        }
    }
}

/// Tunables for the compliance side of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub disclaimer_window_days: i64,
    pub deductions: DeductionWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            disclaimer_window_days: DEFAULT_DISCLAIMER_WINDOW_DAYS,
            deductions: DeductionWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(1..=MAX_DISCLAIMER_WINDOW_DAYS).contains(&self.disclaimer_window_days) {
            return Err(EngineError::InvalidConfig(format!(
                "disclaimerWindowDays must be between 1 and {MAX_DISCLAIMER_WINDOW_DAYS}, got {}",
                self.disclaimer_window_days
            )));
        }
        Ok(())
    }

    /// The window as a duration. Out-of-range day counts are clamped into
    /// `1..=MAX_DISCLAIMER_WINDOW_DAYS`; `validate` reports them.
    pub fn disclaimer_window(&self) -> Duration {
        Duration::days(self.disclaimer_window_days.clamp(1, MAX_DISCLAIMER_WINDOW_DAYS))
    }
}
