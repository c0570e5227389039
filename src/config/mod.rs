//! Configuration module for RxGrid
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. Environment variables (`RXGRID_*`)
//! 2. Configuration file (TOML)
//! 3. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use rxgrid::config::RxGridConfig;
//!
//! // Load defaults
//! let config = RxGridConfig::default();
//! assert_eq!(config.scheduling.max_load, 80);
//!
//! // Parse from TOML
//! let toml = r#"
//! [scheduling]
//! max_load = 100
//! "#;
//! let config: RxGridConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.scheduling.max_load, 100);
//! ```

pub mod error;
pub mod logging;
pub mod pharmacy;
pub mod scheduling;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use pharmacy::PharmacyConfig;
pub use scheduling::{SchedulingConfig, ScoreWeightsConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scheduling::ScheduleParams;

/// Unified configuration for an RxGrid deployment.
///
/// Aggregates the scheduling tuning, logging settings, and the static
/// pharmacy roster seeded into the directory at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RxGridConfig {
    /// Scheduler gate ceilings, time model, and scoring weights
    pub scheduling: SchedulingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Static pharmacy definitions
    pub pharmacies: Vec<PharmacyConfig>,
}

impl RxGridConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports RXGRID_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        // Logging settings
        if let Ok(level) = std::env::var("RXGRID_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RXGRID_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        // Scheduling ceilings
        if let Ok(max_load) = std::env::var("RXGRID_MAX_LOAD") {
            if let Ok(v) = max_load.parse() {
                self.scheduling.max_load = v;
            }
        }
        if let Ok(sla) = std::env::var("RXGRID_SLA_MAX_MIN") {
            if let Ok(v) = sla.parse() {
                self.scheduling.sla_max_min = v;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate scheduling parameters through the runtime type
        ScheduleParams::from(&self.scheduling)
            .validate()
            .map_err(|e| ConfigError::Validation {
                field: "scheduling".to_string(),
                message: e.to_string(),
            })?;

        // Validate pharmacy roster
        let mut seen = std::collections::HashSet::new();
        for (i, pharmacy) in self.pharmacies.iter().enumerate() {
            if pharmacy.node_id.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("pharmacies[{}].node_id", i),
                    message: "node_id cannot be empty".to_string(),
                });
            }
            if pharmacy.name.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("pharmacies[{}].name", i),
                    message: "name cannot be empty".to_string(),
                });
            }
            if !seen.insert(pharmacy.node_id.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("pharmacies[{}].node_id", i),
                    message: format!("duplicate node_id '{}'", pharmacy.node_id),
                });
            }
            if pharmacy.lat.is_some() != pharmacy.lng.is_some() {
                return Err(ConfigError::Validation {
                    field: format!("pharmacies[{}]", i),
                    message: "lat and lng must be set together".to_string(),
                });
            }
        }

        Ok(())
    }
}
