use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Default criticality tolerance in hours.
pub const DEFAULT_FLOAT_TOLERANCE_HOURS: f64 = 0.01;

/// What the graph builder does with a dependency naming an unknown activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Drop the edge and log a warning.
    #[default]
    Permissive,
    /// Fail graph construction.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpmConfig {
    pub float_tolerance_hours: f64,
    pub edge_policy: EdgePolicy,
    /// Clock origin used when no activity carries a planned start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_critical_paths: Option<usize>,
    pub hours_per_day: f64,
}

impl Default for CpmConfig {
    fn default() -> Self {
        Self {
            float_tolerance_hours: DEFAULT_FLOAT_TOLERANCE_HOURS,
            edge_policy: EdgePolicy::Permissive,
            project_start: None,
            max_cycles: None,
            max_critical_paths: None,
            hours_per_day: 8.0,
        }
    }
}

impl CpmConfig {
    pub fn strict() -> Self {
        Self {
            edge_policy: EdgePolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_project_start(mut self, start: NaiveDateTime) -> Self {
        self.project_start = Some(start);
        self
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: CpmConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.float_tolerance_hours.is_finite() || self.float_tolerance_hours < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "float_tolerance_hours must be a non-negative number (got {})",
                self.float_tolerance_hours
            )));
        }
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hours_per_day must be positive (got {})",
                self.hours_per_day
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
