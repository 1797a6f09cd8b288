//! Planner configuration
//!
//! Tunables of the sweep and the loop limits shared by every planning call.
//! Configuration is stored as JSON; every field may be omitted and falls back
//! to its default.

use crate::algorithms::marching::StepBudget;
use crate::core::constants::*;
use crate::core::types::SweepConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Reading or writing a config file failed
    #[error("config file '{path}': {message}")]
    Io { path: String, message: String },

    /// JSON could not be parsed or produced
    #[error("config serialization failed: {message}")]
    Serialization { message: String },

    /// A value is outside its allowed range
    #[error("invalid value {value} for {parameter}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(parameter: &str, value: impl Display, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Geometric tunables of the sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepTunables {
    /// Rows shorter than this are never emitted (meters)
    pub min_row_length_m: f64,
    /// Step for shrinking and shifting row endpoints (meters)
    pub boundary_nudge_m: f64,
    /// Boundary marching step (meters)
    pub march_step_m: f64,
    /// Coarse step of the obstacle router (meters)
    pub obstacle_probe_step_m: f64,
    /// Furthest perpendicular probe when choosing the sweep side (meters)
    pub max_orientation_probe_m: u32,
}

impl Default for SweepTunables {
    fn default() -> Self {
        Self {
            min_row_length_m: DEFAULT_MIN_ROW_LENGTH_M,
            boundary_nudge_m: DEFAULT_BOUNDARY_NUDGE_M,
            march_step_m: DEFAULT_MARCH_STEP_M,
            obstacle_probe_step_m: DEFAULT_OBSTACLE_PROBE_STEP_M,
            max_orientation_probe_m: DEFAULT_MAX_ORIENTATION_PROBE_M,
        }
    }
}

/// Limits guarding a planning call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Iterations allowed per loop before the call fails
    pub max_loop_iterations: usize,
    /// Wall-clock budget for one call (milliseconds), unlimited when absent
    pub time_budget_ms: Option<u64>,
    /// Boundary extent beyond which a warning is logged (meters)
    pub max_mission_extent_m: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
            time_budget_ms: None,
            max_mission_extent_m: DEFAULT_MAX_MISSION_EXTENT_M,
        }
    }
}

/// Complete planner configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    pub sweep: SweepTunables,
    pub limits: LimitsConfig,
}

impl PlanningConfig {
    /// Loads and validates a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        Self::from_json_str(&content).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::Serialization {
                message: format!("{}: {}", path_str, message),
            },
            other => other,
        })
    }

    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PlanningConfig = serde_json::from_str(json).map_err(|e| ConfigError::Serialization {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
            message: e.to_string(),
        })
    }

    /// Writes the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_json_string()?;
        fs::write(&path, content).map_err(|e| ConfigError::Io {
            path: path.as_ref().to_string_lossy().to_string(),
            message: e.to_string(),
        })
    }

    /// Checks every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sweep = &self.sweep;
        let positive = [
            ("min_row_length_m", sweep.min_row_length_m),
            ("boundary_nudge_m", sweep.boundary_nudge_m),
            ("march_step_m", sweep.march_step_m),
            ("obstacle_probe_step_m", sweep.obstacle_probe_step_m),
            ("max_mission_extent_m", self.limits.max_mission_extent_m),
        ];
        for (parameter, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(parameter, value, "must be a positive number"));
            }
        }

        if sweep.boundary_nudge_m >= sweep.min_row_length_m {
            return Err(ConfigError::invalid(
                "boundary_nudge_m",
                sweep.boundary_nudge_m,
                "must be smaller than min_row_length_m",
            ));
        }

        if sweep.march_step_m > sweep.obstacle_probe_step_m {
            return Err(ConfigError::invalid(
                "march_step_m",
                sweep.march_step_m,
                "must not exceed obstacle_probe_step_m",
            ));
        }

        if sweep.max_orientation_probe_m == 0 {
            return Err(ConfigError::invalid("max_orientation_probe_m", 0, "must be at least 1"));
        }

        if self.limits.max_loop_iterations == 0 {
            return Err(ConfigError::invalid("max_loop_iterations", 0, "must be at least 1"));
        }

        Ok(())
    }

    pub fn with_min_row_length(mut self, meters: f64) -> Self {
        self.sweep.min_row_length_m = meters;
        self
    }

    pub fn with_march_step(mut self, meters: f64) -> Self {
        self.sweep.march_step_m = meters;
        self
    }

    pub fn with_max_loop_iterations(mut self, iterations: usize) -> Self {
        self.limits.max_loop_iterations = iterations;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.limits.time_budget_ms = Some(budget.as_millis() as u64);
        self
    }

    pub fn with_max_mission_extent(mut self, meters: f64) -> Self {
        self.limits.max_mission_extent_m = meters;
        self
    }

    /// Sweep parameters for one call
    pub fn sweep_config(&self, row_spacing_m: f64, heading_deg: f64) -> SweepConfig {
        SweepConfig {
            row_spacing_m,
            heading_deg,
            min_row_length_m: self.sweep.min_row_length_m,
            boundary_nudge_m: self.sweep.boundary_nudge_m,
            march_step_m: self.sweep.march_step_m,
            obstacle_probe_step_m: self.sweep.obstacle_probe_step_m,
            max_orientation_probe_m: self.sweep.max_orientation_probe_m,
        }
    }

    /// Loop guard for one call, its clock starting now
    pub fn step_budget(&self) -> StepBudget {
        StepBudget::new(
            self.limits.max_loop_iterations,
            self.limits.time_budget_ms.map(Duration::from_millis),
        )
    }
}
