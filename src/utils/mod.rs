//! Planner configuration

pub mod config;

pub use config::{ConfigError, LimitsConfig, PlanningConfig, SweepTunables};
