//! Core types and constants for the coverage mission planner

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
