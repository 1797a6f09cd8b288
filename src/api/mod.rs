//! Planner API
//!
//! JSON request decoding, output formatting and the blocking planner entry point.

pub mod blocking;
pub mod formatting;
pub mod types;

pub use blocking::MissionPlanner;
pub use formatting::{formatter_for, waypoint_line, JsonFormatter, MissionFormatter, WaypointFileFormatter};
pub use types::{ApiError, ApiResult, HeadingValue, MissionPayload, OutputFormat};
