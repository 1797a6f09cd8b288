//! Coverage mission planner
//!
//! Plans back-and-forth coverage paths for a ground vehicle over a geographic
//! boundary polygon, routing around polygonal obstacles.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{GeoPoint, MissionPath, MissionRequest, PlanarPoint, SweepConfig};
pub use algorithms::mission::plan_mission;
pub use algorithms::projection::{distance_meters, distance_with_elevation_meters, CoordinateFrame};
pub use algorithms::polygon::{Ring, RingKind};
pub use algorithms::sweep::{SweepGenerator, SweepPlan};
pub use validation::{PlanningError, PlanningPhase};
pub use utils::config::{ConfigError, PlanningConfig};
pub use api::{ApiError, ApiResult, MissionPayload, MissionPlanner, OutputFormat};
