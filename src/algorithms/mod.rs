//! Coverage planning algorithms

pub mod projection;
pub mod polygon;
pub mod marching;
pub mod perimeter;
pub mod obstacles;
pub mod sweep;
pub mod mission;

pub use projection::CoordinateFrame;
pub use polygon::{Ring, RingKind};
pub use marching::{BoundaryMarcher, StepBudget};
pub use perimeter::{shortest_perimeter_path, PerimeterPath};
pub use obstacles::ObstacleRouter;
pub use sweep::{SweepGenerator, SweepPlan};
pub use mission::plan_mission;
