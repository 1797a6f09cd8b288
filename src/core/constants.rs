//! Geodetic constants, tolerances and planning defaults

/// Mean Earth radius used by the haversine distance (kilometers)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 1e7-scaled degrees per meter of latitude. Kept at single precision so the
/// flat-earth offset reproduces the values autopilots compute.
pub const LOCATION_SCALING_FACTOR_INV: f32 = 89.832_05;

/// Scale between decimal degrees and the integer-degree representation
pub const DEGREES_E7: f64 = 1.0e7;

/// Lower clamp for the longitude scale near the poles
pub const MIN_LONGITUDE_SCALE: f64 = 0.01;

/// Distance within which a point counts as lying on a ring edge (meters)
pub const EDGE_TOLERANCE_M: f64 = 0.01;

/// Distance within which a point counts as a ring vertex (meters)
pub const VERTEX_MATCH_EPSILON_M: f64 = 1.0e-9;

/// Distance within which a point counts as sitting on the ring outline for containment (meters)
pub const ON_BOUNDARY_EPSILON_M: f64 = 1.0e-6;

/// Minimum number of vertices in a ring
pub const MIN_RING_VERTICES: usize = 3;

/// Default minimum length of a sweep row (meters)
pub const DEFAULT_MIN_ROW_LENGTH_M: f64 = 2.0;

/// Default nudge used when shrinking or shifting row endpoints (meters)
pub const DEFAULT_BOUNDARY_NUDGE_M: f64 = 0.01;

/// Default boundary marching step (meters)
pub const DEFAULT_MARCH_STEP_M: f64 = 0.01;

/// Default coarse probe step along segments checked for obstacles (meters)
pub const DEFAULT_OBSTACLE_PROBE_STEP_M: f64 = 1.0;

/// Default limit for the perpendicular orientation probe (whole meters)
pub const DEFAULT_MAX_ORIENTATION_PROBE_M: u32 = 1000;

/// Distance of the first probe toward a neighbouring vertex when the start is a vertex (meters)
pub const VERTEX_PROBE_DISTANCE_M: f64 = 0.5;

/// Default iteration limit for every marching, look-ahead and routing loop
pub const DEFAULT_MAX_LOOP_ITERATIONS: usize = 1_000_000;

/// Largest boundary extent the flat-earth projection is trusted for (meters)
pub const DEFAULT_MAX_MISSION_EXTENT_M: f64 = 1000.0;

/// Header line of the legacy waypoint file
pub const WAYPOINT_FILE_HEADER: &str = "QGC WPL 110";

/// Altitude column emitted for every legacy waypoint line
pub const WAYPOINT_ALTITUDE: &str = "100.000000";
