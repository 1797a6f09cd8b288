//! Core data types for mission planning

use crate::algorithms::projection::distance_meters;
use crate::core::constants::*;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Point in the local tangent plane: `x` meters north and `y` meters east of the frame anchor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const ORIGIN: PlanarPoint = PlanarPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in meters
    pub fn distance(&self, other: &PlanarPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &PlanarPoint) -> PlanarPoint {
        PlanarPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector2<f64>> for PlanarPoint {
    fn from(v: Vector2<f64>) -> Self {
        PlanarPoint::new(v.x, v.y)
    }
}

impl Add<Vector2<f64>> for PlanarPoint {
    type Output = PlanarPoint;

    fn add(self, rhs: Vector2<f64>) -> PlanarPoint {
        PlanarPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector2<f64>> for PlanarPoint {
    type Output = PlanarPoint;

    fn sub(self, rhs: Vector2<f64>) -> PlanarPoint {
        PlanarPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub for PlanarPoint {
    type Output = Vector2<f64>;

    fn sub(self, rhs: PlanarPoint) -> Vector2<f64> {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Parameters for one sweep: the per-call spacing and heading plus the planner tunables
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Distance between neighbouring rows (meters)
    pub row_spacing_m: f64,
    /// Row heading, degrees clockwise from north
    pub heading_deg: f64,
    /// Rows shorter than this are never emitted (meters)
    pub min_row_length_m: f64,
    /// Step used when shrinking or shifting row endpoints (meters)
    pub boundary_nudge_m: f64,
    /// Boundary marching step (meters)
    pub march_step_m: f64,
    /// Coarse probe step used by the obstacle router (meters)
    pub obstacle_probe_step_m: f64,
    /// Furthest perpendicular probe when choosing the sweep side (whole meters)
    pub max_orientation_probe_m: u32,
}

impl SweepConfig {
    /// Sweep with default tunables
    pub fn new(row_spacing_m: f64, heading_deg: f64) -> Self {
        Self {
            row_spacing_m,
            heading_deg,
            min_row_length_m: DEFAULT_MIN_ROW_LENGTH_M,
            boundary_nudge_m: DEFAULT_BOUNDARY_NUDGE_M,
            march_step_m: DEFAULT_MARCH_STEP_M,
            obstacle_probe_step_m: DEFAULT_OBSTACLE_PROBE_STEP_M,
            max_orientation_probe_m: DEFAULT_MAX_ORIENTATION_PROBE_M,
        }
    }

    pub fn heading_radians(&self) -> f64 {
        self.heading_deg.to_radians()
    }

    /// Probe step used when looking for further sections along a row.
    /// Never coarse enough to skip over a section of minimum row length.
    pub fn look_ahead_step(&self) -> f64 {
        self.row_spacing_m
            .min(self.min_row_length_m - self.boundary_nudge_m)
    }
}

/// Geographic input of one planning call
#[derive(Debug, Clone, PartialEq)]
pub struct MissionRequest {
    /// Vehicle start marker, may lie outside the boundary
    pub start: GeoPoint,
    /// Mission boundary vertices, implicitly closed
    pub boundary: Vec<GeoPoint>,
    /// Obstacle rings inside the boundary
    pub obstacles: Vec<Vec<GeoPoint>>,
    /// Row heading, degrees clockwise from north
    pub heading_deg: f64,
    /// Distance between rows (meters)
    pub row_spacing_m: f64,
}

impl MissionRequest {
    pub fn new(start: GeoPoint, boundary: Vec<GeoPoint>, heading_deg: f64, row_spacing_m: f64) -> Self {
        Self {
            start,
            boundary,
            obstacles: Vec::new(),
            heading_deg,
            row_spacing_m,
        }
    }

    pub fn with_obstacle(mut self, obstacle: Vec<GeoPoint>) -> Self {
        self.obstacles.push(obstacle);
        self
    }
}

/// Ordered waypoints of a planned mission
#[derive(Debug, Clone, PartialEq)]
pub struct MissionPath {
    waypoints: Vec<GeoPoint>,
    row_count: usize,
    start_snapped: bool,
}

impl MissionPath {
    pub fn new(waypoints: Vec<GeoPoint>, row_count: usize, start_snapped: bool) -> Self {
        Self {
            waypoints,
            row_count,
            start_snapped,
        }
    }

    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    pub fn into_waypoints(self) -> Vec<GeoPoint> {
        self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First waypoint, the validated start
    pub fn start(&self) -> Option<&GeoPoint> {
        self.waypoints.first()
    }

    /// Number of sweep rows in the mission
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Whether the caller's start lay outside the boundary and was replaced by a vertex
    pub fn start_snapped(&self) -> bool {
        self.start_snapped
    }

    /// Great-circle length of the whole path in meters
    pub fn length_meters(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|leg| distance_meters(&leg[0], &leg[1]))
            .sum()
    }
}
