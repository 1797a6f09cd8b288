//! The planning call
//!
//! Projects the request into a frame anchored at the first boundary vertex,
//! runs the sweep and projects the path back. Each call builds its own rings
//! and budget; nothing is kept between calls.

use crate::algorithms::projection::CoordinateFrame;
use crate::algorithms::polygon::{Ring, RingKind};
use crate::algorithms::sweep::SweepGenerator;
use crate::core::constants::VERTEX_MATCH_EPSILON_M;
use crate::core::types::{GeoPoint, MissionPath, MissionRequest};
use crate::utils::config::PlanningConfig;
use crate::validation::error::PlanningError;
use crate::validation::input::InputValidator;
use tracing::{info, warn};

/// Plans a coverage mission for `request`.
///
/// The first waypoint is the caller's start marker when it was used as is, or
/// the caller's boundary vertex when the start was snapped to one.
///
/// A start whose first row is too short is moved sideways, or onto an edge
/// beside the nearest boundary vertex when sideways moves cannot lengthen the
/// row. Row spacing below the march step is rejected.
pub fn plan_mission(request: &MissionRequest, config: &PlanningConfig) -> Result<MissionPath, PlanningError> {
    config.validate()?;
    let report = InputValidator::new(config.limits.max_mission_extent_m).validate(request)?;
    for warning in &report.warnings {
        warn!(%warning, "questionable mission input");
    }

    let anchor = request
        .boundary
        .first()
        .copied()
        .ok_or(PlanningError::TooFewVertices {
            ring: RingKind::Boundary,
            count: 0,
        })?;
    let frame = CoordinateFrame::new(anchor);

    let boundary = Ring::new(RingKind::Boundary, frame.project_all(&request.boundary))?;
    let obstacles = request
        .obstacles
        .iter()
        .enumerate()
        .map(|(index, ring)| Ring::new(RingKind::Obstacle(index), frame.project_all(ring)))
        .collect::<Result<Vec<_>, _>>()?;

    let sweep = config.sweep_config(request.row_spacing_m, request.heading_deg);
    let budget = config.step_budget();
    let start = frame.to_planar(&request.start);
    let plan = SweepGenerator::new(boundary, &obstacles, &sweep, &budget).generate(&start)?;

    let mut waypoints: Vec<GeoPoint> = plan.points.iter().map(|p| frame.to_geo(p)).collect();
    if !plan.start_adjusted {
        if let (Some(first), Some(planar)) = (waypoints.first_mut(), plan.points.first()) {
            let original = match plan.snapped_vertex {
                None => Some(request.start),
                Some(_) => request
                    .boundary
                    .iter()
                    .find(|vertex| frame.to_planar(vertex).distance(planar) <= VERTEX_MATCH_EPSILON_M)
                    .copied(),
            };
            if let Some(original) = original {
                *first = original;
            }
        }
    }

    let path = MissionPath::new(waypoints, plan.rows, plan.snapped_vertex.is_some());
    info!(
        rows = path.row_count(),
        waypoints = path.len(),
        length_m = path.length_meters(),
        start_snapped = path.start_snapped(),
        "mission planned"
    );
    Ok(path)
}
