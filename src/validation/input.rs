//! Checks on the geographic input of a planning call
//!
//! Malformed input is rejected before anything is projected. Input that is
//! well-formed but outside what the flat-earth frame handles well only
//! produces warnings.

use crate::algorithms::polygon::RingKind;
use crate::algorithms::projection::distance_meters;
use crate::core::constants::MIN_RING_VERTICES;
use crate::core::types::{GeoPoint, MissionRequest};
use crate::validation::error::PlanningError;

/// Warnings collected while validating a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validates mission requests
#[derive(Debug, Clone)]
pub struct InputValidator {
    max_mission_extent_m: f64,
}

impl InputValidator {
    pub fn new(max_mission_extent_m: f64) -> Self {
        Self { max_mission_extent_m }
    }

    /// Rejects unusable input and reports anything suspicious
    pub fn validate(&self, request: &MissionRequest) -> Result<ValidationReport, PlanningError> {
        if !request.row_spacing_m.is_finite() || request.row_spacing_m <= 0.0 {
            return Err(PlanningError::InvalidRowSpacing(request.row_spacing_m));
        }
        if !request.heading_deg.is_finite() {
            return Err(PlanningError::InvalidHeading(request.heading_deg));
        }

        check_point(&request.start, "start marker")?;
        check_ring(&request.boundary, RingKind::Boundary)?;
        for (index, obstacle) in request.obstacles.iter().enumerate() {
            check_ring(obstacle, RingKind::Obstacle(index))?;
        }

        let mut report = ValidationReport::default();
        let origin = request.boundary[0];

        let extent = request
            .boundary
            .iter()
            .map(|vertex| distance_meters(&origin, vertex))
            .fold(0.0, f64::max);
        if extent > self.max_mission_extent_m {
            report.warnings.push(format!(
                "boundary spans {:.0} m, beyond the {:.0} m the local projection is accurate for",
                extent, self.max_mission_extent_m
            ));
        }

        let start_distance = distance_meters(&origin, &request.start);
        if start_distance > self.max_mission_extent_m {
            report.warnings.push(format!(
                "start marker is {:.0} m from the boundary",
                start_distance
            ));
        }

        Ok(report)
    }
}

fn check_point(point: &GeoPoint, context: &str) -> Result<(), PlanningError> {
    if !point.is_finite() {
        return Err(PlanningError::non_finite(context));
    }
    if !(-90.0..=90.0).contains(&point.latitude) {
        return Err(PlanningError::out_of_range(
            context,
            format!("latitude {} outside [-90, 90]", point.latitude),
        ));
    }
    if !(-180.0..=180.0).contains(&point.longitude) {
        return Err(PlanningError::out_of_range(
            context,
            format!("longitude {} outside [-180, 180]", point.longitude),
        ));
    }
    Ok(())
}

fn check_ring(points: &[GeoPoint], ring: RingKind) -> Result<(), PlanningError> {
    if points.len() < MIN_RING_VERTICES {
        return Err(PlanningError::TooFewVertices {
            ring,
            count: points.len(),
        });
    }
    for (index, point) in points.iter().enumerate() {
        check_point(point, &format!("{} vertex {}", ring, index))?;
    }
    Ok(())
}
