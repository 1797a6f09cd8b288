//! Blocking planner API
//!
//! Planning runs to completion on the calling thread. Each call is independent,
//! so one planner can serve any number of requests.

use crate::algorithms::mission::plan_mission;
use crate::api::formatting::{JsonFormatter, MissionFormatter};
use crate::api::types::{ApiResult, MissionPayload};
use crate::core::types::{MissionPath, MissionRequest};
use crate::utils::config::PlanningConfig;
use tracing::debug;

/// Synchronous mission planner
#[derive(Debug, Clone, Default)]
pub struct MissionPlanner {
    config: PlanningConfig,
}

impl MissionPlanner {
    /// Planner with a validated configuration
    pub fn new(config: PlanningConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn plan(&self, request: &MissionRequest) -> ApiResult<MissionPath> {
        Ok(plan_mission(request, &self.config)?)
    }

    /// Plans from a JSON request body
    pub fn plan_payload(&self, body: &str, row_spacing_override: Option<f64>) -> ApiResult<MissionPath> {
        let payload = MissionPayload::from_json(body)?;
        let request = payload.into_request(row_spacing_override)?;
        debug!(
            vertices = request.boundary.len(),
            obstacles = request.obstacles.len(),
            heading_deg = request.heading_deg,
            row_spacing_m = request.row_spacing_m,
            "decoded mission payload"
        );
        self.plan(&request)
    }

    /// Plans from a JSON request body and returns the JSON response body
    pub fn plan_json(&self, body: &str, row_spacing_override: Option<f64>) -> ApiResult<String> {
        let mission = self.plan_payload(body, row_spacing_override)?;
        JsonFormatter::new().format(&mission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::projection::offset;
    use crate::api::types::{ApiError, HeadingValue};
    use crate::core::types::GeoPoint;

    fn body(width: Option<f64>) -> String {
        let anchor = GeoPoint::new(30.563625, -87.678372);
        let polygon: Vec<GeoPoint> = [(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]
            .iter()
            .map(|&(north, east)| offset(&anchor, north, east))
            .collect();
        let payload = MissionPayload {
            start_marker: anchor,
            mission_polygon: polygon,
            poly_obstacles: Vec::new(),
            heading: HeadingValue::Text("0".to_string()),
            mowing_path_width_in_meters: width,
        };
        serde_json::to_string(&payload).unwrap()
    }

    #[test]
    fn test_plan_json_round_trip() {
        let planner = MissionPlanner::default();
        let response = planner.plan_json(&body(Some(2.0)), None).unwrap();

        let waypoints: Vec<GeoPoint> = serde_json::from_str(&response).unwrap();
        assert_eq!(waypoints.len(), 10);
        assert!((waypoints[0].latitude - 30.563625).abs() < 1e-12);
        assert!((waypoints[0].longitude + 87.678372).abs() < 1e-12);
    }

    #[test]
    fn test_override_spacing() {
        let planner = MissionPlanner::default();
        // 5 m spacing fits rows at 0 and 5 m
        let mission = planner.plan_payload(&body(Some(2.0)), Some(5.0)).unwrap();
        assert_eq!(mission.row_count(), 2);
    }

    #[test]
    fn test_errors_surface_by_kind() {
        let planner = MissionPlanner::default();
        assert!(matches!(
            planner.plan_payload(&body(None), None).unwrap_err(),
            ApiError::InvalidRequest { .. }
        ));
        assert!(matches!(
            planner.plan_payload(&body(Some(-1.0)), None).unwrap_err(),
            ApiError::Planning(_)
        ));
        assert!(matches!(planner.plan_payload("[]", None).unwrap_err(), ApiError::Json(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlanningConfig::default().with_max_loop_iterations(0);
        assert!(matches!(MissionPlanner::new(config).unwrap_err(), ApiError::Config(_)));
    }
}
