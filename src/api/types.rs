//! Request payload and API error types

use crate::core::types::{GeoPoint, MissionRequest};
use crate::utils::config::ConfigError;
use crate::validation::error::PlanningError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The payload is well-formed JSON but not a usable request
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        ApiError::InvalidRequest { reason: reason.into() }
    }
}

/// Heading as sent by clients, either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeadingValue {
    Number(f64),
    Text(String),
}

impl HeadingValue {
    /// Heading in degrees
    pub fn degrees(&self) -> ApiResult<f64> {
        match self {
            HeadingValue::Number(degrees) => Ok(*degrees),
            HeadingValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| ApiError::invalid_request(format!("heading '{}' is not a number", text))),
        }
    }
}

/// Mission request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionPayload {
    pub start_marker: GeoPoint,
    pub mission_polygon: Vec<GeoPoint>,
    #[serde(default)]
    pub poly_obstacles: Vec<Vec<GeoPoint>>,
    pub heading: HeadingValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mowing_path_width_in_meters: Option<f64>,
}

impl MissionPayload {
    pub fn from_json(json: &str) -> ApiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the planning request. `row_spacing_override` takes precedence
    /// over the width carried in the body.
    pub fn into_request(self, row_spacing_override: Option<f64>) -> ApiResult<MissionRequest> {
        let heading_deg = self.heading.degrees()?;
        let row_spacing_m = row_spacing_override
            .or(self.mowing_path_width_in_meters)
            .ok_or_else(|| ApiError::invalid_request("no row spacing given (mowingPathWidthInMeters)"))?;

        Ok(MissionRequest {
            start: self.start_marker,
            boundary: self.mission_polygon,
            obstacles: self.poly_obstacles,
            heading_deg,
            row_spacing_m,
        })
    }
}

/// Output encodings of a planned mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON array of `{"lat", "lng"}` objects
    Json,
    /// Tab-separated autopilot waypoint file
    WaypointFile,
}

impl FromStr for OutputFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "waypoints" | "wpl" => Ok(OutputFormat::WaypointFile),
            other => Err(ApiError::invalid_request(format!("unknown output format '{}'", other))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::WaypointFile => f.write_str("waypoints"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "startMarker": {"lat": 30.5636, "lng": -87.6784},
        "missionPolygon": [
            {"lat": 30.5636, "lng": -87.6784},
            {"lat": 30.5638, "lng": -87.6784},
            {"lat": 30.5638, "lng": -87.6782}
        ],
        "heading": "90",
        "mowingPathWidthInMeters": 0.4
    }"#;

    #[test]
    fn test_decode_payload_with_string_heading() {
        let payload = MissionPayload::from_json(BODY).unwrap();
        assert_eq!(payload.heading, HeadingValue::Text("90".to_string()));
        assert!(payload.poly_obstacles.is_empty());

        let request = payload.into_request(None).unwrap();
        assert_eq!(request.heading_deg, 90.0);
        assert_eq!(request.row_spacing_m, 0.4);
        assert_eq!(request.boundary.len(), 3);
        assert_eq!(request.start, GeoPoint::new(30.5636, -87.6784));
    }

    #[test]
    fn test_numeric_heading_and_obstacles() {
        let body = BODY
            .replace(r#""heading": "90""#, r#""heading": 45.5"#)
            .replace(
                r#""mowingPathWidthInMeters": 0.4"#,
                r#""polyObstacles": [[{"lat":1.0,"lng":2.0},{"lat":1.0,"lng":2.1},{"lat":1.1,"lng":2.0}]]"#,
            );
        let payload = MissionPayload::from_json(&body).unwrap();
        assert_eq!(payload.heading.degrees().unwrap(), 45.5);
        assert_eq!(payload.poly_obstacles.len(), 1);

        let request = payload.into_request(Some(1.5)).unwrap();
        assert_eq!(request.row_spacing_m, 1.5);
        assert_eq!(request.obstacles[0].len(), 3);
    }

    #[test]
    fn test_override_wins_over_body_width() {
        let request = MissionPayload::from_json(BODY).unwrap().into_request(Some(2.0)).unwrap();
        assert_eq!(request.row_spacing_m, 2.0);
    }

    #[test]
    fn test_missing_width_is_invalid_request() {
        let mut value: serde_json::Value = serde_json::from_str(BODY).unwrap();
        value.as_object_mut().unwrap().remove("mowingPathWidthInMeters");
        let payload = MissionPayload::from_json(&value.to_string()).unwrap();
        assert_eq!(payload.mowing_path_width_in_meters, None);
        assert!(matches!(
            payload.into_request(None).unwrap_err(),
            ApiError::InvalidRequest { .. }
        ));
    }

    #[test]
    fn test_bad_heading_text() {
        let body = BODY.replace(r#""heading": "90""#, r#""heading": "east""#);
        let error = MissionPayload::from_json(&body).unwrap().into_request(None).unwrap_err();
        assert!(error.to_string().contains("east"));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(MissionPayload::from_json("{\"startMarker\": 5}"), Err(ApiError::Json(_))));
        assert!(matches!(MissionPayload::from_json("not json"), Err(ApiError::Json(_))));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Waypoints".parse::<OutputFormat>().unwrap(), OutputFormat::WaypointFile);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::WaypointFile.to_string(), "waypoints");
    }
}
