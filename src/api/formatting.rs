//! Output formatting for planned missions

use crate::api::types::{ApiResult, OutputFormat};
use crate::core::constants::{WAYPOINT_ALTITUDE, WAYPOINT_FILE_HEADER};
use crate::core::types::{GeoPoint, MissionPath};

/// Renders a mission as text
pub trait MissionFormatter {
    fn format(&self, mission: &MissionPath) -> ApiResult<String>;
}

/// JSON array of waypoints, the response body of the planning endpoint
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl MissionFormatter for JsonFormatter {
    fn format(&self, mission: &MissionPath) -> ApiResult<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(mission.waypoints())?
        } else {
            serde_json::to_string(mission.waypoints())?
        };
        Ok(json)
    }
}

/// Autopilot waypoint file, one tab-separated record per waypoint
#[derive(Debug, Clone)]
pub struct WaypointFileFormatter {
    /// Emit the file header line
    pub include_header: bool,
}

impl Default for WaypointFileFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl WaypointFileFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_header() -> Self {
        Self { include_header: false }
    }
}

impl MissionFormatter for WaypointFileFormatter {
    fn format(&self, mission: &MissionPath) -> ApiResult<String> {
        let mut lines = Vec::with_capacity(mission.len() + 1);
        if self.include_header {
            lines.push(WAYPOINT_FILE_HEADER.to_string());
        }
        lines.extend(
            mission
                .waypoints()
                .iter()
                .enumerate()
                .map(|(index, point)| waypoint_line(index, point)),
        );

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

/// One waypoint record: sequence, frame and command fields, then position and altitude
pub fn waypoint_line(index: usize, point: &GeoPoint) -> String {
    format!(
        "{}\t0\t3\t16\t0\t0\t0\t0\t{}\t{}\t{}\t1",
        index, point.latitude, point.longitude, WAYPOINT_ALTITUDE
    )
}

/// Formatter for the given output format
pub fn formatter_for(format: OutputFormat, include_header: bool) -> Box<dyn MissionFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::WaypointFile => Box::new(WaypointFileFormatter { include_header }),
    }
}
