//! Geographic to local-plane conversion
//!
//! The local frame is a flat-earth approximation anchored at one geographic
//! point: `x` grows north and `y` grows east, both in meters. Offsets use the
//! same 1e7-scaled arithmetic as autopilot firmware, so waypoints computed here
//! match what the vehicle computes for the same offsets. The approximation is
//! only trustworthy for sub-kilometer missions.

use crate::core::constants::*;
use crate::core::types::{GeoPoint, PlanarPoint};

/// Great-circle distance between two points in meters (haversine)
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    distance_with_elevation_meters(a, b, 0.0, 0.0)
}

/// Haversine surface distance combined with the elevation difference
pub fn distance_with_elevation_meters(a: &GeoPoint, b: &GeoPoint, elevation_a: f64, elevation_b: f64) -> f64 {
    let lat_distance = (b.latitude - a.latitude).to_radians();
    let lng_distance = (b.longitude - a.longitude).to_radians();

    let h = (lat_distance / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (lng_distance / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    let surface = EARTH_RADIUS_KM * c * 1000.0;

    let height = elevation_a - elevation_b;
    (surface.powi(2) + height.powi(2)).sqrt()
}

/// Shrink factor for east offsets at the given 1e7-scaled latitude
pub fn longitude_scale(latitude_e7: f64) -> f64 {
    let scale = (latitude_e7 / DEGREES_E7).to_radians().cos();
    scale.clamp(MIN_LONGITUDE_SCALE, 1.0)
}

/// Moves `anchor` by the given north and east distances using the flat-earth approximation
pub fn offset(anchor: &GeoPoint, north_m: f64, east_m: f64) -> GeoPoint {
    let mut latitude_e7 = anchor.latitude * DEGREES_E7;
    let mut longitude_e7 = anchor.longitude * DEGREES_E7;

    if north_m != 0.0 || east_m != 0.0 {
        let inv_scale = f64::from(LOCATION_SCALING_FACTOR_INV);
        let dlat = north_m * inv_scale;
        let dlng = (east_m * inv_scale) / longitude_scale(latitude_e7);
        latitude_e7 += dlat;
        longitude_e7 += dlng;
    }

    GeoPoint::new(latitude_e7 / DEGREES_E7, longitude_e7 / DEGREES_E7)
}

/// Local planar frame anchored at a geographic point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    anchor: GeoPoint,
}

impl CoordinateFrame {
    /// Frame in which `reference` is the planar origin
    pub fn new(reference: GeoPoint) -> Self {
        Self { anchor: reference }
    }

    /// Frame in which `reference` sits at the already known planar position
    /// `reference_planar`. The anchor is found by offsetting the reference back
    /// to the origin.
    pub fn from_reference(reference: GeoPoint, reference_planar: PlanarPoint) -> Self {
        Self {
            anchor: offset(&reference, -reference_planar.x, -reference_planar.y),
        }
    }

    /// Geographic position of the planar origin
    pub fn anchor(&self) -> GeoPoint {
        self.anchor
    }

    /// Planar position of a geographic point, the inverse of [`CoordinateFrame::to_geo`]
    pub fn to_planar(&self, point: &GeoPoint) -> PlanarPoint {
        let inv_scale = f64::from(LOCATION_SCALING_FACTOR_INV);
        let anchor_latitude_e7 = self.anchor.latitude * DEGREES_E7;
        let anchor_longitude_e7 = self.anchor.longitude * DEGREES_E7;

        let dlat = point.latitude * DEGREES_E7 - anchor_latitude_e7;
        let dlng = point.longitude * DEGREES_E7 - anchor_longitude_e7;

        PlanarPoint::new(
            dlat / inv_scale,
            dlng * longitude_scale(anchor_latitude_e7) / inv_scale,
        )
    }

    /// Geographic position of a planar point
    pub fn to_geo(&self, point: &PlanarPoint) -> GeoPoint {
        offset(&self.anchor, point.x, point.y)
    }

    /// Projects an ordered list of geographic points
    pub fn project_all(&self, points: &[GeoPoint]) -> Vec<PlanarPoint> {
        points.iter().map(|p| self.to_planar(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn reference() -> GeoPoint {
        GeoPoint::new(30.563625, -87.678372)
    }

    #[test]
    fn test_haversine_distance() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        // One degree on a 6371 km sphere
        assert_abs_diff_eq!(distance_meters(&a, &b), 111_194.93, epsilon = 0.01);
        assert_eq!(distance_meters(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_with_elevation() {
        let a = reference();
        let b = offset(&a, 30.0, 0.0);
        let flat = distance_meters(&a, &b);
        let raised = distance_with_elevation_meters(&a, &b, 40.0, 0.0);
        assert_abs_diff_eq!(raised, (flat * flat + 1600.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_longitude_scale_clamped() {
        assert_abs_diff_eq!(longitude_scale(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(longitude_scale(60.0e7), 0.5, epsilon = 1e-9);
        assert_eq!(longitude_scale(90.0e7), MIN_LONGITUDE_SCALE);
    }

    #[test]
    fn test_offset_matches_measured_distance() {
        let start = reference();
        let north = offset(&start, 100.0, 0.0);
        let east = offset(&start, 0.0, 100.0);

        assert_abs_diff_eq!(north.longitude, start.longitude, epsilon = 1e-12);
        assert_abs_diff_eq!(east.latitude, start.latitude, epsilon = 1e-12);
        // The flat-earth model uses a slightly larger radius than the haversine
        assert_abs_diff_eq!(distance_meters(&start, &north), 100.0, epsilon = 0.2);
        assert_abs_diff_eq!(distance_meters(&start, &east), 100.0, epsilon = 0.2);
    }

    #[test]
    fn test_zero_offset_is_identity() {
        let start = reference();
        let same = offset(&start, 0.0, 0.0);
        assert_abs_diff_eq!(same.latitude, start.latitude, epsilon = 1e-12);
        assert_abs_diff_eq!(same.longitude, start.longitude, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_projection() {
        let frame = CoordinateFrame::new(reference());
        for (north, east) in [(0.0, 0.0), (12.5, -40.0), (-350.0, 800.0), (999.0, 999.0)] {
            let g = offset(&reference(), north, east);
            let back = frame.to_geo(&frame.to_planar(&g));
            assert_abs_diff_eq!(back.latitude, g.latitude, epsilon = 1e-6);
            assert_abs_diff_eq!(back.longitude, g.longitude, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_planar_axes_are_north_and_east() {
        let frame = CoordinateFrame::new(reference());
        let p = frame.to_planar(&offset(&reference(), 20.0, 10.0));
        assert_abs_diff_eq!(p.x, 20.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 10.0, epsilon = 1e-6);
        assert_eq!(frame.to_planar(&reference()), PlanarPoint::ORIGIN);
    }

    #[test]
    fn test_frame_from_known_reference() {
        let reference = reference();
        let frame = CoordinateFrame::from_reference(reference, PlanarPoint::new(5.0, -3.0));
        let p = frame.to_planar(&reference);
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, -3.0, epsilon = 1e-6);

        let origin = frame.to_geo(&PlanarPoint::ORIGIN);
        assert_abs_diff_eq!(origin.latitude, frame.anchor().latitude, epsilon = 1e-12);
        assert_abs_diff_eq!(origin.longitude, frame.anchor().longitude, epsilon = 1e-12);
    }
}
