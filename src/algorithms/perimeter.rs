//! Shortest walk around a ring between two points on its outline
//!
//! Both points are located on the ring as a parameter: vertex `i` sits at `i`,
//! a point a fraction `t` along the edge from vertex `i` sits at `i + t`. A walk
//! in either direction then visits exactly the vertices whose parameters lie
//! strictly between the two points, which handles vertex and edge endpoints
//! the same way.

use crate::algorithms::polygon::{point_to_segment_distance, Ring};
use crate::core::constants::EDGE_TOLERANCE_M;
use crate::core::types::PlanarPoint;
use crate::validation::error::PlanningError;

/// Where a point sits on a ring outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingPosition {
    /// On vertex `index`
    Vertex(usize),
    /// On the edge leaving vertex `from`, a fraction `t` of the way along
    Edge { from: usize, t: f64 },
}

impl RingPosition {
    /// Position along the ring in vertex units, in `[0, len)`
    fn parameter(&self, len: usize) -> f64 {
        match *self {
            RingPosition::Vertex(index) => index as f64,
            RingPosition::Edge { from, t } => {
                let parameter = from as f64 + t;
                if parameter >= len as f64 {
                    parameter - len as f64
                } else {
                    parameter
                }
            }
        }
    }
}

/// Direction of a walk in vertex-index order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDirection {
    Decreasing,
    Increasing,
}

/// Result of [`shortest_perimeter_path`]
#[derive(Debug, Clone, PartialEq)]
pub struct PerimeterPath {
    /// Vertices passed on the way, followed by the destination
    pub points: Vec<PlanarPoint>,
    /// Walk length in meters
    pub length: f64,
    pub direction: WalkDirection,
}

/// Locates `point` on the outline of `ring`.
///
/// Exact vertex matches win; otherwise the first edge, in index order, within
/// [`EDGE_TOLERANCE_M`] of the point is used.
pub fn classify(ring: &Ring, point: &PlanarPoint) -> Result<RingPosition, PlanningError> {
    if let Some(index) = ring.vertex_index(point) {
        return Ok(RingPosition::Vertex(index));
    }

    for from in 0..ring.vertex_count() {
        let (a, b) = ring.edge(from);
        if point_to_segment_distance(point, &a, &b) <= EDGE_TOLERANCE_M {
            let edge = b - a;
            let t = ((*point - a).dot(&edge) / edge.norm_squared()).clamp(0.0, 1.0);
            return Ok(RingPosition::Edge { from, t });
        }
    }

    Err(PlanningError::PointNotOnRing {
        ring: ring.kind(),
        x: point.x,
        y: point.y,
        tolerance: EDGE_TOLERANCE_M,
    })
}

/// Vertex indices strictly between parameters `from` and `to`, in walk order
fn walk_indices(len: usize, from: f64, to: f64, direction: WalkDirection) -> Vec<usize> {
    let n = len as f64;
    let modulus = len as i64;

    match direction {
        WalkDirection::Increasing => {
            let end = if to > from {
                to
            } else if to < from {
                to + n
            } else {
                return Vec::new();
            };
            let first = from.floor() as i64 + 1;
            let last = end.ceil() as i64 - 1;
            (first..=last).map(|k| k.rem_euclid(modulus) as usize).collect()
        }
        WalkDirection::Decreasing => {
            let end = if to < from {
                to
            } else if to > from {
                to - n
            } else {
                return Vec::new();
            };
            let first = from.ceil() as i64 - 1;
            let last = end.floor() as i64 + 1;
            (last..=first).rev().map(|k| k.rem_euclid(modulus) as usize).collect()
        }
    }
}

fn walk_length(ring: &Ring, from: &PlanarPoint, indices: &[usize], to: &PlanarPoint) -> f64 {
    let mut length = 0.0;
    let mut previous = *from;
    for &index in indices {
        let vertex = ring.vertex(index);
        length += previous.distance(&vertex);
        previous = vertex;
    }
    length + previous.distance(to)
}

/// Shorter of the two walks around `ring` from `from` to `to`.
///
/// The returned points exclude `from` and end with `to`. Equal walks resolve
/// to the decreasing direction. Fails when either point is not on the outline.
pub fn shortest_perimeter_path(
    ring: &Ring,
    from: &PlanarPoint,
    to: &PlanarPoint,
) -> Result<PerimeterPath, PlanningError> {
    let len = ring.vertex_count();
    let start = classify(ring, from)?.parameter(len);
    let end = classify(ring, to)?.parameter(len);

    let decreasing = walk_indices(len, start, end, WalkDirection::Decreasing);
    let increasing = walk_indices(len, start, end, WalkDirection::Increasing);
    let decreasing_length = walk_length(ring, from, &decreasing, to);
    let increasing_length = walk_length(ring, from, &increasing, to);

    let (indices, length, direction) = if decreasing_length <= increasing_length {
        (decreasing, decreasing_length, WalkDirection::Decreasing)
    } else {
        (increasing, increasing_length, WalkDirection::Increasing)
    };

    let mut points: Vec<PlanarPoint> = indices.into_iter().map(|i| ring.vertex(i)).collect();
    points.push(*to);

    Ok(PerimeterPath {
        points,
        length,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::polygon::RingKind;
    use approx::assert_abs_diff_eq;

    fn square() -> Ring {
        Ring::new(
            RingKind::Boundary,
            vec![
                PlanarPoint::new(0.0, 0.0),
                PlanarPoint::new(10.0, 0.0),
                PlanarPoint::new(10.0, 10.0),
                PlanarPoint::new(0.0, 10.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_adjacent_vertices_take_the_direct_edge() {
        let ring = square();
        let path = shortest_perimeter_path(&ring, &PlanarPoint::new(0.0, 0.0), &PlanarPoint::new(10.0, 0.0)).unwrap();
        assert_abs_diff_eq!(path.length, 10.0, epsilon = 1e-12);
        assert_eq!(path.points, vec![PlanarPoint::new(10.0, 0.0)]);
        assert_eq!(path.direction, WalkDirection::Increasing);
    }

    #[test]
    fn test_classify_positions() {
        let ring = square();
        assert_eq!(classify(&ring, &PlanarPoint::new(10.0, 10.0)).unwrap(), RingPosition::Vertex(2));

        match classify(&ring, &PlanarPoint::new(10.005, 4.0)).unwrap() {
            RingPosition::Edge { from, t } => {
                assert_eq!(from, 1);
                assert_abs_diff_eq!(t, 0.4, epsilon = 1e-9);
            }
            other => panic!("expected edge, got {:?}", other),
        }

        match classify(&ring, &PlanarPoint::new(0.0, 2.5)).unwrap() {
            RingPosition::Edge { from, .. } => assert_eq!(from, 3),
            other => panic!("expected closing edge, got {:?}", other),
        }
    }

    #[test]
    fn test_point_off_the_outline_is_an_error() {
        let ring = square();
        let error = shortest_perimeter_path(&ring, &PlanarPoint::new(5.0, 5.0), &PlanarPoint::new(10.0, 0.0)).unwrap_err();
        assert!(matches!(error, PlanningError::PointNotOnRing { .. }));

        // Just beyond the tolerance
        assert!(classify(&ring, &PlanarPoint::new(5.0, -0.011)).is_err());
    }

    #[test]
    fn test_edge_to_edge_around_a_corner() {
        let ring = square();
        // Bottom edge to right edge, around vertex 1
        let path = shortest_perimeter_path(&ring, &PlanarPoint::new(7.0, 0.0), &PlanarPoint::new(10.0, 2.0)).unwrap();
        assert_eq!(path.points, vec![PlanarPoint::new(10.0, 0.0), PlanarPoint::new(10.0, 2.0)]);
        assert_abs_diff_eq!(path.length, 5.0, epsilon = 1e-12);
        assert_eq!(path.direction, WalkDirection::Increasing);
    }

    #[test]
    fn test_walk_across_the_closing_edge() {
        let ring = square();
        // Left edge (closing edge 3 -> 0) to bottom edge
        let path = shortest_perimeter_path(&ring, &PlanarPoint::new(0.0, 3.0), &PlanarPoint::new(4.0, 0.0)).unwrap();
        assert_eq!(path.points, vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(4.0, 0.0)]);
        assert_abs_diff_eq!(path.length, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_same_edge_goes_straight() {
        let ring = square();
        let path = shortest_perimeter_path(&ring, &PlanarPoint::new(10.0, 2.0), &PlanarPoint::new(10.0, 8.0)).unwrap();
        assert_eq!(path.points, vec![PlanarPoint::new(10.0, 8.0)]);
        assert_abs_diff_eq!(path.length, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertex_to_edge() {
        let ring = square();
        let path = shortest_perimeter_path(&ring, &PlanarPoint::new(0.0, 10.0), &PlanarPoint::new(10.0, 9.0)).unwrap();
        assert_eq!(path.points, vec![PlanarPoint::new(10.0, 10.0), PlanarPoint::new(10.0, 9.0)]);
        assert_abs_diff_eq!(path.length, 11.0, epsilon = 1e-12);
        assert_eq!(path.direction, WalkDirection::Decreasing);
    }

    #[test]
    fn test_tie_prefers_decreasing_walk() {
        let ring = square();
        // Opposite corners are 20 m apart either way
        let path = shortest_perimeter_path(&ring, &PlanarPoint::new(0.0, 0.0), &PlanarPoint::new(10.0, 10.0)).unwrap();
        assert_eq!(path.direction, WalkDirection::Decreasing);
        assert_eq!(path.points, vec![PlanarPoint::new(0.0, 10.0), PlanarPoint::new(10.0, 10.0)]);
        assert_abs_diff_eq!(path.length, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_same_point_is_empty_walk() {
        let ring = square();
        let point = PlanarPoint::new(4.0, 0.0);
        let path = shortest_perimeter_path(&ring, &point, &point).unwrap();
        assert_eq!(path.points, vec![point]);
        assert_eq!(path.length, 0.0);
    }

    #[test]
    fn test_near_edge_points_within_tolerance() {
        let ring = square();
        // Points marched to within a centimetre of the outline still classify
        let path = shortest_perimeter_path(&ring, &PlanarPoint::new(9.995, 5.0), &PlanarPoint::new(5.0, 9.993)).unwrap();
        assert_eq!(path.points.len(), 2);
        assert_eq!(path.points[0], PlanarPoint::new(10.0, 10.0));
    }
}
