//! Polygon primitives in the local plane
//!
//! A [`Ring`] is a closed vertex loop used for the mission boundary and for
//! every obstacle. Containment treats the outline itself as inside, so points
//! marched along an edge or parked on a vertex stay contained.

use crate::core::constants::*;
use crate::core::types::PlanarPoint;
use crate::validation::error::PlanningError;
use std::fmt;

/// What a ring outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    /// The mission boundary
    Boundary,
    /// An obstacle, by its position in the request
    Obstacle(usize),
}

impl fmt::Display for RingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingKind::Boundary => f.write_str("boundary"),
            RingKind::Obstacle(index) => write!(f, "obstacle {}", index),
        }
    }
}

/// Axis-aligned bounds of a ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Inclusive containment
    pub fn contains(&self, point: &PlanarPoint) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    pub fn diagonal(&self) -> f64 {
        (self.max_x - self.min_x).hypot(self.max_y - self.min_y)
    }
}

/// Closed polygon outline with at least three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    kind: RingKind,
    vertices: Vec<PlanarPoint>,
}

impl Ring {
    /// Builds a ring, dropping repeated consecutive vertices and a closing
    /// vertex that repeats the first one.
    pub fn new(kind: RingKind, vertices: Vec<PlanarPoint>) -> Result<Self, PlanningError> {
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(PlanningError::non_finite(format!("{} vertex {}", kind, index)));
        }

        let mut distinct: Vec<PlanarPoint> = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            if distinct.last() != Some(&vertex) {
                distinct.push(vertex);
            }
        }
        while distinct.len() > 1 && distinct.first() == distinct.last() {
            distinct.pop();
        }

        if distinct.len() < MIN_RING_VERTICES {
            return Err(PlanningError::TooFewVertices {
                ring: kind,
                count: distinct.len(),
            });
        }

        Ok(Self {
            kind,
            vertices: distinct,
        })
    }

    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn vertices(&self) -> &[PlanarPoint] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex at `index`, wrapping around the ring
    pub fn vertex(&self, index: usize) -> PlanarPoint {
        self.vertices[index % self.vertices.len()]
    }

    /// Edge from vertex `index` to the next vertex
    pub fn edge(&self, index: usize) -> (PlanarPoint, PlanarPoint) {
        (self.vertex(index), self.vertex(index + 1))
    }

    /// All edges including the closing one
    pub fn edges(&self) -> impl Iterator<Item = (PlanarPoint, PlanarPoint)> + '_ {
        (0..self.vertices.len()).map(move |i| self.edge(i))
    }

    /// Non-zero winding number of the ring around `point`
    pub fn winding_number(&self, point: &PlanarPoint) -> i32 {
        let mut winding = 0;
        for (a, b) in self.edges() {
            if a.y <= point.y {
                if b.y > point.y && cross(&a, &b, point) > 0.0 {
                    winding += 1;
                }
            } else if b.y <= point.y && cross(&a, &b, point) < 0.0 {
                winding -= 1;
            }
        }
        winding
    }

    /// Whether `point` lies on the outline
    pub fn is_on_boundary(&self, point: &PlanarPoint) -> bool {
        self.edges()
            .any(|(a, b)| point_to_segment_distance(point, &a, &b) <= ON_BOUNDARY_EPSILON_M)
    }

    /// Point-in-ring test; the outline counts as inside
    pub fn contains(&self, point: &PlanarPoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        self.winding_number(point) != 0 || self.is_on_boundary(point)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bounds = BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for v in &self.vertices {
            bounds.min_x = bounds.min_x.min(v.x);
            bounds.min_y = bounds.min_y.min(v.y);
            bounds.max_x = bounds.max_x.max(v.x);
            bounds.max_y = bounds.max_y.max(v.y);
        }
        bounds
    }

    /// Index of the vertex closest to `point`
    pub fn nearest_vertex(&self, point: &PlanarPoint) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, vertex) in self.vertices.iter().enumerate() {
            let distance = vertex.distance(point);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }

    /// Index of the vertex `point` coincides with, if any
    pub fn vertex_index(&self, point: &PlanarPoint) -> Option<usize> {
        self.vertices
            .iter()
            .position(|v| v.distance(point) <= VERTEX_MATCH_EPSILON_M)
    }

    /// Same outline with vertex `start` moved to index 0
    pub fn rotated(&self, start: usize) -> Ring {
        let mut vertices = self.vertices.clone();
        vertices.rotate_left(start % self.vertices.len());
        Ring {
            kind: self.kind,
            vertices,
        }
    }

    /// Whether any edge touches or crosses the segment `a`-`b`
    pub fn intersects_segment(&self, a: &PlanarPoint, b: &PlanarPoint) -> bool {
        self.edges().any(|(p, q)| segments_intersect(a, b, &p, &q))
    }
}

/// Twice the signed area of the triangle `a`, `b`, `p`; positive when `p` is left of `a`-`b`
fn cross(a: &PlanarPoint, b: &PlanarPoint, p: &PlanarPoint) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

fn within_span(a: &PlanarPoint, b: &PlanarPoint, p: &PlanarPoint) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether segments `a1`-`a2` and `b1`-`b2` cross or touch
pub fn segments_intersect(a1: &PlanarPoint, a2: &PlanarPoint, b1: &PlanarPoint, b2: &PlanarPoint) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
        return true;
    }

    (d1 == 0.0 && within_span(b1, b2, a1))
        || (d2 == 0.0 && within_span(b1, b2, a2))
        || (d3 == 0.0 && within_span(a1, a2, b1))
        || (d4 == 0.0 && within_span(a1, a2, b2))
}

/// Shortest distance from `point` to the segment `s1`-`s2`
pub fn point_to_segment_distance(point: &PlanarPoint, s1: &PlanarPoint, s2: &PlanarPoint) -> f64 {
    let segment = *s2 - *s1;
    let length_squared = segment.norm_squared();
    if length_squared == 0.0 {
        return point.distance(s1);
    }

    let t = ((*point - *s1).dot(&segment) / length_squared).clamp(0.0, 1.0);
    point.distance(&(*s1 + segment * t))
}

/// Crossing point of two segments, `None` when they are parallel or do not meet
pub fn segment_intersection_point(
    a1: &PlanarPoint,
    a2: &PlanarPoint,
    b1: &PlanarPoint,
    b2: &PlanarPoint,
) -> Option<PlanarPoint> {
    let r = *a2 - *a1;
    let s = *b2 - *b1;
    let denominator = r.perp(&s);
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let offset = *b1 - *a1;
    let t = offset.perp(&s) / denominator;
    let u = offset.perp(&r) / denominator;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(*a1 + r * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_square() -> Ring {
        Ring::new(
            RingKind::Boundary,
            vec![
                PlanarPoint::new(-5.0, -5.0),
                PlanarPoint::new(5.0, -5.0),
                PlanarPoint::new(5.0, 5.0),
                PlanarPoint::new(-5.0, 5.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_square_containment() {
        let ring = centered_square();
        assert!(ring.contains(&PlanarPoint::ORIGIN));
        assert!(ring.contains(&PlanarPoint::new(4.99, -4.99)));
        assert!(!ring.contains(&PlanarPoint::new(5.01, 0.0)));
        assert!(!ring.contains(&PlanarPoint::new(0.0, -7.0)));
        assert!(!ring.contains(&PlanarPoint::new(f64::NAN, 0.0)));

        for vertex in ring.vertices() {
            assert!(ring.contains(vertex));
        }
        assert!(ring.contains(&PlanarPoint::new(5.0, 1.0)));
        assert!(ring.contains(&PlanarPoint::new(-2.0, 5.0)));
    }

    #[test]
    fn test_clockwise_ring_contains_interior() {
        let ring = Ring::new(
            RingKind::Boundary,
            vec![
                PlanarPoint::new(0.0, 0.0),
                PlanarPoint::new(0.0, 10.0),
                PlanarPoint::new(10.0, 10.0),
                PlanarPoint::new(10.0, 0.0),
            ],
        )
        .unwrap();
        assert_eq!(ring.winding_number(&PlanarPoint::new(5.0, 5.0)).abs(), 1);
        assert!(ring.contains(&PlanarPoint::new(5.0, 5.0)));
    }

    #[test]
    fn test_concave_ring_containment() {
        // U shape open to the north
        let ring = Ring::new(
            RingKind::Boundary,
            vec![
                PlanarPoint::new(0.0, 0.0),
                PlanarPoint::new(0.0, 30.0),
                PlanarPoint::new(20.0, 30.0),
                PlanarPoint::new(20.0, 20.0),
                PlanarPoint::new(5.0, 20.0),
                PlanarPoint::new(5.0, 10.0),
                PlanarPoint::new(20.0, 10.0),
                PlanarPoint::new(20.0, 0.0),
            ],
        )
        .unwrap();
        assert!(ring.contains(&PlanarPoint::new(15.0, 5.0)));
        assert!(ring.contains(&PlanarPoint::new(15.0, 25.0)));
        assert!(!ring.contains(&PlanarPoint::new(15.0, 15.0)));
    }

    #[test]
    fn test_ring_rejects_degenerate_input() {
        let two = vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(1.0, 0.0)];
        assert!(matches!(
            Ring::new(RingKind::Obstacle(0), two),
            Err(PlanningError::TooFewVertices { count: 2, .. })
        ));

        let repeated = vec![
            PlanarPoint::new(0.0, 0.0),
            PlanarPoint::new(1.0, 0.0),
            PlanarPoint::new(1.0, 0.0),
            PlanarPoint::new(0.0, 0.0),
        ];
        assert!(Ring::new(RingKind::Boundary, repeated).is_err());

        let nan = vec![
            PlanarPoint::new(0.0, 0.0),
            PlanarPoint::new(f64::NAN, 0.0),
            PlanarPoint::new(1.0, 1.0),
        ];
        assert!(matches!(
            Ring::new(RingKind::Boundary, nan),
            Err(PlanningError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_closing_vertex_dropped() {
        let ring = Ring::new(
            RingKind::Boundary,
            vec![
                PlanarPoint::new(0.0, 0.0),
                PlanarPoint::new(1.0, 0.0),
                PlanarPoint::new(1.0, 1.0),
                PlanarPoint::new(0.0, 0.0),
            ],
        )
        .unwrap();
        assert_eq!(ring.vertex_count(), 3);
    }

    #[test]
    fn test_segments_intersect() {
        let p = PlanarPoint::new;
        assert!(segments_intersect(&p(0.0, 0.0), &p(10.0, 10.0), &p(0.0, 10.0), &p(10.0, 0.0)));
        assert!(!segments_intersect(&p(0.0, 0.0), &p(1.0, 1.0), &p(0.0, 10.0), &p(10.0, 0.0)));
        // Touching at an endpoint
        assert!(segments_intersect(&p(0.0, 0.0), &p(5.0, 5.0), &p(5.0, 5.0), &p(10.0, 0.0)));
        // Collinear overlap
        assert!(segments_intersect(&p(0.0, 0.0), &p(4.0, 0.0), &p(2.0, 0.0), &p(6.0, 0.0)));
        // Collinear but apart
        assert!(!segments_intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0), &p(3.0, 0.0)));
    }

    #[test]
    fn test_point_to_segment_distance() {
        let p = PlanarPoint::new;
        assert!((point_to_segment_distance(&p(5.0, 3.0), &p(0.0, 0.0), &p(10.0, 0.0)) - 3.0).abs() < 1e-12);
        // Beyond the end the distance is to the endpoint, not the carrier line
        assert!((point_to_segment_distance(&p(13.0, 4.0), &p(0.0, 0.0), &p(10.0, 0.0)) - 5.0).abs() < 1e-12);
        assert!((point_to_segment_distance(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_intersection_point() {
        let p = PlanarPoint::new;
        let hit = segment_intersection_point(&p(0.0, 4.0), &p(20.0, 4.0), &p(8.0, 3.0), &p(8.0, 7.0)).unwrap();
        assert!((hit.x - 8.0).abs() < 1e-12);
        assert!((hit.y - 4.0).abs() < 1e-12);
        assert!(segment_intersection_point(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)).is_none());
        assert!(segment_intersection_point(&p(0.0, 0.0), &p(1.0, 0.0), &p(5.0, -1.0), &p(5.0, 1.0)).is_none());
    }

    #[test]
    fn test_nearest_vertex_and_rotation() {
        let ring = centered_square();
        let index = ring.nearest_vertex(&PlanarPoint::new(9.0, 8.0));
        assert_eq!(index, 2);

        let rotated = ring.rotated(index);
        assert_eq!(rotated.vertex(0), PlanarPoint::new(5.0, 5.0));
        assert_eq!(rotated.vertex(1), PlanarPoint::new(-5.0, 5.0));
        assert_eq!(rotated.vertex_index(&PlanarPoint::new(5.0, -5.0)), Some(3));
        assert_eq!(rotated.vertex_index(&PlanarPoint::new(5.0, -4.0)), None);
    }

    #[test]
    fn test_bounding_box() {
        let bounds = centered_square().bounding_box();
        assert_eq!(bounds.min_x, -5.0);
        assert_eq!(bounds.max_y, 5.0);
        assert!(bounds.contains(&PlanarPoint::new(5.0, 5.0)));
        assert!(!bounds.contains(&PlanarPoint::new(5.1, 0.0)));
        assert!((bounds.diagonal() - 200.0_f64.sqrt()).abs() < 1e-12);
    }
}
