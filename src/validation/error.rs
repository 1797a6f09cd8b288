//! Error types for mission planning
//!
//! [`PlanningError`] covers rejected input, points that should lie on a ring
//! outline but do not, and loops that ran out of iterations or time.

use crate::algorithms::polygon::RingKind;
use crate::utils::config::ConfigError;
use std::fmt;
use std::time::Duration;

/// Loop of the planner that was running when a budget ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningPhase {
    /// Pushing a point along a heading to the ring outline
    BoundaryMarch,
    /// Choosing the side of the first row the sweep advances to
    Orientation,
    /// Nudging the start until the first row is long enough
    FirstRowAdjustment,
    /// Searching for further sections along a row
    LookAhead,
    /// Shrinking a row so the next one starts inside the boundary
    TurnAdjustment,
    /// Walking a segment to find obstacle crossings
    ObstacleRouting,
    /// The row-by-row sweep itself
    Sweep,
}

impl fmt::Display for PlanningPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanningPhase::BoundaryMarch => "boundary march",
            PlanningPhase::Orientation => "orientation probe",
            PlanningPhase::FirstRowAdjustment => "first row adjustment",
            PlanningPhase::LookAhead => "look-ahead",
            PlanningPhase::TurnAdjustment => "turn adjustment",
            PlanningPhase::ObstacleRouting => "obstacle routing",
            PlanningPhase::Sweep => "sweep",
        };
        f.write_str(name)
    }
}

/// Errors reported by a planning call
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlanningError {
    /// A ring has fewer than three distinct vertices
    #[error("{ring} has {count} distinct vertices, at least 3 are required")]
    TooFewVertices { ring: RingKind, count: usize },

    /// A coordinate is NaN or infinite
    #[error("non-finite coordinate in {context}")]
    NonFiniteCoordinate { context: String },

    /// A geographic coordinate lies outside its valid range
    #[error("coordinate out of range in {context}: {reason}")]
    CoordinateOutOfRange { context: String, reason: String },

    /// Row spacing is zero, negative or not finite
    #[error("row spacing must be a positive number of meters, got {0}")]
    InvalidRowSpacing(f64),

    /// Heading is not finite
    #[error("heading must be a finite number of degrees, got {0}")]
    InvalidHeading(f64),

    /// A point expected on a ring outline is farther than the edge tolerance from it
    #[error("point ({x:.3}, {y:.3}) is not on the {ring} outline within {tolerance} m")]
    PointNotOnRing {
        ring: RingKind,
        x: f64,
        y: f64,
        tolerance: f64,
    },

    /// A loop exceeded its iteration limit
    #[error("{phase} did not converge within {iterations} iterations")]
    NonConvergence { phase: PlanningPhase, iterations: usize },

    /// The planning call exceeded its time budget
    #[error("{phase} exceeded the planning time budget after {elapsed:?}")]
    Timeout { phase: PlanningPhase, elapsed: Duration },

    /// The planner configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PlanningError {
    #[must_use]
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFiniteCoordinate {
            context: context.into(),
        }
    }

    #[must_use]
    pub fn out_of_range(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CoordinateOutOfRange {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the caller's input was rejected before planning began
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::TooFewVertices { .. }
                | Self::NonFiniteCoordinate { .. }
                | Self::CoordinateOutOfRange { .. }
                | Self::InvalidRowSpacing(_)
                | Self::InvalidHeading(_)
        )
    }

    #[must_use]
    pub const fn is_non_convergence(&self) -> bool {
        matches!(self, Self::NonConvergence { .. })
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Phase that failed, for budget errors
    #[must_use]
    pub const fn phase(&self) -> Option<PlanningPhase> {
        match self {
            Self::NonConvergence { phase, .. } | Self::Timeout { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = PlanningError::TooFewVertices {
            ring: RingKind::Boundary,
            count: 2,
        };
        assert_eq!(error.to_string(), "boundary has 2 distinct vertices, at least 3 are required");

        let error = PlanningError::NonConvergence {
            phase: PlanningPhase::LookAhead,
            iterations: 10,
        };
        assert_eq!(error.to_string(), "look-ahead did not converge within 10 iterations");

        let error = PlanningError::PointNotOnRing {
            ring: RingKind::Obstacle(1),
            x: 1.0,
            y: 2.5,
            tolerance: 0.01,
        };
        assert!(error.to_string().contains("obstacle 1"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(PlanningError::InvalidRowSpacing(0.0).is_invalid_input());
        assert!(PlanningError::non_finite("start").is_invalid_input());
        assert!(!PlanningError::InvalidRowSpacing(0.0).is_timeout());

        let timeout = PlanningError::Timeout {
            phase: PlanningPhase::Sweep,
            elapsed: Duration::from_millis(5),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_invalid_input());
        assert_eq!(timeout.phase(), Some(PlanningPhase::Sweep));

        let stuck = PlanningError::NonConvergence {
            phase: PlanningPhase::BoundaryMarch,
            iterations: 3,
        };
        assert!(stuck.is_non_convergence());
        assert_eq!(PlanningError::InvalidHeading(f64::NAN).phase(), None);
    }
}
