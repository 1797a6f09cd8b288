//! Fixed-step boundary marching
//!
//! Every "push this point to the boundary" in the planner goes through
//! [`BoundaryMarcher`]. Samples are taken at `start + k * step` rather than by
//! repeated addition so long marches do not drift. Each loop is metered by a
//! [`StepBudget`] and fails with a [`PlanningError`] instead of spinning.

use crate::algorithms::polygon::Ring;
use crate::core::constants::DEFAULT_MAX_LOOP_ITERATIONS;
use crate::core::types::PlanarPoint;
use crate::validation::error::{PlanningError, PlanningPhase};
use nalgebra::Vector2;
use std::time::{Duration, Instant};

/// How often loops consult the clock
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Iteration and wall-clock limits shared by all loops of one planning call
#[derive(Debug, Clone)]
pub struct StepBudget {
    max_iterations: usize,
    time_budget: Option<Duration>,
    started: Instant,
}

impl StepBudget {
    /// Budget allowing `max_iterations` per loop and, optionally, a total time
    pub fn new(max_iterations: usize, time_budget: Option<Duration>) -> Self {
        Self {
            max_iterations,
            time_budget,
            started: Instant::now(),
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Fails once `iteration` reaches the per-loop limit or the time budget is spent
    pub fn check(&self, phase: PlanningPhase, iteration: usize) -> Result<(), PlanningError> {
        if iteration >= self.max_iterations {
            return Err(PlanningError::NonConvergence {
                phase,
                iterations: iteration,
            });
        }

        if iteration % DEADLINE_CHECK_INTERVAL == 0 {
            if let Some(limit) = self.time_budget {
                let elapsed = self.started.elapsed();
                if elapsed > limit {
                    return Err(PlanningError::Timeout { phase, elapsed });
                }
            }
        }

        Ok(())
    }
}

impl Default for StepBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOOP_ITERATIONS, None)
    }
}

/// Unit vector for a heading in radians (0 = north, pi/2 = east)
pub fn heading_vector(heading_rad: f64) -> Vector2<f64> {
    Vector2::new(heading_rad.cos(), heading_rad.sin())
}

/// Unit vector perpendicular to a heading, pointing to its left
pub fn lateral_vector(heading_rad: f64) -> Vector2<f64> {
    Vector2::new(heading_rad.sin(), -heading_rad.cos())
}

/// Steps points along a direction until they leave a ring
#[derive(Debug, Clone, Copy)]
pub struct BoundaryMarcher<'a> {
    step: f64,
    budget: &'a StepBudget,
}

impl<'a> BoundaryMarcher<'a> {
    pub fn new(step: f64, budget: &'a StepBudget) -> Self {
        Self { step, budget }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn budget(&self) -> &'a StepBudget {
        self.budget
    }

    /// Last sample inside `ring` when stepping from `start` along the unit
    /// `direction`. Returns `start` itself when the first step already leaves.
    pub fn to_edge(
        &self,
        ring: &Ring,
        start: &PlanarPoint,
        direction: &Vector2<f64>,
    ) -> Result<PlanarPoint, PlanningError> {
        let mut k: usize = 1;
        loop {
            self.budget.check(PlanningPhase::BoundaryMarch, k)?;
            let sample = *start + direction * (k as f64 * self.step);
            if !ring.contains(&sample) {
                return Ok(*start + direction * ((k - 1) as f64 * self.step));
            }
            k += 1;
        }
    }

    /// First inside point of the stretch containing `inside`, found by stepping
    /// backwards against `direction` until the ring is left.
    pub fn back_to_entry(
        &self,
        ring: &Ring,
        inside: &PlanarPoint,
        direction: &Vector2<f64>,
    ) -> Result<PlanarPoint, PlanningError> {
        self.to_edge(ring, inside, &(-direction))
    }

    /// Distance from `start` to the boundary along `direction`
    pub fn row_length(
        &self,
        ring: &Ring,
        start: &PlanarPoint,
        direction: &Vector2<f64>,
    ) -> Result<f64, PlanningError> {
        Ok(self.to_edge(ring, start, direction)?.distance(start))
    }
}
