//! Detours around obstacles crossed by a path segment

use crate::algorithms::marching::{BoundaryMarcher, StepBudget};
use crate::algorithms::perimeter::shortest_perimeter_path;
use crate::algorithms::polygon::{segment_intersection_point, Ring};
use crate::core::types::{PlanarPoint, SweepConfig};
use crate::validation::error::{PlanningError, PlanningPhase};
use tracing::debug;

/// Marched crossings within this many fine steps of an exact edge crossing are snapped onto it
const SNAP_STEPS: f64 = 1.5;

/// Replaces straight crossings of obstacle rings with walks around their outlines
#[derive(Debug, Clone, Copy)]
pub struct ObstacleRouter<'a> {
    obstacles: &'a [Ring],
    probe_step: f64,
    marcher: BoundaryMarcher<'a>,
}

impl<'a> ObstacleRouter<'a> {
    pub fn new(obstacles: &'a [Ring], config: &SweepConfig, budget: &'a StepBudget) -> Self {
        Self {
            obstacles,
            probe_step: config.obstacle_probe_step_m,
            marcher: BoundaryMarcher::new(config.march_step_m, budget),
        }
    }

    /// Obstacles whose outline touches the segment `a`-`b`
    pub fn crossed_obstacles(&self, a: &PlanarPoint, b: &PlanarPoint) -> Vec<&'a Ring> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.intersects_segment(a, b))
            .collect()
    }

    /// Points to insert between `a` and `b` so the path goes around every
    /// obstacle on the way. Empty when the segment is clear.
    pub fn route(&self, a: &PlanarPoint, b: &PlanarPoint) -> Result<Vec<PlanarPoint>, PlanningError> {
        let crossed = self.crossed_obstacles(a, b);
        let total = a.distance(b);
        if crossed.is_empty() || total == 0.0 {
            return Ok(Vec::new());
        }

        let direction = (*b - *a) / total;
        let budget = self.marcher.budget();
        let mut detour = Vec::new();
        let mut travelled = 0.0;
        let mut iteration = 0;

        while travelled < total {
            budget.check(PlanningPhase::ObstacleRouting, iteration)?;
            iteration += 1;

            let probe = *a + direction * travelled;
            let Some(obstacle) = crossed.iter().find(|obstacle| obstacle.contains(&probe)) else {
                travelled += self.probe_step;
                continue;
            };

            let entry = self.marcher.back_to_entry(obstacle, &probe, &direction)?;
            let exit = self.marcher.to_edge(obstacle, &probe, &direction)?;
            let entry = self.snap_to_outline(obstacle, a, b, entry);
            let exit = self.snap_to_outline(obstacle, a, b, exit);

            let walk = shortest_perimeter_path(obstacle, &entry, &exit)?;
            debug!(
                obstacle = %obstacle.kind(),
                corners = walk.points.len() - 1,
                length_m = walk.length,
                "routing around obstacle"
            );

            detour.push(entry);
            detour.extend(walk.points);
            travelled = (exit - *a).dot(&direction) + self.marcher.step();
        }

        Ok(detour)
    }

    /// Moves a marched crossing onto the exact intersection of `a`-`b` with the nearest obstacle edge
    fn snap_to_outline(&self, obstacle: &Ring, a: &PlanarPoint, b: &PlanarPoint, marched: PlanarPoint) -> PlanarPoint {
        obstacle
            .edges()
            .filter_map(|(p, q)| segment_intersection_point(a, b, &p, &q))
            .map(|hit| (hit.distance(&marched), hit))
            .filter(|(gap, _)| *gap <= SNAP_STEPS * self.marcher.step())
            .min_by(|x, y| x.0.total_cmp(&y.0))
            .map_or(marched, |(_, hit)| hit)
    }
}
