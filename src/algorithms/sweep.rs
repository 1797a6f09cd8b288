//! Boustrophedon sweep over a boundary ring
//!
//! The generator walks through these stages:
//!
//! 1. validate the start (snap it to the nearest vertex when it lies outside)
//! 2. lengthen a too-short first row
//! 3. pick the side the sweep advances to
//! 4. emit rows alternately from the top and bottom ends until the next row
//!    would be too short
//!
//! Rows that cross the boundary more than twice are extended with the extra
//! sections found by looking further along the row, joined by walks around
//! the boundary outline. Every segment appended to the path is routed around
//! obstacles.

use crate::algorithms::marching::{heading_vector, lateral_vector, BoundaryMarcher, StepBudget};
use crate::algorithms::obstacles::ObstacleRouter;
use crate::algorithms::perimeter::shortest_perimeter_path;
use crate::algorithms::polygon::Ring;
use crate::core::constants::{VERTEX_MATCH_EPSILON_M, VERTEX_PROBE_DISTANCE_M};
use crate::core::types::{PlanarPoint, SweepConfig};
use crate::validation::error::{PlanningError, PlanningPhase};
use nalgebra::Vector2;
use tracing::{debug, info, warn};

/// Planar result of a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    /// Ordered path, starting at the (possibly moved) start point
    pub points: Vec<PlanarPoint>,
    /// Number of rows emitted
    pub rows: usize,
    /// Boundary vertex, by the caller's index, the start was snapped to
    pub snapped_vertex: Option<usize>,
    /// Whether the start was moved to make the first row long enough
    pub start_adjusted: bool,
    /// Side the sweep advanced to: +1 along the heading's lateral vector, -1 against it
    pub side: f64,
}

/// Outcome of checking whether a row can be followed by another
enum TurnDecision {
    /// Keep sweeping; the row ends at the given point
    Continue(PlanarPoint),
    /// No further row fits
    Terminate,
}

/// A row before its far end is adjusted
struct RowCandidate {
    /// Where the row first leaves the boundary
    first_exit: PlanarPoint,
    /// Perimeter walks and section ends between the first exit and the far end
    connectors: Vec<PlanarPoint>,
    /// Far end of the last section
    far: PlanarPoint,
}

/// Generates the sweep path for one boundary
pub struct SweepGenerator<'a> {
    boundary: Ring,
    config: &'a SweepConfig,
    budget: &'a StepBudget,
    marcher: BoundaryMarcher<'a>,
    router: ObstacleRouter<'a>,
}

impl<'a> SweepGenerator<'a> {
    pub fn new(boundary: Ring, obstacles: &'a [Ring], config: &'a SweepConfig, budget: &'a StepBudget) -> Self {
        Self {
            boundary,
            config,
            budget,
            marcher: BoundaryMarcher::new(config.march_step_m, budget),
            router: ObstacleRouter::new(obstacles, config, budget),
        }
    }

    /// Runs the sweep from `start`
    pub fn generate(mut self, start: &PlanarPoint) -> Result<SweepPlan, PlanningError> {
        let heading = self.config.heading_radians();
        let along = heading_vector(heading);
        let min_row = self.config.min_row_length_m;
        if self.config.row_spacing_m.is_nan() || self.config.row_spacing_m < self.config.march_step_m {
            return Err(PlanningError::InvalidRowSpacing(self.config.row_spacing_m));
        }

        let (start, snapped_vertex) = self.validate_start(start);
        let adjusted = self.adjust_first_row(&start, &along)?;
        let start_adjusted = adjusted != start;
        if start_adjusted {
            info!(
                moved_m = start.distance(&adjusted),
                "start moved so the first row reaches the minimum length"
            );
        }
        let start = adjusted;

        let guide = self.marcher.to_edge(&self.boundary, &start, &along)?;
        let side = self.orient(&start, &guide)?;
        let advance = lateral_vector(heading) * (side * self.config.row_spacing_m);

        let mut path = vec![start];
        let first = self.build_row(guide, &along)?;
        let (first_end, keep_going) = match self.adjust_turn(&start, &first.far, &advance)? {
            TurnDecision::Continue(end) => (end, true),
            TurnDecision::Terminate => (first.far, false),
        };
        self.emit_row(&mut path, &first, first_end)?;
        debug!(row = 1, length_m = start.distance(&first_end), "row accepted");

        let max_rows = (self.boundary.bounding_box().diagonal() / self.config.row_spacing_m).ceil() as usize + 2;
        let mut rows = 1;
        let mut top = first_end;
        let mut bottom = start;
        let mut advancing_top = true;

        while keep_going {
            if rows >= max_rows {
                return Err(PlanningError::NonConvergence {
                    phase: PlanningPhase::Sweep,
                    iterations: rows,
                });
            }
            self.budget.check(PlanningPhase::Sweep, rows)?;

            let (near, direction) = if advancing_top {
                (top + advance, -along)
            } else {
                (bottom + advance, along)
            };
            if !self.boundary.contains(&near) {
                debug!(rows, "next row starts outside the boundary");
                break;
            }

            let first_exit = self.marcher.to_edge(&self.boundary, &near, &direction)?;
            let row = self.build_row(first_exit, &direction)?;
            let end = match self.adjust_turn(&near, &row.far, &advance)? {
                TurnDecision::Continue(end) => end,
                TurnDecision::Terminate => {
                    debug!(rows, "no room for another row");
                    break;
                }
            };

            let length = near.distance(&end);
            if length < min_row {
                debug!(rows, length_m = length, "next row below minimum length");
                break;
            }

            self.append(&mut path, near)?;
            self.emit_row(&mut path, &row, end)?;
            rows += 1;
            debug!(row = rows, length_m = length, "row accepted");

            if advancing_top {
                top = near;
                bottom = end;
            } else {
                bottom = near;
                top = end;
            }
            advancing_top = !advancing_top;
        }

        info!(rows, waypoints = path.len(), side, "sweep complete");
        Ok(SweepPlan {
            points: path,
            rows,
            snapped_vertex,
            start_adjusted,
            side,
        })
    }

    /// Keeps an inside start, otherwise snaps it to the nearest vertex and
    /// makes that vertex the first of the ring
    fn validate_start(&mut self, start: &PlanarPoint) -> (PlanarPoint, Option<usize>) {
        if self.boundary.contains(start) {
            return (*start, None);
        }

        let index = self.boundary.nearest_vertex(start);
        self.boundary = self.boundary.rotated(index);
        let snapped = self.boundary.vertex(0);
        warn!(
            vertex = index,
            distance_m = start.distance(&snapped),
            "start lies outside the boundary, snapped to the nearest vertex"
        );
        (snapped, Some(index))
    }

    /// Side of the first row with more room: +1.0 along the lateral vector, -1.0 against it
    fn orient(&self, start: &PlanarPoint, guide: &PlanarPoint) -> Result<f64, PlanningError> {
        let midpoint = start.midpoint(guide);
        let lateral = lateral_vector(self.config.heading_radians());

        let positive = self.count_inside(&midpoint, &lateral)?;
        let negative = self.count_inside(&midpoint, &(-lateral))?;
        let side = if positive >= negative { 1.0 } else { -1.0 };
        debug!(positive, negative, side, "sweep side chosen");
        Ok(side)
    }

    /// Whole-meter samples from `origin` along `direction` that stay inside before the first exit
    fn count_inside(&self, origin: &PlanarPoint, direction: &Vector2<f64>) -> Result<usize, PlanningError> {
        let mut count = 0;
        for meters in 1..=self.config.max_orientation_probe_m {
            self.budget.check(PlanningPhase::Orientation, count)?;
            if !self.boundary.contains(&(*origin + direction * f64::from(meters))) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    fn adjust_first_row(&self, start: &PlanarPoint, along: &Vector2<f64>) -> Result<PlanarPoint, PlanningError> {
        let length = self.marcher.row_length(&self.boundary, start, along)?;
        if length >= self.config.min_row_length_m {
            return Ok(*start);
        }

        if let Some(index) = self.boundary.vertex_index(start) {
            return self.slide_along_edge(start, index, along);
        }
        if let Some(shifted) = self.shift_sideways(start, along)? {
            return Ok(shifted);
        }

        let index = self.boundary.nearest_vertex(start);
        let vertex = self.boundary.vertex(index);
        warn!(
            vertex = index,
            distance_m = start.distance(&vertex),
            "no long enough row beside the start, sliding from the nearest vertex"
        );
        self.slide_along_edge(&vertex, index, along)
    }

    /// Moves a vertex start onto one of its edges until the first row is just long enough
    fn slide_along_edge(
        &self,
        start: &PlanarPoint,
        index: usize,
        along: &Vector2<f64>,
    ) -> Result<PlanarPoint, PlanningError> {
        let min_row = self.config.min_row_length_m;
        let nudge = self.config.boundary_nudge_m;
        let next = self.boundary.vertex(index + 1);
        let previous = self.boundary.vertex(index + self.boundary.vertex_count() - 1);

        let row_from = |direction: &Vector2<f64>, offset: f64| {
            self.marcher
                .row_length(&self.boundary, &(*start + direction * offset), along)
        };

        let toward_next = (next - *start).normalize();
        let toward_previous = (previous - *start).normalize();
        let next_length = row_from(&toward_next, VERTEX_PROBE_DISTANCE_M.min(start.distance(&next)))?;
        let previous_length = row_from(&toward_previous, VERTEX_PROBE_DISTANCE_M.min(start.distance(&previous)))?;

        let (neighbour, direction) = if next_length >= previous_length {
            (next, toward_next)
        } else {
            (previous, toward_previous)
        };
        let edge_length = start.distance(&neighbour);
        let base = VERTEX_PROBE_DISTANCE_M.min(edge_length);
        let offset_at = |steps: i64| base + steps as f64 * nudge;

        let mut steps: i64 = 0;
        let mut length = row_from(&direction, offset_at(steps))?;
        let mut iteration = 0;

        if length > min_row {
            while length > min_row && offset_at(steps - 1) > 0.0 {
                self.budget.check(PlanningPhase::FirstRowAdjustment, iteration)?;
                iteration += 1;
                steps -= 1;
                length = row_from(&direction, offset_at(steps))?;
            }
            if iteration > 0 && length <= min_row {
                steps += 1;
            }
        } else {
            while length < min_row {
                self.budget.check(PlanningPhase::FirstRowAdjustment, iteration)?;
                iteration += 1;
                steps += 1;
                if offset_at(steps) > edge_length {
                    return Err(PlanningError::NonConvergence {
                        phase: PlanningPhase::FirstRowAdjustment,
                        iterations: iteration,
                    });
                }
                length = row_from(&direction, offset_at(steps))?;
            }
        }

        let adjusted = *start + direction * offset_at(steps);
        debug!(offset_m = offset_at(steps), "start slid along boundary edge");
        Ok(adjusted)
    }

    /// Moves an interior start sideways until the first row is long enough.
    /// `None` when the shift leaves the boundary first.
    fn shift_sideways(&self, start: &PlanarPoint, along: &Vector2<f64>) -> Result<Option<PlanarPoint>, PlanningError> {
        let min_row = self.config.min_row_length_m;
        let nudge = self.config.boundary_nudge_m;
        let left = Vector2::new(-along.y, along.x) * nudge;

        let mut point = if self.boundary.contains(&(*start + left)) {
            *start + left
        } else if self.boundary.contains(&(*start - left)) {
            *start - left
        } else {
            *start
        };

        let guide = self.marcher.to_edge(&self.boundary, &point, along)?;
        let side = self.orient(&point, &guide)?;
        let shift = lateral_vector(self.config.heading_radians()) * (side * nudge);
        let limit = (f64::from(self.config.max_orientation_probe_m) / nudge).ceil() as usize;

        let mut length = point.distance(&guide);
        let mut iteration = 0;
        while length < min_row {
            self.budget.check(PlanningPhase::FirstRowAdjustment, iteration)?;
            iteration += 1;
            point = point + shift;
            if iteration > limit || !self.boundary.contains(&point) {
                return Ok(None);
            }
            length = self.marcher.row_length(&self.boundary, &point, along)?;
        }

        Ok(Some(point))
    }

    /// Collects the sections beyond `first_exit` along `direction`
    fn build_row(&self, first_exit: PlanarPoint, direction: &Vector2<f64>) -> Result<RowCandidate, PlanningError> {
        let mut connectors: Vec<PlanarPoint> = self
            .find_additional_sections(&first_exit, direction)?
            .into_iter()
            .flatten()
            .collect();
        let far = connectors.pop().unwrap_or(first_exit);

        Ok(RowCandidate {
            first_exit,
            connectors,
            far,
        })
    }

    /// Sections of at least the minimum row length further along the row, each
    /// listed as the boundary walk from the previous exit, then its own exit
    fn find_additional_sections(
        &self,
        origin: &PlanarPoint,
        direction: &Vector2<f64>,
    ) -> Result<Vec<Vec<PlanarPoint>>, PlanningError> {
        let bounds = self.boundary.bounding_box();
        let step = self.config.look_ahead_step();
        let min_row = self.config.min_row_length_m;

        let mut sections: Vec<Vec<PlanarPoint>> = Vec::new();
        let mut edge = self.marcher.to_edge(&self.boundary, origin, direction)?;
        let mut probes: usize = 0;
        let mut iteration = 0;

        loop {
            self.budget.check(PlanningPhase::LookAhead, iteration)?;
            iteration += 1;
            probes += 1;

            let probe = edge + direction * (probes as f64 * step);
            if !bounds.contains(&probe) {
                break;
            }
            if !self.boundary.contains(&probe) {
                continue;
            }

            let entry = self.marcher.back_to_entry(&self.boundary, &probe, direction)?;
            let exit = self.marcher.to_edge(&self.boundary, &probe, direction)?;
            if entry.distance(&exit) < min_row {
                continue;
            }

            let mut section = Vec::new();
            if sections.is_empty() && edge.distance(origin) > VERTEX_MATCH_EPSILON_M {
                section.push(edge);
            }
            section.extend(shortest_perimeter_path(&self.boundary, &edge, &entry)?.points);
            section.push(exit);
            debug!(length_m = entry.distance(&exit), "additional section along row");
            sections.push(section);

            edge = exit;
            probes = 0;
        }

        Ok(sections)
    }

    /// Checks that the row after this one starts inside the boundary, pulling
    /// the turn point back toward `line_start` until it does
    fn adjust_turn(
        &self,
        line_start: &PlanarPoint,
        turn: &PlanarPoint,
        advance: &Vector2<f64>,
    ) -> Result<TurnDecision, PlanningError> {
        let min_row = self.config.min_row_length_m;
        let span = *turn - *line_start;
        let length = span.norm();
        if length <= VERTEX_MATCH_EPSILON_M {
            return Ok(TurnDecision::Terminate);
        }

        let push = span / length * self.config.boundary_nudge_m;
        let mut shrunk = *turn;
        let mut next = *turn + *advance;
        let mut iteration = 0;

        while !self.boundary.contains(&next) {
            self.budget.check(PlanningPhase::TurnAdjustment, iteration)?;
            iteration += 1;
            if line_start.distance(&shrunk) < min_row {
                return Ok(TurnDecision::Terminate);
            }
            shrunk = shrunk - push;
            next = next - push;
        }

        if iteration == 0 {
            return Ok(TurnDecision::Continue(*turn));
        }

        let next_length = self
            .marcher
            .row_length(&self.boundary, &next, &(-span / length))?;
        if next_length > min_row {
            Ok(TurnDecision::Continue(shrunk))
        } else {
            Ok(TurnDecision::Continue(*turn))
        }
    }

    /// Appends a row after its near end: first exit and sections when there
    /// are any, then the adjusted far end
    fn emit_row(&self, path: &mut Vec<PlanarPoint>, row: &RowCandidate, end: PlanarPoint) -> Result<(), PlanningError> {
        if !row.connectors.is_empty() || row.far != row.first_exit {
            self.append(path, row.first_exit)?;
            for point in &row.connectors {
                self.append(path, *point)?;
            }
        }
        self.append(path, end)
    }

    /// Appends `point`, routing the segment from the previous point around obstacles
    fn append(&self, path: &mut Vec<PlanarPoint>, point: PlanarPoint) -> Result<(), PlanningError> {
        let Some(last) = path.last().copied() else {
            path.push(point);
            return Ok(());
        };

        let detour = self.router.route(&last, &point)?;
        for waypoint in detour.into_iter().chain(std::iter::once(point)) {
            if path
                .last()
                .map_or(true, |previous| previous.distance(&waypoint) > VERTEX_MATCH_EPSILON_M)
            {
                path.push(waypoint);
            }
        }
        Ok(())
    }
}
