//! Frontier-driven growth of the line pattern.
//!
//! The engine loop is:
//! 1. Pop the oldest [`Candidate`] from the [`Frontier`].
//! 2. Prune it if its origin is outside the canvas.
//! 3. Otherwise hand it to [`try_draw`]. If the segment fits, bump the
//!    progress counter and queue one child candidate per endpoint, turned
//!    90 degrees plus a random deviation.
//!
//! Growth stops when the frontier runs dry or `max_segments` segments have
//! been drawn.

use crate::{
    canvas::Canvas,
    collision::{CollisionProbe, would_collide},
    color::{BaseColor, color_for},
    config::Config,
    frontier::Frontier,
    types::{Candidate, Point},
};
use log::{debug, trace};
use rand::Rng;

/// Engine parameters, usually built with [`Config::growth_params`].
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthParams {
    pub max_segments: u32,
    pub angle_deviation: u32,
    pub segment_length: f32,
    pub line_width: u32,
    pub base_color: BaseColor,
    pub probe: CollisionProbe,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Config::default().growth_params()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Halted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// Every queued candidate has been evaluated.
    FrontierExhausted,
    /// `max_segments` segments have been drawn.
    BudgetExhausted,
}

/// What a single [`GrowthEngine::step`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The candidate was drawn. `progress` is the count including it.
    Accepted {
        candidate: Candidate,
        endpoints: (Point, Point),
        progress: u32,
    },
    /// The candidate would have overlapped drawn pixels and was dropped.
    Rejected(Candidate),
    /// The candidate's origin lay outside the canvas.
    Pruned(Candidate),
    /// Nothing left to do; the canvas was not touched.
    Halted(HaltReason),
}

/// Diagnostic counters for a finished (or paused) run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthReport {
    pub accepted: u32,
    pub rejected: u32,
    pub pruned: u32,
    pub halt: Option<HaltReason>,
}

/// Draws the segment centered on `origin` if it does not collide.
///
/// The endpoints are `origin ± (length / 2) * (cos angle, sin angle)`. On a
/// collision nothing is drawn. Otherwise the segment is drawn in
/// [`color_for`]`(progress, ..)`.
///
/// ### Parameters
/// - `canvas` - Surface to test against and draw on.
/// - `origin` - Center of the segment.
/// - `angle` - Direction in degrees.
/// - `progress` - Segments accepted before this one; picks the color.
/// - `params` - Length, width, color and collision sampling.
///
/// ### Returns
/// Both endpoints if the segment was drawn, `None` otherwise.
pub fn try_draw<C: Canvas + ?Sized>(
    canvas: &mut C,
    origin: Point,
    angle: f32,
    progress: u32,
    params: &GrowthParams,
) -> Option<(Point, Point)> {
    let seg = Candidate::new(origin, angle).segment(params.segment_length);
    if would_collide(canvas, seg.a, seg.b, &params.probe) {
        return None;
    }

    let color = color_for(progress, params.max_segments, params.base_color);
    canvas.draw_segment(seg.a, seg.b, color, params.line_width);
    Some(seg.endpoints())
}

/// Owns the frontier and the progress counter for one drawing.
#[derive(Debug)]
pub struct GrowthEngine {
    params: GrowthParams,
    frontier: Frontier,
    progress: u32,
    rejected: u32,
    pruned: u32,
}

impl GrowthEngine {
    pub fn new(params: GrowthParams, seed: Candidate) -> Self {
        Self {
            params,
            frontier: Frontier::new(seed),
            progress: 0,
            rejected: 0,
            pruned: 0,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.growth_params(), cfg.seed_candidate())
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Segments drawn so far.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        if self.progress >= self.params.max_segments {
            Some(HaltReason::BudgetExhausted)
        } else if self.frontier.is_empty() {
            Some(HaltReason::FrontierExhausted)
        } else {
            None
        }
    }

    pub fn state(&self) -> EngineState {
        match self.halt_reason() {
            Some(_) => EngineState::Halted,
            None => EngineState::Running,
        }
    }

    pub fn report(&self) -> GrowthReport {
        GrowthReport {
            accepted: self.progress,
            rejected: self.rejected,
            pruned: self.pruned,
            halt: self.halt_reason(),
        }
    }

    /// Evaluates the oldest candidate.
    ///
    /// On acceptance two children are queued: first the one grown from the
    /// first endpoint, then the one from the second. Each takes its own
    /// deviation draw from `rng`, in that order, so a seeded generator
    /// replays the same drawing.
    ///
    /// # Panics
    /// If the candidate's origin or angle is not finite.
    pub fn step<C: Canvas + ?Sized>(&mut self, canvas: &mut C, rng: &mut impl Rng) -> Step {
        if let Some(reason) = self.halt_reason() {
            return Step::Halted(reason);
        }
        let Some(candidate) = self.frontier.pop() else {
            return Step::Halted(HaltReason::FrontierExhausted);
        };
        let Candidate { origin, angle } = candidate;
        assert!(
            origin.is_finite() && angle.is_finite(),
            "non-finite candidate {candidate:?}"
        );

        let (w, h) = canvas.size();
        if origin.x <= 0.0 || origin.y <= 0.0 || origin.x >= w as f32 || origin.y >= h as f32 {
            self.pruned += 1;
            trace!("pruned {candidate:?}");
            return Step::Pruned(candidate);
        }

        let Some((a, b)) = try_draw(canvas, origin, angle, self.progress, &self.params) else {
            self.rejected += 1;
            trace!("rejected {candidate:?}");
            return Step::Rejected(candidate);
        };

        self.progress += 1;
        let spread = i32::try_from(self.params.angle_deviation).unwrap_or(i32::MAX);
        for end in [a, b] {
            let deviation = rng.random_range(-spread..=spread);
            self.frontier
                .push(Candidate::new(end, angle + 90.0 + deviation as f32));
        }
        trace!("accepted #{} {candidate:?} -> {a} {b}", self.progress);

        Step::Accepted {
            candidate,
            endpoints: (a, b),
            progress: self.progress,
        }
    }

    /// Steps until the engine halts.
    pub fn run<C: Canvas + ?Sized>(&mut self, canvas: &mut C, rng: &mut impl Rng) -> GrowthReport {
        debug!(
            "growth started: budget={} frontier={} canvas={:?}",
            self.params.max_segments,
            self.frontier.len(),
            canvas.size()
        );
        while !matches!(self.step(canvas, rng), Step::Halted(_)) {}

        let report = self.report();
        debug!("growth halted: {report:?}");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::is_background;
    use glam::Vec2;
    use image::RgbImage;
    use rand::{SeedableRng, rngs::StdRng};

    fn params(max_segments: u32, angle_deviation: u32, segment_length: f32) -> GrowthParams {
        GrowthParams {
            max_segments,
            angle_deviation,
            segment_length,
            base_color: BaseColor::Red,
            ..Default::default()
        }
    }

    fn seeded_engine(params: GrowthParams, origin: Vec2, angle: f32) -> GrowthEngine {
        GrowthEngine::new(params, Candidate::new(origin, angle))
    }

    #[test]
    fn try_draw_draws_and_returns_endpoints() {
        let mut img = RgbImage::new(100, 100);
        let p = params(10, 0, 20.0);

        let ends = try_draw(&mut img, Vec2::new(50.0, 50.0), 0.0, 0, &p);

        assert_eq!(ends, Some((Vec2::new(40.0, 50.0), Vec2::new(60.0, 50.0))));
        assert_eq!(img.read_pixel(50, 50), [255, 0, 0]);
    }

    #[test]
    fn try_draw_leaves_canvas_untouched_on_collision() {
        let mut img = RgbImage::new(100, 100);
        let p = params(10, 0, 20.0);
        // Blocker in the outer band of the would-be segment.
        img.put_pixel(42, 50, image::Rgb([0, 0, 9]));
        let before = img.clone();

        let ends = try_draw(&mut img, Vec2::new(50.0, 50.0), 0.0, 0, &p);

        assert!(ends.is_none());
        assert_eq!(img, before);
    }

    #[test]
    fn try_draw_dims_with_progress() {
        let mut img = RgbImage::new(100, 100);
        let p = params(10, 0, 20.0);

        try_draw(&mut img, Vec2::new(50.0, 50.0), 0.0, 5, &p);

        // 255 - round(5 * 255 / 10) = 127
        assert_eq!(img.read_pixel(50, 50), [127, 0, 0]);
    }

    #[test]
    fn accepted_step_queues_perpendicular_children_in_endpoint_order() {
        let mut img = RgbImage::new(100, 100);
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = seeded_engine(params(10, 0, 20.0), Vec2::new(50.0, 50.0), 0.0);

        let step = engine.step(&mut img, &mut rng);

        assert!(matches!(step, Step::Accepted { progress: 1, .. }));
        assert_eq!(engine.progress(), 1);
        let queued: Vec<Candidate> = engine.frontier().iter().copied().collect();
        assert_eq!(
            queued,
            vec![
                Candidate::new(Vec2::new(40.0, 50.0), 90.0),
                Candidate::new(Vec2::new(60.0, 50.0), 90.0),
            ]
        );
    }

    #[test]
    fn deviation_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen_nonzero = false;
        for _ in 0..50 {
            let mut img = RgbImage::new(100, 100);
            let mut engine = seeded_engine(params(10, 5, 20.0), Vec2::new(50.0, 50.0), 0.0);
            engine.step(&mut img, &mut rng);
            for c in engine.frontier().iter() {
                let dev = c.angle - 90.0;
                assert!((-5.0..=5.0).contains(&dev), "deviation {dev} out of range");
                assert_eq!(dev.fract(), 0.0);
                seen_nonzero |= dev != 0.0;
            }
        }
        assert!(seen_nonzero);
    }

    #[test]
    fn rejected_candidate_is_dropped() {
        let mut img = RgbImage::new(100, 100);
        img.put_pixel(58, 50, image::Rgb([1, 1, 1]));
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = seeded_engine(params(10, 0, 20.0), Vec2::new(50.0, 50.0), 0.0);

        assert!(matches!(engine.step(&mut img, &mut rng), Step::Rejected(_)));
        assert_eq!(engine.frontier_len(), 0);
        assert_eq!(engine.progress(), 0);
        assert_eq!(engine.state(), EngineState::Halted);
        assert_eq!(
            engine.step(&mut img, &mut rng),
            Step::Halted(HaltReason::FrontierExhausted)
        );
        assert_eq!(engine.report().rejected, 1);
    }

    #[test]
    fn origin_on_the_border_is_pruned() {
        let mut img = RgbImage::new(100, 100);
        let mut rng = StdRng::seed_from_u64(1);
        for origin in [Vec2::new(0.0, 50.0), Vec2::new(50.0, 100.0), Vec2::new(100.0, 1.0)] {
            let mut engine = GrowthEngine::new(params(10, 0, 20.0), Candidate::new(origin, 0.0));
            assert!(matches!(engine.step(&mut img, &mut rng), Step::Pruned(_)));
            assert_eq!(engine.report().pruned, 1);
        }
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn run_stops_at_budget() {
        let mut img = RgbImage::new(400, 400);
        let mut rng = StdRng::seed_from_u64(3);
        let mut engine = seeded_engine(params(25, 40, 40.0), Vec2::new(200.0, 200.0), 0.0);

        let report = engine.run(&mut img, &mut rng);

        assert_eq!(report.accepted, 25);
        assert_eq!(report.halt, Some(HaltReason::BudgetExhausted));
        assert_eq!(engine.state(), EngineState::Halted);
        assert!(!is_background(&img, 200, 200));
    }

    #[test]
    fn run_stops_when_the_canvas_fills_up() {
        // The budget is out of reach on a canvas this small.
        let mut img = RgbImage::new(100, 100);
        let mut rng = StdRng::seed_from_u64(3);
        let mut engine = seeded_engine(params(u32::MAX, 40, 20.0), Vec2::new(50.0, 50.0), 0.0);

        let report = engine.run(&mut img, &mut rng);

        assert_eq!(report.halt, Some(HaltReason::FrontierExhausted));
        assert!(report.accepted >= 1);
        assert_eq!(engine.frontier_len(), 0);
        assert_eq!(engine.state(), EngineState::Halted);
        assert_eq!(
            engine.step(&mut img, &mut rng),
            Step::Halted(HaltReason::FrontierExhausted)
        );
    }

    #[test]
    fn children_are_evaluated_breadth_first() {
        let mut img = RgbImage::new(100, 100);
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = seeded_engine(params(10, 0, 20.0), Vec2::new(50.0, 50.0), 0.0);

        let mut accepted = Vec::new();
        while accepted.len() < 3 {
            match engine.step(&mut img, &mut rng) {
                Step::Accepted { candidate, .. } => accepted.push(candidate),
                Step::Halted(reason) => panic!("halted early: {reason:?}"),
                Step::Rejected(_) | Step::Pruned(_) => {}
            }
        }

        assert_eq!(
            accepted,
            vec![
                Candidate::new(Vec2::new(50.0, 50.0), 0.0),
                Candidate::new(Vec2::new(40.0, 50.0), 90.0),
                Candidate::new(Vec2::new(60.0, 50.0), 90.0),
            ]
        );
        // Grandchildren of the first child come before those of the second.
        let queued: Vec<Vec2> = engine.frontier().iter().map(|c| c.origin).collect();
        assert_eq!(queued.len(), 4);
        assert!((queued[0].x - 40.0).abs() < 1e-4 && (queued[0].y - 40.0).abs() < 1e-4);
        assert!((queued[1].x - 40.0).abs() < 1e-4 && (queued[1].y - 60.0).abs() < 1e-4);
        assert!((queued[2].x - 60.0).abs() < 1e-4 && (queued[2].y - 40.0).abs() < 1e-4);
        assert!((queued[3].x - 60.0).abs() < 1e-4 && (queued[3].y - 60.0).abs() < 1e-4);
    }

    #[test]
    #[should_panic(expected = "non-finite candidate")]
    fn nan_angle_fails_fast() {
        let mut img = RgbImage::new(100, 100);
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = seeded_engine(params(10, 0, 20.0), Vec2::new(50.0, 50.0), f32::NAN);
        engine.step(&mut img, &mut rng);
    }
}
