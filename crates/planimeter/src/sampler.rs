//! Incremental Monte Carlo area estimation over a fixed sampling surface.
//!
//! Purpose
//! - Estimate a polygon's area as `box_area * inside / n` by classifying `n`
//!   uniform random points against the polygon's (clamped) bounding box.
//! - Stay yield-friendly: the engine is a resumable state machine driven by
//!   repeated `step` calls, so a host with its own scheduling loop can
//!   interleave rendering between batches instead of blocking for the whole
//!   computation.
//!
//! Model
//! - Lifecycle `Idle → Running → Completed`; invalid `start` calls are
//!   rejected synchronously and mutate nothing.
//! - Samples are processed in strict generation order; after `k` samples the
//!   inside count reflects exactly the first `k`, so seeded runs replay
//!   deterministically.
//! - Single-threaded by design: at most one run is active, `step` is the
//!   sole suspension point, and only the engine mutates the run.
//!
//! Code cross-refs: `geom::Polygon`, `geom::rand::ReplayToken`,
//! `recorder::ExperimentLog`

use std::fmt;
use std::time::{Duration, Instant};

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::geom::rand::ReplayToken;
use crate::geom::{BoundingBox, Polygon};

/// Fixed-size sampling surface, the stand-in for a drawing canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub width: f64,
    pub height: f64,
    /// Margin added around the polygon's box before clamping to the surface.
    pub padding: f64,
}

impl Domain {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Padded box clamped to `[0, width] x [0, height]`.
    ///
    /// The clamp is a safety bound of the sampling surface, not a geometry
    /// operation. A polygon entirely outside the surface clamps to an
    /// inverted box, which `start` rejects as degenerate.
    fn clamp(&self, bb: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: (bb.min_x - self.padding).max(0.0),
            max_x: (bb.max_x + self.padding).min(self.width),
            min_y: (bb.min_y - self.padding).max(0.0),
            max_y: (bb.max_y + self.padding).min(self.height),
        }
    }
}

/// Errors surfaced by `SamplingEngine::start`.
///
/// All are precondition violations reported before any state changes;
/// `step` cannot fail once `start` has accepted a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartError {
    /// Polygon has fewer than 3 vertices.
    NeedVertices,
    /// Requested sample count is zero.
    NeedSamples,
    /// The clamped bounding box has zero width or height.
    DegenerateBox,
    /// A run is already in progress.
    Busy,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::NeedVertices => write!(f, "polygon needs at least 3 vertices"),
            StartError::NeedSamples => write!(f, "sample count must be positive"),
            StartError::DegenerateBox => {
                write!(f, "clamped bounding box has zero width or height")
            }
            StartError::Busy => write!(f, "a sampling run is already in progress"),
        }
    }
}

impl std::error::Error for StartError {}

/// Engine lifecycle as observable from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
}

/// One classified sample, emitted for live rendering.
#[derive(Clone, Copy, Debug)]
pub struct ClassifiedSample {
    pub pos: Vector2<f64>,
    pub inside: bool,
}

/// Immutable summary of one completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingResult {
    /// Target sample count N.
    pub samples: usize,
    pub elapsed: Duration,
    pub exact_area: f64,
    pub estimated_area: f64,
    pub abs_error: f64,
    /// Fraction of the exact area, not a percentage. Defined as 0.0 when the
    /// exact area is zero.
    pub rel_error: f64,
}

impl SamplingResult {
    #[inline]
    pub fn time_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e3
    }
}

/// Output of one `step` call while a run is active.
#[derive(Debug)]
pub struct StepBatch {
    /// Samples classified by this step, in generation order.
    pub samples: Vec<ClassifiedSample>,
    /// Present exactly once, on the step that reaches the target count.
    pub result: Option<SamplingResult>,
}

/// Transient state of the active run; mutated only by `step`.
struct SamplingRun {
    polygon: Polygon,
    bbox: BoundingBox,
    box_area: f64,
    exact_area: f64,
    target: usize,
    processed: usize,
    inside: usize,
    rng: StdRng,
    started: Instant,
}

impl SamplingRun {
    fn finalize(self) -> SamplingResult {
        let estimated = self.box_area * (self.inside as f64) / (self.target as f64);
        let abs_error = (estimated - self.exact_area).abs();
        let rel_error = if self.exact_area > 0.0 {
            abs_error / self.exact_area
        } else {
            0.0
        };
        SamplingResult {
            samples: self.target,
            elapsed: self.started.elapsed(),
            exact_area: self.exact_area,
            estimated_area: estimated,
            abs_error,
            rel_error,
        }
    }
}

/// Incremental Monte Carlo driver; owns its surface and at most one run.
pub struct SamplingEngine {
    domain: Domain,
    run: Option<SamplingRun>,
    last: Option<SamplingResult>,
}

impl SamplingEngine {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            run: None,
            last: None,
        }
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn state(&self) -> EngineState {
        if self.run.is_some() {
            EngineState::Running
        } else if self.last.is_some() {
            EngineState::Completed
        } else {
            EngineState::Idle
        }
    }

    /// `(processed, target)` of the active run, if any.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.run.as_ref().map(|r| (r.processed, r.target))
    }

    /// Result of the most recently completed run, until the next `start`.
    pub fn last_result(&self) -> Option<&SamplingResult> {
        self.last.as_ref()
    }

    /// Batch size giving roughly 120 increments per run.
    ///
    /// A scheduling knob, not a correctness parameter; any positive batch
    /// works.
    pub fn recommended_batch(samples: usize) -> usize {
        ((samples as f64 / 120.0).round() as usize).max(1)
    }

    /// Begin a run of `samples` classifications of `polygon`.
    ///
    /// Rejections mutate nothing: an in-progress run survives a `Busy` call
    /// untouched. On success the previous completed result is discarded and
    /// the engine transitions to `Running`.
    pub fn start(
        &mut self,
        polygon: &Polygon,
        samples: usize,
        tok: ReplayToken,
    ) -> Result<(), StartError> {
        if self.run.is_some() {
            return Err(StartError::Busy);
        }
        if polygon.verts.len() < 3 {
            return Err(StartError::NeedVertices);
        }
        if samples == 0 {
            return Err(StartError::NeedSamples);
        }
        let bbox = polygon
            .bounding_box()
            .ok_or(StartError::NeedVertices)
            .map(|bb| self.domain.clamp(bb))?;
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(StartError::DegenerateBox);
        }
        self.last = None;
        self.run = Some(SamplingRun {
            exact_area: polygon.area(),
            polygon: polygon.clone(),
            box_area: bbox.area(),
            bbox,
            target: samples,
            processed: 0,
            inside: 0,
            rng: tok.to_std_rng(),
            started: Instant::now(),
        });
        Ok(())
    }

    /// Classify up to `batch` further samples; `None` when no run is active.
    ///
    /// The batch is truncated so `processed` never exceeds the target; the
    /// step that reaches the target finalizes the run and carries the
    /// `SamplingResult`.
    pub fn step(&mut self, batch: usize) -> Option<StepBatch> {
        let run = self.run.as_mut()?;
        let take = batch.min(run.target - run.processed);
        let mut samples = Vec::with_capacity(take);
        for _ in 0..take {
            let x = run.bbox.min_x + run.rng.gen::<f64>() * run.bbox.width();
            let y = run.bbox.min_y + run.rng.gen::<f64>() * run.bbox.height();
            let pos = Vector2::new(x, y);
            let inside = run.polygon.contains(pos);
            if inside {
                run.inside += 1;
            }
            run.processed += 1;
            samples.push(ClassifiedSample { pos, inside });
        }
        let finished = run.processed == run.target;
        let result = if finished {
            self.run.take().map(SamplingRun::finalize)
        } else {
            None
        };
        if let Some(res) = &result {
            self.last = Some(res.clone());
        }
        Some(StepBatch { samples, result })
    }

    /// Drive the active run to completion in `batch`-sized steps.
    ///
    /// Convenience for hosts without a frame loop (CLI, tests); `None` when
    /// no run is active. A zero batch is bumped to 1 so the loop always
    /// makes progress.
    pub fn run_to_completion(&mut self, batch: usize) -> Option<SamplingResult> {
        let batch = batch.max(1);
        loop {
            let step = self.step(batch)?;
            if let Some(result) = step.result {
                return Some(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::ExperimentLog;

    fn square10() -> Polygon {
        Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    fn triangle() -> Polygon {
        Polygon::from_xy(&[(0.0, 0.0), (100.0, 0.0), (50.0, 100.0)])
    }

    fn tok(seed: u64) -> ReplayToken {
        ReplayToken { seed, index: 0 }
    }

    #[test]
    fn start_rejects_invalid_input() {
        let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0));
        let seg = Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(engine.start(&seg, 100, tok(1)), Err(StartError::NeedVertices));
        assert_eq!(
            engine.start(&square10(), 0, tok(1)),
            Err(StartError::NeedSamples)
        );
        // Zero-height box: a horizontal sliver.
        let flat = Polygon::from_xy(&[(0.0, 5.0), (10.0, 5.0), (5.0, 5.0)]);
        assert_eq!(
            engine.start(&flat, 100, tok(1)),
            Err(StartError::DegenerateBox)
        );
        // Entirely outside the surface: the clamp inverts the box.
        let outside = Polygon::from_xy(&[(200.0, 200.0), (210.0, 200.0), (205.0, 210.0)]);
        assert_eq!(
            engine.start(&outside, 100, tok(1)),
            Err(StartError::DegenerateBox)
        );
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn busy_rejection_leaves_run_untouched() {
        let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0));
        engine.start(&triangle(), 1000, tok(3)).unwrap();
        engine.step(100);
        let before = engine.progress().unwrap();
        assert_eq!(
            engine.start(&square10(), 50, tok(4)),
            Err(StartError::Busy)
        );
        assert_eq!(engine.progress().unwrap(), before);
        assert_eq!(engine.state(), EngineState::Running);
        let result = engine.run_to_completion(100).unwrap();
        assert_eq!(result.samples, 1000);
    }

    #[test]
    fn counts_are_monotone_and_bounded() {
        let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0));
        engine.start(&triangle(), 1000, tok(9)).unwrap();
        let mut processed_prev = 0;
        let mut inside_total = 0;
        while let Some(batch) = engine.step(64) {
            let inside_batch = batch.samples.iter().filter(|s| s.inside).count();
            inside_total += inside_batch;
            assert!(inside_batch <= batch.samples.len());
            if let Some((processed, target)) = engine.progress() {
                assert!(processed >= processed_prev);
                assert!(processed <= target);
                processed_prev = processed;
            }
            if let Some(result) = batch.result {
                assert_eq!(result.samples, 1000);
                assert!(inside_total <= 1000);
                break;
            }
        }
        assert_eq!(engine.state(), EngineState::Completed);
    }

    #[test]
    fn final_batch_truncates_to_target() {
        let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0));
        engine.start(&triangle(), 10, tok(5)).unwrap();
        let batch = engine.step(64).unwrap();
        assert_eq!(batch.samples.len(), 10);
        let result = batch.result.unwrap();
        assert_eq!(result.samples, 10);
        assert!(engine.step(64).is_none());
    }

    #[test]
    fn recommended_batch_is_positive_and_near_120_increments() {
        assert_eq!(SamplingEngine::recommended_batch(1), 1);
        assert_eq!(SamplingEngine::recommended_batch(100), 1);
        assert_eq!(SamplingEngine::recommended_batch(12_000), 100);
        assert_eq!(SamplingEngine::recommended_batch(100_000), 833);
    }

    #[test]
    fn seeded_runs_replay_exactly() {
        let mut a = SamplingEngine::new(Domain::new(100.0, 100.0));
        let mut b = SamplingEngine::new(Domain::new(100.0, 100.0));
        a.start(&triangle(), 5000, tok(77)).unwrap();
        b.start(&triangle(), 5000, tok(77)).unwrap();
        // Different batch cadence, same sample sequence.
        let ra = a.run_to_completion(1000).unwrap();
        let rb = b.run_to_completion(17).unwrap();
        assert_eq!(ra.estimated_area, rb.estimated_area);
        assert_eq!(ra.abs_error, rb.abs_error);
    }

    #[test]
    fn unit_square_against_own_box_converges() {
        // Box area equals exact area, so the estimate ratio must sit near 1.
        let mut engine = SamplingEngine::new(Domain::new(10.0, 10.0));
        engine.start(&square10(), 100_000, tok(11)).unwrap();
        let batch = SamplingEngine::recommended_batch(100_000);
        let result = engine.run_to_completion(batch).unwrap();
        let ratio = result.estimated_area / result.exact_area;
        assert!((ratio - 1.0).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn rel_error_is_zero_when_exact_area_is_zero() {
        // Collinear loop: zero area but a full-size box, so sampling runs.
        let flat = Polygon::from_xy(&[(0.0, 0.0), (10.0, 10.0), (5.0, 5.0)]);
        let mut engine = SamplingEngine::new(Domain::new(10.0, 10.0));
        engine.start(&flat, 1000, tok(2)).unwrap();
        let result = engine.run_to_completion(100).unwrap();
        assert_eq!(result.exact_area, 0.0);
        assert_eq!(result.rel_error, 0.0);
        assert_eq!(result.abs_error, result.estimated_area);
    }

    #[test]
    fn triangle_end_to_end_with_log() {
        let poly = triangle();
        let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0));
        let mut log = ExperimentLog::new();
        engine.start(&poly, 10_000, tok(42)).unwrap();
        let result = engine
            .run_to_completion(SamplingEngine::recommended_batch(10_000))
            .unwrap();
        assert_eq!(result.exact_area, 5000.0);
        assert!(
            result.estimated_area > 4000.0 && result.estimated_area < 6000.0,
            "estimate {}",
            result.estimated_area
        );
        log.append(result);
        assert_eq!(log.all()[0].samples, 10_000);
    }

    #[test]
    fn padding_grows_the_box_within_the_surface() {
        // Small triangle, large padding: the box clamps to the full surface,
        // and the estimate still converges because box_area scales the
        // inside fraction.
        let small = Polygon::from_xy(&[(40.0, 40.0), (60.0, 40.0), (50.0, 60.0)]);
        let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0).with_padding(50.0));
        engine.start(&small, 50_000, tok(8)).unwrap();
        let result = engine.run_to_completion(500).unwrap();
        assert_eq!(result.exact_area, 200.0);
        assert!(
            (result.estimated_area - 200.0).abs() < 50.0,
            "estimate {}",
            result.estimated_area
        );
    }

    #[test]
    fn step_on_idle_engine_is_none() {
        let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0));
        assert!(engine.step(10).is_none());
        assert!(engine.run_to_completion(10).is_none());
        assert_eq!(engine.state(), EngineState::Idle);
    }
}
