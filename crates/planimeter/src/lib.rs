//! Monte Carlo planimetry for closed 2D polygons.
//!
//! Given a polygon drawn as an ordered vertex loop, this crate computes the
//! exact area analytically (shoelace), estimates the same area by classifying
//! uniform random samples against the polygon's bounding box, and records one
//! summary per completed run in an append-only experiment log.
//!
//! The sampling engine is deliberately incremental: the host drives it with
//! repeated `step` calls (a frame callback, a CLI loop, a test harness) so
//! rendering or other work can interleave with a long run.

pub mod geom;
pub mod recorder;
pub mod sampler;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom::rand::{draw_polygon, JitterCfg, ReplayToken, VertexCount};
    pub use crate::geom::{BoundingBox, Polygon};
    pub use crate::recorder::{ExperimentLog, COLUMNS};
    pub use crate::sampler::{
        ClassifiedSample, Domain, EngineState, SamplingEngine, SamplingResult, StartError,
        StepBatch,
    };
    pub use nalgebra::Vector2 as Vec2;
}
