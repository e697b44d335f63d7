//! Polygon geometry kernel (pure queries, no state, no I/O).
//!
//! Purpose
//! - Exact area (shoelace), vertex-extrema bounding boxes, and ray-casting
//!   containment for closed polygons given as ordered vertex loops.
//! - Keep the API minimal and numerically explicit; everything here is a
//!   plain function of its inputs so renderers and the sampling engine can
//!   query it independently.
//!
//! Code cross-refs: `Polygon`, `BoundingBox`, `rand::draw_polygon`

pub mod rand;
mod types;

pub use types::{BoundingBox, Polygon};
