//! Closed polygons as ordered vertex loops, and their bounding boxes.
//!
//! Conventions
//! - A `Polygon` is the sequence of its vertices; the last vertex implicitly
//!   connects back to the first. Vertex order defines the boundary walk used
//!   by both the shoelace sum and ray casting, so reordering is not a no-op.
//! - Area and containment need at least 3 vertices; below that `area` is 0.0
//!   and `contains` is false.

use nalgebra::Vector2;

/// Closed polygon: ordered vertex loop, last vertex connects to first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub verts: Vec<Vector2<f64>>,
}

impl Polygon {
    #[inline]
    pub fn new(verts: Vec<Vector2<f64>>) -> Self {
        Self { verts }
    }

    /// Build from plain coordinate pairs (convenient for files and tests).
    pub fn from_xy(pairs: &[(f64, f64)]) -> Self {
        Self {
            verts: pairs.iter().map(|&(x, y)| Vector2::new(x, y)).collect(),
        }
    }

    /// Exact area via the shoelace sum `|Σ (xi·yj − xj·yi)| / 2`.
    ///
    /// The absolute value makes the result invariant under cyclic rotation of
    /// the vertex list and under traversal direction. Fewer than 3 vertices
    /// enclose nothing and yield 0.0.
    pub fn area(&self) -> f64 {
        let n = self.verts.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let p = self.verts[i];
            let q = self.verts[(i + 1) % n];
            sum += p.x * q.y - q.x * p.y;
        }
        sum.abs() / 2.0
    }

    /// Axis-aligned bounding box of the vertices; `None` for an empty loop.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.verts.first()?;
        let mut bb = BoundingBox {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for v in &self.verts[1..] {
            bb.min_x = bb.min_x.min(v.x);
            bb.max_x = bb.max_x.max(v.x);
            bb.min_y = bb.min_y.min(v.y);
            bb.max_y = bb.max_y.max(v.y);
        }
        Some(bb)
    }

    /// Ray-casting parity test: odd number of edge crossings = inside.
    ///
    /// Walks each edge (wrapping last→first) and toggles parity when the
    /// horizontal ray from `p` crosses it. Only edges whose y-span straddles
    /// `p.y` (exclusive on one side) can cross, so shared vertices are not
    /// double-counted and horizontal edges never toggle; the straddle check
    /// guarantees a nonzero y-span, but the denominator stays guarded against
    /// exact zero. Points exactly on an edge may classify either way.
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        let n = self.verts.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.verts[i];
            let b = self.verts[j];
            if (a.y > p.y) != (b.y > p.y) {
                let dy = b.y - a.y;
                if dy != 0.0 {
                    let cross_x = (b.x - a.x) * (p.y - a.y) / dy + a.x;
                    if p.x < cross_x {
                        inside = !inside;
                    }
                }
            }
            j = i;
        }
        inside
    }
}

/// Axis-aligned bounding box (vertex extrema).
///
/// Invariant: `min <= max` per axis when derived from a non-empty polygon.
/// A clamped box may invert or collapse; callers reject those before use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}
