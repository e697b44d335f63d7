//! Random simple polygons for experiments (radial jitter + replay tokens).
//!
//! Purpose
//! - Experiments need polygons without a freehand-drawing frontend. The
//!   generator draws `n` roughly equally spaced angles around a center, adds
//!   bounded angular and radial jitter, and connects the vertices in angular
//!   order. Sorted angles keep the polygon simple (star-shaped about its
//!   center), so area and containment queries are well-defined.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//!   so every draw and every sampling run is reproducible and indexable.
//!
//! Code cross-refs: `Polygon`, `sampler::SamplingEngine::start`

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Polygon;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter generator configuration.
#[derive(Clone, Copy, Debug)]
pub struct JitterCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to
    /// [0, 0.49] so perturbed angles stay strictly increasing.
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude). Radii = `base_radius * (1 + u)`
    /// with `u ∈ [-radial_jitter, radial_jitter]`; clamped to [0, 0.95].
    pub radial_jitter: f64,
    /// Mean vertex distance from the center.
    pub base_radius: f64,
    /// Polygon center; pick the middle of the sampling surface to keep the
    /// shape inside it.
    pub center: Vector2<f64>,
}

impl Default for JitterCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            center: Vector2::zeros(),
        }
    }
}

/// Replay token to make draws and runs reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    /// SplitMix64-style mixing, cheap and stable.
    pub(crate) fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random simple polygon around `cfg.center`.
///
/// A random global phase decorrelates the first vertex direction across
/// tokens. The vertex walk is counter-clockwise by construction.
pub fn draw_polygon(cfg: JitterCfg, tok: ReplayToken) -> Polygon {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;
    let verts = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = r0 * (1.0 + u);
            cfg.center + Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    Polygon::new(verts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproducible_draw() {
        let cfg = JitterCfg {
            vertex_count: VertexCount::Fixed(10),
            base_radius: 100.0,
            center: Vector2::new(400.0, 300.0),
            ..JitterCfg::default()
        };
        let tok = ReplayToken { seed: 42, index: 7 };
        let p1 = draw_polygon(cfg, tok);
        let p2 = draw_polygon(cfg, tok);
        assert_eq!(p1, p2);

        let p3 = draw_polygon(cfg, ReplayToken { seed: 42, index: 8 });
        assert_ne!(p1, p3);
    }

    #[test]
    fn draw_stays_near_center_and_encloses_area() {
        let cfg = JitterCfg {
            vertex_count: VertexCount::Uniform { min: 5, max: 20 },
            base_radius: 50.0,
            radial_jitter: 0.2,
            center: Vector2::new(100.0, 100.0),
            ..JitterCfg::default()
        };
        for index in 0..32 {
            let poly = draw_polygon(cfg, ReplayToken { seed: 1, index });
            assert!(poly.verts.len() >= 5);
            assert!(poly.area() > 0.0);
            for v in &poly.verts {
                let r = (v - cfg.center).norm();
                assert!(r <= 50.0 * 1.2 + 1e-9, "vertex radius {r}");
                assert!(r >= 50.0 * 0.8 - 1e-9, "vertex radius {r}");
            }
        }
    }

    #[test]
    fn vertex_count_floor_is_three() {
        let cfg = JitterCfg {
            vertex_count: VertexCount::Fixed(1),
            ..JitterCfg::default()
        };
        let poly = draw_polygon(cfg, ReplayToken { seed: 5, index: 0 });
        assert_eq!(poly.verts.len(), 3);
    }
}
