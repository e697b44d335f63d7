//! End-to-end probe: exact vs Monte Carlo area of a fixed triangle.
//!
//! Runs the (0,0),(100,0),(50,100) triangle at increasing sample counts and
//! prints the error trend, batch by batch the way a frame-driven host would.

use planimeter::prelude::*;

fn main() {
    let poly = Polygon::from_xy(&[(0.0, 0.0), (100.0, 0.0), (50.0, 100.0)]);
    let mut engine = SamplingEngine::new(Domain::new(100.0, 100.0));
    println!("exact_area={:.4}", poly.area());

    for (index, &n) in [1_000usize, 10_000, 100_000].iter().enumerate() {
        engine
            .start(
                &poly,
                n,
                ReplayToken {
                    seed: 42,
                    index: index as u64,
                },
            )
            .expect("start");
        let batch = SamplingEngine::recommended_batch(n);
        let result = engine.run_to_completion(batch).expect("active run");
        println!(
            "n={} mc_area={:.4} abs_error={:.4} rel_error={:.5} time_ms={:.3}",
            result.samples,
            result.estimated_area,
            result.abs_error,
            result.rel_error,
            result.time_ms()
        );
    }
}
