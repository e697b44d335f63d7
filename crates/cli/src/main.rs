use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use planimeter::geom::rand::{draw_polygon, JitterCfg, ReplayToken, VertexCount};
use planimeter::geom::Polygon;
use planimeter::recorder::ExperimentLog;
use planimeter::sampler::{Domain, SamplingEngine};
use planimeter::Vec2;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Monte Carlo polygon-area experiment runner")]
struct Cmd {
    /// Sampling surface width (the canvas stand-in)
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Sampling surface height
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Draw a random polygon and write it as a JSON vertex list
    Gen {
        #[arg(long, default_value_t = 12)]
        vertices: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: String,
    },
    /// Print the exact (shoelace) area of a polygon file
    Area {
        #[arg(long)]
        input: String,
    },
    /// Run seeded Monte Carlo experiments and export the log as CSV
    Run {
        #[arg(long)]
        input: String,
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
        /// Number of runs; each gets its own replay index
        #[arg(long, default_value_t = 1)]
        repeat: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Samples per engine step; defaults to ~120 increments per run
        #[arg(long)]
        batch: Option<usize>,
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let domain = Domain::new(cmd.width, cmd.height);
    match cmd.action {
        Action::Gen {
            vertices,
            seed,
            out,
        } => generate(domain, vertices, seed, out),
        Action::Area { input } => area(input),
        Action::Run {
            input,
            samples,
            repeat,
            seed,
            batch,
            out,
        } => run(domain, input, samples, repeat, seed, batch, out),
    }
}

fn generate(domain: Domain, vertices: usize, seed: u64, out: String) -> Result<()> {
    let cfg = JitterCfg {
        vertex_count: VertexCount::Fixed(vertices),
        base_radius: 0.35 * domain.width.min(domain.height),
        center: Vec2::new(domain.width / 2.0, domain.height / 2.0),
        ..JitterCfg::default()
    };
    let poly = draw_polygon(cfg, ReplayToken { seed, index: 0 });
    write_polygon(Path::new(&out), &poly)?;
    tracing::info!(vertices = poly.verts.len(), area = poly.area(), out, "gen");
    Ok(())
}

fn area(input: String) -> Result<()> {
    let poly = read_polygon(Path::new(&input))?;
    tracing::info!(vertices = poly.verts.len(), input, "area");
    println!("{:.4}", poly.area());
    Ok(())
}

fn run(
    domain: Domain,
    input: String,
    samples: usize,
    repeat: u64,
    seed: u64,
    batch: Option<usize>,
    out: String,
) -> Result<()> {
    let poly = read_polygon(Path::new(&input))?;
    let batch = batch.unwrap_or_else(|| SamplingEngine::recommended_batch(samples));
    let mut engine = SamplingEngine::new(domain);
    let mut log = ExperimentLog::new();

    for index in 0..repeat {
        engine
            .start(&poly, samples, ReplayToken { seed, index })
            .with_context(|| format!("starting run {index}"))?;
        let result = engine
            .run_to_completion(batch)
            .context("engine lost its active run")?;
        tracing::info!(
            n = result.samples,
            time_ms = result.time_ms(),
            exact_area = result.exact_area,
            mc_area = result.estimated_area,
            rel_error = result.rel_error,
            "run"
        );
        log.append(result);
    }

    let out_path = Path::new(&out);
    export::write_csv(out_path, &log)?;
    let meta_path = export::write_meta(
        out_path,
        &export::RunMeta {
            input,
            samples,
            repeat,
            seed,
            batch,
            width: domain.width,
            height: domain.height,
            version: planimeter::VERSION,
        },
    )?;
    tracing::info!(rows = log.len(), out, meta = %meta_path.display(), "exported");
    Ok(())
}

/// Read a polygon from a JSON list of `[x, y]` pairs.
fn read_polygon(path: &Path) -> Result<Polygon> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let pairs: Vec<[f64; 2]> =
        serde_json::from_str(&raw).context("polygon file must be a JSON list of [x, y] pairs")?;
    Ok(Polygon::new(
        pairs.iter().map(|&[x, y]| Vec2::new(x, y)).collect(),
    ))
}

fn write_polygon(path: &Path, poly: &Polygon) -> Result<()> {
    let pairs: Vec<[f64; 2]> = poly.verts.iter().map(|v| [v.x, v.y]).collect();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(&pairs)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
