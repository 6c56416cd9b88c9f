//! Benchmark s2-partition on gridded maps and point sets.
//!
//! Run with: cargo run --release --features bench --bin bench_partition
//!
//! Usage:
//!   bench_partition                  Run default size (100k cells) into 16 partitions
//!   bench_partition 100k 1m -p 64    Run multiple sizes into 64 partitions
//!   bench_partition --points         Use a random point set instead of a map
//!   bench_partition --cap 0.8        Fill only a cap of radius 0.8 rad
//!   bench_partition --legacy         Use the neighbor-boundary extremal search
//!
//! Set RUST_LOG=debug for per-split logging.

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use s2_partition::{
    split_into_n_with, AngularPoint, CubeSphereGrid, ExtremalSearch, PartitionConfig,
    PartitionError, PointSet, SkyMap, SphereGrid, WeightedField,
};
use std::f64::consts::TAU;
use std::time::Instant;

fn parse_count(s: &str) -> Result<usize, String> {
    let s = s.to_lowercase();
    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 1_000_000)
    } else if let Some(stripped) = s.strip_suffix('k') {
        (stripped, 1_000)
    } else {
        (s.as_str(), 1)
    };

    num_str
        .parse::<f64>()
        .map(|n| (n * multiplier as f64) as usize)
        .map_err(|e| format!("Invalid number '{}': {}", s, e))
}

#[derive(Parser)]
#[command(about = "Benchmark weight-balanced sphere partitioning")]
struct Args {
    /// Cell or point counts to benchmark (e.g., 100k, 1m)
    #[arg(value_parser = parse_count)]
    sizes: Vec<usize>,

    /// Number of partitions
    #[arg(short, long, default_value_t = 16)]
    partitions: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Partition a random point set instead of a cube-grid map
    #[arg(long)]
    points: bool,

    /// Restrict the field to a cap of this radius (radians) around a random center
    #[arg(long)]
    cap: Option<f64>,

    /// Use the neighbor-boundary extremal search (maps only, hemispherical regions)
    #[arg(long)]
    legacy: bool,

    /// Azimuth bins for border tracing
    #[arg(long, default_value_t = 180)]
    bins: usize,

    /// Number of iterations to run (useful for profiling)
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: usize,
}

fn format_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{}k", n / 1_000)
    } else {
        format!("{}", n)
    }
}

fn random_direction<R: Rng>(rng: &mut R) -> AngularPoint {
    let z: f64 = rng.gen_range(-1.0..1.0);
    AngularPoint::new(rng.gen_range(0.0..TAU), z.acos())
}

/// Map with random weights in [0.5, 2) on the nearest cube grid to `n` cells.
fn build_map(n: usize, cap: Option<(AngularPoint, f64)>, rng: &mut ChaCha8Rng) -> SkyMap<CubeSphereGrid> {
    let res = ((n as f64 / 6.0).sqrt().round() as usize).max(1);
    let grid = match CubeSphereGrid::new(res) {
        Ok(grid) => grid,
        Err(e) => fail(e),
    };
    let weights: Vec<f64> = (0..grid.num_cells())
        .map(|cell| {
            let w: f64 = rng.gen_range(0.5..2.0);
            match cap {
                Some((center, radius)) if grid.cell_to_angle(cell).distance(center) > radius => 0.0,
                _ => w,
            }
        })
        .collect();
    SkyMap::new(grid, weights).unwrap_or_else(|e| fail(e))
}

/// `n` random points with weights in [0.5, 2), optionally inside a cap.
fn build_points(n: usize, cap: Option<(AngularPoint, f64)>, rng: &mut ChaCha8Rng) -> PointSet {
    let mut points = Vec::with_capacity(n);
    while points.len() < n {
        let p = random_direction(rng);
        match cap {
            Some((center, radius)) if p.distance(center) > radius => continue,
            _ => points.push(p),
        }
    }
    let weights = (0..n).map(|_| rng.gen_range(0.5..2.0)).collect();
    PointSet::new(points, weights).unwrap_or_else(|e| fail(e))
}

fn fail(e: PartitionError) -> ! {
    eprintln!("error: {}", e);
    std::process::exit(1)
}

fn run<F: WeightedField>(field: &F, args: &Args, config: &PartitionConfig) {
    let mut times = Vec::with_capacity(args.repeat);
    let mut last = None;
    for _ in 0..args.repeat.max(1) {
        let t0 = Instant::now();
        let assignment =
            split_into_n_with(field, args.partitions, config).unwrap_or_else(|e| fail(e));
        times.push(t0.elapsed().as_secs_f64() * 1000.0);
        last = Some(assignment);
    }
    let Some(assignment) = last else {
        return;
    };

    let weights = assignment
        .partition_weights(field)
        .unwrap_or_else(|e| fail(e));
    let leaves = &weights[1..];
    let target = field.total_weight() / args.partitions as f64;
    let min = leaves.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = leaves.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    println!("\nResults:");
    if times.len() > 1 {
        let best = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        println!("  Min time:      {:>8.1}ms", best);
        println!("  Avg time:      {:>8.1}ms", avg);
    } else {
        println!("  Total time:    {:>8.1}ms", times[0]);
    }
    println!("  Partitions:    {:>8}", assignment.num_partitions());
    println!("  Target weight: {:>8.1}", target);
    println!(
        "  Weight range:  {:>8.1} .. {:.1} ({:+.2}% .. {:+.2}%)",
        min,
        max,
        100.0 * (min / target - 1.0),
        100.0 * (max / target - 1.0)
    );
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("s2-partition Benchmark");
    println!("======================\n");

    let sizes: Vec<usize> = if args.sizes.is_empty() {
        vec![100_000]
    } else {
        args.sizes.clone()
    };

    let config = PartitionConfig {
        extremal: if args.legacy {
            ExtremalSearch::NeighborBoundary
        } else {
            ExtremalSearch::BorderTrace { bins: args.bins }
        },
        ..PartitionConfig::default()
    };

    println!("Configuration:");
    println!("  seed = {}", args.seed);
    println!("  field = {}", if args.points { "point set" } else { "cube-grid map" });
    println!("  partitions = {}", args.partitions);
    println!("  extremal = {:?}", config.extremal);
    if let Some(radius) = args.cap {
        println!("  cap radius = {:.3} rad", radius);
    }

    for &n in &sizes {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking n = {}", format_num(n));
        println!("{}", "=".repeat(60));

        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        let cap = args.cap.map(|radius| (random_direction(&mut rng), radius));

        let t_gen = Instant::now();
        if args.points {
            let field = build_points(n, cap, &mut rng);
            println!("Field generation: {:.1}ms", t_gen.elapsed().as_secs_f64() * 1000.0);
            run(&field, &args, &config);
        } else {
            let field = build_map(n, cap, &mut rng);
            println!(
                "Field generation: {:.1}ms ({} cells, res {})",
                t_gen.elapsed().as_secs_f64() * 1000.0,
                format_num(field.len()),
                field.grid().resolution()
            );
            run(&field, &args, &config);
        }
    }

    println!("\nBenchmark complete.");
}
