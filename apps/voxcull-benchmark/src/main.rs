//! Culling workload runner.
//!
//! Generates a noise terrain, lays out a grid of entity-sized probe boxes and
//! queries each of them from a viewer hovering above the surface, once with a
//! cold cache and once warm. Counters and timings are logged at `info`.
//!
//! ```bash
//! cargo run --release -p voxcull-benchmark -- --seed 7 --reach 96 --probes 16
//! ```
//!
//! Set `RUST_LOG` to change the log level.

use std::str::FromStr;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voxcull::{Aabb, CullingStats, OcclusionCuller, Point3};
use voxcull_test::{probe_grid, GridWorld, TerrainConfig, TerrainGenerator};

struct Params {
    seed: u32,
    reach: u32,
    probes: i32,
    spacing: i32,
    passes: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 42,
            reach: 64,
            probes: 12,
            spacing: 4,
            passes: 10,
        }
    }
}

impl Params {
    /// Parse `args`, program name first.
    fn from_args(args: &[String]) -> Self {
        let mut params = Self::default();

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let known = matches!(
                flag,
                "--seed" | "--reach" | "--probes" | "--spacing" | "--passes"
            );
            if !known {
                warn!(arg = flag, "ignoring unknown argument");
                i += 1;
                continue;
            }
            let Some(value) = args.get(i + 1) else {
                warn!(flag, "option is missing its value");
                break;
            };
            match flag {
                "--seed" => parse_into(&mut params.seed, flag, value),
                "--reach" => parse_into(&mut params.reach, flag, value),
                "--probes" => parse_into(&mut params.probes, flag, value),
                "--spacing" => parse_into(&mut params.spacing, flag, value),
                _ => parse_into(&mut params.passes, flag, value),
            }
            i += 2;
        }

        params
    }
}

/// Store `value` in `slot`, keeping the default when it does not parse.
fn parse_into<T: FromStr>(slot: &mut T, flag: &str, value: &str) {
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(flag, value, "ignoring unparseable option value"),
    }
}

fn run_pass(culler: &mut OcclusionCuller<GridWorld>, boxes: &[Aabb], viewer: Point3) -> usize {
    boxes
        .iter()
        .filter(|aabb| culler.is_visible(aabb, viewer))
        .count()
}

fn report(label: &str, stats: &CullingStats, visible: usize, elapsed: Duration) {
    let per_query = elapsed.as_secs_f64() * 1e6 / stats.queries.max(1) as f64;
    info!(
        label,
        queries = stats.queries,
        visible,
        rays = stats.rays_cast,
        lookups = stats.provider_lookups,
        short_circuits = stats.cache_short_circuits,
        fail_open = stats.fail_open,
        us_per_query = per_query,
        "pass finished"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        eprintln!(
            "USAGE:
    cargo run -p voxcull-benchmark -- [OPTIONS]

OPTIONS:
    --seed <N>      Terrain seed (default: 42)
    --reach <N>     Culler reach in cells (default: 64)
    --probes <N>    Probe boxes per axis (default: 12)
    --spacing <N>   Cells between probes (default: 4)
    --passes <N>    Warm passes to average (default: 10)"
        );
        return;
    }

    let params = Params::from_args(&std::env::args().collect::<Vec<_>>());
    let generator = TerrainGenerator::new(TerrainConfig {
        seed: params.seed,
        half_extent: i32::try_from(params.reach).unwrap_or(i32::MAX),
        ..Default::default()
    });
    let start = Instant::now();
    let world = generator.generate();
    info!(
        seed = params.seed,
        solid = world.solid_count(),
        elapsed_ms = start.elapsed().as_millis(),
        "terrain ready"
    );

    let surface = generator.height_at(0, 0);
    let viewer = Point3::new(0.5, f64::from(surface) + 2.5, 0.5);
    let boxes: Vec<Aabb> = probe_grid(params.probes, params.spacing, 0.0)
        .into_iter()
        .map(|aabb| {
            let cell = aabb.min.cell().unwrap_or_default();
            let ground = f64::from(generator.height_at(cell.x, cell.z) + 1);
            aabb.translated(Point3::new(0.0, ground, 0.0))
        })
        .collect();

    let mut culler = match OcclusionCuller::new(params.reach, world) {
        Ok(culler) => culler,
        Err(error) => {
            tracing::error!(%error, "invalid culler settings");
            return;
        }
    };
    info!(
        reach = params.reach,
        probes = boxes.len(),
        cache_bytes = culler.cache().memory_usage(),
        "culler ready"
    );

    let start = Instant::now();
    let visible = run_pass(&mut culler, &boxes, viewer);
    report("cold", culler.stats(), visible, start.elapsed());

    culler.reset_stats();
    let start = Instant::now();
    let mut visible = 0;
    for _ in 0..params.passes {
        visible = run_pass(&mut culler, &boxes, viewer);
    }
    report("warm", culler.stats(), visible, start.elapsed());

    let counts = culler.cache().counts();
    info!(
        visible_cells = counts.visible,
        blocked_cells = counts.blocked,
        "cache contents"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Params {
        let args: Vec<String> = std::iter::once("voxcull-benchmark")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        Params::from_args(&args)
    }

    #[test]
    fn reads_known_options() {
        let params = parse(&["--seed", "7", "--reach", "96", "--passes", "3"]);
        assert_eq!(params.seed, 7);
        assert_eq!(params.reach, 96);
        assert_eq!(params.passes, 3);
        assert_eq!(params.probes, Params::default().probes);
    }

    #[test]
    fn bad_value_is_consumed_not_reread_as_flag() {
        // "--probes" here is the (unparseable) value of --seed.
        let params = parse(&["--seed", "--probes", "5", "--spacing", "2"]);
        assert_eq!(params.seed, Params::default().seed);
        assert_eq!(params.probes, Params::default().probes);
        assert_eq!(params.spacing, 2);
    }

    #[test]
    fn unknown_and_dangling_arguments_are_skipped() {
        let params = parse(&["--fast", "--reach", "32", "--passes"]);
        assert_eq!(params.reach, 32);
        assert_eq!(params.passes, Params::default().passes);
    }
}
