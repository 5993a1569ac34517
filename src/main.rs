//! Headless preview of foothold locomotion.
//!
//! Loads a map of footholds, drops one entity into it and prints the
//! recorded move path as JSON lines.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use glam::DVec2;
use ledge::numeric::truncate_to_i32;
use ledge::{
    init_logging, AxisInput, FootholdId, FootholdLine, FootholdMap, MapBounds, MotionController,
    PhysicsConstants,
};
use log::info;
use serde::Deserialize;

/// Preview entity movement over a foothold map
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map file (JSON) with footholds and optional bounds
    #[arg(short, long)]
    map: PathBuf,

    /// Physics constants (TOML); compiled-in defaults when omitted
    #[arg(short, long)]
    constants: Option<PathBuf>,

    /// Spawn X
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    x: f64,

    /// Spawn Y
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    y: f64,

    /// Horizontal input: -1 left, 0 none, 1 right
    #[arg(
        short,
        long,
        default_value_t = 0,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(-1..=1)
    )]
    walk: i32,

    /// Simulated time in seconds
    #[arg(short, long, default_value_t = 3.0)]
    seconds: f64,

    /// Ticks per simulated second
    #[arg(
        long,
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    fps: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Deserialize)]
struct MapFile {
    footholds: Vec<FootholdRecord>,
    #[serde(default)]
    bounds: Option<BoundsRecord>,
}

#[derive(Deserialize)]
struct FootholdRecord {
    id: i32,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    #[serde(default)]
    platform: i32,
    #[serde(default)]
    layer: i32,
    #[serde(default)]
    prev: i32,
    #[serde(default)]
    next: i32,
    #[serde(default)]
    cant_through: bool,
    #[serde(default)]
    forbid_fall_down: bool,
    #[serde(default)]
    force: f64,
    #[serde(default)]
    piece: i32,
}

impl From<FootholdRecord> for FootholdLine {
    fn from(record: FootholdRecord) -> Self {
        // Links use 0 for "none".
        let link = |id: i32| (id != 0).then_some(FootholdId(id));
        let mut line = Self::new(
            FootholdId(record.id),
            DVec2::new(record.x1, record.y1),
            DVec2::new(record.x2, record.y2),
        )
        .on_platform(record.platform)
        .linked(link(record.prev), link(record.next));
        line.layer = record.layer;
        line.cant_through = record.cant_through;
        line.forbid_fall_down = record.forbid_fall_down;
        line.force = record.force;
        line.piece = record.piece;
        line
    }
}

#[derive(Deserialize)]
struct BoundsRecord {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

fn load_map(path: &Path) -> Result<(FootholdMap, Option<MapBounds>)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    let file: MapFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse map {}", path.display()))?;
    let bounds = file
        .bounds
        .map(|b| MapBounds::new(b.left, b.top, b.right, b.bottom));
    let map: FootholdMap = file.footholds.into_iter().map(FootholdLine::from).collect();
    Ok((map, bounds))
}

fn load_constants(path: Option<&Path>) -> Result<PhysicsConstants> {
    let Some(path) = path else {
        return Ok(PhysicsConstants::default());
    };
    PhysicsConstants::load(path)
        .with_context(|| format!("failed to load physics constants from {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );

    let constants = Arc::new(load_constants(args.constants.as_deref())?);
    let (map, bounds) = load_map(&args.map)?;
    info!("loaded {} footholds from {}", map.len(), args.map.display());

    let mut ctrl = MotionController::at(constants, DVec2::new(args.x, args.y));
    if let Some(bounds) = bounds.or_else(|| map.extent()) {
        ctrl.set_map_bounds(bounds);
    }
    ctrl.start_path_recording(0);

    let fps = f64::from(args.fps);
    let dt = 1.0 / fps;
    let ticks = u32::try_from(truncate_to_i32((args.seconds * fps).ceil())).unwrap_or(0);
    let input = AxisInput::from_sign(args.walk);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for tick in 1..=ticks {
        if ctrl.is_on_foothold() {
            ctrl.walk(input, dt);
        }
        ctrl.step(dt, &map);
        let now_ms = u64::from(tick) * 1000 / u64::from(args.fps);
        if ctrl.make_continuous_move_path(now_ms) {
            for element in ctrl.flush_move_path() {
                serde_json::to_writer(&mut out, &element)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;

    info!(
        "finished after {ticks} ticks at {} ({:?})",
        ctrl.position(),
        ctrl.action()
    );
    Ok(())
}
