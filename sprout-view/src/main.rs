//! Application entry point for the line-growth viewer.
//!
//! Without `--out` this opens an eframe window and delegates all interactive
//! logic and rendering to [`Viewer`]. With `--out` the drawing is grown to
//! completion headless and written as a PNG.

mod viewer;

use log::info;
use sprout_core::{Config, GrowthEngine, load_config};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};
use viewer::{Viewer, seeded_rng};

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    seed: Option<u64>,
}

fn usage() -> String {
    "Usage: sprout-view [CONFIG.json] [--out IMAGE.png] [--seed N]".to_string()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                let path = args.next().ok_or_else(usage)?;
                parsed.out = Some(PathBuf::from(path));
            }
            "--seed" => {
                let value = args.next().ok_or_else(usage)?;
                let seed = value
                    .parse()
                    .map_err(|e| format!("Invalid seed {value:?}: {e}"))?;
                parsed.seed = Some(seed);
            }
            "--help" | "-h" => return Err(usage()),
            _ if arg.starts_with('-') => return Err(format!("Unknown option {arg}\n{}", usage())),
            _ if parsed.config.is_none() => parsed.config = Some(PathBuf::from(arg)),
            _ => return Err(usage()),
        }
    }
    Ok(parsed)
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args(env::args().skip(1))?;

    let mut cfg = match &args.config {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        cfg.rng_seed = args.seed;
    }
    cfg.validate().map_err(|e| e.to_string())?;

    match &args.out {
        Some(out) => render_png(&cfg, out),
        None => run_viewer(cfg),
    }
}

/// Grows the whole drawing and writes it to `out`.
fn render_png(cfg: &Config, out: &Path) -> Result<(), String> {
    let (mut rng, seed) = seeded_rng(cfg.rng_seed);
    let mut canvas = cfg.blank_canvas();
    let report = GrowthEngine::from_config(cfg).run(&mut canvas, &mut rng);
    info!(
        "seed {seed}: drew {} segments ({} rejected, {} pruned)",
        report.accepted, report.rejected, report.pruned
    );

    canvas
        .save(out)
        .map_err(|e| format!("Failed to write {}: {e}", out.display()))?;
    println!("wrote {} ({} segments, seed {seed})", out.display(), report.accepted);
    Ok(())
}

fn run_viewer(cfg: Config) -> Result<(), String> {
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Sprout",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(cfg)))),
    )
    .map_err(|e| e.to_string())
}
