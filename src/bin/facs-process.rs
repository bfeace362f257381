//! Headless front end: process a tracker CSV and dump the smoothed datasets.
//!
//! Usage:
//!   facs-process <CSV> [--output facs.json] [--window-size 5] [--polyorder 2]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use facs_smooth::logging::init_logging;
use facs_smooth::{AppConfig, DatasetKind, FaceDataStore};

#[derive(Parser)]
#[command(
    name = "facs-process",
    about = "Smooth facial tracking channels and extract keyframe extrema",
    version
)]
struct Cli {
    /// Tracker CSV (one row per frame, with a `confidence` column)
    csv: PathBuf,

    /// Write the primary dataset as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file (command-line flags take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the effective configuration to this file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Polynomial-fit window (positive, odd)
    #[arg(short, long)]
    window_size: Option<usize>,

    /// Polynomial order (less than the window size)
    #[arg(short, long)]
    polyorder: Option<usize>,

    /// Also process the rigid alignment parameters
    #[arg(long)]
    rigid: bool,

    /// Also process the non-rigid shape parameters
    #[arg(long)]
    non_rigid: bool,

    /// Also process the eye landmark grids
    #[arg(long)]
    eye_landmarks: bool,

    /// Skip the 2D/3D landmark grids
    #[arg(long)]
    no_landmarks: bool,

    /// Skip the action unit / gaze / pose channels
    #[arg(long)]
    no_facs: bool,

    /// Print the extrema of this channel
    #[arg(long)]
    channel: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    let params = &mut config.processing;
    if let Some(w) = cli.window_size {
        params.window_size = w;
    }
    if let Some(p) = cli.polyorder {
        params.polyorder = p;
    }
    let datasets = &mut params.datasets;
    datasets.rigid |= cli.rigid;
    datasets.non_rigid |= cli.non_rigid;
    datasets.eye_landmarks_2d |= cli.eye_landmarks;
    datasets.eye_landmarks_3d |= cli.eye_landmarks;
    if cli.no_landmarks {
        datasets.landmarks_2d = false;
        datasets.landmarks_3d = false;
    }
    if cli.no_facs {
        datasets.facs = false;
    }

    if let Some(path) = &cli.save_config {
        config
            .save(path)
            .with_context(|| format!("saving config to {}", path.display()))?;
    }

    let mut store = FaceDataStore::new();
    let summary = store
        .process_file(&cli.csv, &config.processing)
        .with_context(|| format!("processing {}", cli.csv.display()))?;

    println!(
        "{}: {} frames accepted, {} rejected (window {}, polyorder {})",
        cli.csv.display(),
        summary.ingest.accepted,
        summary.ingest.rejected,
        config.processing.window_size,
        config.processing.polyorder
    );
    for ds in &summary.datasets {
        println!(
            "  {:<24} {:>4} channels  {:>6} maxima  {:>6} minima",
            ds.kind.label(),
            ds.channels,
            ds.maxima,
            ds.minima
        );
    }

    for name in &cli.channel {
        let found = store
            .datasets()
            .find_map(|ds| ds.channel(name).map(|c| (ds.kind(), c)));
        let Some((kind, channel)) = found else {
            bail!("channel '{name}' not found in the processed datasets");
        };
        println!("{name} ({kind}):");
        println!("  maxima: {:?}", channel.maxima);
        println!("  minima: {:?}", channel.minima);
    }

    if let Some(path) = &cli.output {
        if !config.processing.datasets.contains(DatasetKind::Facs) {
            log::warn!("primary dataset not selected; JSON output will be null");
        }
        let json = store.primary_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
