// Command-line entry point: load one event, print its collection sizes,
// then open the viewer and/or write a snapshot.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use caloview::viewer::{self, snapshot, OrbitCamera, SceneGeometry, ViewerOptions};
use caloview::{DetPlot, DisplayConfig, Edm4hepJsonFile, PdgVisMap, SceneLayout};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// EDM4hep JSON event file
    events: PathBuf,

    /// Display configuration (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// PDG reference file
    #[arg(long, default_value = "data/PDG_IDs.txt")]
    pdg: PathBuf,

    /// Event to show first
    #[arg(long, default_value_t = 0)]
    event: usize,

    /// Maximum MC particles read per event (-1 for all)
    #[arg(long, allow_hyphen_values = true)]
    max_mc: Option<i64>,

    /// Write a PNG snapshot of the event
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Do not open the viewer window
    #[arg(long)]
    no_window: bool,

    /// Keep at most this many events in the cache
    #[arg(long)]
    cache_events: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => DisplayConfig::load(path)?,
        None => DisplayConfig::default(),
    };
    if let Some(max_mc) = args.max_mc {
        config.max_mc = max_mc;
    }

    let pdg_map = PdgVisMap::from_file(&args.pdg)?;
    log::info!("Loaded {} PDG entries from {}", pdg_map.len(), args.pdg.display());

    let source = Edm4hepJsonFile::new(&args.events);
    let mut plot = DetPlot::from_config(source, &config, pdg_map)?;
    if let Some(events) = args.cache_events {
        plot = plot.with_cache_limit(events);
    }

    plot.load_hits_for_event(args.event)?;
    plot.print_sizes_for_event(args.event);

    let layout = SceneLayout::from_settings(&config.plot_settings)?;

    if let Some(path) = &args.snapshot {
        let geometry = SceneGeometry::build(&plot.hitmarkers_for_event(args.event), &layout);
        let camera = OrbitCamera::from_layout(&layout.camera);
        snapshot::render_png(&geometry, &layout, &camera, path)?;
    }

    if !args.no_window {
        let options = ViewerOptions {
            snapshot_dir: args
                .snapshot
                .as_ref()
                .and_then(|p| p.parent())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        viewer::run(plot, layout, args.event, options)?;
    }

    Ok(())
}
