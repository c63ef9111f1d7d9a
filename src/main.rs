//! Offline driver for the gesture drawing engine: replays a landmark trace,
//! writes composites, and optionally submits the drawing for analysis.

use air_canvas::analysis::{AnalysisDispatcher, AnalysisState};
use air_canvas::config::{Config, EXAMPLE_CONFIG};
use air_canvas::replay::{read_trace, run_replay, synthetic_frame};
use air_canvas::session::DrawingSession;
use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark trace to replay (JSON lines, one frame per line)
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Background image used as the video frame for every tick
    #[arg(short, long)]
    background: Option<PathBuf>,

    /// Directory for per-frame composite PNGs
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Write the final drawing to this PNG file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Submit the final drawing for analysis and print the result
    #[arg(short, long)]
    analyze: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    let Some(trace_path) = &args.trace else {
        bail!("No trace given; use --trace <file> or --print-config");
    };
    let trace = read_trace(trace_path)?;
    if trace.is_empty() {
        bail!("Trace {} contains no frames", trace_path.display());
    }

    let background = match &args.background {
        Some(path) => image::open(path)?.to_rgb8(),
        None => synthetic_frame(config.canvas.width, config.canvas.height),
    };

    let analysis_config = config.analysis.clone();
    let mut session = DrawingSession::new(config)?;
    let summary = run_replay(&mut session, &trace, &background, args.out_dir.as_deref())?;
    println!(
        "Processed {} frames ({} with hand), final gesture {}, {} painted pixels",
        summary.frames, summary.frames_with_hand, summary.final_state, summary.painted_pixels
    );

    if let Some(path) = &args.export {
        session.surface().save_png(path)?;
        println!("Drawing written to {}", path.display());
    }

    if args.analyze {
        if session.surface().is_blank() {
            bail!("Nothing to analyze: the drawing is empty");
        }
        let mut dispatcher = AnalysisDispatcher::new(analysis_config);
        dispatcher.request(session.encode_drawing()?)?;
        info!("Waiting for analysis result");
        loop {
            match dispatcher.poll() {
                AnalysisState::Requesting => std::thread::sleep(Duration::from_millis(100)),
                AnalysisState::Succeeded(text) => {
                    println!("\n{text}");
                    break;
                }
                AnalysisState::Failed(e) => bail!("Analysis failed: {e}"),
                AnalysisState::Idle => bail!("Analysis never started"),
            }
        }
    }

    Ok(())
}
