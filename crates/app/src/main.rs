//! Eye Health Monitor - Main Entry Point

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use app::{camera_model, collect_face_widths, init_logging, AppSettings, ReplayTask, Report, Session};
use calibration::{CalibrationError, Calibrator};
use clap::{Parser, Subcommand};
use compliance::{ComplianceAggregator, LogSummary};
use landmarks::{JsonLinesSource, LandmarkLayout};
use monitor::{EyeMonitor, FrameAnalysis, MonitorAlert};
use storage::ComplianceLog;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "eye-monitor", version, about = "Screen-time eye health monitor")]
struct Cli {
    /// Settings file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a monitoring session over recorded landmark frames
    Monitor {
        /// JSON-lines landmark frames
        #[arg(long)]
        frames: PathBuf,
    },
    /// Compute the camera focal length from frames taken at the known distance
    Calibrate {
        /// JSON-lines landmark frames
        #[arg(long)]
        frames: PathBuf,
    },
    /// Summarize the compliance log
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    let settings = AppSettings::load(cli.config.as_deref())?;

    match cli.cmd {
        Commands::Monitor { frames } => run_monitor(&settings, &frames).await,
        Commands::Calibrate { frames } => run_calibrate(&settings, &frames),
        Commands::Report => run_report(&settings),
    }
}

async fn run_monitor(settings: &AppSettings, frames: &Path) -> Result<()> {
    info!("=== Eye Health Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let layout = LandmarkLayout::for_kind(settings.layout);
    let mut monitor = EyeMonitor::new(settings.monitor.clone(), layout)?;
    match calibration::load_or_uncalibrated(&settings.paths.calibration_file) {
        Some(record) => {
            monitor = monitor.with_camera(camera_model(&record, settings.monitor.known_face_width_cm));
        }
        None => warn!("Running uncalibrated; distance alerts are disabled"),
    }

    let log = Arc::new(
        ComplianceLog::open(&settings.paths.log_file)
            .with_context(|| format!("opening {}", settings.paths.log_file.display()))?,
    );
    let source = JsonLinesSource::open(frames)?;

    let (frame_tx, frame_rx) = mpsc::channel(settings.session.frame_queue);
    let (analysis_tx, analysis_rx) = mpsc::channel(settings.session.frame_queue);
    let (stop_tx, stop_rx) = watch::channel(false);

    let feeder = ReplayTask::spawn(source, frame_tx, settings.session.realtime_replay);
    let renderer = tokio::spawn(render_alerts(analysis_rx));
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            let _ = stop_tx.send(true);
        }
    });

    let mut session = Session::new(
        monitor,
        ComplianceAggregator::new(settings.compliance.clone()),
        log,
    )
    .with_analysis_channel(analysis_tx);

    let stats = session.run(frame_rx, stop_rx).await?;
    interrupt.abort();
    let sent = feeder.finish().await?;
    let totals = session.totals();
    drop(session);
    renderer.await?;

    println!("Frames replayed:   {}", sent);
    println!("Frames processed:  {} ({} rejected)", stats.frames_processed, stats.frames_rejected);
    println!("Blinks:            {}", totals.blinks);
    println!("Yawns:             {}", totals.yawns);
    println!("Drowsy episodes:   {}", totals.drowsiness_episodes);
    println!(
        "Rest cycles:       {} scheduled, {} completed",
        totals.rest_cycles_scheduled, totals.rest_cycles_completed
    );
    println!(
        "Records written:   {} to {}",
        stats.records_written,
        settings.paths.log_file.display()
    );
    if stats.sink_failures > 0 {
        warn!("{} records could not be written", stats.sink_failures);
    }
    Ok(())
}

/// Print the highest-priority alert each time it changes
async fn render_alerts(mut analysis_rx: mpsc::Receiver<FrameAnalysis>) {
    let mut shown: Option<MonitorAlert> = None;
    while let Some(analysis) = analysis_rx.recv().await {
        let top = analysis.highest_severity_alert();
        if top != shown {
            match top {
                Some(MonitorAlert::RestDue) => println!(
                    "[{:>8.1}s] RestDue: look 20 feet away for {:.0}s",
                    analysis.timestamp_s, analysis.rest_remaining_s
                ),
                Some(alert) => println!("[{:>8.1}s] {:?}", analysis.timestamp_s, alert),
                None => {}
            }
            shown = top;
        }
    }
}

fn run_calibrate(settings: &AppSettings, frames: &Path) -> Result<()> {
    let layout = LandmarkLayout::for_kind(settings.layout);
    let mut calibrator = Calibrator::new(settings.calibration.clone());
    let mut source = JsonLinesSource::open(frames)?;
    collect_face_widths(&mut source, &layout, &mut calibrator)?;

    match calibrator.complete(&settings.paths.calibration_file) {
        Ok(record) => {
            println!(
                "Focal length {:.2}px saved to {}",
                record.focal_length,
                settings.paths.calibration_file.display()
            );
            Ok(())
        }
        Err(CalibrationError::InsufficientSamples { collected, required }) => bail!(
            "calibration failed: only {} usable face-width samples, need {}; \
             sit at the known distance facing the camera and try again",
            collected,
            required
        ),
        Err(e) => Err(e.into()),
    }
}

fn run_report(settings: &AppSettings) -> Result<()> {
    let contents = ComplianceLog::at(&settings.paths.log_file).read_all()?;
    if contents.skipped_rows > 0 {
        warn!("Skipped {} malformed log rows", contents.skipped_rows);
    }

    let summary = LogSummary::from_records(&contents.records, &settings.report_config());
    print!("{}", Report(&summary));
    Ok(())
}
