//! # GOBAN Simulator
//!
//! Runs the generation pipeline against a fresh store for a fixed time and
//! prints what ended up in it.
//!
//! ## Usage
//!
//! ```bash
//! goban_sim --config pipeline.toml --duration 10 --interval-ms 50 --snapshot-dir ./snapshots
//! RUST_LOG=goban_store=debug goban_sim
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use goban::store::{JsonDirSink, SnapshotSink};
use goban::{EntityStore, PipelineBuilder, PipelineConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<PathBuf>,
    duration: Duration,
    interval_ms: Option<u64>,
    snapshot_dir: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config: None,
        duration: Duration::from_secs(5),
        interval_ms: None,
        snapshot_dir: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--duration" | "-d" => {
                if i + 1 < args.len() {
                    parsed.duration = Duration::from_secs(args[i + 1].parse().unwrap_or(5));
                    i += 1;
                }
            }
            "--interval-ms" | "-i" => {
                if i + 1 < args.len() {
                    parsed.interval_ms = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--snapshot-dir" | "-s" => {
                if i + 1 < args.len() {
                    parsed.snapshot_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: goban_sim [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>        Pipeline config (TOML)");
                println!("  -d, --duration <SECS>      Run time in seconds (default: 5)");
                println!("  -i, --interval-ms <MS>     Generation interval override");
                println!("  -s, --snapshot-dir <DIR>   Write JSON collection snapshots");
                println!("  -h, --help                 Show this help");
                return None;
            }
            other => eprintln!("ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    Some(parsed)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(ms) = args.interval_ms {
        config.generation_interval_ms = ms;
        config = config.pace_monitor();
    }

    let store = match &args.snapshot_dir {
        Some(dir) => {
            let sink: Arc<dyn SnapshotSink> = Arc::new(JsonDirSink::new(dir)?);
            info!(dir = %dir.display(), "writing collection snapshots");
            Arc::new(EntityStore::with_sink(sink))
        }
        None => Arc::new(EntityStore::new()),
    };

    let handle = PipelineBuilder::new(Arc::clone(&store))
        .config(config)
        .start()?;

    let deadline = Instant::now() + args.duration;
    while Instant::now() < deadline && !handle.is_cancelled() {
        thread::sleep(Duration::from_millis(100));
    }

    let report = handle.shutdown()?;
    let counts = store.counts();

    println!();
    println!("┌─ FINAL COUNTS ──────────────────────────────┐");
    for (kind, count) in counts.iter() {
        println!("│ {:<10} {:>8}", kind.collection_name(), count);
    }
    println!("│ {:<10} {:>8}", "total", counts.total());
    println!("├─ REPORT ────────────────────────────────────┤");
    println!("│ generated  {:>8}", report.generated);
    println!("│ inserted   {:>8}", report.inserted);
    println!("│ monitor    {:>8} ticks", report.monitor_ticks);
    println!("└─────────────────────────────────────────────┘");
    Ok(())
}

fn main() -> ExitCode {
    let Some(args) = parse_args() else {
        return ExitCode::SUCCESS;
    };
    init_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "goban_sim failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
