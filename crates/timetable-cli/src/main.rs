//! `timetable` CLI: find empty rooms and locate class groups from a timetable file.
//!
//! ## Usage
//!
//! ```sh
//! # Which rooms are free on Monday at 10:00 in the I/J/K block?
//! timetable --dataset week.json rooms --day Lundi --time 10:00 --building J
//!
//! # Where is 4ERP-BI3 right now?
//! timetable --dataset week.json where 4bi3
//!
//! # Where will it be on Wednesday at 14:00?
//! timetable --dataset week.json where 4bi3 --day Mercredi --time 14H00
//!
//! # Which dataset key does an abbreviated code map to?
//! timetable --dataset week.json resolve "4 erp bi 3"
//!
//! # Dataset statistics and sessions with unreadable time ranges
//! timetable --dataset week.json validate
//! ```
//!
//! Results are printed as JSON on stdout; logs go to stderr (`-v`, `-vv`, or `RUST_LOG`).

mod settings;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use timetable_engine::{
    Clock, Engine, EngineConfig, FixedClock, LocationRequest, OccupancyRequest, ResolutionReport,
    ScheduleDataset, SystemClock,
};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "timetable",
    version,
    about = "Room occupancy and class location queries over a weekly timetable"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Timetable JSON file (falls back to `dataset_path` from the settings)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Settings file (defaults to ./timetable.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List occupied, empty, and warning rooms at a given day and time
    Rooms {
        /// Day name, English or French (e.g. "Monday", "Lundi")
        #[arg(long)]
        day: String,
        /// Time of day (e.g. "10:00", "10H:00", "10H00")
        #[arg(long)]
        time: String,
        /// Building letter; I, J and K are searched together
        #[arg(long)]
        building: Option<String>,
    },
    /// Find a class group's current or next session
    Where {
        /// Class code, possibly abbreviated (e.g. "4bi3")
        class: String,
        /// Day name (defaults to today)
        #[arg(long)]
        day: Option<String>,
        /// Time or time range (defaults to now)
        #[arg(long)]
        time: Option<String>,
        /// Pretend the clock reads this RFC 3339 instant
        #[arg(long)]
        now: Option<String>,
    },
    /// Resolve a class code to a dataset key (exit code 1 when unresolved)
    Resolve {
        /// Class code, possibly abbreviated
        class: String,
    },
    /// Show dataset statistics and sessions whose time range cannot be read
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let dataset_path = cli
        .dataset
        .or_else(|| settings.dataset_path.clone())
        .context("No timetable given: pass --dataset or set dataset_path")?;
    let config = settings.engine_config();

    match cli.command {
        Commands::Rooms {
            day,
            time,
            building,
        } => {
            let engine = build_engine(&dataset_path, &config, Arc::new(SystemClock))?;
            let report = engine.occupancy(&OccupancyRequest {
                day: Some(day),
                time: Some(time),
                building,
            });
            print_json(&report)?;
        }
        Commands::Where {
            class,
            day,
            time,
            now,
        } => {
            let clock: Arc<dyn Clock> = match now.as_deref() {
                Some(raw) => Arc::new(FixedClock(parse_now(raw)?)),
                None => Arc::new(SystemClock),
            };
            let engine = build_engine(&dataset_path, &config, clock)?;
            let report = engine.locate(&LocationRequest {
                class_code: class,
                day,
                time,
            });
            print_json(&report)?;
        }
        Commands::Resolve { class } => {
            let engine = build_engine(&dataset_path, &config, Arc::new(SystemClock))?;
            let report = engine.resolve(&class);
            print_json(&report)?;
            if !matches!(report, ResolutionReport::Resolved { .. }) {
                process::exit(1);
            }
        }
        Commands::Validate => {
            let dataset = load_dataset(&dataset_path, &config)?;
            print_json(&validation_summary(&dataset))?;
        }
    }

    Ok(())
}

/// `-v` flags raise the default level; `RUST_LOG` directives still win.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_engine(path: &Path, config: &EngineConfig, clock: Arc<dyn Clock>) -> Result<Engine> {
    let dataset = load_dataset(path, config)?;
    tracing::info!(
        path = %path.display(),
        classes = dataset.len(),
        rooms = dataset.room_universe().len(),
        "timetable loaded"
    );
    Engine::new(dataset, config.clone(), clock).context("Invalid engine settings")
}

fn load_dataset(path: &Path, config: &EngineConfig) -> Result<ScheduleDataset> {
    ScheduleDataset::load(path, config)
        .with_context(|| format!("Failed to load timetable: {}", path.display()))
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .with_context(|| format!("Invalid --now instant (expected RFC 3339): {}", raw))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationSummary {
    classes: usize,
    sessions: usize,
    rooms: usize,
    excluded: Vec<ExcludedSession>,
}

#[derive(Serialize)]
struct ExcludedSession {
    class: String,
    day: String,
    time: String,
    course: String,
}

fn validation_summary(dataset: &ScheduleDataset) -> ValidationSummary {
    let excluded: Vec<ExcludedSession> = dataset
        .excluded_sessions()
        .map(|(class, day, session)| ExcludedSession {
            class: class.id.clone(),
            day: day.key.clone(),
            time: session.raw_time.clone(),
            course: session.raw_course.clone(),
        })
        .collect();
    if !excluded.is_empty() {
        tracing::warn!(count = excluded.len(), "sessions with unreadable time ranges");
    }

    ValidationSummary {
        classes: dataset.len(),
        sessions: dataset.session_count(),
        rooms: dataset.room_universe().len(),
        excluded,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
