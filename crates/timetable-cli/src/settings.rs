//! Layered CLI settings.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults (the engine's [`EngineConfig::default`])
//! 2. `timetable.toml` in the working directory, or the file given with `--config`
//! 3. `TIMETABLE_*` environment variables (`TIMETABLE_DATASET_PATH`,
//!    `TIMETABLE_TIMEZONE`, `TIMETABLE_ONLINE_MARKERS=online,teams`, ...)
//!
//! A `.env` file is loaded into the environment first when one exists.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use timetable_engine::{AmbiguityPolicy, EngineConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Timetable JSON file used when `--dataset` is not given.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    pub timezone: String,
    pub online_markers: Vec<String>,
    pub ambiguity: AmbiguityPolicy,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let defaults = EngineConfig::default();
        let mut builder = Config::builder()
            .set_default("timezone", defaults.timezone)?
            .set_default("online_markers", defaults.online_markers)?
            .set_default("ambiguity", "shortest")?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path.to_path_buf())),
            None => builder.add_source(File::from(PathBuf::from("timetable.toml")).required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix("TIMETABLE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("online_markers"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            timezone: self.timezone.clone(),
            online_markers: self.online_markers.clone(),
            ambiguity: self.ambiguity,
        }
    }
}
