use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

/// Which layout the dashboard uses for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// One chart at a time, switched with the tab strip.
    #[default]
    Tabbed,
    /// All three charts stacked; focus picks the one receiving keys.
    MultiPane,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/vitus/config.toml
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database holding the fitness records
    pub db_path: PathBuf,
    pub layout: LayoutMode,
    /// Theme name (built-in or custom)
    pub theme: String,
    /// Input poll timeout in milliseconds
    pub event_poll_ms: u64,
    /// Default tracing filter when no env override is set
    pub log_level: String,
    pub log_file: PathBuf,
    pub heart: HeartConfig,
    pub weight: WeightConfig,
}

/// Heart rate chart settings.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartConfig {
    pub y_min: f64,
    pub y_max: f64,
    /// Reference lines drawn across the chart (bpm).
    pub zones: Vec<f64>,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            y_min: DEFAULT_HEART_Y_MIN,
            y_max: DEFAULT_HEART_Y_MAX,
            zones: DEFAULT_HEART_ZONES.to_vec(),
        }
    }
}

/// Weight chart settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightConfig {
    pub y_min: f64,
    pub y_max: f64,
    /// First day shown; `None` means January 1 of the current year.
    pub start_date: Option<NaiveDate>,
    /// Days moved per page.
    pub step_days: u32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            y_min: DEFAULT_WEIGHT_Y_MIN,
            y_max: DEFAULT_WEIGHT_Y_MAX,
            start_date: None,
            step_days: DEFAULT_WEIGHT_STEP_DAYS,
        }
    }
}

impl WeightConfig {
    /// Configured start date, or January 1 of `today`'s year.
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        self.start_date
            .or_else(|| NaiveDate::from_ymd_opt(today.year(), 1, 1))
            .unwrap_or(today)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            layout: LayoutMode::default(),
            theme: "default".to_string(),
            event_poll_ms: DEFAULT_EVENT_POLL_MS,
            log_level: "info".to_string(),
            log_file: default_log_path(),
            heart: HeartConfig::default(),
            weight: WeightConfig::default(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    db_path: Option<PathBuf>,
    layout: Option<LayoutMode>,
    theme: Option<String>,
    event_poll_ms: Option<u64>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    heart: Option<FileHeartConfig>,
    weight: Option<FileWeightConfig>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileHeartConfig {
    y_min: Option<f64>,
    y_max: Option<f64>,
    zones: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileWeightConfig {
    y_min: Option<f64>,
    y_max: Option<f64>,
    /// `YYYY-MM-DD`
    start_date: Option<String>,
    step_days: Option<u32>,
}

impl Config {
    /// Load config from `path` (or ~/.config/vitus/config.toml), falling back
    /// to defaults when the file is missing or unreadable.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        match Self::load_from(&path) {
            Ok((config, warnings)) => {
                for w in warnings {
                    eprintln!("Warning: {}", w);
                }
                config
            }
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Config::default()
            }
        }
    }

    /// Strict variant of [`Config::load`]: a missing file yields defaults,
    /// any other failure is an error. Also returns field-level warnings.
    pub fn load_from(path: &Path) -> Result<(Self, Vec<String>), ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok((Config::default(), Vec::new()))
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Config::default();
        let warnings = config.merge(file_config);
        Ok((config, warnings))
    }

    // Merge file values over defaults
    fn merge(&mut self, file_config: FileConfig) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(v) = file_config.db_path {
            if !v.as_os_str().is_empty() {
                self.db_path = v;
            }
        }
        if let Some(v) = file_config.layout {
            self.layout = v;
        }
        if let Some(v) = file_config.theme {
            if !v.is_empty() {
                self.theme = v;
            }
        }
        if let Some(v) = file_config.event_poll_ms {
            self.event_poll_ms = v.clamp(MIN_EVENT_POLL_MS, MAX_EVENT_POLL_MS);
        }
        if let Some(v) = file_config.log_level {
            if !v.is_empty() {
                self.log_level = v;
            }
        }
        if let Some(v) = file_config.log_file {
            if !v.as_os_str().is_empty() {
                self.log_file = v;
            }
        }

        if let Some(h) = file_config.heart {
            let y_min = h.y_min.unwrap_or(self.heart.y_min);
            let y_max = h.y_max.unwrap_or(self.heart.y_max);
            if y_min.is_finite() && y_max.is_finite() && y_min < y_max {
                self.heart.y_min = y_min;
                self.heart.y_max = y_max;
            } else {
                warnings.push(format!(
                    "heart y range {}..{} is empty, keeping {}..{}",
                    y_min, y_max, self.heart.y_min, self.heart.y_max
                ));
            }
            if let Some(zones) = h.zones {
                self.heart.zones = zones.into_iter().filter(|z| z.is_finite()).collect();
            }
        }

        if let Some(w) = file_config.weight {
            let y_min = w.y_min.unwrap_or(self.weight.y_min);
            let y_max = w.y_max.unwrap_or(self.weight.y_max);
            if y_min.is_finite() && y_max.is_finite() && y_min < y_max {
                self.weight.y_min = y_min;
                self.weight.y_max = y_max;
            } else {
                warnings.push(format!(
                    "weight y range {}..{} is empty, keeping {}..{}",
                    y_min, y_max, self.weight.y_min, self.weight.y_max
                ));
            }
            if let Some(v) = w.start_date {
                match NaiveDate::parse_from_str(&v, "%Y-%m-%d") {
                    Ok(date) => self.weight.start_date = Some(date),
                    Err(_) => warnings.push(format!(
                        "weight start_date {:?} is not YYYY-MM-DD, using January 1",
                        v
                    )),
                }
            }
            if let Some(v) = w.step_days {
                self.weight.step_days = v.clamp(1, MAX_WEIGHT_STEP_DAYS);
            }
        }

        warnings
    }
}
