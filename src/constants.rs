//! Application-wide constants.
//!
//! Centralizes magic numbers, chart defaults and well-known paths.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Event poll timeout (ms) -- how often the UI checks for input.
pub const DEFAULT_EVENT_POLL_MS: u64 = 50;
/// Lower bound for the event poll timeout.
pub const MIN_EVENT_POLL_MS: u64 = 10;
/// Upper bound for the event poll timeout.
pub const MAX_EVENT_POLL_MS: u64 = 1000;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;

// ── Windows ───────────────────────────────────────────────────────
/// Hours in a bar series; one bar per hour of the day.
pub const HOURS_PER_DAY: usize = 24;
/// Furthest a relative day window may travel from today, in either direction.
pub const MAX_DAY_OFFSET: i32 = 36_500;
/// Default weight window step (days) for one navigation keypress.
pub const DEFAULT_WEIGHT_STEP_DAYS: u32 = 7;
/// Largest accepted weight window step.
pub const MAX_WEIGHT_STEP_DAYS: u32 = 365;

// ── Chart Bounds ──────────────────────────────────────────────────
/// Heart rate y-axis lower bound (bpm).
pub const DEFAULT_HEART_Y_MIN: f64 = 50.0;
/// Heart rate y-axis upper bound (bpm).
pub const DEFAULT_HEART_Y_MAX: f64 = 175.0;
/// Heart rate zone boundaries drawn as reference lines (bpm).
pub const DEFAULT_HEART_ZONES: [f64; 3] = [114.0, 139.0, 170.0];
/// Weight y-axis lower bound (lb).
pub const DEFAULT_WEIGHT_Y_MIN: f64 = 150.0;
/// Weight y-axis upper bound (lb).
pub const DEFAULT_WEIGHT_Y_MAX: f64 = 170.0;

// ── UI Layout ─────────────────────────────────────────────────────
/// Height of the header bar (tab strip).
pub const HEADER_HEIGHT: u16 = 3;
/// Width of the value column beside the steps chart.
pub const BAR_SIDE_PANEL_WIDTH: u16 = 16;
/// Width of the summary column beside the line charts.
pub const LINE_SIDE_PANEL_WIDTH: u16 = 18;
/// Width of a single bar in the steps chart.
pub const BAR_WIDTH: u16 = 2;
/// Gap between bars in the steps chart.
pub const BAR_GAP: u16 = 1;
/// Minimum content height before panes stop rendering charts.
pub const MIN_CHART_HEIGHT: u16 = 4;

// ── Spinner Animation ─────────────────────────────────────────────
/// Spinner character sequence for loading indicators.
pub const SPINNER_CHARS: &[&str] = &["◐", "◓", "◑", "◒"];

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/vitus/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("vitus")
}

/// Returns `~/.config/vitus/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.config/vitus/themes/`.
pub fn custom_theme_dir() -> PathBuf {
    config_dir().join("themes")
}

/// Returns `~/.config/vitus/themes/<name>.toml`.
pub fn custom_theme_path(name: &str) -> PathBuf {
    custom_theme_dir().join(format!("{}.toml", name))
}

/// Returns `~/.local/share/vitus/`.
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("vitus")
}

/// Default record database: `~/.local/share/vitus/vitus.db`.
pub fn default_db_path() -> PathBuf {
    data_dir().join("vitus.db")
}

/// Default log file: `~/.local/share/vitus/vitus.log`.
pub fn default_log_path() -> PathBuf {
    data_dir().join("vitus.log")
}
