//! Tracing setup. The TUI owns stdout, so events go to a log file, or
//! nowhere when the file cannot be opened.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Env var checked before `RUST_LOG`.
pub const LOG_ENV: &str = "VITUS_LOG";

/// Filter precedence: `-v`, then `VITUS_LOG`, then `RUST_LOG`, then the
/// configured level.
pub fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Open `path` for appending, creating parent directories.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns `true` when logging to `path`.
pub fn init(level: &str, path: &Path, verbose: bool) -> bool {
    let filter = build_filter(level, verbose);
    match open_log_file(path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .is_ok(),
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/vitus.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn open_log_file_appends() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitus.log");
        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn verbose_forces_debug() {
        assert_eq!(build_filter("warn", true).to_string(), "debug");
    }
}
