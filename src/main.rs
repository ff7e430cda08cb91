//! # vitus - Terminal Fitness Dashboard
//!
//! Pages through hourly steps, heart rate and weight history stored in a
//! local SQLite database. Charts load in the background so the terminal
//! stays responsive while a window is being fetched.

mod app;
mod config;
pub mod constants;
mod logging;
mod models;
mod provider;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::{Config, LayoutMode};
use provider::SqliteProvider;

/// vitus - Terminal Fitness Dashboard
#[derive(Parser, Debug)]
#[command(name = "vitus", version, about = "Interactive terminal charts for steps, heart rate and weight")]
struct Cli {
    /// SQLite database with StepsRecords, HeartRateRecords and WeightRecords
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Config file (default: ~/.config/vitus/config.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Dashboard layout
    #[arg(long, value_enum)]
    layout: Option<LayoutMode>,

    /// Color theme (default, gruvbox, nord, or a custom theme name)
    #[arg(long, short = 't')]
    theme: Option<String>,

    /// Log file (default: ~/.local/share/vitus/vitus.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and apply CLI overrides to config
    let mut config = Config::load(cli.config.as_deref());
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = log_file;
    }

    logging::init(&config.log_level, &config.log_file, cli.verbose);
    info!(db = %config.db_path.display(), layout = ?config.layout, "starting vitus");

    let provider = SqliteProvider::open(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))?;

    let mut app = app::App::new(&config, Arc::new(provider));
    app.run().await
}
