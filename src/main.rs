mod db;
mod errors;
mod export;
mod ledger;
mod models;
mod run;
mod session;
mod ui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    init_logging(&data_dir)?;

    let db = db::Database::open(&data_dir.join("saldo.db"))?;
    let mut session = session::Session::load(db)?;

    match args.len() {
        1 => run::as_tui(&mut session),
        2.. => run::as_cli(&args, &mut session),
        _ => {
            eprintln!("Usage: saldo [command]");
            Ok(())
        }
    }
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "saldo", "Saldo")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

// Logs go to a file. Stdout belongs to the TUI.
fn init_logging(data_dir: &std::path::Path) -> Result<()> {
    let log_path = data_dir.join("saldo.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("saldo=info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
