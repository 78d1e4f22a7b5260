//! # halo-export CLI
//!
//! Loads a halo catalog, optionally narrows it with a selection, and exports
//! it as CSV.
//!
//! ## Usage
//!
//! ```bash
//! # Full catalog, extended schema, default file name
//! halo-export --input dmo.parquet
//!
//! # Query download with the reduced schema
//! halo-export --input disk.json --schema reduced \
//!     --where "vmax > 100 and dist < 100" --output disk_query.csv
//! ```
//!
//! ## Logging
//!
//! - `HALO_EXPORT_LOG`: filter directive, overrides `logging.level`
//! - `HALO_EXPORT_LOG_JSON`: `1` for JSON lines, overrides `logging.format`
//! - `HALO_EXPORT_LOG_FILE`: write logs to this file instead of stderr

use std::env;
use std::path::Path;
use std::sync::OnceLock;

use clap::Parser;

use halo_export::cli::{self, Cli};
use halo_export::config::LoggingConfig;

static TRACE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let config = args.load_config(Path::new("."))?;
    init_tracing(&config.logging);

    let plan = args.plan(config)?;
    let summary = cli::run(&plan)?;

    println!(
        "Exported {} rows ({} columns) to {} via {} saver",
        summary.rows,
        summary.columns,
        summary.target.display(),
        summary.saver
    );

    Ok(())
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Environment variables take precedence over config file values
    let level = env::var("HALO_EXPORT_LOG")
        .ok()
        .unwrap_or_else(|| logging_config.level.clone());

    let json = env::var("HALO_EXPORT_LOG_JSON")
        .ok()
        .map_or_else(|| logging_config.format == "json", |v| v != "0");

    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> =
        match env::var("HALO_EXPORT_LOG_FILE") {
            Ok(log_path) => {
                let file = match std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&log_path)
                {
                    Ok(f) => f,
                    Err(e) => {
                        eprintln!("ERROR: Unable to open HALO_EXPORT_LOG_FILE '{log_path}': {e}");
                        return;
                    }
                };
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                let _ = TRACE_GUARD.set(guard);

                let base = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(non_blocking);
                if json {
                    Box::new(base.json().finish())
                } else {
                    Box::new(base.compact().finish())
                }
            }
            Err(_) => {
                let base = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr);
                if json {
                    Box::new(base.json().finish())
                } else {
                    Box::new(base.compact().finish())
                }
            }
        };

    let _ = tracing::subscriber::set_global_default(subscriber);
}
