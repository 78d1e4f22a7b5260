//! Command-line front end.
//!
//! Flags are parsed into [`Cli`], merged with configuration into an
//! [`ExportPlan`], and the plan is executed by [`run`]. Flags win over
//! configuration; configuration wins over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::config::Config;
use crate::export::Exporter;
use crate::schema::{Schema, SchemaKind};
use crate::selection::Selection;
use crate::storage::load_catalog;

#[derive(Debug, Parser)]
#[command(name = "halo-export", version, about = "Export halo catalogs to CSV")]
pub struct Cli {
    /// Catalog file (.parquet or .json)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column layout: extended (18 columns) or reduced (14 columns)
    #[arg(short, long)]
    pub schema: Option<SchemaKind>,

    /// Row filter, e.g. "where vmax > 100 and dist < 100"
    #[arg(short = 'w', long = "where")]
    pub selection: Option<String>,

    /// Suggested file name, used verbatim
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory receiving the export (overrides config)
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Configuration file (defaults to config.toml + config.local.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load configuration from `--config`, or from `config.toml` and
    /// `config.local.toml` in `dir`
    ///
    /// Absent files fall back to defaults. Files that fail to parse are
    /// reported, never ignored.
    pub fn load_config(&self, dir: &Path) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("failed to load config '{}'", path.display())),
            None => Config::load_from_dir(dir).with_context(|| {
                format!(
                    "failed to load config.toml / config.local.toml in '{}'",
                    dir.display()
                )
            }),
        }
    }

    /// Resolve flags against `config`
    pub fn plan(self, mut config: Config) -> anyhow::Result<ExportPlan> {
        if let Some(dir) = self.download_dir {
            config.export.download_dir = dir;
        }

        let selection = match self.selection.as_deref() {
            Some(text) => Selection::parse(text).context("invalid --where selection")?,
            None => Selection::all(),
        };

        Ok(ExportPlan {
            input: self.input,
            schema: Schema::from(self.schema.unwrap_or(config.export.default_schema)),
            selection,
            filename: self
                .output
                .unwrap_or_else(|| config.export.default_filename.clone()),
            config,
        })
    }
}

/// Everything needed to run one export
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub input: PathBuf,
    pub schema: Schema,
    pub selection: Selection,
    pub filename: String,
    pub config: Config,
}

impl ExportPlan {
    /// Where the saver is asked to put the file
    pub fn target(&self) -> PathBuf {
        self.config.export.download_dir.join(&self.filename)
    }
}

/// Outcome of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub columns: usize,
    pub target: PathBuf,
    pub saver: &'static str,
}

/// Load, filter, serialize and save
///
/// Unlike [`Exporter::export_to_file`], a failed save is an error here, so
/// the summary only ever names a file that was written.
pub fn run(plan: &ExportPlan) -> anyhow::Result<ExportSummary> {
    let catalog = load_catalog(&plan.input)
        .with_context(|| format!("failed to load catalog '{}'", plan.input.display()))?;

    let dataset = if plan.selection.is_all() {
        catalog
    } else {
        plan.selection.apply(&catalog)?
    };

    let exporter =
        Exporter::from_config(&plan.config.export).context("no usable file save mechanism")?;

    let document = exporter
        .serialize(&dataset, &plan.schema)
        .with_context(|| format!("failed to serialize '{}'", plan.filename))?;
    let rows = document.row_count();

    let target = plan.target();
    exporter
        .try_export_to_file(document, &plan.filename)
        .with_context(|| format!("failed to save '{}'", target.display()))?;

    info!(rows, target = %target.display(), "cli_export_complete");
    Ok(ExportSummary {
        rows,
        columns: plan.schema.len(),
        target,
        saver: exporter.saver_name(),
    })
}
