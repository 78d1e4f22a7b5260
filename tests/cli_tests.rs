//! Command-line resolution and export run tests.
//! Flags are parsed with `Cli::try_parse_from`, so no process is spawned.

use std::fs;
use std::path::Path;

use clap::Parser;
use halo_export::cli::{run, Cli};
use halo_export::{Config, SaveMode, Schema, SchemaKind};
use tempfile::TempDir;

// Test Helpers
fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["halo-export"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Three-row catalog carrying every reduced-schema column
fn write_catalog(dir: &Path) -> std::path::PathBuf {
    let columns: Vec<String> = Schema::reduced()
        .columns()
        .iter()
        .map(|name| match name.as_str() {
            "index" => format!("\"{name}\": [0, 1, 2]"),
            "vmax" => format!("\"{name}\": [150, 90, 210.5]"),
            _ => format!("\"{name}\": [1, 2, 3]"),
        })
        .collect();
    let path = dir.join("disk.json");
    fs::write(&path, format!("{{{}}}", columns.join(", "))).unwrap();
    path
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, body).unwrap();
    path
}

// Flag and Config Resolution Tests
#[test]
fn test_flags_override_config() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(
        temp.path(),
        "[export]\ndefault_schema = \"reduced\"\ndefault_filename = \"from_config.csv\"\n\
         download_dir = \"/tmp/from_config\"\n",
    );

    let cli = parse(&[
        "--input",
        "halos.json",
        "--config",
        path_str(&config_path),
        "--schema",
        "extended",
        "--output",
        "from_flag.csv",
        "--download-dir",
        path_str(temp.path()),
    ]);
    let config = cli.load_config(temp.path()).unwrap();
    let plan = cli.plan(config).unwrap();

    assert_eq!(plan.schema, Schema::extended());
    assert_eq!(plan.filename, "from_flag.csv");
    assert_eq!(plan.config.export.download_dir, temp.path());
    assert_eq!(plan.target(), temp.path().join("from_flag.csv"));
}

#[test]
fn test_config_fills_missing_flags() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        "[export]\ndefault_schema = \"reduced\"\ndefault_filename = \"subhalos.csv\"\n\
         save_mode = \"direct\"\n",
    );

    let cli = parse(&["--input", "halos.json"]);
    let config = cli.load_config(temp.path()).unwrap();
    let plan = cli.plan(config).unwrap();

    assert_eq!(plan.schema, Schema::reduced());
    assert_eq!(plan.filename, "subhalos.csv");
    assert_eq!(plan.config.export.save_mode, SaveMode::Direct);
    assert!(plan.selection.is_all());
}

#[test]
fn test_no_config_files_means_defaults() {
    let temp = TempDir::new().unwrap();
    let cli = parse(&["--input", "halos.json"]);
    let config = cli.load_config(temp.path()).unwrap();
    assert_eq!(config.export.default_schema, SchemaKind::Extended);
    assert_eq!(config.export.default_filename, "halos.csv");
}

#[test]
fn test_malformed_config_in_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "[export\nbroken");

    let cli = parse(&["--input", "halos.json"]);
    let err = cli.load_config(temp.path()).unwrap_err();
    assert!(
        err.to_string().contains("config.toml"),
        "error should name the config files, got: {err}"
    );
}

#[test]
fn test_malformed_local_override_is_an_error() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "[export]\ndefault_schema = \"reduced\"\n");
    fs::write(
        temp.path().join("config.local.toml"),
        "[export]\nsave_mode = \"sometimes\"\n",
    )
    .unwrap();

    let cli = parse(&["--input", "halos.json"]);
    assert!(cli.load_config(temp.path()).is_err());
}

#[test]
fn test_malformed_explicit_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("custom.toml");
    fs::write(&config_path, "[logging\n").unwrap();

    let cli = parse(&["--input", "halos.json", "--config", path_str(&config_path)]);
    let err = cli.load_config(temp.path()).unwrap_err();
    assert!(err.to_string().contains("custom.toml"));
}

#[test]
fn test_where_flag_is_parsed_into_plan() {
    let cli = parse(&["--input", "halos.json", "-w", "where vmax > 100 and dist < 100"]);
    let plan = cli.plan(Config::default()).unwrap();
    assert_eq!(plan.selection.conditions().len(), 2);
}

#[test]
fn test_bad_where_flag_is_rejected() {
    let cli = parse(&["--input", "halos.json", "--where", "vmax >"]);
    let err = cli.plan(Config::default()).unwrap_err();
    assert!(err.to_string().contains("--where"));
}

#[test]
fn test_unknown_schema_flag_is_rejected() {
    let result = Cli::try_parse_from(["halo-export", "--input", "h.json", "--schema", "full"]);
    assert!(result.is_err());
}

// Export Run Tests
#[test]
fn test_run_writes_file_and_reports_it() {
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(temp.path());
    let downloads = temp.path().join("dl");

    let cli = parse(&[
        "--input",
        path_str(&catalog),
        "--schema",
        "reduced",
        "--output",
        "disk.csv",
        "--download-dir",
        path_str(&downloads),
    ]);
    let plan = cli.plan(Config::default()).unwrap();
    let summary = run(&plan).unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.columns, 14);
    assert_eq!(summary.target, downloads.join("disk.csv"));
    assert_eq!(summary.saver, "staged");

    let text = fs::read_to_string(&summary.target).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert_eq!(text.lines().next().unwrap(), Schema::reduced().header(','));
}

#[test]
fn test_run_applies_selection() {
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(temp.path());

    let cli = parse(&[
        "--input",
        path_str(&catalog),
        "--schema",
        "reduced",
        "--where",
        "vmax > 100",
        "--download-dir",
        path_str(temp.path()),
    ]);
    let summary = run(&cli.plan(Config::default()).unwrap()).unwrap();

    assert_eq!(summary.rows, 2);
    let text = fs::read_to_string(&summary.target).unwrap();
    let firsts: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(firsts, vec!["0", "2"]);
}

#[test]
fn test_run_fails_when_save_fails() {
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(temp.path());
    let downloads = temp.path().join("dl");

    let cli = parse(&[
        "--input",
        path_str(&catalog),
        "--schema",
        "reduced",
        "--output",
        "missing_sub/out.csv",
        "--download-dir",
        path_str(&downloads),
    ]);
    let err = run(&cli.plan(Config::default()).unwrap()).unwrap_err();

    assert!(
        format!("{err:#}").contains("failed to save"),
        "unexpected error: {err:#}"
    );
    assert!(!downloads.join("missing_sub/out.csv").exists());
    assert_eq!(fs::read_dir(&downloads).unwrap().count(), 0);
}

#[test]
fn test_run_fails_on_schema_mismatch_without_writing() {
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(temp.path());
    let downloads = temp.path().join("dl");

    // The reduced catalog lacks most extended columns
    let cli = parse(&[
        "--input",
        path_str(&catalog),
        "--schema",
        "extended",
        "--download-dir",
        path_str(&downloads),
    ]);
    assert!(run(&cli.plan(Config::default()).unwrap()).is_err());
    assert!(!downloads.join("halos.csv").exists());
}

#[test]
fn test_run_fails_on_missing_catalog() {
    let temp = TempDir::new().unwrap();
    let cli = parse(&[
        "--input",
        path_str(&temp.path().join("absent.parquet")),
        "--download-dir",
        path_str(temp.path()),
    ]);
    let err = run(&cli.plan(Config::default()).unwrap()).unwrap_err();
    assert!(err.to_string().contains("absent.parquet"));
}
