//! PDF Metadata Updater CLI tool
//!
//! Rewrites the metadata of every PDF in `input/` into `output/`, using the
//! values of `config/config.ini`.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;
use std::process;

use pdf_metadata_updater::batch::{run_batch, BatchReport};
use pdf_metadata_updater::config::{
    create_config, load_config, parse_assignment, update_config, MetadataRecord,
};
use pdf_metadata_updater::folders::bootstrap;

/// PDF Metadata Updater - Rewrite Producer, Creator and custom metadata of PDFs
#[derive(Parser)]
#[command(name = "pdf-metadata-updater")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Process every PDF in ./input into ./output
    pdf-metadata-updater

    # Store a new title and author, then process
    pdf-metadata-updater --set \"Title=Annual Report\" --set \"Author=Jane Roe\"

    # Work in another folder and only prepare the configuration
    pdf-metadata-updater --base-dir ~/reports --config-only")]
struct Cli {
    /// Folder holding input/, output/ and config/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Store a metadata field in the configuration before processing (KEY=VALUE)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set)]
    set: Vec<(String, String)>,

    /// Stop after creating/updating the configuration file
    #[arg(long)]
    config_only: bool,

    /// Show more log output (repeat for debug output)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_set(value: &str) -> std::result::Result<(String, String), String> {
    parse_assignment(value).ok_or_else(|| format!("expected KEY=VALUE, got '{}'", value))
}

fn main() {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let folders = bootstrap(&cli.base_dir).context("Failed to prepare working folders")?;
    let config_file = folders.config_file();

    if create_config(&config_file, &MetadataRecord::new())? {
        eprintln!("Created configuration file: {}", config_file.display());
    }

    if !cli.set.is_empty() {
        let values: MetadataRecord = cli.set.iter().cloned().collect();
        update_config(&config_file, &values)?;
        eprintln!("Stored {} field(s) in {}", values.len(), config_file.display());
    }

    let values = load_config(&config_file)?;

    if cli.config_only {
        return Ok(());
    }

    let report = run_batch(&folders, &values)?;
    print_summary(&report, cli.quiet);

    Ok(())
}

fn print_summary(report: &BatchReport, quiet: bool) {
    for skipped in &report.skipped {
        eprintln!("Skipped: {}", skipped.error);
    }

    if quiet {
        return;
    }

    for processed in &report.processed {
        eprintln!("Updated: {}", processed.output.display());
    }
    eprintln!(
        "Done: {} updated, {} skipped",
        report.processed.len(),
        report.skipped.len()
    );
}
