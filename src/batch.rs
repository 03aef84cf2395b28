//! Batch run over the input folder

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use log::{info, warn};

use crate::config::MetadataRecord;
use crate::error::{Error, Result};
use crate::folders::Folders;
use crate::pdf::rewrite_file;

/// A file that was rewritten
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub page_count: usize,
}

/// A file that was skipped, with the reason
#[derive(Debug)]
pub struct SkippedFile {
    pub input: PathBuf,
    pub error: Error,
}

/// Result of one pass over the input folder
///
/// A run with skipped files still counts as completed.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchReport {
    /// Total number of input files seen
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len()
    }

    /// Whether every input file was rewritten
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// List the PDFs directly inside `input_dir`, sorted by path
///
/// Only names ending in `.pdf` count. Subfolders are never descended into, and
/// a folder whose name ends in `.pdf` is ignored.
pub fn find_input_pdfs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.pdf",
        Pattern::escape(&input_dir.to_string_lossy())
    );

    let mut paths = Vec::new();
    for entry in glob(&pattern).map_err(|e| Error::InvalidGlob(e.to_string()))? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!("Cannot read entry in {}: {}", input_dir.display(), e),
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

/// Rewrite every PDF of the input folder into the output folder
///
/// `values` is read-only for the whole run. A file that cannot be read or
/// written is recorded in the report and the run moves on; only a failure to
/// list the input folder aborts.
pub fn run_batch(folders: &Folders, values: &MetadataRecord) -> Result<BatchReport> {
    let inputs = find_input_pdfs(&folders.input)?;
    info!("Found {} PDF file(s) in {}", inputs.len(), folders.input.display());

    let mut report = BatchReport::default();

    for input in inputs {
        match rewrite_file(&input, &folders.output, values) {
            Ok(outcome) => {
                info!(
                    "Updated {} ({} page(s))",
                    outcome.output_path.display(),
                    outcome.page_count
                );
                report.processed.push(ProcessedFile {
                    input,
                    output: outcome.output_path,
                    page_count: outcome.page_count,
                });
            }
            Err(error) => {
                warn!("Skipping file: {}", error);
                report.skipped.push(SkippedFile { input, error });
            }
        }
    }

    Ok(report)
}
