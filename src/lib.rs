//! PDF Metadata Updater Library
//!
//! Batch-rewrites the document metadata of PDF files. This library provides
//! functionality to:
//! - Create the `input/`, `output/` and `config/` working folders
//! - Create, load and update the `[Metadata]` INI configuration
//! - Copy a PDF's pages into a new document carrying fresh metadata
//! - Run that rewrite over every PDF of the input folder
//!
//! # Example
//!
//! ```no_run
//! use pdf_metadata_updater::batch::run_batch;
//! use pdf_metadata_updater::config::{create_config, load_config, MetadataRecord};
//! use pdf_metadata_updater::folders::bootstrap;
//! use std::path::Path;
//!
//! let folders = bootstrap(Path::new(".")).expect("Failed to create folders");
//! create_config(&folders.config_file(), &MetadataRecord::new()).expect("Failed to create config");
//! let values = load_config(&folders.config_file()).expect("Failed to load config");
//!
//! let report = run_batch(&folders, &values).expect("Failed to list input folder");
//! println!("{} updated, {} skipped", report.processed.len(), report.skipped.len());
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod folders;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
