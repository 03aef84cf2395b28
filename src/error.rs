//! Error types for the PDF metadata updater

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF metadata updater
#[derive(Error, Debug)]
pub enum Error {
    /// One of the working folders could not be created
    #[error("Cannot create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be read, parsed or written
    #[error("Invalid configuration file {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// The input file is not a PDF we can read
    #[error("Unreadable PDF {}: {reason}", .path.display())]
    UnreadableDocument { path: PathBuf, reason: String },

    /// The rewritten document could not be written
    #[error("Cannot write {}: {reason}", .path.display())]
    WriteFailure { path: PathBuf, reason: String },

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Document structure is missing a required entry
    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),
}

impl Error {
    /// Whether this error aborts the whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::UnreadableDocument { .. }
                | Error::WriteFailure { .. }
                | Error::FileNotFound(_)
                | Error::InvalidStructure(_)
        )
    }
}
