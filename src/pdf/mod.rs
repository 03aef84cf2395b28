//! PDF manipulation module

pub mod metadata;
pub mod rewrite;

// Re-export commonly used items
pub use metadata::{build_info_dictionary, count_pages, extract_metadata, PdfMetadata, CREATOR, PRODUCER};
pub use rewrite::{process, rewrite_document, rewrite_file, RewriteOutcome};
