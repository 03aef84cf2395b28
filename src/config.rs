//! Metadata configuration file
//!
//! The configuration is a hand-editable INI file with a single `[Metadata]`
//! section. Every key in that section becomes a field of the document
//! information dictionary written into each output PDF.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use ini::{Ini, ParseOption};
use log::debug;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Name of the INI section holding the metadata fields
pub const METADATA_SECTION: &str = "Metadata";

/// Fields written into a freshly created configuration file
pub const DEFAULT_FIELDS: [&str; 4] = ["Title", "Author", "Subject", "Keywords"];

/// Metadata field name to value. Keys are case-sensitive.
pub type MetadataRecord = BTreeMap<String, String>;

/// Create the configuration file at `path` unless one already exists
///
/// The new file holds a `[Metadata]` section with every field of
/// [`DEFAULT_FIELDS`] (empty unless `defaults` supplies a value) plus any extra
/// keys from `defaults`. Returns `true` if a file was written.
pub fn create_config(path: &Path, defaults: &MetadataRecord) -> Result<bool> {
    if path.exists() {
        debug!("Config already present: {}", path.display());
        return Ok(false);
    }

    let mut ini = Ini::new();
    for field in DEFAULT_FIELDS {
        let value = defaults.get(field).map(String::as_str).unwrap_or("");
        ini.with_section(Some(METADATA_SECTION)).set(field, value);
    }
    for (key, value) in defaults {
        if !DEFAULT_FIELDS.contains(&key.as_str()) {
            ini.with_section(Some(METADATA_SECTION))
                .set(key.as_str(), value.as_str());
        }
    }

    write_atomically(path, &ini)?;
    debug!("Created config: {}", path.display());
    Ok(true)
}

/// Read the `[Metadata]` section of the configuration file
pub fn load_config(path: &Path) -> Result<MetadataRecord> {
    let ini = read_ini(path)?;
    let section = ini
        .section(Some(METADATA_SECTION))
        .ok_or_else(|| Error::ConfigParse {
            path: path.to_path_buf(),
            message: format!("missing [{}] section", METADATA_SECTION),
        })?;

    Ok(section
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect())
}

/// Overwrite `values` in the existing `[Metadata]` section and persist
///
/// Keys not named in `values` keep their current value. The file is replaced
/// by renaming a fully written temporary file over it.
pub fn update_config(path: &Path, values: &MetadataRecord) -> Result<()> {
    let mut ini = read_ini(path)?;
    for (key, value) in values {
        ini.with_section(Some(METADATA_SECTION))
            .set(key.as_str(), value.as_str());
    }

    write_atomically(path, &ini)?;
    debug!("Updated {} field(s) in {}", values.len(), path.display());
    Ok(())
}

/// Parse a `KEY=VALUE` assignment
pub fn parse_assignment(assignment: &str) -> Option<(String, String)> {
    let (key, value) = assignment.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Values are taken as written; surrounding quotes are part of the value
fn read_ini(path: &Path) -> Result<Ini> {
    let options = ParseOption {
        enabled_quote: false,
        ..ParseOption::default()
    };
    Ini::load_from_file_opt(path, options).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_atomically(path: &Path, ini: &Ini) -> Result<()> {
    let to_config_error = |message: String| Error::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| to_config_error(e.to_string()))?;
    ini.write_to(&mut temp)
        .map_err(|e| to_config_error(e.to_string()))?;
    temp.flush().map_err(|e| to_config_error(e.to_string()))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| to_config_error(e.to_string()))?;
    temp.persist(path)
        .map_err(|e| to_config_error(e.error.to_string()))?;

    Ok(())
}
