//! Working folder layout

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Name of the folder holding the PDFs to process
pub const INPUT_DIR: &str = "input";
/// Name of the folder receiving rewritten PDFs
pub const OUTPUT_DIR: &str = "output";
/// Name of the folder holding the configuration file
pub const CONFIG_DIR: &str = "config";
/// File name of the configuration file inside the config folder
pub const CONFIG_FILE: &str = "config.ini";

/// The three working folders of a run, as absolute paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folders {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: PathBuf,
}

impl Folders {
    /// Path of the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE)
    }
}

/// Ensure `input/`, `output/` and `config/` exist below `base`
///
/// Existing folders are left alone, so calling this repeatedly is harmless.
pub fn bootstrap(base: &Path) -> Result<Folders> {
    let base = std::path::absolute(base).map_err(|source| Error::DirectoryCreation {
        path: base.to_path_buf(),
        source,
    })?;

    let folders = Folders {
        input: base.join(INPUT_DIR),
        output: base.join(OUTPUT_DIR),
        config: base.join(CONFIG_DIR),
    };

    for dir in [&folders.output, &folders.input, &folders.config] {
        fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreation {
            path: dir.clone(),
            source,
        })?;
        debug!("Folder ready: {}", dir.display());
    }

    Ok(folders)
}
