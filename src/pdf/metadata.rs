//! PDF metadata extraction and construction

use std::collections::BTreeMap;
use std::path::Path;
use lopdf::{decode_text_string, text_string, Dictionary, Document, Object};
use crate::config::MetadataRecord;
use crate::error::{Error, Result};

/// Producer string stamped on every document this tool writes
pub const PRODUCER: &str = concat!("pdf-metadata-updater ", env!("CARGO_PKG_VERSION"));

/// Creator string stamped on every document this tool writes
pub const CREATOR: &str = "pdf-metadata-updater";

/// Count pages by reading the Count field from the Pages dictionary
/// This is more reliable than get_pages() which doesn't handle nested page trees
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let general = |message: &str| Error::InvalidStructure(message.to_string());

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| general("Root is missing or not a reference"))?;
    let catalog_dict = doc.get_object(catalog_id)?.as_dict()?;

    let pages_id = catalog_dict
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| general("Pages is missing or not a reference"))?;
    let pages_dict = doc.get_object(pages_id)?.as_dict()?;

    match pages_dict.get(b"Count") {
        Ok(Object::Integer(n)) if *n >= 0 => Ok(*n as usize),
        _ => Err(general("Count is missing or not a positive integer")),
    }
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// String fields of the document information dictionary
    pub info: MetadataRecord,
}

impl PdfMetadata {
    /// Look up a field of the information dictionary
    pub fn field(&self, name: &str) -> Option<&str> {
        self.info.get(name).map(String::as_str)
    }
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    Ok(PdfMetadata {
        page_count,
        info: read_info(&doc),
    })
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    count_pages_from_catalog(&doc)
}

/// Read the string fields of a document's information dictionary
///
/// Non-string values (dates stored as names, numbers, ...) are skipped.
pub fn read_info(doc: &Document) -> MetadataRecord {
    let mut info = BTreeMap::new();

    let info_dict = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => doc.get_object(*id).and_then(Object::as_dict).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };

    if let Some(dict) = info_dict {
        for (key, value) in dict.iter() {
            let value = match value {
                Object::Reference(id) => match doc.get_object(*id) {
                    Ok(resolved) => resolved,
                    Err(_) => continue,
                },
                other => other,
            };
            if !matches!(value, Object::String(..)) {
                continue;
            }
            if let Ok(text) = decode_text_string(value) {
                info.insert(String::from_utf8_lossy(key).into_owned(), text);
            }
        }
    }

    info
}

/// Build the information dictionary written into every output document
///
/// Every configuration entry with a non-empty value becomes a text string
/// entry. Empty values (the blank fields of a fresh configuration) are left
/// out instead of being written as empty strings. `Producer` and `Creator`
/// always carry the tool constants, whatever the configuration says.
pub fn build_info_dictionary(values: &MetadataRecord) -> Dictionary {
    let mut info = Dictionary::new();

    for (key, value) in values {
        if value.is_empty() || key == "Producer" || key == "Creator" {
            continue;
        }
        info.set(key.as_bytes().to_vec(), text_string(value));
    }

    info.set("Producer", text_string(PRODUCER));
    info.set("Creator", text_string(CREATOR));

    info
}
