//! Metadata rewriting using lopdf
//!
//! Every input document is rebuilt into a fresh document: the pages are moved
//! under a new page tree and catalog, and a new information dictionary replaces
//! whatever metadata the source carried. Content streams and page resources are
//! carried over untouched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use lopdf::{Dictionary, Document, Object, ObjectId};
use log::debug;
use crate::config::MetadataRecord;
use crate::error::{Error, Result};
use super::metadata::build_info_dictionary;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Outcome of rewriting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Path of the written document
    pub output_path: PathBuf,
    /// Number of pages copied
    pub page_count: usize,
}

/// Rewrite the metadata of `input_path` into `output_folder`
///
/// The output keeps the input's file name and silently replaces any file of
/// that name. Parse problems surface as [`Error::UnreadableDocument`], problems
/// saving the result as [`Error::WriteFailure`].
///
/// # Example
///
/// ```no_run
/// use pdf_metadata_updater::config::MetadataRecord;
/// use pdf_metadata_updater::pdf::process;
/// use std::path::Path;
///
/// let mut values = MetadataRecord::new();
/// values.insert("Title".to_string(), "Annual Report".to_string());
///
/// let output = process(Path::new("input/report.pdf"), Path::new("output"), &values)
///     .expect("Failed to rewrite metadata");
/// println!("{}", output.display());
/// ```
pub fn process(input_path: &Path, output_folder: &Path, values: &MetadataRecord) -> Result<PathBuf> {
    rewrite_file(input_path, output_folder, values).map(|outcome| outcome.output_path)
}

/// Same as [`process`], also reporting how many pages were copied
pub fn rewrite_file(
    input_path: &Path,
    output_folder: &Path,
    values: &MetadataRecord,
) -> Result<RewriteOutcome> {
    if !input_path.exists() {
        return Err(Error::FileNotFound(input_path.to_path_buf()));
    }

    let file_name = input_path
        .file_name()
        .ok_or_else(|| Error::FileNotFound(input_path.to_path_buf()))?;
    let output_path = output_folder.join(file_name);

    let unreadable = |reason: String| Error::UnreadableDocument {
        path: input_path.to_path_buf(),
        reason,
    };

    let source = Document::load(input_path).map_err(|e| unreadable(e.to_string()))?;
    let mut doc = rewrite_document(source, values).map_err(|e| match e {
        Error::UnreadableDocument { reason, .. } => unreadable(reason),
        other => unreadable(other.to_string()),
    })?;
    let page_count = doc.get_pages().len();

    doc.save(&output_path).map_err(|e| Error::WriteFailure {
        path: output_path.clone(),
        reason: e.to_string(),
    })?;

    debug!("Wrote {} page(s) to {}", page_count, output_path.display());

    Ok(RewriteOutcome {
        output_path,
        page_count,
    })
}

/// Build a new document holding the pages of `source` and a fresh
/// information dictionary made from `values`
///
/// The source's catalog, page tree nodes, information dictionary and anything
/// only they reference (outlines, XMP metadata, ...) are dropped.
pub fn rewrite_document(mut source: Document, values: &MetadataRecord) -> Result<Document> {
    if source.trailer.has(b"Encrypt") {
        return Err(unreadable_in_memory("encrypted documents are not supported"));
    }
    source
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|id| source.get_object(id))
        .and_then(Object::as_dict)
        .map_err(|_| unreadable_in_memory("document has no catalog"))?;

    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
    for &page_id in &page_ids {
        inherit_page_attributes(&mut source, page_id)?;
    }

    let mut doc = Document::with_version(source.version.clone());

    // Carry over every object, then allocate new IDs above the highest one
    doc.objects = std::mem::take(&mut source.objects);
    doc.max_id = source.max_id;

    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let info_id = doc.add_object(Object::Dictionary(build_info_dictionary(values)));
    doc.trailer.set("Info", Object::Reference(info_id));

    let pruned = doc.prune_objects();
    debug!("Dropped {} unreferenced object(s)", pruned.len());

    Ok(doc)
}

fn unreadable_in_memory(reason: &str) -> Error {
    Error::UnreadableDocument {
        path: PathBuf::new(),
        reason: reason.to_string(),
    }
}

/// Copy inheritable attributes from ancestor page tree nodes onto the page
///
/// Pages are re-parented under a single new node, so anything they relied on
/// inheriting has to live on the page itself.
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    {
        let page = match doc.get_object(page_id).and_then(Object::as_dict) {
            Ok(page) => page,
            Err(_) => return Ok(()),
        };

        let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();

        let mut visited = HashSet::new();
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

        while let Some(node_id) = parent {
            if missing.is_empty() || !visited.insert(node_id) {
                break;
            }
            let node = match doc.get_object(node_id).and_then(Object::as_dict) {
                Ok(node) => node,
                Err(_) => break,
            };

            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((key.to_vec(), value.clone()));
                    false
                }
                Err(_) => true,
            });

            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    for (key, value) in inherited {
        page.set(key, value);
    }

    Ok(())
}
