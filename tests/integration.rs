//! Integration tests for the PDF metadata updater

use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use pdf_metadata_updater::batch::run_batch;
use pdf_metadata_updater::config::{create_config, load_config, update_config, MetadataRecord};
use pdf_metadata_updater::folders::{bootstrap, Folders};
use pdf_metadata_updater::pdf::{count_pages, extract_metadata, process, CREATOR, PRODUCER};
use pdf_metadata_updater::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a PDF with one page per entry of `texts` and the given Producer/Creator
fn write_sample_pdf(path: &Path, texts: &[&str], producer: &str, creator: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in texts {
        let content = format!("BT /F1 18 Tf 72 720 Td ({}) Tj ET", text);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Original Title"),
        "Producer" => Object::string_literal(producer),
        "Creator" => Object::string_literal(creator),
    });
    doc.trailer.set("Info", info_id);

    doc.save(path).expect("Failed to write sample PDF");
}

/// Content stream bytes of every page, in page order
fn page_streams(path: &Path) -> Vec<Vec<u8>> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .values()
        .flat_map(|&page_id| doc.get_page_contents(page_id))
        .map(|id| {
            doc.get_object(id)
                .and_then(Object::as_stream)
                .expect("Content is not a stream")
                .content
                .clone()
        })
        .collect()
}

fn values(pairs: &[(&str, &str)]) -> MetadataRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn setup() -> (TempDir, Folders) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let folders = bootstrap(temp_dir.path()).expect("Failed to bootstrap folders");
    (temp_dir, folders)
}

#[test]
fn test_process_preserves_pages() {
    let (_temp_dir, folders) = setup();
    let input = folders.input.join("report.pdf");
    write_sample_pdf(&input, &["First", "Second", "Third"], "Word", "Word");

    let output = process(&input, &folders.output, &values(&[("Title", "Report")]))
        .expect("Failed to process PDF");

    assert_eq!(output, folders.output.join("report.pdf"));
    assert_eq!(count_pages(&output).unwrap(), 3);
    assert_eq!(page_streams(&output), page_streams(&input));
}

#[test]
fn test_process_replaces_metadata() {
    let (_temp_dir, folders) = setup();
    let input = folders.input.join("memo.pdf");
    write_sample_pdf(&input, &["Memo"], "Acrobat Distiller", "Microsoft Word");

    let config = values(&[
        ("Title", "Quarterly Memo"),
        ("Author", "Jane Roe"),
        ("Producer", "Ignored"),
        ("Keywords", ""),
    ]);
    let output = process(&input, &folders.output, &config).expect("Failed to process PDF");

    let metadata = extract_metadata(&output).expect("Failed to read metadata");
    assert_eq!(metadata.page_count, 1);
    assert_eq!(metadata.field("Title"), Some("Quarterly Memo"));
    assert_eq!(metadata.field("Author"), Some("Jane Roe"));
    assert_eq!(metadata.field("Producer"), Some(PRODUCER));
    assert_eq!(metadata.field("Creator"), Some(CREATOR));
    assert_eq!(metadata.field("Keywords"), None);
    assert_eq!(metadata.info.len(), 4);
}

#[test]
fn test_process_writes_unicode_values() {
    let (_temp_dir, folders) = setup();
    let input = folders.input.join("brief.pdf");
    write_sample_pdf(&input, &["Brief"], "x", "y");

    let output = process(&input, &folders.output, &values(&[("Author", "Jürgen Müller")]))
        .expect("Failed to process PDF");

    let metadata = extract_metadata(&output).unwrap();
    assert_eq!(metadata.field("Author"), Some("Jürgen Müller"));
}

#[test]
fn test_process_overwrites_existing_output() {
    let (_temp_dir, folders) = setup();
    let input = folders.input.join("same.pdf");
    write_sample_pdf(&input, &["Page"], "x", "y");
    fs::write(folders.output.join("same.pdf"), b"stale").unwrap();

    let output = process(&input, &folders.output, &MetadataRecord::new()).unwrap();
    assert_eq!(count_pages(&output).unwrap(), 1);
}

#[test]
fn test_process_unreadable_document() {
    let (_temp_dir, folders) = setup();
    let input = folders.input.join("broken.pdf");
    fs::write(&input, b"this is a text file renamed to .pdf").unwrap();

    let result = process(&input, &folders.output, &MetadataRecord::new());
    assert!(matches!(result, Err(Error::UnreadableDocument { .. })));
    assert!(!folders.output.join("broken.pdf").exists());
}

#[test]
fn test_process_write_failure() {
    let (temp_dir, folders) = setup();
    let input = folders.input.join("doc.pdf");
    write_sample_pdf(&input, &["Page"], "x", "y");

    let missing_output = temp_dir.path().join("does-not-exist");
    let result = process(&input, &missing_output, &MetadataRecord::new());
    assert!(matches!(result, Err(Error::WriteFailure { .. })));
}

#[test]
fn test_batch_skips_corrupt_file_and_processes_valid_one() {
    let (_temp_dir, folders) = setup();
    write_sample_pdf(&folders.input.join("good.pdf"), &["Fine"], "x", "y");
    fs::write(folders.input.join("bad.pdf"), b"not a pdf at all").unwrap();

    let report = run_batch(&folders, &values(&[("Title", "Batch")])).expect("Batch aborted");

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.processed[0].output, folders.output.join("good.pdf"));
    assert_eq!(report.processed[0].page_count, 1);
    assert_eq!(report.skipped[0].input, folders.input.join("bad.pdf"));
    assert!(folders.output.join("good.pdf").exists());
    assert!(!folders.output.join("bad.pdf").exists());
}

#[test]
fn test_batch_empty_input_folder() {
    let (_temp_dir, folders) = setup();

    let report = run_batch(&folders, &MetadataRecord::new()).expect("Batch aborted");

    assert_eq!(report.total(), 0);
    assert!(report.is_clean());
    assert_eq!(fs::read_dir(&folders.output).unwrap().count(), 0);
}

#[test]
fn test_batch_ignores_other_files_and_subfolders() {
    let (_temp_dir, folders) = setup();
    write_sample_pdf(&folders.input.join("top.pdf"), &["Top"], "x", "y");
    fs::write(folders.input.join("readme.txt"), b"hello").unwrap();
    fs::create_dir(folders.input.join("archive")).unwrap();
    write_sample_pdf(&folders.input.join("archive").join("old.pdf"), &["Old"], "x", "y");

    let report = run_batch(&folders, &MetadataRecord::new()).unwrap();

    assert_eq!(report.processed.len(), 1);
    assert!(report.is_clean());
    assert!(!folders.output.join("old.pdf").exists());
    assert!(!folders.output.join("readme.txt").exists());
}

#[test]
fn test_batch_is_idempotent() {
    let (_temp_dir, folders) = setup();
    write_sample_pdf(&folders.input.join("a.pdf"), &["A1", "A2"], "x", "y");
    write_sample_pdf(&folders.input.join("b.pdf"), &["B1"], "x", "y");
    let config = values(&[("Title", "Stable"), ("Subject", "Ünïcode")]);

    run_batch(&folders, &config).unwrap();
    let first_a = fs::read(folders.output.join("a.pdf")).unwrap();
    let first_b = fs::read(folders.output.join("b.pdf")).unwrap();

    run_batch(&folders, &config).unwrap();
    assert_eq!(fs::read(folders.output.join("a.pdf")).unwrap(), first_a);
    assert_eq!(fs::read(folders.output.join("b.pdf")).unwrap(), first_b);
}

#[test]
fn test_full_run_from_config_file() {
    let (_temp_dir, folders) = setup();
    let config_file = folders.config_file();
    write_sample_pdf(&folders.input.join("paper.pdf"), &["Abstract"], "LaTeX", "pdfTeX");

    assert!(create_config(&config_file, &MetadataRecord::new()).unwrap());
    update_config(&config_file, &values(&[("Title", "Paper"), ("Author", "A. Author")])).unwrap();
    assert!(!create_config(&config_file, &MetadataRecord::new()).unwrap());

    let config = load_config(&config_file).unwrap();
    assert_eq!(config["Title"], "Paper");

    let report = run_batch(&folders, &config).unwrap();
    assert_eq!(report.processed.len(), 1);

    let metadata = extract_metadata(&folders.output.join("paper.pdf")).unwrap();
    assert_eq!(metadata.field("Title"), Some("Paper"));
    assert_eq!(metadata.field("Author"), Some("A. Author"));
    assert_eq!(metadata.field("Producer"), Some(PRODUCER));
    assert_eq!(metadata.field("Creator"), Some(CREATOR));
}
