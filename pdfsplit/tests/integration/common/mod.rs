//! Shared helpers for the integration tests.
//!
//! Fixtures are generated with lopdf at test time, one content stream per
//! page, so no binary files need to live in the repository.

use std::path::{Path, PathBuf};

use lopdf::xref::XrefType;
use lopdf::{Document, Object, Stream, dictionary};
use pdfsplit::config::{Config, OverwriteMode};
use tempfile::TempDir;

/// Build a PDF with `pages` pages whose content streams draw the page number.
pub fn sample_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    // A cross-reference stream would add a stream segment with no page.
    doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let content = Stream::new(
                dictionary! {},
                format!("BT /F1 24 Tf 72 700 Td (Page {n}) Tj ET").into_bytes(),
            );
            let content_id = doc.add_object(content);
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture");
    bytes
}

/// A temp directory holding `name` with the given contents.
pub fn workspace_with(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    (dir, path)
}

/// Config that writes next to the input and never prompts.
pub fn config_for(input: &Path, ranges: &str) -> Config {
    let mut config = Config::new(input, ranges);
    config.quiet = true;
    config.overwrite_mode = OverwriteMode::Force;
    config
}

/// Page count of a PDF on disk as lopdf sees it.
pub fn page_count(path: &Path) -> usize {
    Document::load(path)
        .unwrap_or_else(|e| panic!("{} does not parse: {e}", path.display()))
        .get_pages()
        .len()
}
