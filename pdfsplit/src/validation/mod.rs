//! Input and output validation for pdfsplit.
//!
//! This module performs the checks that surround the byte-level split:
//! - File existence and accessibility checks
//! - Output directory and overwrite checks
//! - A page-count cross check against a real PDF parser
//! - Re-parsing of structured outputs
//!
//! The split itself never depends on `lopdf`; it is only used here to tell
//! the user when the one-stream-per-page assumption does not hold, and to
//! prove that a structured output opens.

use lopdf::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{Config, OverwriteMode};
use crate::error::{Result, SplitError};
use crate::split::{OutputDocument, RawDocument, SegmentTable};

/// Disagreement between the segment count and the parsed page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCountMismatch {
    /// Number of `stream…endstream` segments found.
    pub segment_count: usize,
    /// Number of pages reported by the PDF page tree.
    pub page_count: usize,
}

/// Compare the segment table with the document's real page tree.
///
/// Returns `None` when the counts agree, or when the document cannot be
/// parsed at all (the byte scan still works on such input).
pub fn cross_check_pages(doc: &RawDocument, table: &SegmentTable) -> Option<PageCountMismatch> {
    let parsed = match Document::load_mem(doc.bytes()) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "page cross check skipped, input does not parse");
            return None;
        }
    };

    let page_count = parsed.get_pages().len();
    (page_count != table.len()).then_some(PageCountMismatch {
        segment_count: table.len(),
        page_count,
    })
}

/// Re-parse a structured output and check it has one page per segment.
///
/// # Errors
///
/// Returns [`SplitError::VerificationFailed`] if the output does not parse or
/// its page count differs from the number of segments it was built from.
pub fn verify_output(output: &OutputDocument) -> Result<usize> {
    let parsed =
        Document::load_mem(&output.bytes).map_err(|e| SplitError::VerificationFailed {
            name: output.name.clone(),
            reason: e.to_string(),
        })?;

    let pages = parsed.get_pages().len();
    if pages != output.segment_count() {
        return Err(SplitError::VerificationFailed {
            name: output.name.clone(),
            reason: format!(
                "expected {} page(s), found {pages}",
                output.segment_count()
            ),
        });
    }

    Ok(pages)
}

/// Validator for the input file and the output location.
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Validate the input file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist
    /// - Path is not a regular file
    /// - File is not accessible
    /// - File is empty
    pub async fn validate_input(&self, path: &Path) -> Result<u64> {
        if !path.exists() {
            return Err(SplitError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(SplitError::not_a_file(path.to_path_buf()));
        }

        let metadata =
            tokio::fs::metadata(path)
                .await
                .map_err(|e| SplitError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                })?;

        if metadata.len() == 0 {
            return Err(SplitError::NotAPdf {
                path: path.to_path_buf(),
            });
        }

        Ok(metadata.len())
    }

    /// Validate the output directory and the planned output names.
    ///
    /// Returns the paths of planned outputs that already exist. With
    /// [`OverwriteMode::Prompt`] the caller decides what to do with them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist or is read-only
    /// - A planned output exists and overwrite mode is no-clobber
    pub async fn validate_output(&self, config: &Config, names: &[String]) -> Result<Vec<PathBuf>> {
        let dir = config.effective_output_dir();

        let metadata =
            tokio::fs::metadata(&dir)
                .await
                .map_err(|_| SplitError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    dir.display()
                )))?;

        if !metadata.is_dir() {
            return Err(SplitError::invalid_config(format!(
                "Output path is not a directory: {}",
                dir.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(SplitError::invalid_config(format!(
                "Output directory is not writable: {}",
                dir.display()
            )));
        }

        let existing: Vec<PathBuf> = names
            .iter()
            .map(|name| dir.join(name))
            .filter(|path| path.exists())
            .collect();

        if config.overwrite_mode == OverwriteMode::NoClobber
            && let Some(first) = existing.first()
        {
            return Err(SplitError::output_exists(first.clone()));
        }

        Ok(existing)
    }
}
