//! Input loading.
//!
//! The splitter works on the raw bytes of a single file, so loading is a plain
//! read plus a few cheap sanity checks. No PDF parsing happens here.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplit::io::reader::DocumentReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DocumentReader::new();
//! let loaded = reader.load(Path::new("report.pdf")).await?;
//! println!("Read {} in {:?}", loaded.format_file_size(), loaded.load_time);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{Result, SplitError};
use crate::split::RawDocument;
use crate::utils::format_file_size;

/// An input document read from disk.
#[derive(Debug)]
pub struct LoadedDocument {
    /// The raw bytes, tagged with their source path.
    pub document: RawDocument,

    /// Path to the source file.
    pub path: PathBuf,

    /// Time taken to read the file.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedDocument {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Reads input documents into memory.
///
/// Files without a `%PDF-` header are rejected.
#[derive(Debug, Clone, Default)]
pub struct DocumentReader;

impl DocumentReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not a regular file
    /// - File cannot be read
    /// - The `%PDF-` header is missing
    pub async fn load(&self, path: &Path) -> Result<LoadedDocument> {
        let start = Instant::now();

        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SplitError::file_not_found(path.to_path_buf()));
            }
            Err(e) => {
                return Err(SplitError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        if !metadata.is_file() {
            return Err(SplitError::not_a_file(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SplitError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;

        let document = RawDocument::with_source(bytes, path);

        if !document.has_pdf_header() {
            return Err(SplitError::NotAPdf {
                path: path.to_path_buf(),
            });
        }

        Ok(LoadedDocument {
            file_size: document.len() as u64,
            document,
            path: path.to_path_buf(),
            load_time: start.elapsed(),
        })
    }
}
