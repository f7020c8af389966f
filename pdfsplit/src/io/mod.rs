//! I/O operations for pdfsplit.
//!
//! This module handles all file I/O operations including:
//! - Loading the input document from disk
//! - Delivering assembled outputs to disk or memory
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplit::io::load_document;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = load_document(Path::new("input.pdf")).await?;
//! println!("Read {} bytes", doc.len());
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod reader;

pub use delivery::{Delivery, FileDelivery, MemoryDelivery, WriteOptions};
pub use reader::{DocumentReader, LoadedDocument};

use crate::error::Result;
use crate::split::RawDocument;
use std::path::Path;

/// Load a document from a file.
///
/// Convenience function using a header-checking [`DocumentReader`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks a `%PDF-` header.
pub async fn load_document(path: &Path) -> Result<RawDocument> {
    let loaded = DocumentReader::new().load(path).await?;
    Ok(loaded.document)
}
