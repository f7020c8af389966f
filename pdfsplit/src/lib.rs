//! pdfsplit - Split a PDF into page-range documents.
//!
//! The library cuts a PDF apart at the byte level: it locates every
//! `stream … endstream` body, numbers them as pages, and assembles one new
//! document per requested range. It supports:
//!
//! - Lenient page range parsing (`1-3,5,7-9`)
//! - Raw output (header, verbatim segments, trailer)
//! - Structured output with a real object table, `xref` and `/Root`
//! - Atomic file delivery or in-memory collection
//! - Progress reporting and cancellation between ranges
//!
//! # Examples
//!
//! ## Split a file
//!
//! ```no_run
//! use pdfsplit::config::Config;
//! use pdfsplit::split::{self, CancellationToken, NoProgress};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("report.pdf", "1-3,5");
//! let report = split::split_pdf(&config, CancellationToken::new(), NoProgress).await?;
//! println!("Created {} file(s)", report.outputs.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```
//! use pdfsplit::split::{parse_ranges, RawDocument, SegmentTable};
//!
//! let doc = RawDocument::from_bytes(&b"stream\nA\nendstream stream\nB\nendstream"[..]);
//! let table = SegmentTable::from_document(&doc).unwrap();
//! let selection = parse_ranges("2, 7", table.len()).unwrap();
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(selection.len(), 1);
//! assert_eq!(selection.rejected()[0].token, "7");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod output;
pub mod split;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SplitError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
