//! Byte-level PDF splitting.
//!
//! The pipeline never parses the PDF object graph. It scans the raw bytes
//! for `stream`/`endstream` keywords, treats each pair as one page, and
//! builds one output per requested page range.
//!
//! # Examples
//!
//! ```
//! use pdfsplit::io::MemoryDelivery;
//! use pdfsplit::split::{AssemblyMode, NoProgress, RawDocument, SplitOptions, Splitter};
//!
//! let bytes = b"%PDF-1.4\nstream\nA\nendstream\nstream\nB\nendstream\n";
//! let doc = RawDocument::from_bytes(&bytes[..]);
//! let splitter = Splitter::new(SplitOptions {
//!     mode: AssemblyMode::Raw,
//!     ..Default::default()
//! });
//!
//! let mut delivery = MemoryDelivery::new();
//! let report = splitter.split(&doc, "2", &mut delivery, &mut NoProgress).unwrap();
//! assert_eq!(report.outputs[0].name, "split.pdf");
//! ```

pub mod assembler;
pub mod dictionary;
pub mod document;
pub mod naming;
pub mod ranges;
pub mod scanner;
pub mod segments;
pub mod splitter;

pub use assembler::{Assembler, AssemblyMode, RAW_HEADER, RAW_TRAILER};
pub use dictionary::MediaBox;
pub use document::{DeliveredOutput, OutputDocument, RawDocument};
pub use naming::output_name;
pub use ranges::{PageRange, RangeSelection, RejectReason, RejectedToken, parse_ranges};
pub use scanner::find_all_occurrences;
pub use segments::{SegmentOffset, SegmentTable};
pub use splitter::{
    CancellationToken, FailedOutput, NoProgress, PlannedOutput, Progress, ProgressReporter,
    SplitOptions, SplitPlan, SplitReport, Splitter, plan_pdf, split_pdf,
};
