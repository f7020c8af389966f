//! Input and output document buffers.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::split::ranges::PageRange;
use crate::split::segments::SegmentOffset;

/// An input PDF loaded into memory.
///
/// The buffer is never mutated once constructed; every split step borrows it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Vec<u8>,
    source: Option<PathBuf>,
}

impl RawDocument {
    /// Wrap an in-memory buffer with no known origin.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            source: None,
        }
    }

    /// Wrap a buffer that was read from `path`.
    pub fn with_source(bytes: impl Into<Vec<u8>>, path: impl Into<PathBuf>) -> Self {
        Self {
            bytes: bytes.into(),
            source: Some(path.into()),
        }
    }

    /// The raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Path the document was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// File stem of the source path, used to derive output names.
    pub fn stem(&self) -> Option<&str> {
        self.source
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }

    /// Whether the buffer starts with the `%PDF-` signature.
    pub fn has_pdf_header(&self) -> bool {
        self.bytes.starts_with(b"%PDF-")
    }

    /// The verbatim bytes of one segment.
    ///
    /// Offsets come from a [`SegmentTable`](crate::split::SegmentTable) built
    /// over this same buffer, so they are always in bounds.
    pub fn segment(&self, segment: SegmentOffset) -> &[u8] {
        &self.bytes[segment.start..segment.end]
    }
}

/// A freshly assembled output document for one page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    /// Zero-based position of the range in processing order.
    pub index: usize,

    /// The range this document was built from.
    pub range: PageRange,

    /// Suggested file name.
    pub name: String,

    /// Assembled bytes.
    pub bytes: Vec<u8>,
}

impl OutputDocument {
    /// Number of segments copied into this document.
    pub fn segment_count(&self) -> usize {
        self.range.len()
    }
}

/// Summary of one delivered output, kept after the bytes are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredOutput {
    /// Zero-based position of the range in processing order.
    pub index: usize,

    /// The range as written by the user, normalised to `start-end`.
    pub range: String,

    /// File name of the output.
    pub name: String,

    /// Where the output was persisted, when delivered to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Size of the output in bytes.
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_from_source() {
        let doc = RawDocument::with_source(b"%PDF-1.4".to_vec(), "/tmp/report.pdf");
        assert_eq!(doc.stem(), Some("report"));
        assert!(doc.has_pdf_header());
    }

    #[test]
    fn test_stem_without_source() {
        let doc = RawDocument::from_bytes(b"junk".to_vec());
        assert_eq!(doc.stem(), None);
        assert!(!doc.has_pdf_header());
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_segment_slice() {
        let doc = RawDocument::from_bytes(b"xxstream\nabc\nendstreamyy".to_vec());
        let segment = SegmentOffset { start: 2, end: 22 };
        assert_eq!(doc.segment(segment), b"stream\nabc\nendstream");
    }
}
