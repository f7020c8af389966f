//! Segment table construction.
//!
//! A segment is the byte span from a `stream` keyword up to and including the
//! matching `endstream` keyword. Segments are numbered 1..=N in discovery
//! order and that number is treated as the page number.
//!
//! # Known limitation
//!
//! One `stream…endstream` pair is assumed to be one page. Real PDFs break this
//! freely: a page may draw from several content streams or none, and fonts,
//! images and object streams are streams too. The table does not try to tell
//! them apart, so on anything but the simplest documents "segment N" is not
//! "page N". [`validation::cross_check_pages`](crate::validation::cross_check_pages)
//! reports the discrepancy when it can.

use tracing::debug;

use crate::error::{Result, SplitError};
use crate::split::document::RawDocument;
use crate::split::scanner::{ENDSTREAM_KEYWORD, find_endstream_markers, find_stream_markers};

/// Byte offsets of one detected segment: `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentOffset {
    /// Offset of the `s` in `stream`.
    pub start: usize,
    /// Offset one past the final `m` of `endstream`.
    pub end: usize,
}

impl SegmentOffset {
    /// Length of the segment in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the segment is empty. Never true for a table-built segment.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Ordered list of segments found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTable {
    segments: Vec<SegmentOffset>,
}

impl SegmentTable {
    /// Pair `stream` and `endstream` offsets positionally.
    ///
    /// The k-th `stream` offset pairs with the k-th `endstream` offset. Both
    /// slices must be ascending, as produced by the scanner.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::StructuralMismatch`] if:
    /// - the two counts differ
    /// - an `endstream` would come before its paired `stream`
    pub fn build(stream_offsets: &[usize], endstream_offsets: &[usize]) -> Result<Self> {
        if stream_offsets.len() != endstream_offsets.len() {
            return Err(SplitError::structural_mismatch(
                stream_offsets.len(),
                endstream_offsets.len(),
                "every 'stream' keyword needs a matching 'endstream'",
            ));
        }

        let mut segments = Vec::with_capacity(stream_offsets.len());

        for (k, (&start, &endstream)) in stream_offsets.iter().zip(endstream_offsets).enumerate() {
            if endstream < start {
                return Err(SplitError::structural_mismatch(
                    stream_offsets.len(),
                    endstream_offsets.len(),
                    format!(
                        "segment {} closes at byte {endstream} before it opens at byte {start}",
                        k + 1
                    ),
                ));
            }

            segments.push(SegmentOffset {
                start,
                end: endstream + ENDSTREAM_KEYWORD.len(),
            });
        }

        Ok(Self { segments })
    }

    /// Scan a document and build its segment table.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::StructuralMismatch`] under the same conditions as
    /// [`build`](Self::build).
    pub fn from_document(doc: &RawDocument) -> Result<Self> {
        let streams = find_stream_markers(doc.bytes());
        let endstreams = find_endstream_markers(doc.bytes());

        debug!(
            streams = streams.len(),
            endstreams = endstreams.len(),
            bytes = doc.len(),
            "scanned stream markers"
        );

        Self::build(&streams, &endstreams)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segments were found.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment by 1-based index.
    pub fn get(&self, index: usize) -> Option<SegmentOffset> {
        index
            .checked_sub(1)
            .and_then(|i| self.segments.get(i))
            .copied()
    }

    /// All segments in discovery order.
    pub fn segments(&self) -> &[SegmentOffset] {
        &self.segments
    }

    /// Segments with 1-based indices in `start..=end`, in ascending order.
    ///
    /// Indices outside the table are skipped.
    pub fn slice(&self, start: usize, end: usize) -> impl Iterator<Item = SegmentOffset> + '_ {
        (start..=end).filter_map(|index| self.get(index))
    }

    /// Total bytes covered by all segments.
    pub fn total_bytes(&self) -> usize {
        self.segments.iter().map(SegmentOffset::len).sum()
    }
}
