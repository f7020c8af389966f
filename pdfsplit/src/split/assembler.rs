//! Output document assembly.
//!
//! Two layouts are supported:
//!
//! - [`AssemblyMode::Raw`] concatenates [`RAW_HEADER`], the selected segments
//!   verbatim, and [`RAW_TRAILER`]. The result has PDF signature bytes at both
//!   ends but no object table, no cross-reference section and no `/Root`. It
//!   only works for consumers that scan for stream content; PDF readers will
//!   reject or "repair" it.
//! - [`AssemblyMode::Structured`] wraps every selected segment in a content
//!   stream, gives each its own page, and saves the page tree and catalog
//!   through `lopdf` with a classic `xref` table, producing a document a
//!   conforming reader can open. `/Filter` and `/DecodeParms` are carried
//!   over from the source stream dictionary. Fonts, images and other
//!   resources are not copied, so text may render with substitute fonts or
//!   not at all.
//!
//! ```text
//! %PDF-x.y
//! 1           0 obj  /Pages
//! 2, 4, …     0 obj  content streams (one per segment)
//! 3, 5, …     0 obj  /Page objects
//! 2N+2        0 obj  /Catalog
//! xref / trailer / startxref / %%EOF
//! ```

use lopdf::xref::XrefType;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SplitError};
use crate::split::dictionary::{
    MediaBox, detect_media_box, detect_version, has_reference, recover_stream_dictionary,
};
use crate::split::document::RawDocument;
use crate::split::ranges::PageRange;
use crate::split::scanner::{ENDSTREAM_KEYWORD, STREAM_KEYWORD};
use crate::split::segments::{SegmentOffset, SegmentTable};

/// Fixed header written in raw mode.
pub const RAW_HEADER: &[u8] = b"%PDF-1.4\n";

/// Fixed trailer written in raw mode.
pub const RAW_TRAILER: &[u8] = b"\n%%EOF\n";

/// Version written in structured mode when the source header is unreadable.
const DEFAULT_VERSION: &str = "1.4";

/// Stream dictionary keys that describe how the data is encoded.
const ENCODING_KEYS: [&[u8]; 3] = [b"Filter", b"DecodeParms", b"DL"];

/// How output documents are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyMode {
    /// Header + verbatim segments + trailer. Not a valid PDF.
    Raw,
    /// Complete object table with page tree, xref and trailer.
    #[default]
    Structured,
}

impl FromStr for AssemblyMode {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "structured" => Ok(Self::Structured),
            _ => Err(SplitError::invalid_config(format!(
                "Invalid assembly mode: {s}. Must be one of: raw, structured"
            ))),
        }
    }
}

impl fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Structured => f.write_str("structured"),
        }
    }
}

/// Builds output documents from segments of one source document.
#[derive(Debug, Clone)]
pub struct Assembler {
    mode: AssemblyMode,
    media_box: MediaBox,
    version: String,
}

impl Assembler {
    /// Create an assembler with default page geometry and version.
    pub fn new(mode: AssemblyMode) -> Self {
        Self {
            mode,
            media_box: MediaBox::default(),
            version: DEFAULT_VERSION.to_string(),
        }
    }

    /// Create an assembler that copies page size and version from `doc` when it can.
    pub fn for_document(doc: &RawDocument, mode: AssemblyMode) -> Self {
        Self {
            mode,
            media_box: detect_media_box(doc.bytes()).unwrap_or_default(),
            version: detect_version(doc.bytes()).unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        }
    }

    /// The layout this assembler produces.
    pub fn mode(&self) -> AssemblyMode {
        self.mode
    }

    /// The page size used in structured mode.
    pub fn media_box(&self) -> MediaBox {
        self.media_box
    }

    /// Assemble the segments covered by `range` into one output buffer.
    ///
    /// Indices in `range` must come from a range parsed against `table`. The
    /// result depends only on its inputs, so assembling the same range twice
    /// yields identical bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the structured document cannot be serialized.
    pub fn assemble(
        &self,
        doc: &RawDocument,
        table: &SegmentTable,
        range: PageRange,
    ) -> Result<Vec<u8>> {
        match self.mode {
            AssemblyMode::Raw => Ok(assemble_raw(doc, table, range)),
            AssemblyMode::Structured => self.assemble_structured(doc, table, range),
        }
    }

    fn assemble_structured(
        &self,
        doc: &RawDocument,
        table: &SegmentTable,
        range: PageRange,
    ) -> Result<Vec<u8>> {
        let mut output = Document::with_version(self.version.as_str());
        output.reference_table.cross_reference_type = XrefType::CrossReferenceTable;

        let pages_id = output.new_object_id();
        let media_box = self.media_box.to_object();

        let kids: Vec<Object> = (range.start()..=range.end())
            .filter_map(|index| table.get(index).map(|segment| (index, segment)))
            .map(|(index, segment)| {
                let content_id = output.add_object(content_stream(doc, table, index, segment));
                output
                    .add_object(dictionary! {
                        "Type" => "Page",
                        "Parent" => pages_id,
                        "MediaBox" => media_box.clone(),
                        "Resources" => dictionary! {},
                        "Contents" => content_id,
                    })
                    .into()
            })
            .collect();

        let count = kids.len() as i64;
        output.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        output.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(AssemblyMode::default())
    }
}

/// The content stream for segment `index`, keeping the source encoding.
///
/// Encoding entries are copied only when none of them refers to another
/// object, since referenced objects are not carried over.
fn content_stream(
    doc: &RawDocument,
    table: &SegmentTable,
    index: usize,
    segment: SegmentOffset,
) -> Stream {
    let floor = index
        .checked_sub(1)
        .and_then(|prev| table.get(prev))
        .map_or(0, |prev| prev.end);

    let mut dict = Dictionary::new();
    if let Some(source) = recover_stream_dictionary(doc.bytes(), floor, segment.start) {
        let encoding: Vec<(&[u8], &Object)> = ENCODING_KEYS
            .iter()
            .copied()
            .filter_map(|key| source.get(key).ok().map(|value| (key, value)))
            .collect();

        if !encoding.iter().any(|(_, value)| has_reference(value)) {
            for (key, value) in encoding {
                dict.set(key, value.clone());
            }
        }
    }

    Stream::new(dict, stream_payload(doc.segment(segment)).to_vec())
}

fn assemble_raw(doc: &RawDocument, table: &SegmentTable, range: PageRange) -> Vec<u8> {
    let segments: Vec<&[u8]> = table
        .slice(range.start(), range.end())
        .map(|segment| doc.segment(segment))
        .collect();

    let body: usize = segments.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(RAW_HEADER.len() + body + RAW_TRAILER.len());

    out.extend_from_slice(RAW_HEADER);
    for segment in segments {
        out.extend_from_slice(segment);
    }
    out.extend_from_slice(RAW_TRAILER);

    out
}

/// The stream data inside a `stream … endstream` segment.
///
/// Strips the keywords, the end-of-line that must follow `stream`, and one
/// end-of-line before `endstream`.
fn stream_payload(segment: &[u8]) -> &[u8] {
    let mut body = segment
        .strip_prefix(STREAM_KEYWORD)
        .and_then(|rest| rest.strip_suffix(ENDSTREAM_KEYWORD))
        .unwrap_or(segment);

    body = body
        .strip_prefix(b"\r\n")
        .or_else(|| body.strip_prefix(b"\n"))
        .or_else(|| body.strip_prefix(b"\r"))
        .unwrap_or(body);

    body.strip_suffix(b"\r\n")
        .or_else(|| body.strip_suffix(b"\n"))
        .or_else(|| body.strip_suffix(b"\r"))
        .unwrap_or(body)
}
