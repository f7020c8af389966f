//! Page range parsing.
//!
//! Input is a comma separated list of tokens, each either `N` or `N-M`
//! (1-based, inclusive). `N-` is the single page `N`, and anything after a
//! second `-` is ignored. Parsing is lenient: a bad token is dropped and
//! recorded, the remaining tokens are still used. Order is preserved and
//! duplicates or overlaps are kept, since every range becomes its own output.
//!
//! ```
//! use pdfsplit::split::ranges::{PageRange, parse_ranges};
//!
//! let selection = parse_ranges("2-3, 9", 5).unwrap();
//! assert_eq!(selection.ranges(), &[PageRange::new(2, 3).unwrap()]);
//! assert_eq!(selection.rejected().len(), 1);
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::{Result, SplitError};

/// A validated inclusive range of 1-based segment indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    start: usize,
    end: usize,
}

impl PageRange {
    /// Create a range, returning `None` unless `1 <= start <= end`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start >= 1 && start <= end).then_some(Self { start, end })
    }

    /// Create a range covering a single index.
    pub fn single(page: usize) -> Option<Self> {
        Self::new(page, page)
    }

    /// First index, inclusive.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last index, inclusive.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a range covers at least one index.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if an index falls inside this range.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Why a token was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    /// A bound is not a decimal integer.
    NotANumber,
    /// A bound is zero.
    NotPositive,
    /// A bound exceeds the number of segments.
    OutOfBounds,
    /// `start > end`.
    Reversed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotANumber => "not a number",
            Self::NotPositive => "page numbers start at 1",
            Self::OutOfBounds => "beyond the last page",
            Self::Reversed => "start is after end",
        };
        f.write_str(text)
    }
}

/// A token that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedToken {
    /// The trimmed token text.
    pub token: String,
    /// Why it was dropped.
    pub reason: RejectReason,
}

/// The outcome of parsing a range input against a segment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelection {
    ranges: Vec<PageRange>,
    rejected: Vec<RejectedToken>,
}

impl RangeSelection {
    /// Surviving ranges, in input order.
    pub fn ranges(&self) -> &[PageRange] {
        &self.ranges
    }

    /// Tokens that were dropped, in input order.
    pub fn rejected(&self) -> &[RejectedToken] {
        &self.rejected
    }

    /// Number of surviving ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether no range survived. Never true for a selection returned by [`parse_ranges`].
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Consume the selection, keeping only the ranges.
    pub fn into_ranges(self) -> Vec<PageRange> {
        self.ranges
    }
}

/// Parse `input` into ranges bounded by `segment_count`.
///
/// # Errors
///
/// Returns [`SplitError::NoValidRanges`] if no token survives validation.
pub fn parse_ranges(input: &str, segment_count: usize) -> Result<RangeSelection> {
    let mut ranges = Vec::new();
    let mut rejected = Vec::new();

    for token in input.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        match parse_token(token, segment_count) {
            Ok(range) => ranges.push(range),
            Err(reason) => rejected.push(RejectedToken {
                token: token.to_string(),
                reason,
            }),
        }
    }

    if ranges.is_empty() {
        return Err(SplitError::no_valid_ranges(input, segment_count));
    }

    Ok(RangeSelection { ranges, rejected })
}

fn parse_token(
    token: &str,
    segment_count: usize,
) -> std::result::Result<PageRange, RejectReason> {
    let mut parts = token.split('-');
    let start = parse_bound(parts.next().unwrap_or_default())?;

    let end = match parts.next().map(str::trim) {
        None | Some("") => start,
        Some(end) => parse_bound(end)?,
    };

    if start == 0 || end == 0 {
        return Err(RejectReason::NotPositive);
    }

    if start > segment_count || end > segment_count {
        return Err(RejectReason::OutOfBounds);
    }

    PageRange::new(start, end).ok_or(RejectReason::Reversed)
}

fn parse_bound(text: &str) -> std::result::Result<usize, RejectReason> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectReason::NotANumber);
    }
    // All digits but too large for usize is still past any real segment count.
    text.parse().map_err(|_| RejectReason::OutOfBounds)
}
