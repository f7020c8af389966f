//! Byte pattern scanning over raw PDF buffers.
//!
//! The scan is a straightforward O(n·m) comparison: every position of the
//! buffer is a candidate and each candidate is compared byte by byte until the
//! first mismatch. With `m` being a short PDF keyword this is linear in
//! practice and fast enough for upload-sized documents; it is not meant for
//! multi-gigabyte inputs.

/// Opening keyword of a stream body.
pub const STREAM_KEYWORD: &[u8] = b"stream";

/// Closing keyword of a stream body.
pub const ENDSTREAM_KEYWORD: &[u8] = b"endstream";

/// Find every offset at which `pattern` occurs in `buffer`.
///
/// Offsets are returned in ascending order. Overlapping matches are all
/// reported: after a hit the scan resumes at the next byte, not after the
/// match. An empty pattern matches nowhere.
///
/// # Examples
///
/// ```
/// use pdfsplit::split::scanner::find_all_occurrences;
///
/// assert_eq!(find_all_occurrences(b"aaaa", b"aa"), vec![0, 1, 2]);
/// assert!(find_all_occurrences(b"ab", b"abc").is_empty());
/// ```
pub fn find_all_occurrences(buffer: &[u8], pattern: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();

    if pattern.is_empty() || pattern.len() > buffer.len() {
        return offsets;
    }

    let first = pattern[0];
    let last_start = buffer.len() - pattern.len();

    for i in 0..=last_start {
        if buffer[i] != first {
            continue;
        }

        if matches_at(buffer, i, pattern) {
            offsets.push(i);
        }
    }

    offsets
}

/// Compare `pattern` against `buffer` starting at `offset`, stopping at the first mismatch.
///
/// Positions too close to the end of the buffer simply do not match.
fn matches_at(buffer: &[u8], offset: usize, pattern: &[u8]) -> bool {
    if offset + pattern.len() > buffer.len() {
        return false;
    }

    pattern
        .iter()
        .enumerate()
        .all(|(k, &byte)| buffer[offset + k] == byte)
}

/// Offsets of opening `stream` keywords.
///
/// `stream` is a suffix of `endstream`, so hits preceded by `end` are dropped.
pub fn find_stream_markers(buffer: &[u8]) -> Vec<usize> {
    find_all_occurrences(buffer, STREAM_KEYWORD)
        .into_iter()
        .filter(|&offset| !is_endstream_tail(buffer, offset))
        .collect()
}

/// Offsets of closing `endstream` keywords.
pub fn find_endstream_markers(buffer: &[u8]) -> Vec<usize> {
    find_all_occurrences(buffer, ENDSTREAM_KEYWORD)
}

fn is_endstream_tail(buffer: &[u8], offset: usize) -> bool {
    offset >= 3 && &buffer[offset - 3..offset] == b"end"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_single_occurrence() {
        assert_eq!(find_all_occurrences(b"hello world", b"world"), vec![6]);
    }

    #[test]
    fn test_finds_occurrences_in_ascending_order() {
        let buffer = b"ab--ab--ab";
        assert_eq!(find_all_occurrences(buffer, b"ab"), vec![0, 4, 8]);
    }

    #[test]
    fn test_reports_overlapping_matches() {
        assert_eq!(find_all_occurrences(b"aaaaa", b"aaa"), vec![0, 1, 2]);
        assert_eq!(find_all_occurrences(b"abababa", b"aba"), vec![0, 2, 4]);
    }

    #[test]
    fn test_pattern_longer_than_buffer() {
        assert!(find_all_occurrences(b"str", b"stream").is_empty());
        assert!(find_all_occurrences(b"", b"x").is_empty());
    }

    #[test]
    fn test_partial_match_at_buffer_end() {
        // "strea" at the tail must not read past the end.
        assert_eq!(find_all_occurrences(b"stream strea", b"stream"), vec![0]);
    }

    #[test]
    fn test_empty_pattern_matches_nowhere() {
        assert!(find_all_occurrences(b"abc", b"").is_empty());
    }

    #[test]
    fn test_matches_at_bounds() {
        assert!(matches_at(b"abc", 1, b"bc"));
        assert!(!matches_at(b"abc", 2, b"bc"));
        assert!(!matches_at(b"abc", 5, b"a"));
    }

    #[test]
    fn test_binary_buffer() {
        let buffer = [0x00, 0xff, 0x00, 0xff, 0x00];
        assert_eq!(find_all_occurrences(&buffer, &[0x00, 0xff]), vec![0, 2]);
    }

    #[test]
    fn test_stream_markers_skip_endstream() {
        let buffer = b"stream\nBT ET\nendstream stream\nq Q\nendstream";
        assert_eq!(find_stream_markers(buffer), vec![0, 23]);
        assert_eq!(find_endstream_markers(buffer), vec![13, 34]);

        // The raw keyword scan still sees the embedded "stream" of each "endstream".
        assert_eq!(find_all_occurrences(buffer, STREAM_KEYWORD).len(), 4);
    }
}
