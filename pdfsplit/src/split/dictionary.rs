//! Small byte-level readers for the bits of PDF syntax the assembler reuses.
//!
//! These are not a PDF parser. They look at a few bytes around known offsets
//! and give up (return `None`) on anything unexpected.

use lopdf::{Dictionary, Object, StringFormat};

use crate::split::scanner::find_all_occurrences;

/// A page rectangle in default user-space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox(pub [f64; 4]);

impl MediaBox {
    /// US Letter, 612 x 792 points.
    pub const LETTER: MediaBox = MediaBox([0.0, 0.0, 612.0, 792.0]);

    /// Width in points.
    pub fn width(&self) -> f64 {
        self.0[2] - self.0[0]
    }

    /// Height in points.
    pub fn height(&self) -> f64 {
        self.0[3] - self.0[1]
    }

    /// The rectangle as a PDF array. Whole numbers are written as integers.
    pub fn to_object(&self) -> Object {
        Object::Array(
            self.0
                .iter()
                .map(|&v| {
                    if v.fract() == 0.0 {
                        Object::Integer(v as i64)
                    } else {
                        Object::Real(v as f32)
                    }
                })
                .collect(),
        )
    }
}

impl Default for MediaBox {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Find the first `/MediaBox [a b c d]` in the buffer.
pub fn detect_media_box(buffer: &[u8]) -> Option<MediaBox> {
    let key = b"/MediaBox";

    find_all_occurrences(buffer, key).into_iter().find_map(|offset| {
        let rest = &buffer[offset + key.len()..];
        let open = rest.iter().position(|&b| !is_whitespace(b))?;
        if rest[open] != b'[' {
            // Indirect MediaBox arrays are not followed.
            return None;
        }

        let close = rest[open..].iter().position(|&b| b == b']')? + open;
        let inner = std::str::from_utf8(&rest[open + 1..close]).ok()?;
        let values: Vec<f64> = inner
            .split_ascii_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;

        let values: [f64; 4] = values.try_into().ok()?;
        let media_box = MediaBox(values);
        (media_box.width() > 0.0 && media_box.height() > 0.0).then_some(media_box)
    })
}

/// Read the `x.y` version out of a `%PDF-x.y` header.
pub fn detect_version(buffer: &[u8]) -> Option<String> {
    let rest = buffer.strip_prefix(b"%PDF-")?;
    let version = rest.get(..3)?;
    let valid = version[0].is_ascii_digit() && version[1] == b'.' && version[2].is_ascii_digit();
    valid.then(|| String::from_utf8_lossy(version).into_owned())
}

/// Recover the stream dictionary that precedes the `stream` keyword at `stream_start`.
///
/// Only bytes in `floor..stream_start` are considered, where `floor` is the
/// end of the previous segment. The dictionary is the text between the last
/// `obj` keyword and `stream`; it must be a single `<< … >>` that parses
/// completely. Indirect references come back as [`Object::Reference`].
pub fn recover_stream_dictionary(
    buffer: &[u8],
    floor: usize,
    stream_start: usize,
) -> Option<Dictionary> {
    let window = buffer.get(floor..stream_start)?;

    let obj_end = find_all_occurrences(window, b"obj")
        .into_iter()
        .filter(|&offset| !(offset >= 3 && &window[offset - 3..offset] == b"end"))
        .next_back()?
        + 3;

    let mut parser = ObjectParser::new(trim(&window[obj_end..]));
    let dict = match parser.object()? {
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    parser.at_end().then_some(dict)
}

/// Whether `object` is or contains an indirect reference.
pub fn has_reference(object: &Object) -> bool {
    match object {
        Object::Reference(_) => true,
        Object::Array(items) => items.iter().any(has_reference),
        Object::Dictionary(dict) => dict.iter().any(|(_, value)| has_reference(value)),
        _ => false,
    }
}

/// Recursive-descent reader for direct PDF objects.
///
/// Covers what appears in stream dictionaries: dictionaries, arrays, names,
/// numbers, booleans, null, literal and hex strings, and `N G R` references.
struct ObjectParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ObjectParser<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn at_end(&mut self) -> bool {
        self.skip_filler();
        self.pos == self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, token: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(token)
    }

    /// Skip whitespace and `%` comments.
    fn skip_filler(&mut self) {
        loop {
            self.pos = skip_whitespace(self.bytes, self.pos);
            if self.peek() != Some(b'%') {
                return;
            }
            while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                self.pos += 1;
            }
        }
    }

    fn object(&mut self) -> Option<Object> {
        self.skip_filler();

        match self.peek()? {
            b'<' if self.starts_with(b"<<") => self.dictionary().map(Object::Dictionary),
            b'<' => self.hex_string(),
            b'[' => self.array(),
            b'(' => self.literal_string(),
            b'/' => self.name().map(Object::Name),
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.number(),
            _ => self.keyword(),
        }
    }

    fn dictionary(&mut self) -> Option<Dictionary> {
        self.pos += 2;
        let mut dict = Dictionary::new();

        loop {
            self.skip_filler();
            if self.starts_with(b">>") {
                self.pos += 2;
                return Some(dict);
            }
            if self.peek()? != b'/' {
                return None;
            }

            let key = self.name()?;
            let value = self.object()?;
            dict.set(key, value);
        }
    }

    fn array(&mut self) -> Option<Object> {
        self.pos += 1;
        let mut items = Vec::new();

        loop {
            self.skip_filler();
            if self.peek()? == b']' {
                self.pos += 1;
                return Some(Object::Array(items));
            }
            items.push(self.object()?);
        }
    }

    fn name(&mut self) -> Option<Vec<u8>> {
        self.pos += 1;
        let mut name = Vec::new();

        while let Some(b) = self.peek() {
            if is_whitespace(b) || is_delimiter(b) {
                break;
            }
            if b == b'#' {
                let hex = self.bytes.get(self.pos + 1..self.pos + 3)?;
                name.push(u8::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?);
                self.pos += 3;
            } else {
                name.push(b);
                self.pos += 1;
            }
        }

        Some(name)
    }

    fn number(&mut self) -> Option<Object> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        self.pos = skip_digits(self.bytes, self.pos);

        let is_real = self.peek() == Some(b'.');
        if is_real {
            self.pos = skip_digits(self.bytes, self.pos + 1);
        }

        let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
        if is_real {
            return text.parse::<f32>().ok().map(Object::Real);
        }

        let value: i64 = text.parse().ok()?;
        Some(self.reference_after(value).unwrap_or(Object::Integer(value)))
    }

    /// Consume ` G R` after an object number, rewinding when it is not there.
    fn reference_after(&mut self, number: i64) -> Option<Object> {
        let rewind = self.pos;

        let gen_start = skip_whitespace(self.bytes, self.pos);
        let gen_end = skip_digits(self.bytes, gen_start);
        let r_pos = skip_whitespace(self.bytes, gen_end);

        let is_reference = gen_start > rewind
            && gen_end > gen_start
            && r_pos > gen_end
            && self.bytes.get(r_pos) == Some(&b'R')
            && self
                .bytes
                .get(r_pos + 1)
                .is_none_or(|&b| is_whitespace(b) || is_delimiter(b));

        if !is_reference {
            self.pos = rewind;
            return None;
        }

        let id = u32::try_from(number).ok()?;
        let generation = std::str::from_utf8(&self.bytes[gen_start..gen_end])
            .ok()?
            .parse::<u16>()
            .ok()?;
        self.pos = r_pos + 1;
        Some(Object::Reference((id, generation)))
    }

    fn literal_string(&mut self) -> Option<Object> {
        self.pos += 1;
        let mut depth = 1;
        let mut text = Vec::new();

        loop {
            let b = self.peek()?;
            self.pos += 1;
            match b {
                b'\\' => {
                    let escaped = self.peek()?;
                    self.pos += 1;
                    text.push(match escaped {
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'b' => 0x08,
                        b'f' => 0x0c,
                        other => other,
                    });
                }
                b'(' => {
                    depth += 1;
                    text.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(Object::String(text, StringFormat::Literal));
                    }
                    text.push(b);
                }
                _ => text.push(b),
            }
        }
    }

    fn hex_string(&mut self) -> Option<Object> {
        self.pos += 1;
        let mut digits = Vec::new();

        loop {
            let b = self.peek()?;
            self.pos += 1;
            match b {
                b'>' => break,
                b if b.is_ascii_hexdigit() => digits.push(b),
                b if is_whitespace(b) => {}
                _ => return None,
            }
        }

        if digits.len() % 2 == 1 {
            digits.push(b'0');
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok())
            .collect::<Option<Vec<u8>>>()?;

        Some(Object::String(bytes, StringFormat::Hexadecimal))
    }

    fn keyword(&mut self) -> Option<Object> {
        for (word, object) in [
            (&b"true"[..], Object::Boolean(true)),
            (b"false", Object::Boolean(false)),
            (b"null", Object::Null),
        ] {
            let follows = self.bytes.get(self.pos + word.len());
            let ends = follows.is_none_or(|&b| is_whitespace(b) || is_delimiter(b));
            if self.starts_with(word) && ends {
                self.pos += word.len();
                return Some(object);
            }
        }
        None
    }
}

/// Step backwards from `end` (exclusive) while `pred` holds; returns the new start.
fn rskip(bytes: &[u8], end: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut i = end;
    while i > 0 && pred(bytes[i - 1]) {
        i -= 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = skip_whitespace(bytes, 0);
    let end = rskip(bytes, bytes.len(), is_whitespace);
    if start >= end { &[] } else { &bytes[start..end] }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\r' | b'\t' | b'\x0c' | b'\0')
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'/' | b'<' | b'>' | b'[' | b']' | b'(' | b')' | b'{' | b'}' | b'%'
    )
}
