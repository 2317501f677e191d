//! Source-side scanning primitives: the per-line table the block phase works
//! from, indentation arithmetic in the tab-stop column model, and the
//! backslash/entity expansion applied to destinations, titles, and labels.

use crate::entities::decode_entity;

pub(crate) const TAB_STOP: usize = 4;

/// One physical line of the source. `end` excludes the line terminator;
/// `indent` is the expanded width of the leading whitespace with tabs taken
/// to the next multiple of four.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Line {
    pub start: usize,
    pub end: usize,
    pub indent: usize,
    pub content_start: usize,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.content_start >= self.end
    }
}

/// Build the line table for a source buffer. A lone `\r` or a `\r\n` pair
/// terminates a line just like `\n` does.
pub(crate) fn scan_lines(src: &str) -> Vec<Line> {
    let bytes = src.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        let (end, next) = match memchr::memchr2(b'\n', b'\r', &bytes[start..]) {
            Some(index) => {
                let end = start + index;
                let next = if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
                    end + 2
                } else {
                    end + 1
                };
                (end, next)
            }
            None => (bytes.len(), bytes.len()),
        };

        let (indent, content_offset) = measure_indent(&src[start..end]);
        lines.push(Line {
            start,
            end,
            indent,
            content_start: start + content_offset,
        });
        start = next;
    }

    lines
}

/// Measure the expanded indent of a line, returning the width in columns and
/// the byte offset of the first non-whitespace character.
pub(crate) fn measure_indent(line: &str) -> (usize, usize) {
    let mut width = 0;
    for (offset, byte) in line.bytes().enumerate() {
        match byte {
            b' ' => width += 1,
            b'\t' => width += TAB_STOP - (width % TAB_STOP),
            _ => return (width, offset),
        }
    }
    (width, line.len())
}

/// Remove `columns` of indentation from the front of a line. A tab that
/// straddles the boundary is replaced by the spaces left over on the far
/// side, per the column model.
pub(crate) fn strip_columns(line: &str, columns: usize) -> String {
    let mut width = 0;
    for (offset, ch) in line.char_indices() {
        if width >= columns {
            return line[offset..].to_string();
        }
        match ch {
            ' ' => width += 1,
            '\t' => {
                let next = width + (TAB_STOP - (width % TAB_STOP));
                if next > columns {
                    let mut out = " ".repeat(next - columns);
                    out.push_str(&line[offset + 1..]);
                    return out;
                }
                width = next;
            }
            _ => return line[offset..].to_string(),
        }
    }
    String::new()
}

pub(crate) fn is_escapable(byte: u8) -> bool {
    byte.is_ascii_punctuation()
}

#[rustfmt::skip]
static UTF8_LENGTH_LOOKUP: [usize; 32] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 3, 3, 4, 0,
];

/// Byte length of the UTF-8 code point beginning with `byte`, computed
/// without decoding the whole character.
#[inline(always)]
pub(crate) fn char_length(byte: u8) -> usize {
    UTF8_LENGTH_LOOKUP[byte as usize >> 3].max(1)
}

/// Expand backslash escapes and entity references in a slice of source text.
/// This is the processing applied to link destinations, titles, reference
/// labels (before normalization), and code fence info strings.
pub(crate) fn unescape_all(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while cursor < bytes.len() {
        match bytes[cursor] {
            b'\\' if cursor + 1 < bytes.len() && is_escapable(bytes[cursor + 1]) => {
                out.push(bytes[cursor + 1] as char);
                cursor += 2;
            }
            b'&' => {
                if let Some((decoded, len)) = decode_entity(&text[cursor..]) {
                    out.push_str(&decoded);
                    cursor += len;
                } else {
                    out.push('&');
                    cursor += 1;
                }
            }
            _ => {
                let chunk = memchr::memchr2(b'\\', b'&', &bytes[cursor + 1..])
                    .map_or(bytes.len(), |index| cursor + 1 + index);
                out.push_str(&text[cursor..chunk]);
                cursor = chunk;
            }
        }
    }
    out
}

/// Normalize a link or footnote reference label: trim, collapse interior
/// whitespace runs to a single space, and case-fold. Normalization is
/// idempotent, which lookup relies on.
pub(crate) fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_space = false;
    for ch in label.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        for lowered in ch.to_lowercase() {
            out.push(lowered);
        }
    }
    out
}
