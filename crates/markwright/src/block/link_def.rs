//! Link reference definitions. These are eaten from the stream with no token
//! emitted; the destinations land in the document reference map.

use crate::block::{BlockParser, BlockRule, BlockState};
use crate::inline::links::{scan_label, scan_destination, scan_title};
use crate::scanner::unescape_all;

/// Scan one full definition at the start of `text` (which may span lines).
/// Returns `(label, url, title, bytes_consumed)`; the consumed range always
/// ends just past a line terminator or at the end of the text.
fn scan_def(text: &str) -> Option<(String, String, Option<String>, usize)> {
    let (label, mut pos) = scan_label(text)?;
    if label.trim().is_empty() {
        return None;
    }
    if text.as_bytes().get(pos) != Some(&b':') {
        return None;
    }
    pos += 1;

    pos += skip_spaces(&text[pos..]);
    if text.as_bytes().get(pos) == Some(&b'\n') {
        pos += 1;
        pos += skip_spaces(&text[pos..]);
    }

    let (dest, dest_len) = scan_destination(&text[pos..])?;
    pos += dest_len;
    let after_dest = pos;

    // A title must be separated from the destination by whitespace, possibly
    // crossing a single line break.
    let mut title_pos = pos;
    let spaces = skip_spaces(&text[title_pos..]);
    title_pos += spaces;
    let mut crossed_line = false;
    if text.as_bytes().get(title_pos) == Some(&b'\n') {
        crossed_line = true;
        title_pos += 1;
        title_pos += skip_spaces(&text[title_pos..]);
    }
    let has_separator = spaces > 0 || crossed_line;

    if has_separator {
        if let Some((title, title_len)) = scan_title(&text[title_pos..]) {
            let mut end = title_pos + title_len;
            end += skip_spaces(&text[end..]);
            match text.as_bytes().get(end) {
                None => {
                    return Some((label.to_string(), unescape_all(dest), Some(title), end));
                }
                Some(b'\n') => {
                    return Some((label.to_string(), unescape_all(dest), Some(title), end + 1));
                }
                // Junk after the title: when the title started on its own
                // line, fall back to a title-less definition; on the same
                // line the whole definition is invalid.
                _ if crossed_line => {}
                _ => return None,
            }
        }
    }

    // No (valid) title: the destination must be the last thing on its line.
    let mut end = after_dest + skip_spaces(&text[after_dest..]);
    match text.as_bytes().get(end) {
        None => Some((label.to_string(), unescape_all(dest), None, end)),
        Some(b'\n') => {
            end += 1;
            Some((label.to_string(), unescape_all(dest), None, end))
        }
        _ => None,
    }
}

fn skip_spaces(text: &str) -> usize {
    text.bytes()
        .take_while(|&byte| byte == b' ' || byte == b'\t')
        .count()
}

pub(crate) struct LinkRefDef;

impl BlockRule for LinkRefDef {
    fn name(&self) -> &'static str {
        "link_ref_def"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current().indent <= 3 && state.current_content().starts_with('[')
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        // Definitions cannot contain blank lines, so a window up to the next
        // blank line bounds everything a run of definitions could consume.
        let mut window_end = state.cursor;
        while window_end < state.line_count() && !state.line(window_end).is_blank() {
            window_end += 1;
        }
        let window: Vec<&str> = (state.cursor..window_end)
            .map(|index| state.line_content(index))
            .collect();
        let window_len = window.len();
        let text = window.join("\n");

        let mut offset = 0;
        let mut defs = Vec::new();
        while offset < text.len() {
            match scan_def(&text[offset..]) {
                Some((label, url, title, used)) => {
                    defs.push((label, url, title));
                    offset += used;
                }
                None => break,
            }
        }
        if defs.is_empty() {
            return None;
        }

        for (label, url, title) in defs {
            state.add_def(&label, url, title);
        }

        let lines_consumed = if offset >= text.len() {
            window_len
        } else {
            text[..offset].matches('\n').count()
        };
        state.advance(lines_consumed);
        Some(())
    }
}
