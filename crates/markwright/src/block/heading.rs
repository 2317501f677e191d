use crate::block::{BlockParser, BlockRule, BlockState};
use crate::token::Token;

/// Shape test for an ATX heading opener: one to six `#` followed by
/// whitespace or the end of the line, at an indent of at most three.
pub(crate) fn is_atx_heading(indent: usize, content: &str) -> bool {
    if indent > 3 {
        return false;
    }
    let bytes = content.as_bytes();
    let hashes = bytes.iter().take_while(|&&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return false;
    }
    matches!(bytes.get(hashes), None | Some(b' ') | Some(b'\t'))
}

pub(crate) struct AtxHeading;

impl BlockRule for AtxHeading {
    fn name(&self) -> &'static str {
        "atx_heading"
    }

    fn matches(&self, state: &BlockState) -> bool {
        is_atx_heading(state.current().indent, state.current_content())
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        is_atx_heading(state.line(index).indent, state.line_content(index))
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        let content = state.current_content();
        let level = content.bytes().take_while(|&b| b == b'#').count();
        let mut text = content[level..].trim_matches([' ', '\t']);

        // An optional closing hash run, separated from the content by
        // whitespace (or forming the entire content), is dropped.
        let without_hashes = text.trim_end_matches('#');
        if without_hashes.len() < text.len() {
            if without_hashes.is_empty() {
                text = "";
            } else if without_hashes.ends_with([' ', '\t']) {
                text = without_hashes.trim_end_matches([' ', '\t']);
            }
        }

        let token = Token::raw_leaf("heading", text).with_attr("level", level as i64);
        state.append(token);
        state.advance(1);
        Some(())
    }
}

/// Shape test for a setext underline: a run of `=` or `-` with nothing but
/// trailing whitespace after it.
pub(crate) fn is_setext_underline(indent: usize, content: &str) -> Option<u8> {
    if indent > 3 || content.is_empty() {
        return None;
    }
    let marker = content.as_bytes()[0];
    if !matches!(marker, b'=' | b'-') {
        return None;
    }
    let rest = content.trim_start_matches(marker as char);
    if rest.bytes().all(|b| b == b' ' || b == b'\t') {
        Some(marker)
    } else {
        None
    }
}

/// Promotes the open paragraph into a level 1 (`=`) or level 2 (`-`)
/// heading. Only fires while a paragraph is open in the same container, so
/// it never participates in lazy-continuation decisions.
pub(crate) struct SetextHeading;

impl BlockRule for SetextHeading {
    fn name(&self) -> &'static str {
        "setext_heading"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.has_open_paragraph()
            && is_setext_underline(state.current().indent, state.current_content()).is_some()
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        index == state.cursor
            && state.has_open_paragraph()
            && is_setext_underline(state.line(index).indent, state.line_content(index)).is_some()
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        let marker = is_setext_underline(state.current().indent, state.current_content())?;
        let text = state.take_paragraph()?;
        let level = if marker == b'=' { 1 } else { 2 };
        state.append(Token::raw_leaf("heading", text).with_attr("level", level as i64));
        state.advance(1);
        Some(())
    }
}
