use crate::block::{BlockParser, BlockRule, BlockState};
use crate::scanner::{strip_columns, unescape_all};
use crate::token::Token;

/// Returns the fence character and length when the line opens a fenced code
/// block: three or more `` ` `` or `~` at an indent of at most three. An
/// info string after a backtick fence may not contain a backtick.
pub(crate) fn fence_open(indent: usize, content: &str) -> Option<(u8, usize)> {
    if indent > 3 || content.is_empty() {
        return None;
    }
    let marker = content.as_bytes()[0];
    if !matches!(marker, b'`' | b'~') {
        return None;
    }
    let length = content
        .bytes()
        .take_while(|&byte| byte == marker)
        .count();
    if length < 3 {
        return None;
    }
    if marker == b'`' && content.as_bytes()[length..].contains(&b'`') {
        return None;
    }
    Some((marker, length))
}

fn is_fence_close(indent: usize, content: &str, marker: u8, open_length: usize) -> bool {
    if indent > 3 {
        return false;
    }
    let length = content.bytes().take_while(|&byte| byte == marker).count();
    length >= open_length
        && content.as_bytes()[length..]
            .iter()
            .all(|byte| matches!(byte, b' ' | b'\t'))
}

pub(crate) struct FencedCode;

impl BlockRule for FencedCode {
    fn name(&self) -> &'static str {
        "fenced_code"
    }

    fn matches(&self, state: &BlockState) -> bool {
        fence_open(state.current().indent, state.current_content()).is_some()
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        fence_open(state.line(index).indent, state.line_content(index)).is_some()
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        let fence_indent = state.current().indent;
        let content = state.current_content();
        let (marker, length) = fence_open(fence_indent, content)?;
        let info = unescape_all(content[length..].trim());

        let mut raw = String::new();
        let mut index = state.cursor + 1;
        while index < state.line_count() {
            let line = *state.line(index);
            if is_fence_close(line.indent, state.line_content(index), marker, length) {
                index += 1;
                break;
            }
            // Up to the opening fence's indentation is stripped from each
            // content line.
            let strip = fence_indent.min(line.indent);
            raw.push_str(&strip_columns(state.line_text(index), strip));
            raw.push('\n');
            index += 1;
        }

        let mut token = Token::literal("block_code", raw);
        if !info.is_empty() {
            token.attrs.set("info", info);
        }
        state.append(token);
        let consumed = index - state.cursor;
        state.advance(consumed);
        Some(())
    }
}

pub(crate) struct IndentedCode;

impl BlockRule for IndentedCode {
    fn name(&self) -> &'static str {
        "indented_code"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current().indent >= 4
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        let mut raw = String::new();
        let mut index = state.cursor;
        let mut last_content = state.cursor;
        while index < state.line_count() {
            let line = *state.line(index);
            if line.is_blank() {
                index += 1;
                continue;
            }
            if line.indent < 4 {
                break;
            }
            // Catch up on any interior blank lines skipped above.
            for blank in (last_content + 1)..index {
                raw.push_str(&strip_columns(state.line_text(blank), 4));
                raw.push('\n');
            }
            raw.push_str(&strip_columns(state.line_text(index), 4));
            raw.push('\n');
            last_content = index;
            index += 1;
        }

        state.append(Token::literal("block_code", raw));
        let consumed = last_content + 1 - state.cursor;
        state.advance(consumed);
        Some(())
    }
}
