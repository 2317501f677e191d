use crate::block::{BlockParser, BlockRule, BlockState, InteriorScan};
use crate::scanner::strip_columns;
use crate::token::Token;

pub(crate) struct BlockQuote;

fn has_marker(indent: usize, content: &str) -> bool {
    indent <= 3 && content.starts_with('>')
}

impl BlockRule for BlockQuote {
    fn name(&self) -> &'static str {
        "block_quote"
    }

    fn matches(&self, state: &BlockState) -> bool {
        has_marker(state.current().indent, state.current_content())
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        has_marker(state.line(index).indent, state.line_content(index))
    }

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()> {
        let mut content = String::new();
        let mut scan = InteriorScan::new();
        let mut index = state.cursor;

        while index < state.line_count() {
            let line = *state.line(index);
            if has_marker(line.indent, state.line_content(index)) {
                // The marker consumes one optional column of following
                // whitespace.
                let rest = &state.line_content(index)[1..];
                let stripped = strip_columns(rest, 1);
                scan.feed(&stripped);
                content.push_str(&stripped);
                content.push('\n');
                index += 1;
                continue;
            }
            if line.is_blank() {
                break;
            }
            // Lazy continuation: a markerless line that cannot start a new
            // block joins the open paragraph inside the quote.
            if scan.paragraph_open && !parser.line_interrupts_paragraph(state, index) {
                let text = state.line_content(index).to_string();
                scan.feed(&text);
                content.push_str(&text);
                content.push('\n');
                index += 1;
                continue;
            }
            break;
        }

        let children = parser.parse_container(state, content);
        state.append(Token::container("block_quote", children));
        let consumed = index - state.cursor;
        state.advance(consumed);
        Some(())
    }
}
