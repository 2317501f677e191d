use crate::block::{BlockParser, BlockRule, BlockState};
use crate::token::Token;

/// Three or more of the same `-`, `_`, or `*`, with any amount of
/// interspersed spaces and tabs and nothing else on the line.
pub(crate) fn is_thematic_break(indent: usize, content: &str) -> bool {
    if indent > 3 {
        return false;
    }
    let mut marker = 0u8;
    let mut count = 0;
    for byte in content.bytes() {
        match byte {
            b' ' | b'\t' => continue,
            b'-' | b'_' | b'*' => {
                if marker == 0 {
                    marker = byte;
                }
                if byte != marker {
                    return false;
                }
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}

pub(crate) struct ThematicBreak;

impl BlockRule for ThematicBreak {
    fn name(&self) -> &'static str {
        "thematic_break"
    }

    fn matches(&self, state: &BlockState) -> bool {
        is_thematic_break(state.current().indent, state.current_content())
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        is_thematic_break(state.line(index).indent, state.line_content(index))
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        state.append(Token::new("thematic_break"));
        state.advance(1);
        Some(())
    }
}
