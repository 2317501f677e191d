use memchr::memchr;

use crate::inline::state::InlineState;
use crate::inline::{append_text, InlineRule};
use crate::token::Token;

/// Code spans are parsed predictively: scan ahead for a backtick run of
/// exactly the opening length. If none exists, the opening run is literal
/// text and scanning resumes right after it.
pub(crate) struct CodeSpan;

impl InlineRule for CodeSpan {
    fn name(&self) -> &'static str {
        "code_span"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"`"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        let bytes = state.src.as_bytes();
        let open_start = state.pos;
        let mut open_end = open_start;
        while open_end < bytes.len() && bytes[open_end] == b'`' {
            open_end += 1;
        }
        let length = open_end - open_start;

        let mut cursor = open_end;
        while let Some(found) = memchr(b'`', &bytes[cursor..]) {
            let run_start = cursor + found;
            let mut run_end = run_start;
            while run_end < bytes.len() && bytes[run_end] == b'`' {
                run_end += 1;
            }
            if run_end - run_start == length {
                let mut content = state.src[open_end..run_start].replace('\n', " ");
                if content.len() >= 2
                    && content.starts_with(' ')
                    && content.ends_with(' ')
                    && !content.bytes().all(|byte| byte == b' ')
                {
                    content = content[1..content.len() - 1].to_string();
                }
                let mut token = Token::new("codespan");
                token.text = Some(content);
                state.push(token);
                state.pos = run_end;
                return Some(());
            }
            cursor = run_end;
        }

        // No matching closer: the run is literal.
        append_text(&mut state.tokens, state.src[open_start..open_end].to_string());
        state.pos = open_end;
        Some(())
    }
}
