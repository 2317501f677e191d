//! The small single-byte rules: backslash escapes, entity references, and
//! line breaks.

use crate::entities::decode_entity;
use crate::inline::state::InlineState;
use crate::inline::{append_text, InlineRule};
use crate::scanner::is_escapable;
use crate::token::Token;

pub(crate) struct Escape;

impl InlineRule for Escape {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"\\"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        match state.byte(1) {
            // A backslash at the end of a line is a hard break.
            Some(b'\n') => {
                state.push(Token::new("linebreak"));
                state.pos += 2;
                Some(())
            }
            Some(byte) if is_escapable(byte) => {
                append_text(&mut state.tokens, (byte as char).to_string());
                state.pos += 2;
                Some(())
            }
            _ => None,
        }
    }
}

pub(crate) struct Entity;

impl InlineRule for Entity {
    fn name(&self) -> &'static str {
        "entity"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"&"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        let (decoded, len) = decode_entity(state.rest())?;
        append_text(&mut state.tokens, decoded);
        state.pos += len;
        Some(())
    }
}

pub(crate) struct LineBreak;

impl InlineRule for LineBreak {
    fn name(&self) -> &'static str {
        "linebreak"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"\n"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        // Two or more trailing spaces on the preceding text make the break
        // hard; either way the spaces themselves never reach the output.
        let mut hard = false;
        if let Some(last) = state.tokens.last_mut() {
            if last.kind == "text" {
                if let Some(text) = &mut last.text {
                    let trimmed_len = text.trim_end_matches(' ').len();
                    hard = text.len() - trimmed_len >= 2;
                    text.truncate(trimmed_len);
                }
            }
        }
        state.push(Token::new(if hard { "linebreak" } else { "softbreak" }));
        state.pos += 1;
        Some(())
    }
}
