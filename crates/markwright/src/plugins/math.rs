//! `$...$` inline and `$$...$$` block math. Content is carried verbatim
//! (never inline-parsed) and handed to the client's math renderer via
//! `.math` spans.

use std::sync::Arc;

use crate::block::{BlockParser, BlockRule, BlockState};
use crate::error::Error;
use crate::escape::escape_html;
use crate::inline::state::InlineState;
use crate::inline::InlineRule;
use crate::markdown::Markdown;
use crate::render::HtmlContext;
use crate::token::Token;

const BLOCK_MATH_PRIORITY: i32 = 95;
const INLINE_MATH_PRIORITY: i32 = 45;

pub fn math(md: &mut Markdown) {
    md.block_rule(BLOCK_MATH_PRIORITY, Arc::new(BlockMath));
    md.inline_rule(INLINE_MATH_PRIORITY, Arc::new(InlineMath));
    md.render_method("block_math", Box::new(render_block_math));
    md.render_method("inline_math", Box::new(render_inline_math));
}

struct BlockMath;

impl BlockRule for BlockMath {
    fn name(&self) -> &'static str {
        "block_math"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current().indent <= 3 && state.current_content().starts_with("$$")
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        let content = state.current_content().trim_end();

        // Single-line form: `$$expr$$` on one line.
        if content.len() > 4 && content.ends_with("$$") {
            let inner = &content[2..content.len() - 2];
            state.append(Token::literal("block_math", inner.trim()));
            state.advance(1);
            return Some(());
        }

        // Multi-line form: an opening `$$` line, content, a closing `$$`.
        if content != "$$" {
            return None;
        }
        let mut index = state.cursor + 1;
        let mut close = None;
        while index < state.line_count() {
            if state.line_content(index).trim_end() == "$$" {
                close = Some(index);
                break;
            }
            index += 1;
        }
        let close = close?;
        let body: Vec<&str> = (state.cursor + 1..close)
            .map(|at| state.line_text(at))
            .collect();
        state.append(Token::literal("block_math", body.join("\n")));
        let consumed = close + 1 - state.cursor;
        state.advance(consumed);
        Some(())
    }
}

struct InlineMath;

impl InlineRule for InlineMath {
    fn name(&self) -> &'static str {
        "inline_math"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"$"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        let bytes = state.rest().as_bytes();
        // The opener may not be followed by whitespace or another dollar.
        match bytes.get(1) {
            None | Some(b'$') | Some(b' ') | Some(b'\t') | Some(b'\n') => return None,
            _ => {}
        }
        let mut index = 2;
        while index < bytes.len() {
            match bytes[index] {
                b'\\' => index += 2,
                b'\n' => return None,
                b'$' => {
                    // The closer may not follow whitespace or precede a digit.
                    if matches!(bytes[index - 1], b' ' | b'\t') {
                        return None;
                    }
                    if bytes.get(index + 1).is_some_and(u8::is_ascii_digit) {
                        return None;
                    }
                    let content = state.rest()[1..index].to_string();
                    state.push(Token::literal("inline_math", content));
                    state.pos += index + 1;
                    return Some(());
                }
                _ => index += 1,
            }
        }
        None
    }
}

fn render_block_math(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!(
        "<div class=\"math\">$${}$$</div>\n",
        escape_html(token.raw.as_deref().unwrap_or(""))
    ))
}

fn render_inline_math(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!(
        "<span class=\"math\">\\({}\\)</span>",
        escape_html(token.raw.as_deref().unwrap_or(""))
    ))
}
