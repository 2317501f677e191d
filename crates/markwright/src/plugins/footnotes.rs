//! Footnotes: `[^label]` references, `[^label]: content` definitions, and
//! the trailing footnotes section with back-references, assembled in
//! first-use order by a post-parse pass.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{BlockParser, BlockRule, BlockState};
use crate::error::Error;
use crate::inline::state::InlineState;
use crate::inline::InlineRule;
use crate::markdown::Markdown;
use crate::render::HtmlContext;
use crate::scanner::strip_columns;
use crate::token::Token;

const DEF_PRIORITY: i32 = 55;
const REF_PRIORITY: i32 = 38;

pub fn footnotes(md: &mut Markdown) {
    md.block_rule(DEF_PRIORITY, Arc::new(FootnoteDef));
    md.inline_rule(REF_PRIORITY, Arc::new(FootnoteRef));
    md.after_parse("footnotes", Box::new(collect_footnotes));
    md.render_method("footnote_ref", Box::new(render_ref));
    md.render_method("footnotes", Box::new(render_section));
    md.render_method("footnote_item", Box::new(render_item));
}

static DEF_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\^([^\]\s]+)\]:[ \t]*").unwrap());
static REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\^([^\]\s]+)\]").unwrap());

struct FootnoteDef;

impl BlockRule for FootnoteDef {
    fn name(&self) -> &'static str {
        "footnote_def"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current().indent <= 3 && DEF_START.is_match(state.current_content())
    }

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()> {
        let captures = DEF_START.captures(state.current_content())?;
        let label = crate::scanner::normalize_label(&captures[1]);
        let first = state.current_content()[captures.get(0).unwrap().end()..].to_string();

        let mut lines = vec![first];
        let mut index = state.cursor + 1;
        let mut pending_blank = false;
        while index < state.line_count() {
            let line = *state.line(index);
            if line.is_blank() {
                pending_blank = true;
                lines.push(String::new());
                index += 1;
                continue;
            }
            // Continuation content is indented four columns.
            if line.indent >= 4 {
                lines.push(strip_columns(state.line_text(index), 4));
                pending_blank = false;
                index += 1;
                continue;
            }
            // A new definition always ends the current one.
            if DEF_START.is_match(state.line_content(index)) {
                break;
            }
            if !pending_blank && !parser.line_interrupts_paragraph(state, index) {
                lines.push(state.line_content(index).to_string());
                index += 1;
                continue;
            }
            break;
        }
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        state
            .env
            .borrow_mut()
            .footnote_defs
            .entry(label)
            .or_insert_with(|| lines.join("\n"));
        let consumed = index - state.cursor;
        state.advance(consumed);
        Some(())
    }
}

struct FootnoteRef;

impl InlineRule for FootnoteRef {
    fn name(&self) -> &'static str {
        "footnote_ref"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"["
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        let captures = REF.captures(state.rest())?;
        let label = crate::scanner::normalize_label(&captures[1]);
        // Only defined labels form references; anything else is left for the
        // regular link machinery.
        if !state.env.borrow().footnote_defs.contains_key(&label) {
            return None;
        }
        let length = captures.get(0).unwrap().end();
        state.push(Token::new("footnote_ref").with_attr("label", label));
        state.pos += length;
        Some(())
    }
}

/// Number references in first-use order and build the trailing section from
/// the used definitions, block-parsing their stored content.
fn collect_footnotes(
    md: &Markdown,
    tokens: &mut Vec<Token>,
    env: &std::rc::Rc<std::cell::RefCell<crate::block::Env>>,
) {
    let mut order: Vec<String> = Vec::new();
    number_refs(tokens, &mut order);
    if order.is_empty() {
        return;
    }

    let mut items = Vec::with_capacity(order.len());
    for (position, label) in order.iter().enumerate() {
        let content = env
            .borrow()
            .footnote_defs
            .get(label)
            .cloned()
            .unwrap_or_default();
        let blocks = md.parse_fragment(&content, env, 1);
        items.push(
            Token::container("footnote_item", blocks)
                .with_attr("index", (position + 1) as i64)
                .with_attr("label", label.clone()),
        );
    }
    tokens.push(Token::container("footnotes", items));
}

fn number_refs(tokens: &mut [Token], order: &mut Vec<String>) {
    for token in tokens.iter_mut() {
        if token.is("footnote_ref") {
            let label = token.attr_str("label").unwrap_or_default().to_string();
            let index = match order.iter().position(|seen| *seen == label) {
                Some(at) => at + 1,
                None => {
                    order.push(label);
                    order.len()
                }
            };
            token.attrs.set("index", index as i64);
        }
        if let Some(children) = token.children.as_mut() {
            number_refs(children, order);
        }
    }
}

fn render_ref(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let index = token.attr_int("index").unwrap_or(0);
    Ok(format!(
        "<sup class=\"footnote-ref\"><a href=\"#fn-{index}\" id=\"fnref-{index}\">{index}</a></sup>"
    ))
}

fn render_section(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!(
        "<section class=\"footnotes\">\n<ol>\n{}</ol>\n</section>\n",
        ctx.render_children(token)?
    ))
}

fn render_item(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let index = token.attr_int("index").unwrap_or(0);
    let mut body = ctx.render_children(token)?;
    let backref = format!("<a href=\"#fnref-{index}\" class=\"footnote-backref\">\u{21A9}</a>");
    // Attach the back-reference inside the final paragraph when there is
    // one, so it sits on the same line as the closing text.
    if let Some(at) = body.rfind("</p>") {
        body.insert_str(at, &backref);
    } else {
        body.push_str(&format!("<p>{backref}</p>\n"));
    }
    Ok(format!("<li id=\"fn-{index}\">\n{body}</li>\n"))
}
