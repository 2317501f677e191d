//! Definition lists:
//!
//! ```text
//! term
//! : definition
//! ```
//!
//! Terms run the inline phase; definition bodies are block-parsed so they
//! can hold paragraphs, code, or nested lists.

use std::sync::Arc;

use crate::block::{BlockParser, BlockRule, BlockState};
use crate::error::Error;
use crate::markdown::Markdown;
use crate::render::HtmlContext;
use crate::scanner::strip_columns;
use crate::token::Token;

const DEF_LIST_PRIORITY: i32 = 85;

pub fn def_list(md: &mut Markdown) {
    md.block_rule(DEF_LIST_PRIORITY, Arc::new(DefList));
    md.render_method("def_list", Box::new(render_def_list));
    md.render_method("def_term", Box::new(render_term));
    md.render_method("def_desc", Box::new(render_desc));
}

fn is_def_marker(content: &str) -> bool {
    content.starts_with(": ") || content.starts_with(":\t")
}

struct DefList;

impl BlockRule for DefList {
    fn name(&self) -> &'static str {
        "def_list"
    }

    fn matches(&self, state: &BlockState) -> bool {
        // A term line is only a term because a `: ` line follows it.
        state.current().indent <= 3
            && !is_def_marker(state.current_content())
            && state.cursor + 1 < state.line_count()
            && state.line(state.cursor + 1).indent <= 3
            && is_def_marker(state.line_content(state.cursor + 1))
    }

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()> {
        let mut children = Vec::new();
        let mut index = state.cursor;

        while index < state.line_count() {
            // One term, then one or more `: ` definitions.
            let term_ok = index + 1 < state.line_count()
                && state.line(index).indent <= 3
                && !state.line(index).is_blank()
                && !is_def_marker(state.line_content(index))
                && state.line(index + 1).indent <= 3
                && is_def_marker(state.line_content(index + 1));
            if !term_ok {
                break;
            }
            children.push(Token::raw_leaf(
                "def_term",
                state.line_content(index).trim_end(),
            ));
            index += 1;

            while index < state.line_count()
                && state.line(index).indent <= 3
                && is_def_marker(state.line_content(index))
            {
                let mut lines = vec![state.line_content(index)[2..].trim_start().to_string()];
                index += 1;
                // Continuation lines are indented at least two columns.
                let mut pending_blank = false;
                while index < state.line_count() {
                    let line = *state.line(index);
                    if line.is_blank() {
                        pending_blank = true;
                        lines.push(String::new());
                        index += 1;
                        continue;
                    }
                    if line.indent >= 2 && !is_def_marker(state.line_content(index)) {
                        lines.push(strip_columns(state.line_text(index), 2));
                        pending_blank = false;
                        index += 1;
                        continue;
                    }
                    break;
                }
                if pending_blank {
                    // Leave the trailing blank for the outer driver.
                    while lines.last().is_some_and(|line| line.trim().is_empty()) {
                        lines.pop();
                        index -= 1;
                    }
                }
                let blocks = parser.parse_container(state, lines.join("\n"));
                children.push(Token::container("def_desc", blocks));
            }
        }

        if children.is_empty() {
            return None;
        }
        state.append(Token::container("def_list", children));
        let consumed = index - state.cursor;
        state.advance(consumed);
        Some(())
    }
}

fn render_def_list(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<dl>\n{}</dl>\n", ctx.render_children(token)?))
}

fn render_term(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<dt>{}</dt>\n", ctx.render_children(token)?))
}

fn render_desc(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let children = token.children();
    // A lone paragraph renders unwrapped, like a tight list item.
    if let [only] = children {
        if only.is("paragraph") {
            return Ok(format!("<dd>{}</dd>\n", ctx.render_children(only)?));
        }
    }
    Ok(format!("<dd>\n{}</dd>\n", ctx.render_children(token)?))
}

#[cfg(test)]
mod test {
    use crate::markdown::Markdown;

    fn convert(src: &str) -> String {
        let mut md = Markdown::new();
        md.use_plugin(super::def_list);
        md.convert(src).unwrap()
    }

    #[test]
    fn single_term_and_definition() {
        assert_eq!(
            convert("Term\n: meaning"),
            "<dl>\n<dt>Term</dt>\n<dd>meaning</dd>\n</dl>\n"
        );
    }

    #[test]
    fn multiple_definitions_per_term() {
        let html = convert("Term\n: one\n: two");
        assert_eq!(html.matches("<dd>").count(), 2);
    }

    #[test]
    fn multiple_terms() {
        let html = convert("A\n: first\nB\n: second");
        assert_eq!(html.matches("<dt>").count(), 2);
    }

    #[test]
    fn definition_with_block_content() {
        let html = convert("Term\n: para one\n\n  para two");
        assert!(html.contains("<dd>\n<p>para one</p>\n<p>para two</p>\n</dd>"));
    }

    #[test]
    fn plain_paragraph_is_untouched() {
        assert_eq!(convert("just text"), "<p>just text</p>\n");
    }

    #[test]
    fn colon_line_without_term_is_a_paragraph() {
        assert_eq!(convert(": orphan"), "<p>: orphan</p>\n");
    }
}
