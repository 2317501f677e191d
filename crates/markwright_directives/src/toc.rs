use std::cell::RefCell;
use std::rc::Rc;

use markwright::{BlockParser, BlockState, Env, Error, HtmlContext, Markdown, Token};
use markwright::escape::escape_html;

use crate::{Directive, DirectiveError, DirectiveHandler};

const DEFAULT_MAX_LEVEL: i64 = 3;

/// Emits a placeholder; the post-parse pass fills it in from the document's
/// headings once they exist in final form.
pub struct TableOfContents;

impl DirectiveHandler for TableOfContents {
    fn handle(
        &self,
        directive: Directive,
        state: &mut BlockState,
        _parser: &BlockParser,
    ) -> Result<(), DirectiveError> {
        let max_level = directive
            .option("max-level")
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| DirectiveError::malformed("max-level must be an integer"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_LEVEL);
        state.append(
            Token::new("toc")
                .with_attr("title", directive.title)
                .with_attr("max_level", max_level),
        );
        Ok(())
    }
}

/// The post-parse pass: assign `toc_<n>` ids to headings and expand every
/// placeholder into a flat item list (the renderer handles nesting). With
/// no headings in the document, placeholders resolve to an empty list.
pub(crate) fn resolve_toc(_md: &Markdown, tokens: &mut Vec<Token>, _env: &Rc<RefCell<Env>>) {
    if !contains_kind(tokens, "toc") {
        return;
    }

    let mut headings: Vec<(i64, String, String)> = Vec::new();
    label_headings(tokens, &mut headings);

    fill_placeholders(tokens, &headings);
}

fn contains_kind(tokens: &[Token], kind: &str) -> bool {
    tokens.iter().any(|token| {
        token.is(kind) || token.children.as_deref().is_some_and(|c| contains_kind(c, kind))
    })
}

fn label_headings(tokens: &mut [Token], headings: &mut Vec<(i64, String, String)>) {
    for token in tokens.iter_mut() {
        if token.is("heading") {
            let id = format!("toc_{}", headings.len() + 1);
            token.attrs.set("id", id.clone());
            let level = token.attr_int("level").unwrap_or(1);
            headings.push((level, id, token.plain_text()));
        } else if let Some(children) = token.children.as_mut() {
            label_headings(children, headings);
        }
    }
}

fn fill_placeholders(tokens: &mut [Token], headings: &[(i64, String, String)]) {
    for token in tokens.iter_mut() {
        if token.is("toc") {
            let max_level = token.attr_int("max_level").unwrap_or(DEFAULT_MAX_LEVEL);
            let items = headings
                .iter()
                .filter(|(level, _, _)| *level <= max_level)
                .map(|(level, id, text)| {
                    let mut item = Token::new("toc_item")
                        .with_attr("level", *level)
                        .with_attr("target", id.clone());
                    item.raw = Some(text.clone());
                    item
                })
                .collect();
            token.children = Some(items);
        } else if let Some(children) = token.children.as_mut() {
            fill_placeholders(children, headings);
        }
    }
}

pub(crate) fn render(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let items = token.children();
    if items.is_empty() {
        return Ok("<ul class=\"toc\"></ul>\n".to_string());
    }

    let mut out = String::from("<ul class=\"toc\">\n");
    let mut level_stack: Vec<i64> = Vec::new();
    for item in items {
        let level = item.attr_int("level").unwrap_or(1);
        let target = item.attr_str("target").unwrap_or("");
        let text = escape_html(item.raw.as_deref().unwrap_or(""));

        if level_stack.is_empty() {
            level_stack.push(level);
        } else if level > *level_stack.last().unwrap() {
            out.push_str("\n<ul>\n");
            level_stack.push(level);
        } else {
            out.push_str("</li>\n");
            while level_stack.len() > 1 && level < *level_stack.last().unwrap() {
                level_stack.pop();
                out.push_str("</ul>\n</li>\n");
            }
        }
        out.push_str(&format!("<li><a href=\"#{target}\">{text}</a>"));
    }
    out.push_str("</li>\n");
    while level_stack.len() > 1 {
        level_stack.pop();
        out.push_str("</ul>\n</li>\n");
    }
    out.push_str("</ul>\n");
    Ok(out)
}
