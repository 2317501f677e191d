//! The GFM trio: pipe tables, strikethrough, and task list items.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{priority as block_priority, BlockParser, BlockRule, BlockState};
use crate::error::Error;
use crate::inline::state::{DelimMode, InlineState};
use crate::inline::{delimiter, InlineRule};
use crate::markdown::Markdown;
use crate::render::HtmlContext;
use crate::token::Token;

const STRIKETHROUGH_PRIORITY: i32 = 55;

pub fn gfm(md: &mut Markdown) {
    md.block_rule(block_priority::TABLE, Arc::new(Table));
    md.inline_rule(STRIKETHROUGH_PRIORITY, Arc::new(Strikethrough));
    md.after_block("task_lists", Box::new(|_, tokens, _| mark_task_items(tokens)));

    md.render_method("table", Box::new(render_table));
    md.render_method("table_head", Box::new(render_table_head));
    md.render_method("table_body", Box::new(render_table_body));
    md.render_method("table_row", Box::new(render_table_row));
    md.render_method("table_cell", Box::new(render_table_cell));
    md.render_method("strikethrough", Box::new(render_strikethrough));
    md.render_method("list_item", Box::new(render_list_item));
}

// Tables

static DELIMITER_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Split a row line on unescaped pipes, dropping one optional leading and
/// trailing pipe. Cell text is trimmed but otherwise raw; `\|` is left for
/// the inline escape rule.
fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let bytes = trimmed.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 2,
            b'|' => {
                cells.push(trimmed[start..index.min(trimmed.len())].trim().to_string());
                index += 1;
                start = index;
            }
            _ => index += 1,
        }
    }
    if start <= trimmed.len() {
        cells.push(trimmed[start..].trim().to_string());
    }
    // A leading or trailing pipe produces one empty edge cell; drop it.
    if cells.first().is_some_and(|cell| cell.is_empty()) && trimmed.starts_with('|') {
        cells.remove(0);
    }
    if cells.last().is_some_and(|cell| cell.is_empty()) && trimmed.ends_with('|') {
        cells.pop();
    }
    cells
}

fn parse_alignments(line: &str) -> Option<Vec<Option<&'static str>>> {
    let cells = split_row(line);
    if cells.is_empty() {
        return None;
    }
    let mut aligns = Vec::with_capacity(cells.len());
    for cell in &cells {
        if !DELIMITER_CELL.is_match(cell) {
            return None;
        }
        let align = match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Some("center"),
            (true, false) => Some("left"),
            (false, true) => Some("right"),
            (false, false) => None,
        };
        aligns.push(align);
    }
    Some(aligns)
}

fn make_cell(text: String, align: Option<&'static str>, head: bool) -> Token {
    let mut cell = Token::raw_leaf("table_cell", text).with_attr("head", head);
    if let Some(align) = align {
        cell.attrs.set("align", align);
    }
    cell
}

struct Table;

impl BlockRule for Table {
    fn name(&self) -> &'static str {
        "table"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current().indent <= 3
            && state.current_content().contains('|')
            && state.cursor + 1 < state.line_count()
    }

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()> {
        let header = split_row(state.current_content());
        let aligns = parse_alignments(state.line_content(state.cursor + 1))?;
        if header.len() != aligns.len() {
            return None;
        }
        // The delimiter row needs a pipe somewhere to be a table and not a
        // stray `---` underline.
        if !state.line_content(state.cursor + 1).contains('|') {
            return None;
        }

        let head_cells: Vec<Token> = header
            .into_iter()
            .zip(&aligns)
            .map(|(text, align)| make_cell(text, *align, true))
            .collect();
        let head_row = Token::container("table_row", head_cells);
        let head = Token::container("table_head", vec![head_row]);

        let mut index = state.cursor + 2;
        let mut rows = Vec::new();
        while index < state.line_count()
            && !state.line(index).is_blank()
            && !parser.line_interrupts_paragraph(state, index)
        {
            let mut cells = split_row(state.line_content(index));
            // Rows are padded with empty cells or truncated to the header
            // width.
            cells.resize(aligns.len(), String::new());
            let tokens: Vec<Token> = cells
                .into_iter()
                .zip(&aligns)
                .map(|(text, align)| make_cell(text, *align, false))
                .collect();
            rows.push(Token::container("table_row", tokens));
            index += 1;
        }

        let mut children = vec![head];
        if !rows.is_empty() {
            children.push(Token::container("table_body", rows));
        }
        state.append(Token::container("table", children));
        let consumed = index - state.cursor;
        state.advance(consumed);
        Some(())
    }
}

fn render_table(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<table>\n{}</table>\n", ctx.render_children(token)?))
}

fn render_table_head(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<thead>\n{}</thead>\n", ctx.render_children(token)?))
}

fn render_table_body(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<tbody>\n{}</tbody>\n", ctx.render_children(token)?))
}

fn render_table_row(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<tr>\n{}</tr>\n", ctx.render_children(token)?))
}

fn render_table_cell(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let tag = if token.attr_bool("head") { "th" } else { "td" };
    let body = ctx.render_children(token)?;
    match token.attr_str("align") {
        Some(align) => Ok(format!("<{tag} align=\"{align}\">{body}</{tag}>\n")),
        None => Ok(format!("<{tag}>{body}</{tag}>\n")),
    }
}

// Strikethrough

struct Strikethrough;

impl InlineRule for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"~"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        delimiter::push_delimiter_run(
            state,
            b'~',
            DelimMode::Matched {
                kind: "strikethrough",
                max: 2,
            },
        );
        Some(())
    }
}

fn render_strikethrough(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<del>{}</del>", ctx.render_children(token)?))
}

// Task lists

/// Runs between the block and inline phases: a list item whose paragraph
/// starts with `[ ]` or `[x]` becomes a task item, with the marker stripped
/// before the inline parser can mistake it for a link.
fn mark_task_items(tokens: &mut Vec<Token>) {
    for token in tokens.iter_mut() {
        if token.is("list") {
            for item in token.children.as_mut().into_iter().flatten() {
                mark_one_item(item);
            }
        }
        if let Some(children) = token.children.as_mut() {
            mark_task_items(children);
        }
    }
}

fn mark_one_item(item: &mut Token) {
    if !item.is("list_item") {
        return;
    }
    let Some(first) = item.children.as_mut().and_then(|children| children.first_mut()) else {
        return;
    };
    if !first.is("paragraph") {
        return;
    }
    let Some(text) = first.text.as_mut() else {
        return;
    };
    let checked = match text.get(..4) {
        Some("[ ] ") => false,
        Some("[x] ") | Some("[X] ") => true,
        _ => match text.as_str() {
            "[ ]" => false,
            "[x]" | "[X]" => true,
            _ => return,
        },
    };
    let rest = text.get(4..).unwrap_or("").trim_start().to_string();
    *text = rest;
    item.attrs.set("task", true);
    item.attrs.set("checked", checked);
}

/// Replaces the core `list_item` method to prepend the checkbox on task
/// items; plain items render exactly as before.
fn render_list_item(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let tight = token.attr_bool("tight");
    let mut out = String::from("<li>");
    if token.attr_bool("task") {
        if token.attr_bool("checked") {
            out.push_str("<input type=\"checkbox\" disabled checked /> ");
        } else {
            out.push_str("<input type=\"checkbox\" disabled /> ");
        }
    }
    for child in token.children() {
        if tight && child.is("paragraph") {
            out.push_str(&ctx.render_children(child)?);
        } else {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&ctx.render_token(child)?);
        }
    }
    out.push_str("</li>\n");
    Ok(out)
}
