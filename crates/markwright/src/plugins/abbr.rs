//! Abbreviations: `*[HTML]: HyperText Markup Language` definitions, with
//! occurrences in running text wrapped in `<abbr>` by a post-parse pass.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{BlockParser, BlockRule, BlockState};
use crate::error::Error;
use crate::escape::escape_html;
use crate::markdown::Markdown;
use crate::render::HtmlContext;
use crate::token::Token;

const ABBR_DEF_PRIORITY: i32 = 58;

pub fn abbr(md: &mut Markdown) {
    md.block_rule(ABBR_DEF_PRIORITY, Arc::new(AbbrDef));
    md.after_parse("abbr", Box::new(|_, tokens, env| {
        let env = env.borrow();
        if env.abbrs.is_empty() {
            return;
        }
        // Longest keys first so overlapping abbreviations prefer the most
        // specific expansion.
        let mut keys: Vec<&String> = env.abbrs.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        expand_in_tokens(tokens, &keys, &env);
    }));
    md.render_method("abbr", Box::new(render_abbr));
}

static DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\[([^\]]+)\]:[ \t]*(.*)$").unwrap());

struct AbbrDef;

impl BlockRule for AbbrDef {
    fn name(&self) -> &'static str {
        "abbr_def"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current().indent <= 3 && state.current_content().starts_with("*[")
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        let captures = DEF.captures(state.current_content())?;
        let key = captures[1].trim().to_string();
        let expansion = captures[2].trim().to_string();
        if key.is_empty() {
            return None;
        }
        state
            .env
            .borrow_mut()
            .abbrs
            .entry(key)
            .or_insert(expansion);
        state.advance(1);
        Some(())
    }
}

fn is_word_boundary(ch: Option<char>) -> bool {
    ch.map_or(true, |ch| !ch.is_alphanumeric())
}

fn expand_in_tokens(tokens: &mut Vec<Token>, keys: &[&String], env: &crate::block::Env) {
    let mut index = 0;
    while index < tokens.len() {
        if let Some(children) = tokens[index].children.as_mut() {
            expand_in_tokens(children, keys, env);
            index += 1;
            continue;
        }
        if !tokens[index].is("text") {
            index += 1;
            continue;
        }
        let text = tokens[index].text.clone().unwrap_or_default();
        let pieces = split_text(&text, keys, env);
        match pieces {
            None => index += 1,
            Some(pieces) => {
                let count = pieces.len();
                tokens.splice(index..index + 1, pieces);
                index += count;
            }
        }
    }
}

/// Split a text run around abbreviation occurrences. Returns `None` when no
/// occurrence was found, leaving the original token in place.
fn split_text(text: &str, keys: &[&String], env: &crate::block::Env) -> Option<Vec<Token>> {
    let mut out: Vec<Token> = Vec::new();
    let mut cursor = 0;
    let mut found = false;

    while cursor < text.len() {
        // The earliest occurrence of any key wins; ties go to the longest
        // key because of the sort order.
        let best = keys
            .iter()
            .filter_map(|key| find_word(&text[cursor..], key).map(|at| (at, *key)))
            .min_by_key(|(at, _)| *at);
        let Some((relative, key)) = best else {
            out.push(Token::text(&text[cursor..]));
            break;
        };
        let at = cursor + relative;
        if at > cursor {
            out.push(Token::text(&text[cursor..at]));
        }
        let title = env.abbrs.get(key).cloned().unwrap_or_default();
        let mut token = Token::new("abbr");
        token.text = Some(key.clone());
        token.attrs.set("title", title);
        out.push(token);
        cursor = at + key.len();
        found = true;
    }

    found.then_some(out)
}

/// Earliest whole-word occurrence of `key` in `text`.
fn find_word(text: &str, key: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(relative) = text[from..].find(key) {
        let at = from + relative;
        let before = text[..at].chars().next_back();
        let after = text[at + key.len()..].chars().next();
        if is_word_boundary(before) && is_word_boundary(after) {
            return Some(at);
        }
        from = at + key.len();
    }
    None
}

fn render_abbr(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let title = token.attr_str("title").unwrap_or("");
    let text = escape_html(token.text.as_deref().unwrap_or(""));
    if title.is_empty() {
        return Ok(format!("<abbr>{text}</abbr>"));
    }
    Ok(format!("<abbr title=\"{}\">{text}</abbr>", escape_html(title)))
}
