//! Autolink literals: bare `http(s)://` and `www.` URLs and bare email
//! addresses, per the GFM extended-autolink rules.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::inline::state::InlineState;
use crate::inline::InlineRule;
use crate::markdown::Markdown;
use crate::token::Token;

const LINKIFY_PRIORITY: i32 = 65;

pub fn linkify(md: &mut Markdown) {
    md.inline_rule(LINKIFY_PRIORITY, Arc::new(Linkify));
}

static URL_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://|www\.)[^\s<]+").unwrap());
static EMAIL_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)+").unwrap());

/// Trim trailing punctuation that GFM excludes from an autolink, plus any
/// unbalanced closing parentheses.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let trimmed = url.trim_end_matches(['?', '!', '.', ',', ':', '*', '_', '~', ';', '\'', '"']);
        let balanced = {
            let opens = trimmed.matches('(').count();
            let closes = trimmed.matches(')').count();
            if closes > opens && trimmed.ends_with(')') {
                &trimmed[..trimmed.len() - 1]
            } else {
                trimmed
            }
        };
        if balanced.len() == url.len() {
            return balanced;
        }
        url = balanced;
    }
}

fn boundary_ok(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(ch) => ch.is_whitespace() || matches!(ch, '*' | '_' | '~' | '(' | '>'),
    }
}

struct Linkify;

impl InlineRule for Linkify {
    fn name(&self) -> &'static str {
        "linkify"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"wWhH@"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        if state.byte(0) == Some(b'@') {
            return parse_email(state);
        }
        if !boundary_ok(state.prev_char()) {
            return None;
        }
        let found = URL_START.find(state.rest())?;
        let text = trim_url(found.as_str()).to_string();
        if text.is_empty() {
            return None;
        }
        let url = if text.starts_with("www.") {
            format!("http://{text}")
        } else {
            text.clone()
        };
        let len = text.len();
        let token =
            Token::container("link", vec![Token::text(text)]).with_attr("url", url);
        state.push(token);
        state.pos += len;
        Some(())
    }
}

/// Emails are spotted at the `@`: the local part has already been consumed
/// into the preceding text token, so it is carved back out of it.
fn parse_email(state: &mut InlineState) -> Option<()> {
    let domain_len = {
        let found = EMAIL_DOMAIN.find(state.rest())?;
        let matched = found.as_str();
        // The final label may not end with `-` or `_`.
        if matched.ends_with(['-', '_']) {
            return None;
        }
        found.end()
    };

    let local = {
        let last = state.tokens.last()?;
        if last.kind != "text" {
            return None;
        }
        let text = last.text.as_deref()?;
        let start = text
            .rfind(|ch: char| !ch.is_ascii_alphanumeric() && !matches!(ch, '.' | '_' | '+' | '-'))
            .map(|at| at + 1)
            .unwrap_or(0);
        if start >= text.len() {
            return None;
        }
        text[start..].to_string()
    };

    let last = state.tokens.last_mut()?;
    let text = last.text.as_mut()?;
    text.truncate(text.len() - local.len());

    let address = format!("{local}{}", &state.rest()[..domain_len]);
    let token = Token::container("link", vec![Token::text(address.clone())])
        .with_attr("url", format!("mailto:{address}"));
    state.push(token);
    state.pos += domain_len;
    Some(())
}
