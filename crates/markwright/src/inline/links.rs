//! Links and images: bracket markers emitted during the scan, resolved when
//! the closing `]` arrives. Also home to the destination/title/label
//! scanners shared with the link-reference-definition block rule.

use crate::inline::emphasis::process_emphasis;
use crate::inline::state::{Bracket, InlineState};
use crate::inline::{append_text, InlineRule};
use crate::scanner::unescape_all;
use crate::token::Token;

/// Scan a link label (`[...]`) at the start of `text`: no unescaped square
/// brackets inside, at most 999 characters of content. Returns the content
/// and the total length consumed including both brackets.
pub(crate) fn scan_label(text: &str) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let mut index = 1;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 2,
            b'[' => return None,
            b']' => {
                let content = &text[1..index.min(text.len())];
                if content.chars().count() > 999 {
                    return None;
                }
                return Some((content, index + 1));
            }
            _ => index += 1,
        }
    }
    None
}

/// Scan a link destination: either `<...>` (no newlines, no unescaped `<`)
/// or a bare run of non-whitespace, non-control characters with balanced
/// parentheses. Returns the raw destination text (still escaped) and the
/// length consumed.
pub(crate) fn scan_destination(text: &str) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    match bytes.first()? {
        b'<' => {
            let mut index = 1;
            while index < bytes.len() {
                match bytes[index] {
                    b'\\' => index += 2,
                    b'<' | b'\n' => return None,
                    b'>' => return Some((&text[1..index], index + 1)),
                    _ => index += 1,
                }
            }
            None
        }
        _ => {
            let mut index = 0;
            let mut balance = 0usize;
            while index < bytes.len() {
                match bytes[index] {
                    b'\\' => index += 2,
                    byte if byte <= b' ' => break,
                    b'(' => {
                        balance += 1;
                        index += 1;
                    }
                    b')' => {
                        if balance == 0 {
                            break;
                        }
                        balance -= 1;
                        index += 1;
                    }
                    _ => index += 1,
                }
            }
            let index = index.min(bytes.len());
            if index == 0 || balance != 0 {
                return None;
            }
            Some((&text[..index], index))
        }
    }
}

/// Scan a link title delimited by `"`, `'`, or parentheses. Returns the
/// unescaped title content and the length consumed. Titles may span lines
/// but may not contain a blank line.
pub(crate) fn scan_title(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let (close, forbid_open) = match bytes.first()? {
        b'"' => (b'"', None),
        b'\'' => (b'\'', None),
        b'(' => (b')', Some(b'(')),
        _ => return None,
    };
    let mut index = 1;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 2,
            byte if byte == close => {
                let inner = &text[1..index.min(text.len())];
                if inner.lines().any(|line| line.trim().is_empty()) && inner.contains('\n') {
                    return None;
                }
                return Some((unescape_all(inner), index + 1));
            }
            byte if Some(byte) == forbid_open => return None,
            _ => index += 1,
        }
    }
    None
}

fn skip_resource_whitespace(text: &str) -> usize {
    text.bytes()
        .take_while(|byte| matches!(byte, b' ' | b'\t' | b'\n'))
        .count()
}

/// Scan an inline resource `(dest "title")` after a closing bracket.
fn scan_inline_resource(text: &str) -> Option<(String, Option<String>, usize)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'(') {
        return None;
    }
    let mut pos = 1 + skip_resource_whitespace(&text[1..]);
    if bytes.get(pos) == Some(&b')') {
        return Some((String::new(), None, pos + 1));
    }

    let (dest, dest_len) = scan_destination(&text[pos..])?;
    pos += dest_len;
    let url = unescape_all(dest);

    let spaces = skip_resource_whitespace(&text[pos..]);
    pos += spaces;
    if bytes.get(pos) == Some(&b')') {
        return Some((url, None, pos + 1));
    }
    if spaces == 0 {
        return None;
    }
    let (title, title_len) = scan_title(&text[pos..])?;
    pos += title_len;
    pos += skip_resource_whitespace(&text[pos..]);
    if bytes.get(pos) != Some(&b')') {
        return None;
    }
    Some((url, Some(title), pos + 1))
}

pub(crate) struct LinkBrackets;

impl InlineRule for LinkBrackets {
    fn name(&self) -> &'static str {
        "link"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"[]!"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        match state.byte(0)? {
            b'[' => {
                open_bracket(state, false);
                Some(())
            }
            b'!' => {
                if state.byte(1) != Some(b'[') {
                    return None;
                }
                open_bracket(state, true);
                Some(())
            }
            b']' => {
                close_bracket(state);
                Some(())
            }
            _ => None,
        }
    }
}

fn open_bracket(state: &mut InlineState, is_image: bool) {
    let marker = if is_image { "![" } else { "[" };
    let mut token = Token::new("bracket");
    token.text = Some(marker.to_string());
    let index = state.push(token);
    state.brackets.push(Bracket {
        token: index,
        content_start: state.pos + marker.len(),
        is_image,
        active: true,
        delim_floor: state.delims.len(),
    });
    state.pos += marker.len();
}

fn close_bracket(state: &mut InlineState) {
    let Some(entry) = state.brackets.pop() else {
        append_text(&mut state.tokens, "]".to_string());
        state.pos += 1;
        return;
    };
    if !entry.active {
        append_text(&mut state.tokens, "]".to_string());
        state.pos += 1;
        return;
    }

    let closer_pos = state.pos;
    let after = &state.src[closer_pos + 1..];

    // An inline `(...)` resource wins; otherwise a following `[label]` or
    // `[]` picks the reference label, and failing that the bracketed content
    // itself is tried as a shortcut label.
    let mut resolved: Option<(String, Option<String>, usize)> = scan_inline_resource(after);

    if resolved.is_none() {
        let content_label = &state.src[entry.content_start..closer_pos];
        if let Some((label, consumed)) = scan_label(after) {
            let label = if label.trim().is_empty() {
                content_label
            } else {
                label
            };
            resolved = lookup(state, label).map(|(url, title)| (url, title, consumed));
        } else {
            resolved = lookup(state, content_label).map(|(url, title)| (url, title, 0));
        }
    }

    let Some((url, title, extra)) = resolved else {
        append_text(&mut state.tokens, "]".to_string());
        state.pos += 1;
        return;
    };

    // Links may not nest: a completed link (including an autolink) anywhere
    // in the bracketed content keeps the outer brackets literal.
    if !entry.is_image {
        let contains_link = state.tokens[entry.token + 1..]
            .iter()
            .any(|token| token.kind == "link" || token.kind == "link_open");
        if contains_link {
            append_text(&mut state.tokens, "]".to_string());
            state.pos += 1;
            return;
        }
    }

    // Resolve emphasis inside the link content, then retire those
    // delimiters; nothing outside may pair into the content anymore.
    process_emphasis(state, entry.delim_floor);
    for run in &mut state.delims[entry.delim_floor..] {
        run.active = false;
    }

    let open = &mut state.tokens[entry.token];
    open.kind = if entry.is_image {
        "image_open".into()
    } else {
        "link_open".into()
    };
    open.text = None;
    open.attrs.set("url", url);
    if let Some(title) = title {
        open.attrs.set("title", title);
    }
    state.push(Token::new(if entry.is_image {
        "image_close"
    } else {
        "link_close"
    }));

    if !entry.is_image {
        // No nested links: every older link opener is dead now.
        for bracket in &mut state.brackets {
            if !bracket.is_image {
                bracket.active = false;
            }
        }
    }

    state.pos = closer_pos + 1 + extra;
}

fn lookup(state: &InlineState, label: &str) -> Option<(String, Option<String>)> {
    if label.trim().is_empty() {
        return None;
    }
    let env = state.env.borrow();
    let def = env.get_def(label)?;
    Some((def.url.clone(), def.title.clone()))
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::block::Env;
    use crate::inline::InlineParser;
    use crate::token::Token;

    fn parse_with(src: &str, setup: impl FnOnce(&mut Env)) -> Vec<Token> {
        let env = Rc::new(RefCell::new(Env::default()));
        setup(&mut env.borrow_mut());
        InlineParser::commonmark().parse(src, env, 10_000)
    }

    fn parse(src: &str) -> Vec<Token> {
        parse_with(src, |_| {})
    }

    #[test]
    fn inline_link() {
        let tokens = parse("[text](/url \"title\")");
        assert_eq!(tokens.len(), 1);
        let link = &tokens[0];
        assert_eq!(link.kind, "link");
        assert_eq!(link.attr_str("url"), Some("/url"));
        assert_eq!(link.attr_str("title"), Some("title"));
        assert_eq!(link.children()[0].text.as_deref(), Some("text"));
    }

    #[test]
    fn image() {
        let tokens = parse("![alt](/img.png)");
        assert_eq!(tokens[0].kind, "image");
        assert_eq!(tokens[0].attr_str("url"), Some("/img.png"));
    }

    #[test]
    fn unresolved_brackets_degrade_to_text() {
        let tokens = parse("[not a link]");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text.as_deref(), Some("[not a link]"));
    }

    #[test]
    fn full_reference() {
        let tokens = parse_with("[foo][bar]", |env| {
            env.add_def("bar", "/url".into(), Some("t".into()));
        });
        assert_eq!(tokens[0].kind, "link");
        assert_eq!(tokens[0].attr_str("url"), Some("/url"));
        assert_eq!(tokens[0].children()[0].text.as_deref(), Some("foo"));
    }

    #[test]
    fn collapsed_and_shortcut_references() {
        let tokens = parse_with("[foo][] and [foo]", |env| {
            env.add_def("foo", "/url".into(), None);
        });
        assert_eq!(tokens[0].kind, "link");
        assert_eq!(tokens[2].kind, "link");
    }

    #[test]
    fn undefined_full_reference_is_literal() {
        let tokens = parse_with("[foo][bar]", |env| {
            env.add_def("foo", "/url".into(), None);
        });
        assert_eq!(tokens[0].kind, "text");
    }

    #[test]
    fn emphasis_resolves_inside_links() {
        let tokens = parse("[*em*](/u)");
        let link = &tokens[0];
        assert_eq!(link.children()[0].kind, "emphasis");
    }

    #[test]
    fn no_nested_links() {
        let tokens = parse_with("[outer [inner](/a) rest](/b)", |_| {});
        // The inner link resolves; the outer brackets stay literal.
        let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_ref()).collect();
        assert!(kinds.contains(&"link"));
        assert_eq!(tokens.iter().filter(|t| t.kind == "link").count(), 1);
        assert_eq!(tokens[0].text.as_deref(), Some("[outer "));
    }

    #[test]
    fn autolink_inside_brackets_blocks_outer_link() {
        let tokens = parse("[a <http://x.com> b](/u)");
        assert_eq!(tokens.iter().filter(|t| t.kind == "link").count(), 1);
        assert_eq!(tokens[0].text.as_deref(), Some("[a "));
    }

    #[test]
    fn images_may_contain_links() {
        let tokens = parse("![alt [text](/a)](/img)");
        assert_eq!(tokens[0].kind, "image");
        assert_eq!(
            tokens[0]
                .children()
                .iter()
                .filter(|t| t.kind == "link")
                .count(),
            1
        );
    }

    #[test]
    fn emphasis_wraps_a_whole_link() {
        let tokens = parse("*before [text](/u) after*");
        assert_eq!(tokens[0].kind, "emphasis");
        let inner: Vec<&str> = tokens[0].children().iter().map(|t| t.kind.as_ref()).collect();
        assert_eq!(inner, vec!["text", "link", "text"]);
    }

    #[test]
    fn balanced_parens_in_bare_destination() {
        let tokens = parse("[a](/url(x))");
        assert_eq!(tokens[0].attr_str("url"), Some("/url(x)"));
    }

    #[test]
    fn angle_destination_allows_spaces() {
        let tokens = parse("[a](</my url>)");
        assert_eq!(tokens[0].attr_str("url"), Some("/my url"));
    }
}
