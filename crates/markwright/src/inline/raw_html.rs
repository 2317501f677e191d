use once_cell::sync::Lazy;
use regex::Regex;

use crate::inline::state::InlineState;
use crate::inline::InlineRule;
use crate::token::Token;

// The inline HTML forms from the CommonMark grammar. Attribute whitespace
// may include newlines, so these run over the whole remaining slice.
static OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^<[A-Za-z][A-Za-z0-9-]*(\s+[A-Za-z_:][A-Za-z0-9_.:-]*(\s*=\s*("[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*\s*/?>"#,
    )
    .unwrap()
});
static CLOSE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^</[A-Za-z][A-Za-z0-9-]*\s*>").unwrap());
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<!--([^-]|-[^-])*-->").unwrap());
static PROCESSING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^<\?.*?\?>").unwrap());
static DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^<![A-Za-z][^>]*>").unwrap());
static CDATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^<!\[CDATA\[.*?\]\]>").unwrap());

pub(crate) struct RawHtml;

impl InlineRule for RawHtml {
    fn name(&self) -> &'static str {
        "raw_html"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"<"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        let rest = state.rest();
        let found = OPEN_TAG
            .find(rest)
            .or_else(|| CLOSE_TAG.find(rest))
            .or_else(|| COMMENT.find(rest))
            .or_else(|| PROCESSING.find(rest))
            .or_else(|| DECLARATION.find(rest))
            .or_else(|| CDATA.find(rest))?;
        let text = found.as_str().to_string();
        let end = found.end();
        state.push(Token::literal("inline_html", text));
        state.pos += end;
        Some(())
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use test_case::test_case;

    use crate::block::Env;
    use crate::inline::InlineParser;
    use crate::token::Token;

    fn parse(src: &str) -> Vec<Token> {
        InlineParser::commonmark().parse(src, Rc::new(RefCell::new(Env::default())), 10_000)
    }

    #[test_case("<a href=\"x\">"; "open tag with attribute")]
    #[test_case("</span>"; "close tag")]
    #[test_case("<!-- comment -->"; "comment")]
    #[test_case("<?php ?>"; "processing instruction")]
    #[test_case("<!DOCTYPE html>"; "declaration")]
    #[test_case("<![CDATA[>&<]]>"; "cdata")]
    fn recognized(src: &str) {
        let tokens = parse(src);
        assert_eq!(tokens[0].kind, "inline_html");
        assert_eq!(tokens[0].raw.as_deref(), Some(src));
    }

    #[test_case("<33>"; "numeric tag name")]
    #[test_case("<a h*#ref=\"b\">"; "bad attribute name")]
    #[test_case("<!-- not -- valid -->"; "double hyphen in comment")]
    fn not_recognized(src: &str) {
        let tokens = parse(src);
        assert_eq!(tokens[0].kind, "text");
    }
}
