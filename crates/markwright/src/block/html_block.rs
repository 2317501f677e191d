use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{BlockParser, BlockRule, BlockState};
use crate::token::Token;

/// Tag names that open a "basic" HTML block (start condition 6).
#[rustfmt::skip]
static BLOCK_TAG_NAMES: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body",
    "caption", "center", "col", "colgroup", "dd", "details", "dialog", "dir",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header",
    "hr", "html", "iframe", "legend", "li", "link", "main", "menu", "menuitem",
    "nav", "noframes", "ol", "optgroup", "option", "p", "param", "section",
    "source", "summary", "table", "tbody", "td", "tfoot", "th", "thead",
    "title", "tr", "track", "ul",
];

static RAW_TAG_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(?i:script|pre|style|textarea)([ \t>]|$)").unwrap());
static RAW_TAG_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i:</script>|</pre>|</style>|</textarea>)").unwrap());
static DECLARATION_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<![A-Za-z]").unwrap());
static BASIC_TAG_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^</?([A-Za-z][A-Za-z0-9-]*)([ \t]|/?>|$)").unwrap());
static COMPLETE_OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^<[A-Za-z][A-Za-z0-9-]*([ \t]+[A-Za-z_:][A-Za-z0-9_.:-]*([ \t]*=[ \t]*("[^"]*"|'[^']*'|[^ \t"'=<>`]+))?)*[ \t]*/?>[ \t]*$"#,
    )
    .unwrap()
});
static COMPLETE_CLOSE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^</[A-Za-z][A-Za-z0-9-]*[ \t]*>[ \t]*$").unwrap());

/// How an open HTML block is terminated.
#[derive(Clone, Copy, Debug, PartialEq)]
enum EndCondition {
    /// The block includes the line containing this marker.
    Marker(&'static str),
    RawTag,
    /// The block runs until (not including) the next blank line.
    BlankLine,
}

/// Identify which of the seven CommonMark start conditions the line meets.
/// Returns the end condition and whether the condition may interrupt an open
/// paragraph (all but condition 7 can).
fn start_condition(indent: usize, content: &str) -> Option<(EndCondition, bool)> {
    if indent > 3 || !content.starts_with('<') {
        return None;
    }
    if RAW_TAG_START.is_match(content) {
        return Some((EndCondition::RawTag, true));
    }
    if content.starts_with("<!--") {
        return Some((EndCondition::Marker("-->"), true));
    }
    if content.starts_with("<?") {
        return Some((EndCondition::Marker("?>"), true));
    }
    if content.starts_with("<![CDATA[") {
        return Some((EndCondition::Marker("]]>"), true));
    }
    if DECLARATION_START.is_match(content) {
        return Some((EndCondition::Marker(">"), true));
    }
    if let Some(captures) = BASIC_TAG_START.captures(content) {
        let name = captures.get(1).unwrap().as_str().to_ascii_lowercase();
        if BLOCK_TAG_NAMES.contains(&name.as_str()) {
            return Some((EndCondition::BlankLine, true));
        }
    }
    if COMPLETE_OPEN_TAG.is_match(content) || COMPLETE_CLOSE_TAG.is_match(content) {
        // Raw-content tags never qualify for condition 7.
        if !RAW_TAG_START.is_match(content) {
            return Some((EndCondition::BlankLine, false));
        }
    }
    None
}

fn line_meets_end(content: &str, condition: EndCondition) -> bool {
    match condition {
        EndCondition::Marker(marker) => content.contains(marker),
        EndCondition::RawTag => RAW_TAG_END.is_match(content),
        EndCondition::BlankLine => false,
    }
}

pub(crate) struct HtmlBlock;

impl BlockRule for HtmlBlock {
    fn name(&self) -> &'static str {
        "html_block"
    }

    fn matches(&self, state: &BlockState) -> bool {
        start_condition(state.current().indent, state.current_content()).is_some()
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        start_condition(state.line(index).indent, state.line_content(index))
            .is_some_and(|(_, interrupts)| interrupts)
    }

    fn parse(&self, state: &mut BlockState, _parser: &BlockParser) -> Option<()> {
        let (condition, interrupts) = start_condition(state.current().indent, state.current_content())?;
        if state.has_open_paragraph() && !interrupts {
            return None;
        }

        let mut raw = String::new();
        let mut index = state.cursor;
        while index < state.line_count() {
            if condition == EndCondition::BlankLine && state.line(index).is_blank() {
                break;
            }
            raw.push_str(state.line_text(index));
            raw.push('\n');
            index += 1;
            if line_meets_end(state.line_content(index - 1), condition) {
                break;
            }
        }

        state.append(Token::literal("block_html", raw));
        let consumed = index - state.cursor;
        state.advance(consumed);
        Some(())
    }
}
