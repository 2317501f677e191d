//! The block phase: a prioritized list of rules driven over the line table,
//! producing the outer token tree with raw-text leaves for the inline phase.

use std::sync::Arc;

use crate::token::Token;

pub(crate) mod code;
pub(crate) mod heading;
pub(crate) mod html_block;
pub(crate) mod link_def;
pub(crate) mod list;
pub(crate) mod quote;
pub(crate) mod state;
pub(crate) mod thematic_break;

pub use state::{BlockState, Env, LinkDef};

/// Priorities of the built-in rules. Lower runs earlier. The gaps leave room
/// for extensions to slot in between built-ins; the relative order of the
/// core rules is load-bearing (setext before thematic break so `---` closes
/// an open paragraph as a heading, thematic break before list so `- - -`
/// never becomes a list, and so on). The paragraph fallback is built into
/// the driver and always runs last.
pub mod priority {
    pub const FENCED_CODE: i32 = 0;
    pub const ATX_HEADING: i32 = 10;
    pub const SETEXT_HEADING: i32 = 20;
    pub const THEMATIC_BREAK: i32 = 30;
    pub const INDENTED_CODE: i32 = 40;
    pub const HTML_BLOCK: i32 = 50;
    pub const LINK_DEF: i32 = 60;
    pub const BLOCK_QUOTE: i32 = 70;
    pub const LIST: i32 = 80;
    pub const TABLE: i32 = 90;
    pub const DIRECTIVE: i32 = 100;
}

/// A block-level rule. `matches` is a cheap shape test against the current
/// line; `parse` does the full work, emitting tokens and advancing the
/// cursor. `parse` may still bail with `None` after a closer look, in which
/// case the driver moves on to the next rule as if `matches` had failed.
pub trait BlockRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, state: &BlockState) -> bool;

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()>;

    /// Whether this rule may start at the line `index` while a paragraph is
    /// open. Also consulted for lazy-continuation decisions inside block
    /// quotes and list items.
    fn interrupts(&self, _state: &BlockState, _index: usize) -> bool {
        false
    }
}

/// The block-phase driver: an ordered rule list plus the paragraph fallback.
pub struct BlockParser {
    rules: Vec<(i32, Arc<dyn BlockRule>)>,
}

impl BlockParser {
    /// A parser with no rules at all; every line becomes paragraph content.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The CommonMark core rule set.
    pub fn commonmark() -> Self {
        let mut parser = Self::empty();
        parser.register(priority::FENCED_CODE, Arc::new(code::FencedCode));
        parser.register(priority::ATX_HEADING, Arc::new(heading::AtxHeading));
        parser.register(priority::SETEXT_HEADING, Arc::new(heading::SetextHeading));
        parser.register(
            priority::THEMATIC_BREAK,
            Arc::new(thematic_break::ThematicBreak),
        );
        parser.register(priority::INDENTED_CODE, Arc::new(code::IndentedCode));
        parser.register(priority::HTML_BLOCK, Arc::new(html_block::HtmlBlock));
        parser.register(priority::LINK_DEF, Arc::new(link_def::LinkRefDef));
        parser.register(priority::BLOCK_QUOTE, Arc::new(quote::BlockQuote));
        parser.register(priority::LIST, Arc::new(list::List));
        parser
    }

    /// Register a rule at the given priority. Registration is idempotent by
    /// rule name: re-registering replaces the existing rule in place.
    pub fn register(&mut self, priority: i32, rule: Arc<dyn BlockRule>) {
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|(_, existing)| existing.name() == rule.name())
        {
            log::debug!("replacing block rule `{}`", rule.name());
            *existing = (priority, rule);
        } else {
            self.rules.push((priority, rule));
        }
        self.rules.sort_by_key(|(priority, _)| *priority);
    }

    /// Drive the rule list over the state until the source is exhausted.
    pub fn process(&self, state: &mut BlockState) {
        while !state.is_eof() {
            if state.current().is_blank() {
                state.close_paragraph();
                state.advance(1);
                continue;
            }

            let in_paragraph = state.has_open_paragraph();
            let mut handled = false;
            for (_, rule) in &self.rules {
                if in_paragraph && !rule.interrupts(state, state.cursor) {
                    continue;
                }
                if rule.matches(state) && rule.parse(state, self).is_some() {
                    handled = true;
                    break;
                }
            }

            if !handled {
                let text = state.current_text().to_string();
                state.add_paragraph_line(&text);
                state.advance(1);
            }
        }
        state.close_paragraph();
    }

    /// Parse a prefix-stripped sub-source into tokens, sharing the given
    /// state's env. Containers stop recursing past the nesting limit and
    /// leave their content as a plain paragraph instead.
    pub fn parse_container(&self, parent: &BlockState, src: String) -> Vec<Token> {
        let mut child = parent.child_state(src);
        if child.depth > child.nesting_limit {
            let text = child.src.trim().to_string();
            if text.is_empty() {
                return Vec::new();
            }
            return vec![Token::raw_leaf("paragraph", text)];
        }
        self.process(&mut child);
        child.into_tokens()
    }

    /// True if the line at `index` could begin a block that is allowed to
    /// interrupt a paragraph. This is the test behind lazy continuation: a
    /// line that cannot interrupt is swallowed by the open paragraph.
    pub(crate) fn line_interrupts_paragraph(&self, state: &BlockState, index: usize) -> bool {
        self.rules
            .iter()
            .any(|(_, rule)| rule.interrupts(state, index))
    }
}

/// Tracks just enough of a container's interior to answer "is a paragraph
/// open at the end of the collected content?", which is what decides whether
/// a markerless line may continue the container lazily.
pub(crate) struct InteriorScan {
    fence: Option<(u8, usize)>,
    pub(crate) paragraph_open: bool,
}

impl InteriorScan {
    pub(crate) fn new() -> Self {
        Self {
            fence: None,
            paragraph_open: false,
        }
    }

    pub(crate) fn feed(&mut self, stripped: &str) {
        let (indent, offset) = crate::scanner::measure_indent(stripped);
        let content = &stripped[offset..];

        if let Some((marker, length)) = self.fence {
            let run = content.bytes().take_while(|&b| b == marker).count();
            if indent <= 3
                && run >= length
                && content.as_bytes()[run..]
                    .iter()
                    .all(|b| matches!(b, b' ' | b'\t'))
            {
                self.fence = None;
            }
            self.paragraph_open = false;
            return;
        }

        if content.is_empty() {
            self.paragraph_open = false;
            return;
        }
        if let Some(open) = code::fence_open(indent, content) {
            self.fence = Some(open);
            self.paragraph_open = false;
            return;
        }
        if heading::is_atx_heading(indent, content)
            || thematic_break::is_thematic_break(indent, content)
        {
            self.paragraph_open = false;
            return;
        }
        self.paragraph_open = true;
    }
}
