//! The inline phase: a priority scan over each raw-text leaf, followed by
//! delimiter resolution and a fold of the flat token stream into a tree.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::block::Env;
use crate::scanner::char_length;
use crate::token::Token;

pub(crate) mod autolink;
pub(crate) mod code_span;
pub(crate) mod delimiter;
pub(crate) mod emphasis;
pub(crate) mod escape;
pub(crate) mod links;
pub(crate) mod raw_html;
pub(crate) mod state;

pub use state::InlineState;

/// Priorities of the built-in inline rules; lower runs earlier when two
/// rules share a trigger byte. The text fallback is built into the driver.
pub mod priority {
    pub const ESCAPE: i32 = 0;
    pub const CODE_SPAN: i32 = 10;
    pub const RAW_HTML: i32 = 20;
    pub const ENTITY: i32 = 25;
    pub const AUTOLINK: i32 = 30;
    pub const LINK: i32 = 40;
    pub const EMPHASIS: i32 = 50;
    pub const LINEBREAK: i32 = 60;
}

/// An inline rule. `try_parse` either consumes input (pushing tokens and
/// advancing `state.pos`) and returns `Some`, or leaves the state untouched
/// and returns `None`.
pub trait InlineRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// The bytes at which the driver should offer this rule a chance to run.
    fn trigger_bytes(&self) -> &'static [u8];

    fn try_parse(&self, state: &mut InlineState) -> Option<()>;
}

pub struct InlineParser {
    rules: Vec<(i32, Arc<dyn InlineRule>)>,
    special: [bool; 256],
}

impl InlineParser {
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            special: [false; 256],
        }
    }

    /// The CommonMark core rule set.
    pub fn commonmark() -> Self {
        let mut parser = Self::empty();
        parser.register(priority::ESCAPE, Arc::new(escape::Escape));
        parser.register(priority::CODE_SPAN, Arc::new(code_span::CodeSpan));
        parser.register(priority::RAW_HTML, Arc::new(raw_html::RawHtml));
        parser.register(priority::ENTITY, Arc::new(escape::Entity));
        parser.register(priority::AUTOLINK, Arc::new(autolink::Autolink));
        parser.register(priority::LINK, Arc::new(links::LinkBrackets));
        parser.register(priority::EMPHASIS, Arc::new(delimiter::EmphasisDelimiters));
        parser.register(priority::LINEBREAK, Arc::new(escape::LineBreak));
        parser
    }

    /// Register a rule at the given priority, replacing any existing rule
    /// with the same name.
    pub fn register(&mut self, priority: i32, rule: Arc<dyn InlineRule>) {
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|(_, existing)| existing.name() == rule.name())
        {
            log::debug!("replacing inline rule `{}`", rule.name());
            *existing = (priority, rule);
        } else {
            self.rules.push((priority, rule));
        }
        self.rules.sort_by_key(|(priority, _)| *priority);
        self.special = [false; 256];
        for (_, rule) in &self.rules {
            for &byte in rule.trigger_bytes() {
                self.special[byte as usize] = true;
            }
        }
    }

    /// Run the inline phase over one slice of raw text.
    pub fn parse(
        &self,
        text: &str,
        env: Rc<RefCell<Env>>,
        scan_limit: usize,
    ) -> Vec<Token> {
        let mut state = InlineState::new(text, env);
        state.scan_limit = scan_limit;

        while !state.is_eof() {
            let byte = state.src.as_bytes()[state.pos];
            let mut handled = false;
            if self.special[byte as usize] {
                for (_, rule) in &self.rules {
                    if rule.trigger_bytes().contains(&byte) && rule.try_parse(&mut state).is_some()
                    {
                        handled = true;
                        break;
                    }
                }
            }
            if !handled {
                self.consume_text(&mut state);
            }
        }

        emphasis::process_emphasis(&mut state, 0);
        fold_tree(state)
    }

    /// The text fallback: consume at least one character, then everything up
    /// to the next registered special byte.
    fn consume_text(&self, state: &mut InlineState) {
        let bytes = state.src.as_bytes();
        let start = state.pos;
        let mut end = start + char_length(bytes[start]);
        while end < bytes.len() && !self.special[bytes[end] as usize] {
            end += char_length(bytes[end]);
        }
        let text = state.src[start..end].to_string();
        append_text(&mut state.tokens, text);
        state.pos = end;
    }
}

/// Append literal text to a flat token list, merging with a trailing plain
/// text token when possible.
pub(crate) fn append_text(tokens: &mut Vec<Token>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = tokens.last_mut() {
        if last.kind == "text" {
            last.text.get_or_insert_with(String::new).push_str(&text);
            return;
        }
    }
    tokens.push(Token::text(text));
}

enum FoldOp {
    Open(Token),
    Close,
    Leaf(Token),
}

/// Fold the flat inline stream (text, leaves, delimiter runs, and paired
/// open/close markers) into a token tree.
fn fold_tree(state: InlineState) -> Vec<Token> {
    let InlineState {
        tokens, mut delims, ..
    } = state;

    let mut runs: std::collections::VecDeque<state::DelimRun> = delims.drain(..).collect();
    let mut ops: Vec<FoldOp> = Vec::with_capacity(tokens.len());

    for (index, token) in tokens.into_iter().enumerate() {
        match token.kind.as_ref() {
            "delim" => {
                let run = runs
                    .iter()
                    .position(|run| run.token == index)
                    .map(|at| runs.remove(at).unwrap());
                let Some(run) = run else {
                    // A delimiter token without a surviving run degrades to
                    // its literal text.
                    ops.push(FoldOp::Leaf(Token::text(token.text.unwrap_or_default())));
                    continue;
                };
                // Expansion order: closers (innermost first), any leftover
                // literal characters, then openers (outermost first).
                for _ in &run.closes {
                    ops.push(FoldOp::Close);
                }
                if run.len > 0 {
                    let literal = (run.ch as char).to_string().repeat(run.len);
                    ops.push(FoldOp::Leaf(Token::text(literal)));
                }
                for kind in run.opens.iter().rev() {
                    ops.push(FoldOp::Open(Token::new(*kind)));
                }
            }
            "bracket" => {
                ops.push(FoldOp::Leaf(Token::text(token.text.unwrap_or_default())));
            }
            "link_open" | "image_open" => {
                let kind = if token.kind == "link_open" {
                    "link"
                } else {
                    "image"
                };
                let mut open = Token::new(kind);
                open.attrs = token.attrs;
                ops.push(FoldOp::Open(open));
            }
            "link_close" | "image_close" => ops.push(FoldOp::Close),
            _ => ops.push(FoldOp::Leaf(token)),
        }
    }

    let mut stack: Vec<(Token, Vec<Token>)> = Vec::new();
    let mut top: Vec<Token> = Vec::new();
    for op in ops {
        match op {
            FoldOp::Open(container) => {
                stack.push((container, std::mem::take(&mut top)));
            }
            FoldOp::Close => {
                let (mut container, parent) = stack
                    .pop()
                    .expect("unbalanced close marker in inline stream");
                container.children = Some(std::mem::take(&mut top));
                top = parent;
                top.push(container);
            }
            FoldOp::Leaf(leaf) => {
                if leaf.kind == "text" {
                    append_text(&mut top, leaf.text.unwrap_or_default());
                } else {
                    top.push(leaf);
                }
            }
        }
    }
    debug_assert!(stack.is_empty(), "unbalanced open marker in inline stream");
    top
}
