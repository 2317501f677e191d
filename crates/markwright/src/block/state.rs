use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::scanner::{normalize_label, scan_lines, Line};
use crate::token::Token;

/// A resolved link reference definition.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkDef {
    pub url: String,
    pub title: Option<String>,
}

/// Document-scoped state shared between the block phase, the inline phase,
/// and post-parse passes. Core concerns get typed fields; plugins that need
/// to accumulate their own data use the `extra` side table.
#[derive(Debug, Default)]
pub struct Env {
    /// Reference map: normalized label to destination. First definition wins.
    pub defs: FxHashMap<String, LinkDef>,
    /// Footnote definitions collected during the block phase, keyed by
    /// normalized label. Content is raw source, block-parsed on demand when
    /// the trailing footnotes section is built.
    pub footnote_defs: FxHashMap<String, String>,
    /// Abbreviation definitions: literal form to expansion.
    pub abbrs: FxHashMap<String, String>,
    pub extra: FxHashMap<String, serde_json::Value>,
}

impl Env {
    /// Insert a link reference definition unless the label already has one.
    pub fn add_def(&mut self, label: &str, url: String, title: Option<String>) {
        let key = normalize_label(label);
        if key.is_empty() {
            return;
        }
        self.defs.entry(key).or_insert(LinkDef { url, title });
    }

    pub fn get_def(&self, label: &str) -> Option<&LinkDef> {
        self.defs.get(&normalize_label(label))
    }
}

/// Mutable state for one block-parsing pass over one (sub-)source.
///
/// A container rule builds the prefix-stripped content of its container and
/// hands it to [`BlockState::child_state`]; the child sees a fresh cursor and
/// token list but shares the document [`Env`].
pub struct BlockState {
    pub(crate) src: String,
    pub(crate) lines: Vec<Line>,
    pub(crate) cursor: usize,
    pub(crate) tokens: Vec<Token>,
    paragraph: Vec<String>,
    pub env: Rc<RefCell<Env>>,
    pub(crate) depth: usize,
    pub(crate) nesting_limit: usize,
}

impl BlockState {
    pub fn new(src: impl Into<String>, env: Rc<RefCell<Env>>) -> Self {
        let src = src.into();
        let lines = scan_lines(&src);
        Self {
            src,
            lines,
            cursor: 0,
            tokens: Vec::new(),
            paragraph: Vec::new(),
            env,
            depth: 0,
            nesting_limit: 64,
        }
    }

    /// A state for parsing container content, sharing the document env.
    pub fn child_state(&self, src: impl Into<String>) -> Self {
        let mut child = BlockState::new(src, Rc::clone(&self.env));
        child.depth = self.depth + 1;
        child.nesting_limit = self.nesting_limit;
        child
    }

    pub fn is_eof(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn line(&self, index: usize) -> &Line {
        &self.lines[index]
    }

    /// Full text of the line at `index`, including indentation.
    pub fn line_text(&self, index: usize) -> &str {
        let line = &self.lines[index];
        &self.src[line.start..line.end]
    }

    /// Text of the line at `index` with the leading whitespace removed.
    pub fn line_content(&self, index: usize) -> &str {
        let line = &self.lines[index];
        &self.src[line.content_start..line.end]
    }

    /// Expanded indentation width of the line at `index`.
    pub fn line_indent(&self, index: usize) -> usize {
        self.lines[index].indent
    }

    pub fn line_is_blank(&self, index: usize) -> bool {
        self.lines[index].is_blank()
    }

    pub(crate) fn current(&self) -> &Line {
        self.line(self.cursor)
    }

    pub fn current_text(&self) -> &str {
        self.line_text(self.cursor)
    }

    pub fn current_content(&self) -> &str {
        self.line_content(self.cursor)
    }

    pub fn current_indent(&self) -> usize {
        self.current().indent
    }

    pub fn advance(&mut self, lines: usize) {
        self.cursor += lines;
    }

    /// Append a finished block token, closing any open paragraph first.
    pub fn append(&mut self, token: Token) {
        self.close_paragraph();
        self.tokens.push(token);
    }

    pub fn has_open_paragraph(&self) -> bool {
        !self.paragraph.is_empty()
    }

    /// Accumulate one line of paragraph content. Leading whitespace is
    /// stripped; trailing whitespace is kept so the hard-break rule can see
    /// it during the inline phase.
    pub(crate) fn add_paragraph_line(&mut self, line: &str) {
        self.paragraph.push(line.trim_start().to_string());
    }

    /// Take the accumulated paragraph text without emitting a token. Used by
    /// the setext rule to promote a paragraph into a heading.
    pub(crate) fn take_paragraph(&mut self) -> Option<String> {
        if self.paragraph.is_empty() {
            return None;
        }
        let mut text = self.paragraph.join("\n");
        self.paragraph.clear();
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
        Some(text)
    }

    /// Flush the open paragraph, if any, into a raw-leaf `paragraph` token.
    pub fn close_paragraph(&mut self) {
        if let Some(text) = self.take_paragraph() {
            self.tokens.push(Token::raw_leaf("paragraph", text));
        }
    }

    pub fn add_def(&mut self, label: &str, url: String, title: Option<String>) {
        self.env.borrow_mut().add_def(label, url, title);
    }

    pub fn into_tokens(mut self) -> Vec<Token> {
        self.close_paragraph();
        self.tokens
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn state(src: &str) -> BlockState {
        BlockState::new(src, Rc::new(RefCell::new(Env::default())))
    }

    #[test]
    fn paragraph_lines_coalesce() {
        let mut s = state("");
        s.add_paragraph_line("  one");
        s.add_paragraph_line("two  ");
        s.close_paragraph();
        assert_eq!(s.tokens.len(), 1);
        assert_eq!(s.tokens[0].text.as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn append_closes_open_paragraph() {
        let mut s = state("");
        s.add_paragraph_line("text");
        s.append(Token::new("thematic_break"));
        assert_eq!(s.tokens[0].kind, "paragraph");
        assert_eq!(s.tokens[1].kind, "thematic_break");
    }

    #[test]
    fn first_definition_wins() {
        let mut env = Env::default();
        env.add_def("Foo", "/a".into(), None);
        env.add_def("  FOO ", "/b".into(), None);
        assert_eq!(env.get_def("foo").unwrap().url, "/a");
    }

    #[test]
    fn child_state_shares_env() {
        let s = state("parent");
        s.env.borrow_mut().add_def("x", "/x".into(), None);
        let child = s.child_state("child");
        assert!(child.env.borrow().get_def("X").is_some());
        assert_eq!(child.depth, 1);
    }
}
