//! The pipeline orchestrator: block phase, inline expansion, post-passes,
//! and rendering, behind one `parse`/`render`/`convert` surface.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use crate::block::{BlockParser, BlockRule, BlockState, Env};
use crate::error::Error;
use crate::inline::{InlineParser, InlineRule};
use crate::plugin::{EnvInit, Plugin, PostPass};
use crate::render::{ast_value, HtmlRenderFn, HtmlRenderer};
use crate::token::Token;

/// Pipeline options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Escape raw HTML instead of passing it through.
    pub escape: bool,
    /// Render soft line breaks as `<br />`.
    pub hard_wrap: bool,
    /// Keep `javascript:` and friends in destinations instead of replacing
    /// them with a placeholder.
    pub allow_harmful_protocols: bool,
    /// Base directory for the include directive's resolver.
    pub base_dir: Option<PathBuf>,
    /// Maximum container nesting depth before content degrades to text.
    pub nesting_limit: usize,
    /// Backstop for delimiter-resolution work on pathological input.
    pub delimiter_scan_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            escape: true,
            hard_wrap: false,
            allow_harmful_protocols: false,
            base_dir: None,
            nesting_limit: 64,
            delimiter_scan_limit: 10_000,
        }
    }
}

/// The output mode of [`Markdown::render`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Renderer {
    #[default]
    Html,
    Ast,
}

/// Parse-call state returned alongside the token tree. The env behind it is
/// fully built once `parse` returns and is only read during rendering.
pub struct ParseState {
    pub env: Rc<RefCell<Env>>,
}

pub struct Markdown {
    block: BlockParser,
    inline: InlineParser,
    html: HtmlRenderer,
    renderer: Renderer,
    env_inits: Vec<(String, EnvInit)>,
    after_block: Vec<(String, PostPass)>,
    after_parse: Vec<(String, PostPass)>,
    pub options: Options,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Markdown {
    /// A CommonMark pipeline with the HTML renderer and default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            block: BlockParser::commonmark(),
            inline: InlineParser::commonmark(),
            html: HtmlRenderer::commonmark(),
            renderer: Renderer::Html,
            env_inits: Vec::new(),
            after_block: Vec::new(),
            after_parse: Vec::new(),
            options,
        }
    }

    pub fn use_plugin(&mut self, plugin: impl Plugin) -> &mut Self {
        plugin.install(self);
        self
    }

    pub fn set_renderer(&mut self, renderer: Renderer) -> &mut Self {
        self.renderer = renderer;
        self
    }

    // Registration surface used by plugins. All of these are idempotent by
    // name: registering under an existing name replaces the previous entry.

    pub fn block_rule(&mut self, priority: i32, rule: Arc<dyn BlockRule>) -> &mut Self {
        self.block.register(priority, rule);
        self
    }

    pub fn inline_rule(&mut self, priority: i32, rule: Arc<dyn InlineRule>) -> &mut Self {
        self.inline.register(priority, rule);
        self
    }

    pub fn render_method(
        &mut self,
        kind: impl Into<std::borrow::Cow<'static, str>>,
        method: HtmlRenderFn,
    ) -> &mut Self {
        self.html.register(kind, method);
        self
    }

    pub fn env_init(&mut self, name: &str, init: EnvInit) -> &mut Self {
        replace_named(&mut self.env_inits, name, init);
        self
    }

    pub fn after_block(&mut self, name: &str, pass: PostPass) -> &mut Self {
        replace_named(&mut self.after_block, name, pass);
        self
    }

    pub fn after_parse(&mut self, name: &str, pass: PostPass) -> &mut Self {
        replace_named(&mut self.after_parse, name, pass);
        self
    }

    /// Run the block and inline phases plus all post-passes.
    pub fn parse(&self, source: &str) -> (Vec<Token>, ParseState) {
        let env = Rc::new(RefCell::new(Env::default()));
        for (_, init) in &self.env_inits {
            init(&mut env.borrow_mut());
        }

        let mut tokens = self.parse_blocks(source, &env, 0);
        for (_, pass) in &self.after_block {
            pass(self, &mut tokens, &env);
        }
        self.expand_inlines(&mut tokens, &env);
        for (_, pass) in &self.after_parse {
            pass(self, &mut tokens, &env);
        }

        (tokens, ParseState { env })
    }

    pub fn render(&self, tokens: &[Token], state: &ParseState) -> Result<String, Error> {
        match self.renderer {
            Renderer::Html => self
                .html
                .render(tokens, &state.env.borrow(), &self.options),
            Renderer::Ast => Ok(ast_value(tokens).to_string()),
        }
    }

    pub fn convert(&self, source: &str) -> Result<String, Error> {
        let (tokens, state) = self.parse(source);
        self.render(&tokens, &state)
    }

    /// Block-parse a source fragment against an existing env. Used by
    /// post-passes and directive handlers that re-enter the parser.
    pub fn parse_blocks(&self, source: &str, env: &Rc<RefCell<Env>>, depth: usize) -> Vec<Token> {
        let cleaned = if source.contains('\0') {
            source.replace('\0', "\u{FFFD}")
        } else {
            source.to_string()
        };
        let mut state = BlockState::new(cleaned, Rc::clone(env));
        state.depth = depth;
        state.nesting_limit = self.options.nesting_limit;
        self.block.process(&mut state);
        state.into_tokens()
    }

    /// Fully parse a fragment: blocks plus inline expansion.
    pub fn parse_fragment(&self, source: &str, env: &Rc<RefCell<Env>>, depth: usize) -> Vec<Token> {
        let mut tokens = self.parse_blocks(source, env, depth);
        self.expand_inlines(&mut tokens, env);
        tokens
    }

    /// Walk the tree and run the inline phase over every raw leaf: `text`
    /// is consumed, `children` appear in its place.
    pub fn expand_inlines(&self, tokens: &mut Vec<Token>, env: &Rc<RefCell<Env>>) {
        for token in tokens.iter_mut() {
            if let Some(children) = token.children.as_mut() {
                self.expand_inlines(children, env);
            } else if let Some(text) = token.text.take() {
                token.children = Some(self.inline.parse(
                    &text,
                    Rc::clone(env),
                    self.options.delimiter_scan_limit,
                ));
            }
        }
    }
}

fn replace_named<T>(entries: &mut Vec<(String, T)>, name: &str, value: T) {
    match entries.iter_mut().find(|(existing, _)| existing == name) {
        Some(entry) => {
            log::debug!("replacing pipeline pass `{name}`");
            entry.1 = value;
        }
        None => entries.push((name.to_string(), value)),
    }
}
