//! Directive blocks for the markwright pipeline: a shared envelope parser
//! for the RST form (`.. name:: arg`) and the fenced form (a code fence
//! whose info string is `{name} arg`), a handler registry, and the built-in
//! Admonition, TableOfContents, Include, and Image handlers.
//!
//! The plugin registers two block rules. The fenced-form rule slots in just
//! ahead of the core fenced-code rule, which would otherwise swallow the
//! fence; the RST-form rule runs at the tail of the core ordering.
//!
//! By default an unregistered directive name and a handler failure degrade
//! to a literal block holding the original source, with a warning. In
//! strict mode they surface as render-time errors instead.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use markwright::block::priority as block_priority;
use markwright::{BlockParser, BlockRule, BlockState, Error, Markdown, Plugin, Token};

mod admonition;
mod image;
mod include;
mod parse;
mod toc;

pub use admonition::Admonition;
pub use image::Image;
pub use include::{fs_resolver, Include, IncludeResolver};
pub use parse::Directive;
pub use toc::TableOfContents;

const FENCED_DIRECTIVE_PRIORITY: i32 = block_priority::FENCED_CODE - 10;

/// Why a directive could not be handled. Carried on the placeholder token
/// in strict mode and surfaced when the renderer reaches it.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("{reason}")]
    Malformed { reason: String },
    #[error("failed to include `{path}`: {source}")]
    Include {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl DirectiveError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DirectiveError::Malformed {
            reason: reason.into(),
        }
    }
}

/// A directive handler: receives the parsed envelope and emits its tokens
/// into the block state. On error, nothing may have been emitted; the
/// calling rule applies the fallback (or strict) policy.
pub trait DirectiveHandler: Send + Sync {
    fn handle(
        &self,
        directive: Directive,
        state: &mut BlockState,
        parser: &BlockParser,
    ) -> Result<(), DirectiveError>;
}

type Registry = FxHashMap<String, Arc<dyn DirectiveHandler>>;

/// The directives plugin. Construct, optionally configure, then install:
///
/// ```
/// use markwright::Markdown;
/// use markwright_directives::DirectivesPlugin;
///
/// let mut md = Markdown::new();
/// md.use_plugin(DirectivesPlugin::new());
/// ```
pub struct DirectivesPlugin {
    strict: bool,
    base_dir: Option<PathBuf>,
    resolver: Arc<IncludeResolver>,
    extra: Vec<(String, Arc<dyn DirectiveHandler>)>,
}

impl Default for DirectivesPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectivesPlugin {
    pub fn new() -> Self {
        Self {
            strict: false,
            base_dir: None,
            resolver: Arc::new(fs_resolver()),
            extra: Vec::new(),
        }
    }

    /// Fail rendering on unregistered or malformed directives instead of
    /// falling back to a literal block.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Base directory that include paths resolve against.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Replace the include resolver (the tests use an in-memory one).
    pub fn resolver(mut self, resolver: IncludeResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Register a handler for a directive name. Re-registering a name
    /// replaces the previous handler, built-ins included.
    pub fn handler(mut self, name: &str, handler: Arc<dyn DirectiveHandler>) -> Self {
        self.extra.push((name.to_string(), handler));
        self
    }

    fn build_registry(&self) -> Arc<Registry> {
        let mut registry: Registry = FxHashMap::default();
        let admonition: Arc<dyn DirectiveHandler> = Arc::new(Admonition);
        for name in admonition::NAMES {
            registry.insert((*name).to_string(), Arc::clone(&admonition));
        }
        registry.insert("toc".to_string(), Arc::new(TableOfContents));
        registry.insert(
            "include".to_string(),
            Arc::new(Include::new(Arc::clone(&self.resolver), self.base_dir.clone())),
        );
        let image: Arc<dyn DirectiveHandler> = Arc::new(Image);
        registry.insert("image".to_string(), Arc::clone(&image));
        registry.insert("figure".to_string(), image);
        for (name, handler) in &self.extra {
            registry.insert(name.clone(), Arc::clone(handler));
        }
        Arc::new(registry)
    }
}

impl Plugin for DirectivesPlugin {
    fn install(&self, md: &mut Markdown) {
        let registry = self.build_registry();
        md.block_rule(
            block_priority::DIRECTIVE,
            Arc::new(RstDirective {
                registry: Arc::clone(&registry),
                strict: self.strict,
            }),
        );
        md.block_rule(
            FENCED_DIRECTIVE_PRIORITY,
            Arc::new(FencedDirective {
                registry,
                strict: self.strict,
            }),
        );

        md.after_parse("toc", Box::new(toc::resolve_toc));

        md.render_method("admonition", Box::new(admonition::render));
        md.render_method("toc", Box::new(toc::render));
        md.render_method("block_image", Box::new(image::render));
        md.render_method("directive_error", Box::new(render_directive_error));
    }
}

/// Common tail for both directive rules: dispatch to the handler, or apply
/// the fallback / strict policy.
fn dispatch(
    registry: &Registry,
    strict: bool,
    directive: Directive,
    lines: usize,
    state: &mut BlockState,
    parser: &BlockParser,
) {
    let raw: String = (state.cursor()..state.cursor() + lines)
        .map(|index| format!("{}\n", state.line_text(index)))
        .collect();
    let name = directive.name.clone();

    match registry.get(&name) {
        None => {
            if strict {
                state.append(
                    Token::new("directive_error")
                        .with_attr("name", name)
                        .with_attr("kind", "not_registered"),
                );
            } else {
                log::warn!("directive `{name}` is not registered; emitting literal block");
                state.append(Token::literal("block_code", raw));
            }
        }
        Some(handler) => match handler.handle(directive, state, parser) {
            Ok(()) => {}
            Err(error) => {
                if strict {
                    let token = match error {
                        DirectiveError::Malformed { reason } => Token::new("directive_error")
                            .with_attr("name", name)
                            .with_attr("kind", "malformed")
                            .with_attr("reason", reason),
                        DirectiveError::Include { path, source } => Token::new("directive_error")
                            .with_attr("name", name)
                            .with_attr("kind", "include")
                            .with_attr("path", path)
                            .with_attr("reason", source.to_string()),
                    };
                    state.append(token);
                } else {
                    match &error {
                        DirectiveError::Malformed { reason } => {
                            log::warn!("directive `{name}` is malformed ({reason}); emitting literal block");
                        }
                        DirectiveError::Include { path, source } => {
                            log::warn!("include of `{path}` failed ({source}); emitting literal block");
                        }
                    }
                    state.append(Token::literal("block_code", raw));
                }
            }
        },
    }
    state.advance(lines);
}

fn render_directive_error(
    _ctx: &markwright::HtmlContext,
    token: &Token,
) -> Result<String, Error> {
    let name = token.attr_str("name").unwrap_or("").to_string();
    match token.attr_str("kind") {
        Some("malformed") => Err(Error::DirectiveMalformed {
            name,
            reason: token.attr_str("reason").unwrap_or("").to_string(),
        }),
        Some("include") => Err(Error::IncludeResolution {
            path: token.attr_str("path").unwrap_or("").to_string(),
            source: io::Error::new(
                io::ErrorKind::Other,
                token.attr_str("reason").unwrap_or("").to_string(),
            ),
        }),
        _ => Err(Error::DirectiveNotRegistered { name }),
    }
}

struct RstDirective {
    registry: Arc<Registry>,
    strict: bool,
}

impl BlockRule for RstDirective {
    fn name(&self) -> &'static str {
        "directive_rst"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current_indent() <= 3 && state.current_content().starts_with(".. ")
    }

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()> {
        let (directive, lines) = parse::scan_rst(state)?;
        dispatch(&self.registry, self.strict, directive, lines, state, parser);
        Some(())
    }
}

struct FencedDirective {
    registry: Arc<Registry>,
    strict: bool,
}

impl BlockRule for FencedDirective {
    fn name(&self) -> &'static str {
        "directive_fenced"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current_indent() <= 3 && state.current_content().starts_with("```")
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        state.line_indent(index) <= 3 && state.line_content(index).starts_with("```{")
    }

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()> {
        let (directive, lines) = parse::scan_fenced(state)?;
        dispatch(&self.registry, self.strict, directive, lines, state, parser);
        Some(())
    }
}
