//! A CommonMark + GitHub-Flavored Markdown parser and renderer built around
//! a two-phase pipeline: a prioritized block-rule pass producing a token
//! tree with raw-text leaves, and an inline pass with a delimiter processor
//! for emphasis resolution. Extensions plug in through the same registries
//! the built-in rules use.

pub use block::{BlockParser, BlockRule, BlockState, Env, LinkDef};
pub use error::Error;
pub use inline::{InlineParser, InlineRule, InlineState};
pub use markdown::{Markdown, Options, ParseState, Renderer};
pub use plugin::{EnvInit, Plugin, PostPass};
pub use render::{ast_value, HtmlContext, HtmlRenderFn, HtmlRenderer};
pub use token::{AttrValue, Attrs, Token};

pub mod block;
mod entities;
mod error;
pub mod escape;
pub mod inline;
mod markdown;
mod plugin;
pub mod plugins;
pub mod render;
mod scanner;
mod token;

/// Convert with the batteries-included pipeline: GFM tables, strikethrough,
/// task lists, URL linkify, math, footnotes, definition lists, and
/// abbreviations, rendered to HTML.
pub fn html(source: &str) -> String {
    let mut md = Markdown::new();
    md.use_plugin(plugins::gfm)
        .use_plugin(plugins::linkify)
        .use_plugin(plugins::math)
        .use_plugin(plugins::footnotes)
        .use_plugin(plugins::def_list)
        .use_plugin(plugins::abbr);
    md.convert(source)
        .expect("the default pipeline has methods for every kind it emits")
}
