use std::cell::RefCell;
use std::rc::Rc;

use crate::block::Env;
use crate::markdown::Markdown;
use crate::token::Token;

/// A plugin wires new rules, render methods, env initializers, and
/// post-passes into a [`Markdown`] pipeline at construction time. Plain
/// functions are plugins, so the usual shape is
/// `md.use_plugin(markwright::plugins::gfm)`.
pub trait Plugin {
    fn install(&self, md: &mut Markdown);
}

impl<F: Fn(&mut Markdown)> Plugin for F {
    fn install(&self, md: &mut Markdown) {
        self(md)
    }
}

/// A post-pass over the token tree: after the block phase (`after_block`,
/// tokens still carry raw text) or after the inline phase (`after_parse`).
/// Passes receive the pipeline so they can parse nested fragments.
pub type PostPass = Box<dyn Fn(&Markdown, &mut Vec<Token>, &Rc<RefCell<Env>>) + Send + Sync>;

/// An env initializer, run at the start of every parse.
pub type EnvInit = Box<dyn Fn(&mut Env) + Send + Sync>;
