//! Rendering: a method table keyed by token kind, dispatched over the token
//! tree. Plugins extend the table at registration time; a kind with no
//! method is a hard error, never silent output.

pub(crate) mod ast;
pub(crate) mod html;

pub use ast::ast_value;
pub use html::{HtmlContext, HtmlRenderFn, HtmlRenderer};
