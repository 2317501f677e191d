//! Built-in extension plugins. Each is a plain function usable with
//! [`crate::Markdown::use_plugin`]; everything they do goes through the same
//! registration surface available to third-party plugins.

mod abbr;
mod def_list;
mod footnotes;
mod gfm;
mod linkify;
mod math;

pub use abbr::abbr;
pub use def_list::def_list;
pub use footnotes::footnotes;
pub use gfm::gfm;
pub use linkify::linkify;
pub use math::math;
