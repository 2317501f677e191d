use markwright::{BlockParser, BlockState, Error, HtmlContext, Token};
use markwright::escape::escape_html;

use crate::{Directive, DirectiveError, DirectiveHandler};

/// The admonition names this handler registers under.
pub(crate) static NAMES: &[&str] = &[
    "attention",
    "caution",
    "danger",
    "error",
    "hint",
    "important",
    "note",
    "tip",
    "warning",
];

/// A styled container; the argument becomes the title (falling back to the
/// capitalized directive name) and the body is block-parsed.
pub struct Admonition;

impl DirectiveHandler for Admonition {
    fn handle(
        &self,
        directive: Directive,
        state: &mut BlockState,
        parser: &BlockParser,
    ) -> Result<(), DirectiveError> {
        let title = if directive.title.is_empty() {
            capitalize(&directive.name)
        } else {
            directive.title.clone()
        };
        let class = directive.option("class").map(|s| s.to_string());
        let children = parser.parse_container(state, directive.content);
        let mut token = Token::container("admonition", children)
            .with_attr("name", directive.name)
            .with_attr("title", title);
        if let Some(class) = class {
            token.attrs.set("class", class);
        }
        state.append(token);
        Ok(())
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn render(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let name = token.attr_str("name").unwrap_or("note");
    let mut classes = format!("admonition {name}");
    if let Some(extra) = token.attr_str("class") {
        classes.push(' ');
        classes.push_str(extra);
    }
    let mut out = format!("<section class=\"{}\">\n", escape_html(&classes));
    if let Some(title) = token.attr_str("title") {
        if !title.is_empty() {
            out.push_str(&format!(
                "<p class=\"admonition-title\">{}</p>\n",
                escape_html(title)
            ));
        }
    }
    out.push_str(&ctx.render_children(token)?);
    out.push_str("</section>\n");
    Ok(out)
}
