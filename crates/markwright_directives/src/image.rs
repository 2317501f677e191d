use markwright::escape::escape_html;
use markwright::{BlockParser, BlockState, Error, HtmlContext, Token};

use crate::{Directive, DirectiveError, DirectiveHandler};

/// `.. image:: url` (or `figure`): a block-level figure with optional alt,
/// title, and dimension options.
pub struct Image;

impl DirectiveHandler for Image {
    fn handle(
        &self,
        directive: Directive,
        state: &mut BlockState,
        _parser: &BlockParser,
    ) -> Result<(), DirectiveError> {
        let url = directive.title.trim();
        if url.is_empty() {
            return Err(DirectiveError::malformed("image requires a destination"));
        }
        let mut token = Token::new("block_image").with_attr("url", url);
        for key in ["alt", "title", "width", "height"] {
            if let Some(value) = directive.option(key) {
                token.attrs.set(key.to_string(), value.to_string());
            }
        }
        state.append(token);
        Ok(())
    }
}

pub(crate) fn render(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let src = ctx.destination(token.attr_str("url").unwrap_or(""));
    let alt = escape_html(token.attr_str("alt").unwrap_or(""));
    let mut img = format!("<img src=\"{src}\" alt=\"{alt}\"");
    for key in ["width", "height"] {
        if let Some(value) = token.attr_str(key) {
            img.push_str(&format!(" {key}=\"{}\"", escape_html(value)));
        }
    }
    img.push_str(" />");

    match token.attr_str("title") {
        Some(title) if !title.is_empty() => Ok(format!(
            "<figure>\n{img}\n<figcaption>{}</figcaption>\n</figure>\n",
            escape_html(title)
        )),
        _ => Ok(format!("<figure>\n{img}\n</figure>\n")),
    }
}
