use std::borrow::Cow;

use rustc_hash::FxHashMap;

use crate::block::Env;
use crate::error::Error;
use crate::escape::{encode_href, escape_html, safe_url};
use crate::markdown::Options;
use crate::token::Token;

pub type HtmlRenderFn = Box<dyn Fn(&HtmlContext, &Token) -> Result<String, Error> + Send + Sync>;

/// The HTML renderer: a token-kind to method table. Every built-in token
/// kind has a method; plugins register methods for the kinds they emit.
pub struct HtmlRenderer {
    methods: FxHashMap<Cow<'static, str>, HtmlRenderFn>,
}

/// Per-render context handed to methods: the method table for recursion,
/// the document env, and the pipeline options.
pub struct HtmlContext<'a> {
    renderer: &'a HtmlRenderer,
    pub env: &'a Env,
    pub options: &'a Options,
}

impl<'a> HtmlContext<'a> {
    pub fn render_token(&self, token: &Token) -> Result<String, Error> {
        let method = self
            .renderer
            .methods
            .get(token.kind.as_ref())
            .ok_or_else(|| Error::MissingRenderMethod {
                kind: token.kind.to_string(),
            })?;
        method(self, token)
    }

    pub fn render_tokens(&self, tokens: &[Token]) -> Result<String, Error> {
        let mut out = String::new();
        for token in tokens {
            out.push_str(&self.render_token(token)?);
        }
        Ok(out)
    }

    /// Render a container's children, or escape its text when it is a leaf
    /// that never went through the inline phase.
    pub fn render_children(&self, token: &Token) -> Result<String, Error> {
        match &token.children {
            Some(children) => self.render_tokens(children),
            None => Ok(escape_html(token.text.as_deref().unwrap_or(""))),
        }
    }

    pub fn destination(&self, url: &str) -> String {
        if self.options.allow_harmful_protocols {
            encode_href(url)
        } else {
            encode_href(safe_url(url))
        }
    }
}

impl HtmlRenderer {
    pub fn empty() -> Self {
        Self {
            methods: FxHashMap::default(),
        }
    }

    /// A renderer with methods for every token kind the core pipeline emits.
    pub fn commonmark() -> Self {
        let mut renderer = Self::empty();
        renderer.register("paragraph", Box::new(paragraph));
        renderer.register("heading", Box::new(heading));
        renderer.register("thematic_break", Box::new(thematic_break));
        renderer.register("block_code", Box::new(block_code));
        renderer.register("block_quote", Box::new(block_quote));
        renderer.register("block_html", Box::new(block_html));
        renderer.register("list", Box::new(list));
        renderer.register("list_item", Box::new(list_item));
        renderer.register("text", Box::new(text));
        renderer.register("codespan", Box::new(codespan));
        renderer.register("emphasis", Box::new(emphasis));
        renderer.register("strong", Box::new(strong));
        renderer.register("link", Box::new(link));
        renderer.register("image", Box::new(image));
        renderer.register("inline_html", Box::new(inline_html));
        renderer.register("softbreak", Box::new(softbreak));
        renderer.register("linebreak", Box::new(linebreak));
        renderer
    }

    /// Register (or replace) the method for a token kind.
    pub fn register(&mut self, kind: impl Into<Cow<'static, str>>, method: HtmlRenderFn) {
        let kind = kind.into();
        if self.methods.insert(kind.clone(), method).is_some() {
            log::debug!("replacing html render method for `{kind}`");
        }
    }

    pub fn render(&self, tokens: &[Token], env: &Env, options: &Options) -> Result<String, Error> {
        let context = HtmlContext {
            renderer: self,
            env,
            options,
        };
        context.render_tokens(tokens)
    }
}

fn paragraph(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<p>{}</p>\n", ctx.render_children(token)?))
}

fn heading(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let level = token.attr_int("level").unwrap_or(1).clamp(1, 6);
    let body = ctx.render_children(token)?;
    match token.attr_str("id") {
        Some(id) => Ok(format!("<h{level} id=\"{}\">{body}</h{level}>\n", escape_html(id))),
        None => Ok(format!("<h{level}>{body}</h{level}>\n")),
    }
}

fn thematic_break(_ctx: &HtmlContext, _token: &Token) -> Result<String, Error> {
    Ok("<hr />\n".to_string())
}

fn block_code(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let code = escape_html(token.raw.as_deref().unwrap_or(""));
    match token
        .attr_str("info")
        .and_then(|info| info.split_ascii_whitespace().next())
    {
        Some(language) => Ok(format!(
            "<pre><code class=\"language-{}\">{code}</code></pre>\n",
            escape_html(language)
        )),
        None => Ok(format!("<pre><code>{code}</code></pre>\n")),
    }
}

fn block_quote(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!(
        "<blockquote>\n{}</blockquote>\n",
        ctx.render_children(token)?
    ))
}

fn block_html(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let raw = token.raw.as_deref().unwrap_or("");
    if ctx.options.escape {
        Ok(format!("<p>{}</p>\n", escape_html(raw.trim_end())))
    } else {
        Ok(raw.to_string())
    }
}

fn list(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let body = ctx.render_children(token)?;
    if token.attr_bool("ordered") {
        let start = token.attr_int("start").unwrap_or(1);
        if start != 1 {
            Ok(format!("<ol start=\"{start}\">\n{body}</ol>\n"))
        } else {
            Ok(format!("<ol>\n{body}</ol>\n"))
        }
    } else {
        Ok(format!("<ul>\n{body}</ul>\n"))
    }
}

fn list_item(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let tight = token.attr_bool("tight");
    let mut out = String::from("<li>");
    for child in token.children() {
        if tight && child.is("paragraph") {
            out.push_str(&ctx.render_children(child)?);
        } else {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&ctx.render_token(child)?);
        }
    }
    out.push_str("</li>\n");
    Ok(out)
}

fn text(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(escape_html(token.text.as_deref().unwrap_or("")))
}

fn codespan(_ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!(
        "<code>{}</code>",
        escape_html(token.text.as_deref().unwrap_or(""))
    ))
}

fn emphasis(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<em>{}</em>", ctx.render_children(token)?))
}

fn strong(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    Ok(format!("<strong>{}</strong>", ctx.render_children(token)?))
}

fn link(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let href = ctx.destination(token.attr_str("url").unwrap_or(""));
    let mut out = format!("<a href=\"{href}\"");
    if let Some(title) = token.attr_str("title") {
        out.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }
    out.push('>');
    out.push_str(&ctx.render_children(token)?);
    out.push_str("</a>");
    Ok(out)
}

fn image(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let src = ctx.destination(token.attr_str("url").unwrap_or(""));
    let alt = escape_html(&token.plain_text());
    let mut out = format!("<img src=\"{src}\" alt=\"{alt}\"");
    if let Some(title) = token.attr_str("title") {
        out.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }
    out.push_str(" />");
    Ok(out)
}

fn inline_html(ctx: &HtmlContext, token: &Token) -> Result<String, Error> {
    let raw = token.raw.as_deref().unwrap_or("");
    if ctx.options.escape {
        Ok(escape_html(raw))
    } else {
        Ok(raw.to_string())
    }
}

fn softbreak(ctx: &HtmlContext, _token: &Token) -> Result<String, Error> {
    if ctx.options.hard_wrap {
        Ok("<br />\n".to_string())
    } else {
        Ok("\n".to_string())
    }
}

fn linebreak(_ctx: &HtmlContext, _token: &Token) -> Result<String, Error> {
    Ok("<br />\n".to_string())
}
