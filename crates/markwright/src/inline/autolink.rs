use once_cell::sync::Lazy;
use regex::Regex;

use crate::inline::state::InlineState;
use crate::inline::InlineRule;
use crate::token::Token;

static URI_AUTOLINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<[A-Za-z][A-Za-z0-9+.-]{1,31}:[^<>\x00-\x20]*>").unwrap());
static EMAIL_AUTOLINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*>",
    )
    .unwrap()
});

/// `<scheme:...>` and `<user@host>` autolinks. The bracketed text is both
/// the destination and the label, taken verbatim.
pub(crate) struct Autolink;

impl InlineRule for Autolink {
    fn name(&self) -> &'static str {
        "autolink"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"<"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        let rest = state.rest();
        let (url, label, len) = if let Some(found) = URI_AUTOLINK.find(rest) {
            let inner = &rest[1..found.end() - 1];
            (inner.to_string(), inner.to_string(), found.end())
        } else if let Some(found) = EMAIL_AUTOLINK.find(rest) {
            let inner = &rest[1..found.end() - 1];
            (format!("mailto:{inner}"), inner.to_string(), found.end())
        } else {
            return None;
        };

        let token = Token::container("link", vec![Token::text(label)]).with_attr("url", url);
        state.push(token);
        state.pos += len;
        Some(())
    }
}
