//! Delimiter runs and the flag computation behind them (CommonMark's
//! left/right-flanking rules). The resolution pass lives in `emphasis.rs`.

use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::inline::state::{DelimMode, DelimRun, InlineState};
use crate::inline::InlineRule;
use crate::token::Token;

#[derive(Clone, Copy, Debug, PartialEq)]
enum CharClass {
    Whitespace,
    Punctuation,
    Other,
}

/// The start and end of the slice count as whitespace.
fn classify(ch: Option<char>) -> CharClass {
    let Some(ch) = ch else {
        return CharClass::Whitespace;
    };
    if ch.is_whitespace() {
        return CharClass::Whitespace;
    }
    if ch.is_ascii_punctuation() || ch.general_category_group() == GeneralCategoryGroup::Punctuation
    {
        return CharClass::Punctuation;
    }
    CharClass::Other
}

/// can-open / can-close for a run of `ch` between the given neighbors.
/// Underscore runs take the stricter intraword rules.
pub(crate) fn delimiter_flags(ch: u8, before: Option<char>, after: Option<char>) -> (bool, bool) {
    let prev = classify(before);
    let next = classify(after);

    let left_flanking = next != CharClass::Whitespace
        && (next != CharClass::Punctuation
            || prev == CharClass::Whitespace
            || prev == CharClass::Punctuation);
    let right_flanking = prev != CharClass::Whitespace
        && (prev != CharClass::Punctuation
            || next == CharClass::Whitespace
            || next == CharClass::Punctuation);

    if ch == b'_' {
        let can_open =
            left_flanking && (!right_flanking || prev == CharClass::Punctuation);
        let can_close =
            right_flanking && (!left_flanking || next == CharClass::Punctuation);
        (can_open, can_close)
    } else {
        (left_flanking, right_flanking)
    }
}

/// Consume a run of `ch` at the cursor, pushing a `delim` placeholder token
/// and its run record. Shared with extension delimiters like `~`.
pub(crate) fn push_delimiter_run(state: &mut InlineState, ch: u8, mode: DelimMode) {
    let bytes = state.src.as_bytes();
    let start = state.pos;
    let mut end = start;
    while end < bytes.len() && bytes[end] == ch {
        end += 1;
    }
    let count = end - start;

    let before = state.prev_char();
    let after = state.src[end..].chars().next();
    let (can_open, can_close) = delimiter_flags(ch, before, after);

    let mut token = Token::new("delim");
    token.text = Some(state.src[start..end].to_string());
    let token_index = state.push(token);
    state.delims.push(DelimRun {
        token: token_index,
        ch,
        len: count,
        orig_len: count,
        can_open,
        can_close,
        active: true,
        mode,
        opens: Vec::new(),
        closes: Vec::new(),
    });
    state.pos = end;
}

/// The `*` / `_` emphasis delimiter rule.
pub(crate) struct EmphasisDelimiters;

impl InlineRule for EmphasisDelimiters {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn trigger_bytes(&self) -> &'static [u8] {
        b"*_"
    }

    fn try_parse(&self, state: &mut InlineState) -> Option<()> {
        let ch = state.byte(0)?;
        push_delimiter_run(state, ch, DelimMode::Emphasis);
        Some(())
    }
}
