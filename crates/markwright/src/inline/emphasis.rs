//! The delimiter-resolution pass: for each closer, scan backward for the
//! nearest compatible opener, consuming two characters at a time into strong
//! and then one into emphasis. The `openers_bottom` floor keeps the scan
//! near-linear; `scan_limit` is the hard backstop for pathological input.

use rustc_hash::FxHashMap;

use crate::inline::state::{DelimMode, InlineState};

/// Process delimiter stack entries at and above `floor`. Entries below the
/// floor (delimiters opened outside a just-completed link) are untouchable.
pub(crate) fn process_emphasis(state: &mut InlineState, floor: usize) {
    let mut openers_bottom: FxHashMap<(u8, usize, bool), usize> = FxHashMap::default();
    let mut budget = state.scan_limit;
    let mut closer_index = floor;

    while closer_index < state.delims.len() {
        {
            let closer = &state.delims[closer_index];
            if !closer.active || !closer.can_close {
                closer_index += 1;
                continue;
            }
        }

        let (key, opener_index) = {
            let closer = &state.delims[closer_index];
            let key = (closer.ch, closer.orig_len % 3, closer.can_open);
            let bottom = openers_bottom.get(&key).copied().unwrap_or(floor);
            let mut found = None;
            for scan in (bottom..closer_index).rev() {
                if budget == 0 {
                    break;
                }
                budget -= 1;
                let opener = &state.delims[scan];
                if !opener.active || !opener.can_open || opener.ch != closer.ch {
                    continue;
                }
                match (opener.mode, closer.mode) {
                    (DelimMode::Emphasis, DelimMode::Emphasis) => {
                        // "... the sum of the lengths of the delimiter runs
                        // containing the opening and closing delimiters must
                        // not be a multiple of 3 unless both lengths are
                        // multiples of 3."
                        if (opener.can_close || closer.can_open)
                            && (opener.orig_len + closer.orig_len) % 3 == 0
                            && (opener.orig_len % 3 != 0 || closer.orig_len % 3 != 0)
                        {
                            continue;
                        }
                    }
                    (DelimMode::Matched { max, .. }, DelimMode::Matched { .. }) => {
                        if opener.orig_len != closer.orig_len || opener.orig_len > max {
                            continue;
                        }
                    }
                    _ => continue,
                }
                found = Some(scan);
                break;
            }
            (key, found)
        };

        let Some(opener_index) = opener_index else {
            let closer = &mut state.delims[closer_index];
            openers_bottom.insert(key, closer_index);
            if !closer.can_open {
                closer.active = false;
            }
            closer_index += 1;
            continue;
        };

        // Consume as much of the pair as one match allows.
        let (count, kind) = {
            let opener = &state.delims[opener_index];
            let closer = &state.delims[closer_index];
            match opener.mode {
                DelimMode::Matched { kind, .. } => (opener.len.min(closer.len), kind),
                DelimMode::Emphasis => {
                    let count = opener.len.min(closer.len).min(2);
                    (count, if count == 2 { "strong" } else { "emphasis" })
                }
            }
        };

        state.delims[opener_index].opens.push(kind);
        state.delims[opener_index].len -= count;
        state.delims[closer_index].closes.push(kind);
        state.delims[closer_index].len -= count;

        // Delimiters between the pair can no longer match anything outside
        // the span that was just closed over them.
        for between in opener_index + 1..closer_index {
            state.delims[between].active = false;
        }
        if state.delims[opener_index].len == 0 {
            state.delims[opener_index].active = false;
        }
        if state.delims[closer_index].len == 0 {
            state.delims[closer_index].active = false;
            closer_index += 1;
        }
    }
}
