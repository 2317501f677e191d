//! HTML entity and numeric character reference decoding.
//!
//! CommonMark recognizes the HTML5 named entity set; this table carries the
//! subset that shows up in real documents and in the conformance suite.
//! Unknown names pass through literally, which is also what the spec requires
//! for strings like `&MadeUpEntity;`.

/// Named entities, sorted by name for binary search. Values are the decoded
/// replacement strings (a few entities decode to multiple code points).
#[rustfmt::skip]
static NAMED_ENTITIES: &[(&str, &str)] = &[
    ("AElig", "\u{C6}"),
    ("AMP", "&"),
    ("Aacute", "\u{C1}"),
    ("Acirc", "\u{C2}"),
    ("Agrave", "\u{C0}"),
    ("Aring", "\u{C5}"),
    ("Atilde", "\u{C3}"),
    ("Auml", "\u{C4}"),
    ("Ccedil", "\u{C7}"),
    ("ClockwiseContourIntegral", "\u{2232}"),
    ("Dagger", "\u{2021}"),
    ("Dcaron", "\u{10E}"),
    ("DifferentialD", "\u{2146}"),
    ("ETH", "\u{D0}"),
    ("Eacute", "\u{C9}"),
    ("Ecirc", "\u{CA}"),
    ("Egrave", "\u{C8}"),
    ("Euml", "\u{CB}"),
    ("GT", ">"),
    ("HilbertSpace", "\u{210B}"),
    ("Iacute", "\u{CD}"),
    ("Icirc", "\u{CE}"),
    ("Igrave", "\u{CC}"),
    ("Iuml", "\u{CF}"),
    ("LT", "<"),
    ("Ntilde", "\u{D1}"),
    ("Oacute", "\u{D3}"),
    ("Ocirc", "\u{D4}"),
    ("Ograve", "\u{D2}"),
    ("Oslash", "\u{D8}"),
    ("Otilde", "\u{D5}"),
    ("Ouml", "\u{D6}"),
    ("Prime", "\u{2033}"),
    ("QUOT", "\""),
    ("REG", "\u{AE}"),
    ("Scaron", "\u{160}"),
    ("THORN", "\u{DE}"),
    ("TRADE", "\u{2122}"),
    ("Uacute", "\u{DA}"),
    ("Ucirc", "\u{DB}"),
    ("Ugrave", "\u{D9}"),
    ("Uuml", "\u{DC}"),
    ("Yacute", "\u{DD}"),
    ("Yuml", "\u{178}"),
    ("aacute", "\u{E1}"),
    ("acirc", "\u{E2}"),
    ("acute", "\u{B4}"),
    ("aelig", "\u{E6}"),
    ("agrave", "\u{E0}"),
    ("alpha", "\u{3B1}"),
    ("amp", "&"),
    ("apos", "'"),
    ("aring", "\u{E5}"),
    ("asymp", "\u{2248}"),
    ("atilde", "\u{E3}"),
    ("auml", "\u{E4}"),
    ("bdquo", "\u{201E}"),
    ("beta", "\u{3B2}"),
    ("brvbar", "\u{A6}"),
    ("bull", "\u{2022}"),
    ("ccedil", "\u{E7}"),
    ("cedil", "\u{B8}"),
    ("cent", "\u{A2}"),
    ("copy", "\u{A9}"),
    ("curren", "\u{A4}"),
    ("dagger", "\u{2020}"),
    ("darr", "\u{2193}"),
    ("deg", "\u{B0}"),
    ("delta", "\u{3B4}"),
    ("divide", "\u{F7}"),
    ("eacute", "\u{E9}"),
    ("ecirc", "\u{EA}"),
    ("egrave", "\u{E8}"),
    ("emsp", "\u{2003}"),
    ("ensp", "\u{2002}"),
    ("epsilon", "\u{3B5}"),
    ("equiv", "\u{2261}"),
    ("eth", "\u{F0}"),
    ("euml", "\u{EB}"),
    ("euro", "\u{20AC}"),
    ("fjlig", "fj"),
    ("frac12", "\u{BD}"),
    ("frac14", "\u{BC}"),
    ("frac34", "\u{BE}"),
    ("gamma", "\u{3B3}"),
    ("ge", "\u{2265}"),
    ("gt", ">"),
    ("harr", "\u{2194}"),
    ("hearts", "\u{2665}"),
    ("hellip", "\u{2026}"),
    ("iacute", "\u{ED}"),
    ("icirc", "\u{EE}"),
    ("iexcl", "\u{A1}"),
    ("igrave", "\u{EC}"),
    ("infin", "\u{221E}"),
    ("iquest", "\u{BF}"),
    ("iuml", "\u{EF}"),
    ("lambda", "\u{3BB}"),
    ("laquo", "\u{AB}"),
    ("larr", "\u{2190}"),
    ("ldquo", "\u{201C}"),
    ("le", "\u{2264}"),
    ("lsaquo", "\u{2039}"),
    ("lsquo", "\u{2018}"),
    ("lt", "<"),
    ("macr", "\u{AF}"),
    ("mdash", "\u{2014}"),
    ("micro", "\u{B5}"),
    ("middot", "\u{B7}"),
    ("minus", "\u{2212}"),
    ("nbsp", "\u{A0}"),
    ("ndash", "\u{2013}"),
    ("ne", "\u{2260}"),
    ("ngE", "\u{2267}\u{338}"),
    ("not", "\u{AC}"),
    ("ntilde", "\u{F1}"),
    ("oacute", "\u{F3}"),
    ("ocirc", "\u{F4}"),
    ("oelig", "\u{153}"),
    ("ograve", "\u{F2}"),
    ("oline", "\u{203E}"),
    ("omega", "\u{3C9}"),
    ("ordf", "\u{AA}"),
    ("ordm", "\u{BA}"),
    ("oslash", "\u{F8}"),
    ("otilde", "\u{F5}"),
    ("ouml", "\u{F6}"),
    ("para", "\u{B6}"),
    ("permil", "\u{2030}"),
    ("phi", "\u{3C6}"),
    ("pi", "\u{3C0}"),
    ("plusmn", "\u{B1}"),
    ("pound", "\u{A3}"),
    ("prime", "\u{2032}"),
    ("quot", "\""),
    ("raquo", "\u{BB}"),
    ("rarr", "\u{2192}"),
    ("rdquo", "\u{201D}"),
    ("reg", "\u{AE}"),
    ("rsaquo", "\u{203A}"),
    ("rsquo", "\u{2019}"),
    ("sbquo", "\u{201A}"),
    ("scaron", "\u{161}"),
    ("sect", "\u{A7}"),
    ("shy", "\u{AD}"),
    ("sigma", "\u{3C3}"),
    ("squot", "'"),
    ("sup1", "\u{B9}"),
    ("sup2", "\u{B2}"),
    ("sup3", "\u{B3}"),
    ("szlig", "\u{DF}"),
    ("theta", "\u{3B8}"),
    ("thorn", "\u{FE}"),
    ("tilde", "\u{2DC}"),
    ("times", "\u{D7}"),
    ("trade", "\u{2122}"),
    ("uacute", "\u{FA}"),
    ("uarr", "\u{2191}"),
    ("ucirc", "\u{FB}"),
    ("ugrave", "\u{F9}"),
    ("uml", "\u{A8}"),
    ("uuml", "\u{FC}"),
    ("yacute", "\u{FD}"),
    ("yen", "\u{A5}"),
    ("yuml", "\u{FF}"),
];

fn lookup_named(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by_key(&name, |(key, _)| *key)
        .ok()
        .map(|index| NAMED_ENTITIES[index].1)
}

/// Replace an invalid or out-of-range code point per the HTML spec.
fn char_from_code_point(value: u32) -> char {
    if value == 0 {
        return '\u{FFFD}';
    }
    char::from_u32(value).unwrap_or('\u{FFFD}')
}

/// Attempt to decode an entity or character reference starting at the `&`
/// at the beginning of `src`. On success, returns the decoded replacement
/// and the number of source bytes consumed (including the `&` and `;`).
pub(crate) fn decode_entity(src: &str) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }

    if bytes.get(1) == Some(&b'#') {
        let (is_hex, digits_start) = match bytes.get(2) {
            Some(b'x') | Some(b'X') => (true, 3),
            _ => (false, 2),
        };
        let max_digits = if is_hex { 6 } else { 7 };
        let mut value: u32 = 0;
        let mut index = digits_start;
        while index < bytes.len() && index - digits_start < max_digits {
            let digit = match (is_hex, bytes[index]) {
                (_, b @ b'0'..=b'9') => (b - b'0') as u32,
                (true, b @ b'a'..=b'f') => (b - b'a' + 10) as u32,
                (true, b @ b'A'..=b'F') => (b - b'A' + 10) as u32,
                _ => break,
            };
            value = value.saturating_mul(if is_hex { 16 } else { 10 }) + digit;
            index += 1;
        }
        if index == digits_start || bytes.get(index) != Some(&b';') {
            return None;
        }
        return Some((char_from_code_point(value).to_string(), index + 1));
    }

    // Named references: up to 32 alphanumeric characters followed by `;`.
    let mut index = 1;
    while index < bytes.len() && index <= 32 && bytes[index].is_ascii_alphanumeric() {
        index += 1;
    }
    if index == 1 || bytes.get(index) != Some(&b';') {
        return None;
    }
    let replacement = lookup_named(&src[1..index])?;
    Some((replacement.to_string(), index + 1))
}
