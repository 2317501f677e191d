//! Output-side encoding: HTML escaping for body and attribute text, and the
//! percent-encoding applied to link destinations. Both are driven by byte
//! replacement tables so that clean input is copied in whole chunks.

type ReplacementTable = [Option<&'static str>; 256];

const fn html_table() -> ReplacementTable {
    let mut table: ReplacementTable = [None; 256];
    table[b'<' as usize] = Some("&lt;");
    table[b'>' as usize] = Some("&gt;");
    table[b'"' as usize] = Some("&quot;");
    table[b'&' as usize] = Some("&amp;");
    table
}

static HTML_TABLE: ReplacementTable = html_table();

/// Bytes that pass through href encoding untouched. The set matches what the
/// CommonMark test corpus expects from rendered destinations.
const HREF_SAFE: &[u8] = b"!#$%()*+,-./0123456789:;=?@ABCDEFGHIJKLMNOPQRSTUVWXYZ^_abcdefghijklmnopqrstuvwxyz~";

const fn href_safe_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut index = 0;
    while index < HREF_SAFE.len() {
        table[HREF_SAFE[index] as usize] = true;
        index += 1;
    }
    table
}

static HREF_SAFE_TABLE: [bool; 256] = href_safe_table();

fn escape_with(text: &str, table: &ReplacementTable, out: &mut String) {
    let bytes = text.as_bytes();
    let mut cursor = 0;
    while cursor < bytes.len() {
        let chunk_len = bytes[cursor..]
            .iter()
            .position(|&byte| table[byte as usize].is_some())
            .unwrap_or(bytes.len() - cursor);
        out.push_str(&text[cursor..cursor + chunk_len]);
        cursor += chunk_len;
        if cursor < bytes.len() {
            // The replaced bytes are all ASCII, so single-byte stepping is
            // always on a char boundary here.
            out.push_str(table[bytes[cursor] as usize].unwrap());
            cursor += 1;
        }
    }
}

/// Escape `<`, `>`, `"`, and `&` for HTML body or attribute output.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html_into(text, &mut out);
    out
}

pub fn escape_html_into(text: &str, out: &mut String) {
    escape_with(text, &HTML_TABLE, out)
}

/// Percent-encode a link destination for output. `&` becomes `&amp;` (the
/// destination lands inside an HTML attribute) and already-encoded `%XX`
/// sequences are preserved as-is.
pub fn encode_href(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    encode_href_into(url, &mut out);
    out
}

pub fn encode_href_into(url: &str, out: &mut String) {
    for &byte in url.as_bytes() {
        if byte == b'&' {
            out.push_str("&amp;");
        } else if HREF_SAFE_TABLE[byte as usize] {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
}

/// Protocols rejected by default in link and image destinations. `data:` is
/// allowed only for a small set of image MIME types.
const HARMFUL_PROTOCOLS: &[&str] = &["javascript:", "vbscript:", "file:", "data:"];
const ALLOWED_DATA_PREFIXES: &[&str] = &[
    "data:image/png",
    "data:image/gif",
    "data:image/jpeg",
    "data:image/webp",
];

/// Returns the destination unchanged when it is safe to emit, or a harmless
/// placeholder when it carries a dangerous protocol.
pub fn safe_url(url: &str) -> &str {
    let lowered = url.trim_start();
    let harmful = HARMFUL_PROTOCOLS.iter().any(|protocol| {
        lowered.len() >= protocol.len() && lowered[..protocol.len()].eq_ignore_ascii_case(protocol)
    });
    if !harmful {
        return url;
    }
    if ALLOWED_DATA_PREFIXES
        .iter()
        .any(|prefix| lowered.len() >= prefix.len() && lowered[..prefix.len()].eq_ignore_ascii_case(prefix))
    {
        return url;
    }
    "#harmful-link"
}
