//! The shared directive envelope parser. Both source forms normalize to the
//! same [`Directive`] record before any handler runs:
//!
//! ```text
//! .. name:: argument                ```{name} argument
//!    :key: value                    :key: value
//!
//!    content                        content
//!                                   ```
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use markwright::BlockState;

/// A canonical directive envelope: name, title (the argument after the
/// name), `:key: value` options, and the raw nested content.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: String,
    pub title: String,
    pub options: Vec<(String, String)>,
    pub content: String,
}

impl Directive {
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

static RST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.\. +([a-zA-Z0-9_-]+):: *(.*)$").unwrap());
static OPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([a-zA-Z0-9_-]+): *(.*)$").unwrap());
static FENCE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(`{3,})\{([a-zA-Z0-9_-]+)\} *(.*)$").unwrap());

/// Pull leading `:key: value` option lines off a list of content lines.
fn split_options(lines: &[String]) -> (Vec<(String, String)>, usize) {
    let mut options = Vec::new();
    let mut consumed = 0;
    for line in lines {
        let Some(captures) = OPTION_LINE.captures(line.trim_start()) else {
            break;
        };
        options.push((captures[1].to_string(), captures[2].trim().to_string()));
        consumed += 1;
    }
    (options, consumed)
}

fn assemble(name: &str, title: &str, body: Vec<String>) -> Directive {
    let (options, consumed) = split_options(&body);
    let mut content_lines = &body[consumed..];
    while content_lines.first().is_some_and(|line| line.trim().is_empty()) {
        content_lines = &content_lines[1..];
    }
    let mut content = content_lines.join("\n");
    let trimmed = content.trim_end().len();
    content.truncate(trimmed);
    Directive {
        name: name.to_string(),
        title: title.trim().to_string(),
        options,
        content,
    }
}

/// Try to read an RST-form directive at the state's cursor. Returns the
/// directive and the number of lines it spans.
pub(crate) fn scan_rst(state: &BlockState) -> Option<(Directive, usize)> {
    if state.current_indent() > 3 {
        return None;
    }
    let captures = RST_MARKER.captures(state.current_content())?;
    let name = captures[1].to_string();
    let title = captures[2].to_string();

    // Everything indented at least three columns (or blank) belongs to the
    // directive body.
    let mut body = Vec::new();
    let mut index = state.cursor() + 1;
    let mut last_content = state.cursor();
    while index < state.line_count() {
        if state.line_is_blank(index) {
            body.push(String::new());
            index += 1;
            continue;
        }
        if state.line_indent(index) < 3 {
            break;
        }
        // Catch up for interior blanks, then dedent by three.
        body.push(dedent(state.line_text(index), 3));
        last_content = index;
        index += 1;
    }
    body.truncate(body.len() - (index - last_content - 1));

    Some((assemble(&name, &title, body), last_content + 1 - state.cursor()))
}

/// Try to read a fenced-form directive at the state's cursor.
pub(crate) fn scan_fenced(state: &BlockState) -> Option<(Directive, usize)> {
    if state.current_indent() > 3 {
        return None;
    }
    let captures = FENCE_MARKER.captures(state.current_content())?;
    let fence_len = captures[1].len();
    let name = captures[2].to_string();
    let title = captures[3].to_string();

    let mut body = Vec::new();
    let mut index = state.cursor() + 1;
    let mut closed = false;
    while index < state.line_count() {
        let content = state.line_content(index);
        let run = content.bytes().take_while(|&byte| byte == b'`').count();
        if state.line_indent(index) <= 3
            && run >= fence_len
            && content[run..].trim().is_empty()
        {
            closed = true;
            index += 1;
            break;
        }
        body.push(state.line_text(index).to_string());
        index += 1;
    }
    if !closed {
        return None;
    }

    Some((assemble(&name, &title, body), index - state.cursor()))
}

fn dedent(line: &str, columns: usize) -> String {
    let mut width = 0;
    for (offset, ch) in line.char_indices() {
        if width >= columns {
            return line[offset..].to_string();
        }
        match ch {
            ' ' => width += 1,
            '\t' => width += 4 - (width % 4),
            _ => return line[offset..].to_string(),
        }
    }
    String::new()
}
