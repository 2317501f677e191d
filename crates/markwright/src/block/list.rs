use crate::block::{thematic_break, BlockParser, BlockRule, BlockState, InteriorScan};
use crate::scanner::{strip_columns, TAB_STOP};
use crate::token::Token;

/// A parsed list item marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Marker {
    pub ordered: bool,
    /// The bullet character, or the `.`/`)` delimiter for ordered markers.
    pub glyph: u8,
    pub start: i64,
    /// Width of the marker itself in bytes (equal to columns, all ASCII).
    pub width: usize,
}

impl Marker {
    fn compatible(&self, other: &Marker) -> bool {
        self.ordered == other.ordered && self.glyph == other.glyph
    }
}

/// Parse a list marker at the start of `content`. The marker must be
/// followed by whitespace or the end of the line.
pub(crate) fn parse_marker(content: &str) -> Option<Marker> {
    let bytes = content.as_bytes();
    match bytes.first()? {
        b'-' | b'*' | b'+' => {
            if !matches!(bytes.get(1), None | Some(b' ') | Some(b'\t')) {
                return None;
            }
            Some(Marker {
                ordered: false,
                glyph: bytes[0],
                start: 0,
                width: 1,
            })
        }
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 {
                return None;
            }
            let glyph = *bytes.get(digits)?;
            if !matches!(glyph, b'.' | b')') {
                return None;
            }
            if !matches!(bytes.get(digits + 1), None | Some(b' ') | Some(b'\t')) {
                return None;
            }
            let start: i64 = content[..digits].parse().ok()?;
            Some(Marker {
                ordered: true,
                glyph,
                start,
                width: digits + 1,
            })
        }
        _ => None,
    }
}

/// Expanded width of the whitespace prefix of `text` when it begins at
/// column `col`, plus the byte offset of the first non-whitespace character.
fn indent_from_col(text: &str, col: usize) -> (usize, usize) {
    let mut width = 0;
    for (offset, byte) in text.bytes().enumerate() {
        match byte {
            b' ' => width += 1,
            b'\t' => width += TAB_STOP - ((col + width) % TAB_STOP),
            _ => return (width, offset),
        }
    }
    (width, text.len())
}

/// Whether a marker at the given line may interrupt an open paragraph:
/// bullets and ordered markers starting at 1, and only with content on the
/// marker line.
fn marker_interrupts(indent: usize, content: &str) -> bool {
    if indent > 3 || thematic_break::is_thematic_break(indent, content) {
        return false;
    }
    let Some(marker) = parse_marker(content) else {
        return false;
    };
    if marker.ordered && marker.start != 1 {
        return false;
    }
    !content[marker.width..].trim().is_empty()
}

struct Item {
    lines: Vec<String>,
    interior_blank: bool,
    trailing_blank: bool,
}

pub(crate) struct List;

impl BlockRule for List {
    fn name(&self) -> &'static str {
        "list"
    }

    fn matches(&self, state: &BlockState) -> bool {
        state.current().indent <= 3 && parse_marker(state.current_content()).is_some()
    }

    fn interrupts(&self, state: &BlockState, index: usize) -> bool {
        marker_interrupts(state.line(index).indent, state.line_content(index))
    }

    fn parse(&self, state: &mut BlockState, parser: &BlockParser) -> Option<()> {
        let first_marker = parse_marker(state.current_content())?;
        let mut items: Vec<Item> = Vec::new();
        let mut index = state.cursor;

        'list: while index < state.line_count() {
            // Loop entry invariant: `index` is at a compatible marker line.
            let line = *state.line(index);
            let content = state.line_content(index);
            let marker = parse_marker(content).expect("marker line expected");
            let marker_col = line.indent + marker.width;

            let rest = &content[marker.width..];
            let (spaces, offset) = indent_from_col(rest, marker_col);
            let (content_indent, first_line) = if rest.trim().is_empty() {
                (marker_col + 1, String::new())
            } else if spaces >= 5 {
                // More than four spaces after the marker: the content starts
                // one column in and the remainder is indented code.
                (marker_col + 1, strip_columns(rest, 1))
            } else {
                (marker_col + spaces, rest[offset..].to_string())
            };

            let mut item = Item {
                lines: Vec::new(),
                interior_blank: false,
                trailing_blank: false,
            };
            let mut scan = InteriorScan::new();
            let mut has_content = !first_line.trim().is_empty();
            let mut pending_blank = false;
            scan.feed(&first_line);
            item.lines.push(first_line);
            index += 1;

            while index < state.line_count() {
                let line = *state.line(index);
                if line.is_blank() {
                    // An item may begin with at most one blank line.
                    if !has_content {
                        break;
                    }
                    pending_blank = true;
                    item.lines.push(String::new());
                    index += 1;
                    continue;
                }
                if line.indent >= content_indent {
                    if pending_blank {
                        item.interior_blank = true;
                        pending_blank = false;
                    }
                    let stripped = strip_columns(state.line_text(index), content_indent);
                    scan.feed(&stripped);
                    item.lines.push(stripped);
                    has_content = true;
                    index += 1;
                    continue;
                }

                let next_content = state.line_content(index);
                if line.indent <= 3 {
                    if thematic_break::is_thematic_break(line.indent, next_content) {
                        break;
                    }
                    if let Some(next_marker) = parse_marker(next_content) {
                        if next_marker.compatible(&first_marker) {
                            // Close this item; the outer loop re-enters at
                            // the new marker line.
                            item.trailing_blank = pending_blank;
                            finish_item(&mut item);
                            items.push(item);
                            continue 'list;
                        }
                        break;
                    }
                }

                // Lazy continuation of the item's trailing paragraph.
                if !pending_blank
                    && scan.paragraph_open
                    && !parser.line_interrupts_paragraph(state, index)
                {
                    let text = next_content.to_string();
                    scan.feed(&text);
                    item.lines.push(text);
                    index += 1;
                    continue;
                }
                break;
            }

            item.trailing_blank = pending_blank;
            finish_item(&mut item);
            items.push(item);
            break;
        }

        if items.is_empty() {
            return None;
        }

        // The tightness fix-up, run once at close time: a list is loose when
        // any item holds blank-separated blocks, or a blank line separates
        // two items.
        let item_count = items.len();
        let loose = items.iter().enumerate().any(|(position, item)| {
            item.interior_blank || (item.trailing_blank && position + 1 < item_count)
        });

        let mut children = Vec::with_capacity(item_count);
        for item in items {
            let blocks = parser.parse_container(state, item.lines.join("\n"));
            children.push(Token::container("list_item", blocks).with_attr("tight", !loose));
        }

        let mut token = Token::container("list", children)
            .with_attr("ordered", first_marker.ordered)
            .with_attr("tight", !loose);
        if first_marker.ordered {
            token.attrs.set("start", first_marker.start);
        }
        state.append(token);

        let consumed = index - state.cursor;
        state.advance(consumed);
        Some(())
    }
}

fn finish_item(item: &mut Item) {
    while item.lines.last().is_some_and(|line| line.trim().is_empty()) {
        item.lines.pop();
    }
}

#[cfg(test)]
mod test {
    use crate::block::test::parse_blocks;
    use crate::token::Token;

    fn item_kinds(list: &Token) -> Vec<Vec<String>> {
        list.children()
            .iter()
            .map(|item| {
                item.children()
                    .iter()
                    .map(|child| child.kind.to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn simple_bullet_list() {
        let tokens = parse_blocks("- a\n- b\n- c");
        assert_eq!(tokens.len(), 1);
        let list = &tokens[0];
        assert_eq!(list.kind, "list");
        assert!(!list.attr_bool("ordered"));
        assert!(list.attr_bool("tight"));
        assert_eq!(list.children().len(), 3);
    }

    #[test]
    fn ordered_list_keeps_start() {
        let tokens = parse_blocks("3. a\n4. b");
        let list = &tokens[0];
        assert!(list.attr_bool("ordered"));
        assert_eq!(list.attr_int("start"), Some(3));
    }

    #[test]
    fn blank_between_items_makes_it_loose() {
        let tokens = parse_blocks("- a\n\n- b");
        assert!(!tokens[0].attr_bool("tight"));
    }

    #[test]
    fn trailing_blank_after_last_item_stays_tight() {
        let tokens = parse_blocks("- a\n- b\n\nafter");
        assert!(tokens[0].attr_bool("tight"));
        assert_eq!(tokens[1].kind, "paragraph");
    }

    #[test]
    fn blank_separated_blocks_in_item_make_it_loose() {
        let tokens = parse_blocks("- a\n\n  b");
        let list = &tokens[0];
        assert!(!list.attr_bool("tight"));
        assert_eq!(item_kinds(list), vec![vec!["paragraph", "paragraph"]]);
    }

    #[test]
    fn nested_list_via_indentation() {
        let tokens = parse_blocks("- a\n  - b");
        let list = &tokens[0];
        assert_eq!(list.children().len(), 1);
        let inner = &list.children()[0].children()[1];
        assert_eq!(inner.kind, "list");
    }

    #[test]
    fn changing_bullet_starts_a_new_list() {
        let tokens = parse_blocks("- a\n+ b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, "list");
        assert_eq!(tokens[1].kind, "list");
    }

    #[test]
    fn thematic_break_ends_the_list() {
        let tokens = parse_blocks("- a\n- - -");
        assert_eq!(tokens[0].kind, "list");
        assert_eq!(tokens[1].kind, "thematic_break");
    }

    #[test]
    fn lazy_continuation_in_items() {
        let tokens = parse_blocks("- a\nb");
        let item = &tokens[0].children()[0];
        assert_eq!(item.children()[0].text.as_deref(), Some("a\nb"));
    }

    #[test]
    fn ordered_list_not_starting_at_one_cannot_interrupt() {
        let tokens = parse_blocks("para\n2. item");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, "paragraph");
    }

    #[test]
    fn bullet_list_interrupts_paragraph() {
        let tokens = parse_blocks("para\n- item");
        assert_eq!(tokens[0].kind, "paragraph");
        assert_eq!(tokens[1].kind, "list");
    }

    #[test]
    fn empty_item_then_blank_closes_item() {
        let tokens = parse_blocks("-\n\n  foo");
        assert_eq!(tokens[0].kind, "list");
        let item = &tokens[0].children()[0];
        assert!(item.children().is_empty());
        assert_eq!(tokens[1].kind, "paragraph");
    }

    #[test]
    fn marker_with_code_distance() {
        let tokens = parse_blocks("-      code");
        let item = &tokens[0].children()[0];
        assert_eq!(item.children()[0].kind, "block_code");
    }
}
