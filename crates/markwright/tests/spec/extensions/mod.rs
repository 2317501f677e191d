//! Integration coverage for the extension plugins through the full
//! pipeline, including the combinations the per-plugin unit tests skip.

use crate::harness::run_extension_test;

mod tables {
    use super::run_extension_test;

    #[test]
    fn header_and_body() {
        run_extension_test(
            "| a | b |\n|---|---|\n| 1 | 2 |",
            "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td>1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n",
        );
    }

    #[test]
    fn alignment_attributes() {
        run_extension_test(
            "| l | c | r |\n|:--|:-:|--:|\n| 1 | 2 | 3 |",
            "<table>\n<thead>\n<tr>\n<th align=\"left\">l</th>\n<th align=\"center\">c</th>\n<th align=\"right\">r</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td align=\"left\">1</td>\n<td align=\"center\">2</td>\n<td align=\"right\">3</td>\n</tr>\n</tbody>\n</table>\n",
        );
    }

    #[test]
    fn header_only_table_has_no_tbody() {
        run_extension_test(
            "| a |\n|---|",
            "<table>\n<thead>\n<tr>\n<th>a</th>\n</tr>\n</thead>\n</table>\n",
        );
    }

    #[test]
    fn table_ends_at_blank_line() {
        run_extension_test(
            "| a |\n|---|\n| 1 |\n\nafter",
            "<table>\n<thead>\n<tr>\n<th>a</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td>1</td>\n</tr>\n</tbody>\n</table>\n<p>after</p>\n",
        );
    }
}

mod strikethrough {
    use super::run_extension_test;

    #[test]
    fn double_tilde() {
        run_extension_test("~~Hi~~ Hello, world!", "<p><del>Hi</del> Hello, world!</p>\n");
    }

    #[test]
    fn strikethrough_nests_with_emphasis() {
        run_extension_test(
            "*a ~~b~~ c*",
            "<p><em>a <del>b</del> c</em></p>\n",
        );
    }

    #[test]
    fn triple_tildes_do_not_strike() {
        run_extension_test("x ~~~a~~~ y", "<p>x ~~~a~~~ y</p>\n");
    }
}

mod task_lists {
    use super::run_extension_test;

    #[test]
    fn checked_and_unchecked() {
        run_extension_test(
            "- [ ] foo\n- [x] bar",
            "<ul>\n<li><input type=\"checkbox\" disabled /> foo</li>\n<li><input type=\"checkbox\" disabled checked /> bar</li>\n</ul>\n",
        );
    }

    #[test]
    fn marker_must_lead_the_item() {
        run_extension_test(
            "- foo [x] bar",
            "<ul>\n<li>foo [x] bar</li>\n</ul>\n",
        );
    }
}

mod linkify {
    use super::run_extension_test;

    #[test]
    fn url_in_running_text() {
        run_extension_test(
            "visit https://example.com today",
            "<p>visit <a href=\"https://example.com\">https://example.com</a> today</p>\n",
        );
    }

    #[test]
    fn explicit_links_are_untouched() {
        run_extension_test(
            "[here](https://example.com)",
            "<p><a href=\"https://example.com\">here</a></p>\n",
        );
    }
}

mod math {
    use super::run_extension_test;

    #[test]
    fn inline_and_block() {
        run_extension_test(
            "inline $a+b$ here\n\n$$\nc^2\n$$",
            "<p>inline <span class=\"math\">\\(a+b\\)</span> here</p>\n<div class=\"math\">$$c^2$$</div>\n",
        );
    }
}

mod footnotes {
    use super::run_extension_test;

    #[test]
    fn full_document_shape() {
        run_extension_test(
            "text[^a]\n\n[^a]: note",
            "<p>text<sup class=\"footnote-ref\"><a href=\"#fn-1\" id=\"fnref-1\">1</a></sup></p>\n<section class=\"footnotes\">\n<ol>\n<li id=\"fn-1\">\n<p>note<a href=\"#fnref-1\" class=\"footnote-backref\">\u{21A9}</a></p>\n</li>\n</ol>\n</section>\n",
        );
    }

    #[test]
    fn unused_definitions_emit_nothing() {
        run_extension_test("plain\n\n[^a]: unused", "<p>plain</p>\n");
    }
}

mod definition_lists {
    use super::run_extension_test;

    #[test]
    fn terms_run_inline_rules() {
        run_extension_test(
            "*Term*\n: meaning",
            "<dl>\n<dt><em>Term</em></dt>\n<dd>meaning</dd>\n</dl>\n",
        );
    }
}

mod abbreviations {
    use super::run_extension_test;

    #[test]
    fn expansion_inside_emphasis() {
        run_extension_test(
            "*the HTML spec*\n\n*[HTML]: HyperText Markup Language",
            "<p><em>the <abbr title=\"HyperText Markup Language\">HTML</abbr> spec</em></p>\n",
        );
    }
}
