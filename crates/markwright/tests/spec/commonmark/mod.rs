//! A curated slice of the CommonMark 0.30 example suite, organized by spec
//! section. Expected output is the reference HTML verbatim.

use crate::harness::run_spec_test;

mod tabs {
    use super::run_spec_test;

    #[test]
    fn tab_expands_into_code_block() {
        run_spec_test("\tfoo\tbaz\t\tbim", "<pre><code>foo\tbaz\t\tbim\n</code></pre>\n");
    }

    #[test]
    fn spaces_plus_tab() {
        run_spec_test("  \tfoo", "<pre><code>foo\n</code></pre>\n");
    }
}

mod thematic_breaks {
    use super::run_spec_test;

    #[test]
    fn three_markers() {
        run_spec_test("***\n---\n___", "<hr />\n<hr />\n<hr />\n");
    }

    #[test]
    fn wrong_characters() {
        run_spec_test("+++", "<p>+++</p>\n");
    }

    #[test]
    fn not_enough_characters() {
        run_spec_test("--\n**\n__", "<p>--\n**\n__</p>\n");
    }

    #[test]
    fn up_to_three_spaces_of_indent() {
        run_spec_test(" ***\n  ***\n   ***", "<hr />\n<hr />\n<hr />\n");
    }

    #[test]
    fn four_spaces_is_code() {
        run_spec_test("    ***", "<pre><code>***\n</code></pre>\n");
    }

    #[test]
    fn spaces_allowed_between_markers() {
        run_spec_test(" - - -", "<hr />\n");
    }

    #[test]
    fn interrupts_a_paragraph() {
        run_spec_test("Foo\n***\nbar", "<p>Foo</p>\n<hr />\n<p>bar</p>\n");
    }

    #[test]
    fn dashes_after_paragraph_form_a_heading_instead() {
        run_spec_test("Foo\n---\nbar", "<h2>Foo</h2>\n<p>bar</p>\n");
    }

    #[test]
    fn break_splits_lists() {
        run_spec_test(
            "* Foo\n* * *\n* Bar",
            "<ul>\n<li>Foo</li>\n</ul>\n<hr />\n<ul>\n<li>Bar</li>\n</ul>\n",
        );
    }
}

mod atx_headings {
    use super::run_spec_test;

    #[test]
    fn all_levels() {
        run_spec_test(
            "# foo\n## foo\n### foo\n#### foo\n##### foo\n###### foo",
            "<h1>foo</h1>\n<h2>foo</h2>\n<h3>foo</h3>\n<h4>foo</h4>\n<h5>foo</h5>\n<h6>foo</h6>\n",
        );
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        run_spec_test("####### foo", "<p>####### foo</p>\n");
    }

    #[test]
    fn space_required_after_hashes() {
        run_spec_test("#5 bolt\n\n#hashtag", "<p>#5 bolt</p>\n<p>#hashtag</p>\n");
    }

    #[test]
    fn escaped_hash_is_text() {
        run_spec_test("\\## foo", "<p>## foo</p>\n");
    }

    #[test]
    fn contents_are_inline_parsed() {
        run_spec_test(
            "# foo *bar* \\*baz\\*",
            "<h1>foo <em>bar</em> *baz*</h1>\n",
        );
    }

    #[test]
    fn leading_and_trailing_whitespace_ignored() {
        run_spec_test("#                  foo                     ", "<h1>foo</h1>\n");
    }

    #[test]
    fn indented_heading_lines_join_paragraphs() {
        run_spec_test("foo\n    # bar", "<p>foo\n# bar</p>\n");
    }

    #[test]
    fn closing_sequences() {
        run_spec_test("## foo ##\n  ###   bar    ###", "<h2>foo</h2>\n<h3>bar</h3>\n");
    }

    #[test]
    fn long_closing_sequence() {
        run_spec_test(
            "# foo ##################################",
            "<h1>foo</h1>\n",
        );
    }

    #[test]
    fn closing_sequence_needs_preceding_space() {
        run_spec_test("### foo ### b", "<h3>foo ### b</h3>\n");
    }

    #[test]
    fn hash_glued_to_content_stays() {
        run_spec_test("# foo#", "<h1>foo#</h1>\n");
    }

    #[test]
    fn empty_headings() {
        run_spec_test("## \n#\n### ###", "<h2></h2>\n<h1></h1>\n<h3></h3>\n");
    }
}

mod setext_headings {
    use super::run_spec_test;

    #[test]
    fn basic_levels() {
        run_spec_test(
            "Foo *bar*\n=========\n\nFoo *bar*\n---------",
            "<h1>Foo <em>bar</em></h1>\n<h2>Foo <em>bar</em></h2>\n",
        );
    }

    #[test]
    fn underline_length_is_free() {
        run_spec_test(
            "Foo\n-------------------------\n\nFoo\n=",
            "<h2>Foo</h2>\n<h1>Foo</h1>\n",
        );
    }

    #[test]
    fn content_may_span_lines() {
        run_spec_test("Foo\nbar\n---\nbaz", "<h2>Foo\nbar</h2>\n<p>baz</p>\n");
    }

    #[test]
    fn four_space_indent_is_code() {
        run_spec_test(
            "    Foo\n    ---\n\n    Foo",
            "<pre><code>Foo\n---\n\nFoo\n</code></pre>\n",
        );
    }

    #[test]
    fn underline_cannot_be_lazy_in_a_quote() {
        run_spec_test(
            "> foo\n===",
            "<blockquote>\n<p>foo\n===</p>\n</blockquote>\n",
        );
    }

    #[test]
    fn dashes_after_quote_are_a_break() {
        run_spec_test("> Foo\n---", "<blockquote>\n<p>Foo</p>\n</blockquote>\n<hr />\n");
    }
}

mod indented_code {
    use super::run_spec_test;

    #[test]
    fn simple_block() {
        run_spec_test(
            "    a simple\n      indented code block",
            "<pre><code>a simple\n  indented code block\n</code></pre>\n",
        );
    }

    #[test]
    fn chunks_with_blank_lines() {
        run_spec_test(
            "    chunk1\n\n    chunk2\n  \n \n \n    chunk3",
            "<pre><code>chunk1\n\nchunk2\n\n\n\nchunk3\n</code></pre>\n",
        );
    }

    #[test]
    fn cannot_interrupt_a_paragraph() {
        run_spec_test("Foo\n    bar", "<p>Foo\nbar</p>\n");
    }

    #[test]
    fn paragraph_may_follow_directly() {
        run_spec_test("    foo\nbar", "<pre><code>foo\n</code></pre>\n<p>bar</p>\n");
    }

    #[test]
    fn contents_are_literal() {
        run_spec_test(
            "    <a/>\n    *hi*",
            "<pre><code>&lt;a/&gt;\n*hi*\n</code></pre>\n",
        );
    }
}

mod fenced_code {
    use super::run_spec_test;

    #[test]
    fn backtick_fence_with_literal_content() {
        run_spec_test("```\n<\n >\n```", "<pre><code>&lt;\n &gt;\n</code></pre>\n");
    }

    #[test]
    fn tilde_fence() {
        run_spec_test("~~~\n<\n >\n~~~", "<pre><code>&lt;\n &gt;\n</code></pre>\n");
    }

    #[test]
    fn closing_fence_must_use_same_character() {
        run_spec_test("```\naaa\n~~~\n```", "<pre><code>aaa\n~~~\n</code></pre>\n");
    }

    #[test]
    fn closing_fence_must_be_long_enough() {
        run_spec_test("````\naaa\n```\n``````", "<pre><code>aaa\n```\n</code></pre>\n");
    }

    #[test]
    fn empty_and_blank_content() {
        run_spec_test("```\n\n  \n```", "<pre><code>\n  \n</code></pre>\n");
    }

    #[test]
    fn empty_block() {
        run_spec_test("```\n```", "<pre><code></code></pre>\n");
    }

    #[test]
    fn fence_indent_is_stripped_from_content() {
        run_spec_test(
            " ```\n aaa\naaa\n```",
            "<pre><code>aaa\naaa\n</code></pre>\n",
        );
    }

    #[test]
    fn info_string_sets_the_language_class() {
        run_spec_test(
            "```ruby\ndef foo(x)\n  return 3\nend\n```",
            "<pre><code class=\"language-ruby\">def foo(x)\n  return 3\nend\n</code></pre>\n",
        );
    }

    #[test]
    fn interrupts_paragraphs_without_blank_lines() {
        run_spec_test(
            "foo\n```\nbar\n```\nbaz",
            "<p>foo</p>\n<pre><code>bar\n</code></pre>\n<p>baz</p>\n",
        );
    }
}

mod html_blocks {
    use super::run_spec_test;

    #[test]
    fn div_runs_to_blank_line() {
        run_spec_test(
            "<div>\n*foo*\n\n*bar*",
            "<div>\n*foo*\n<p><em>bar</em></p>\n",
        );
    }

    #[test]
    fn markdown_between_tag_paragraphs() {
        run_spec_test(
            "<DIV CLASS=\"foo\">\n\n*Markdown*\n\n</DIV>",
            "<DIV CLASS=\"foo\">\n<p><em>Markdown</em></p>\n</DIV>\n",
        );
    }

    #[test]
    fn comment_block_spans_blank_lines() {
        run_spec_test(
            "<!-- Foo\n\nbar\n   baz -->\nokay",
            "<!-- Foo\n\nbar\n   baz -->\n<p>okay</p>\n",
        );
    }

    #[test]
    fn processing_instruction_block() {
        run_spec_test(
            "<?php\n\n  echo '>';\n\n?>\nokay",
            "<?php\n\n  echo '>';\n\n?>\n<p>okay</p>\n",
        );
    }

    #[test]
    fn declaration_block() {
        run_spec_test("<!DOCTYPE html>", "<!DOCTYPE html>\n");
    }

    #[test]
    fn raw_pre_block() {
        run_spec_test(
            "<pre language=\"haskell\"><code>\nimport Text.HTML.TagSoup\n\nmain :: IO ()\nmain = print $ parseTags tags\n</code></pre>\nokay",
            "<pre language=\"haskell\"><code>\nimport Text.HTML.TagSoup\n\nmain :: IO ()\nmain = print $ parseTags tags\n</code></pre>\n<p>okay</p>\n",
        );
    }

    #[test]
    fn complete_tag_cannot_interrupt() {
        run_spec_test(
            "Foo\n<a href=\"bar\">\nbaz",
            "<p>Foo\n<a href=\"bar\">\nbaz</p>\n",
        );
    }
}

mod link_reference_definitions {
    use super::run_spec_test;

    #[test]
    fn basic_definition() {
        run_spec_test(
            "[foo]: /url \"title\"\n\n[foo]",
            "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
        );
    }

    #[test]
    fn definition_after_use() {
        run_spec_test("[foo]\n\n[foo]: url", "<p><a href=\"url\">foo</a></p>\n");
    }

    #[test]
    fn first_definition_wins() {
        run_spec_test(
            "[foo]: first\n[foo]: second\n\n[foo]",
            "<p><a href=\"first\">foo</a></p>\n",
        );
    }

    #[test]
    fn labels_are_case_insensitive() {
        run_spec_test("[FOO]: /url\n\n[Foo]", "<p><a href=\"/url\">Foo</a></p>\n");
    }

    #[test]
    fn garbage_after_title_invalidates() {
        run_spec_test(
            "[foo]: /url \"title\" ok",
            "<p>[foo]: /url &quot;title&quot; ok</p>\n",
        );
    }

    #[test]
    fn cannot_interrupt_a_paragraph() {
        run_spec_test(
            "Foo\n[bar]: /baz\n\n[bar]",
            "<p>Foo\n[bar]: /baz</p>\n<p>[bar]</p>\n",
        );
    }
}

mod paragraphs {
    use super::run_spec_test;

    #[test]
    fn two_paragraphs() {
        run_spec_test("aaa\n\nbbb", "<p>aaa</p>\n<p>bbb</p>\n");
    }

    #[test]
    fn leading_spaces_are_skipped() {
        run_spec_test("  aaa\n bbb", "<p>aaa\nbbb</p>\n");
    }

    #[test]
    fn deep_continuation_indent_is_fine() {
        run_spec_test(
            "aaa\n             bbb\n                                       ccc",
            "<p>aaa\nbbb\nccc</p>\n",
        );
    }
}

mod block_quotes {
    use super::run_spec_test;

    #[test]
    fn basic_quote() {
        run_spec_test(
            "> # Foo\n> bar\n> baz",
            "<blockquote>\n<h1>Foo</h1>\n<p>bar\nbaz</p>\n</blockquote>\n",
        );
    }

    #[test]
    fn space_after_marker_is_optional() {
        run_spec_test(
            "># Foo\n>bar\n> baz",
            "<blockquote>\n<h1>Foo</h1>\n<p>bar\nbaz</p>\n</blockquote>\n",
        );
    }

    #[test]
    fn lazy_and_marked_lines_mix() {
        run_spec_test(
            "> bar\nbaz\n> foo",
            "<blockquote>\n<p>bar\nbaz\nfoo</p>\n</blockquote>\n",
        );
    }

    #[test]
    fn empty_quote() {
        run_spec_test(">", "<blockquote>\n</blockquote>\n");
    }

    #[test]
    fn blank_line_separates_quotes() {
        run_spec_test(
            "> foo\n\n> bar",
            "<blockquote>\n<p>foo</p>\n</blockquote>\n<blockquote>\n<p>bar</p>\n</blockquote>\n",
        );
    }

    #[test]
    fn quote_can_interrupt_a_paragraph() {
        run_spec_test(
            "foo\n> bar",
            "<p>foo</p>\n<blockquote>\n<p>bar</p>\n</blockquote>\n",
        );
    }

    #[test]
    fn nested_with_lazy_continuation() {
        run_spec_test(
            "> > > foo\nbar",
            "<blockquote>\n<blockquote>\n<blockquote>\n<p>foo\nbar</p>\n</blockquote>\n</blockquote>\n</blockquote>\n",
        );
    }
}

mod lists {
    use super::run_spec_test;

    #[test]
    fn tight_bullet_list() {
        run_spec_test(
            "- foo\n- bar\n- baz",
            "<ul>\n<li>foo</li>\n<li>bar</li>\n<li>baz</li>\n</ul>\n",
        );
    }

    #[test]
    fn changing_the_bullet_starts_a_new_list() {
        run_spec_test(
            "- foo\n- bar\n+ baz",
            "<ul>\n<li>foo</li>\n<li>bar</li>\n</ul>\n<ul>\n<li>baz</li>\n</ul>\n",
        );
    }

    #[test]
    fn under_indented_continuation_falls_out() {
        run_spec_test(
            "- one\n\n two",
            "<ul>\n<li>one</li>\n</ul>\n<p>two</p>\n",
        );
    }

    #[test]
    fn indented_continuation_makes_it_loose() {
        run_spec_test(
            "- one\n\n  two",
            "<ul>\n<li>\n<p>one</p>\n<p>two</p>\n</li>\n</ul>\n",
        );
    }

    #[test]
    fn marker_needs_following_space() {
        run_spec_test("-one\n\n2.two", "<p>-one</p>\n<p>2.two</p>\n");
    }

    #[test]
    fn ordered_list_with_start() {
        run_spec_test(
            "3. a\n4. b",
            "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>\n",
        );
    }

    #[test]
    fn nine_digit_starts_are_allowed() {
        run_spec_test(
            "123456789. ok",
            "<ol start=\"123456789\">\n<li>ok</li>\n</ol>\n",
        );
    }

    #[test]
    fn ten_digits_are_not() {
        run_spec_test("1234567890. not ok", "<p>1234567890. not ok</p>\n");
    }

    #[test]
    fn zero_start() {
        run_spec_test("0. ok", "<ol start=\"0\">\n<li>ok</li>\n</ol>\n");
    }

    #[test]
    fn item_with_multiple_blocks() {
        run_spec_test(
            "1.  foo\n\n    ```\n    bar\n    ```\n\n    baz",
            "<ol>\n<li>\n<p>foo</p>\n<pre><code>bar\n</code></pre>\n<p>baz</p>\n</li>\n</ol>\n",
        );
    }

    #[test]
    fn nested_tight_lists() {
        run_spec_test(
            "- foo\n  - bar",
            "<ul>\n<li>foo\n<ul>\n<li>bar</li>\n</ul>\n</li>\n</ul>\n",
        );
    }

    #[test]
    fn blank_line_between_items_loosens() {
        run_spec_test(
            "- a\n\n- b",
            "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n",
        );
    }

    #[test]
    fn blockquote_inside_an_item() {
        run_spec_test(
            "- > quoted",
            "<ul>\n<li>\n<blockquote>\n<p>quoted</p>\n</blockquote>\n</li>\n</ul>\n",
        );
    }

    #[test]
    fn paragraph_interrupted_by_bullet_list() {
        run_spec_test(
            "Foo\n- bar",
            "<p>Foo</p>\n<ul>\n<li>bar</li>\n</ul>\n",
        );
    }

    #[test]
    fn ordered_interrupt_requires_start_one() {
        run_spec_test("Foo\n2. bar", "<p>Foo\n2. bar</p>\n");
    }
}

mod code_spans {
    use super::run_spec_test;

    #[test]
    fn simple_span() {
        run_spec_test("`foo`", "<p><code>foo</code></p>\n");
    }

    #[test]
    fn double_backtick_delimiters() {
        run_spec_test("`` foo ` bar ``", "<p><code>foo ` bar</code></p>\n");
    }

    #[test]
    fn backslashes_are_literal_inside() {
        run_spec_test("`foo\\`bar`", "<p><code>foo\\</code>bar`</p>\n");
    }

    #[test]
    fn span_binds_tighter_than_emphasis() {
        run_spec_test("*foo`*`", "<p>*foo<code>*</code></p>\n");
    }

    #[test]
    fn line_endings_become_spaces() {
        run_spec_test("`foo\nbar`", "<p><code>foo bar</code></p>\n");
    }
}

mod emphasis {
    use super::run_spec_test;

    #[test]
    fn simple_emphasis() {
        run_spec_test("*foo bar*", "<p><em>foo bar</em></p>\n");
    }

    #[test]
    fn opening_star_before_whitespace_fails() {
        run_spec_test("a * foo bar*", "<p>a * foo bar*</p>\n");
    }

    #[test]
    fn intraword_star_works() {
        run_spec_test("foo*bar*", "<p>foo<em>bar</em></p>\n");
    }

    #[test]
    fn intraword_underscore_does_not() {
        run_spec_test("foo_bar_", "<p>foo_bar_</p>\n");
    }

    #[test]
    fn strong_emphasis() {
        run_spec_test("**foo bar**", "<p><strong>foo bar</strong></p>\n");
    }

    #[test]
    fn nested_strong_inside_emphasis() {
        run_spec_test("*(**foo**)*", "<p><em>(<strong>foo</strong>)</em></p>\n");
    }

    #[test]
    fn triple_stars_nest_strong_in_em() {
        run_spec_test("***foo***", "<p><em><strong>foo</strong></em></p>\n");
    }

    #[test]
    fn star_runs_share_between_pairs() {
        run_spec_test(
            "*foo**bar**baz*",
            "<p><em>foo<strong>bar</strong>baz</em></p>\n",
        );
    }

    #[test]
    fn leftover_opener_is_literal() {
        run_spec_test("**foo*", "<p>*<em>foo</em></p>\n");
    }

    #[test]
    fn leftover_closer_is_literal() {
        run_spec_test("*foo**", "<p><em>foo</em>*</p>\n");
    }

    #[test]
    fn punctuation_underscore_emphasis() {
        run_spec_test("foo-_(bar)_", "<p>foo-<em>(bar)</em></p>\n");
    }

    #[test]
    fn interior_underscores_stay_literal() {
        run_spec_test("_foo_bar_baz_", "<p><em>foo_bar_baz</em></p>\n");
    }

    #[test]
    fn trailing_run_with_no_opener() {
        run_spec_test("foo ***", "<p>foo ***</p>\n");
    }

    #[test]
    fn strong_pairs_in_sequence() {
        run_spec_test(
            "**foo**bar**baz**",
            "<p><strong>foo</strong>bar<strong>baz</strong></p>\n",
        );
    }
}

mod links {
    use super::run_spec_test;

    #[test]
    fn inline_link_with_title() {
        run_spec_test(
            "[link](/uri \"title\")",
            "<p><a href=\"/uri\" title=\"title\">link</a></p>\n",
        );
    }

    #[test]
    fn inline_link_without_title() {
        run_spec_test("[link](/uri)", "<p><a href=\"/uri\">link</a></p>\n");
    }

    #[test]
    fn empty_destination() {
        run_spec_test("[link]()", "<p><a href=\"\">link</a></p>\n");
    }

    #[test]
    fn space_in_bare_destination_fails() {
        run_spec_test("[link](/my uri)", "<p>[link](/my uri)</p>\n");
    }

    #[test]
    fn angle_destination_allows_spaces() {
        run_spec_test("[link](</my uri>)", "<p><a href=\"/my%20uri\">link</a></p>\n");
    }

    #[test]
    fn escaped_parens_in_destination() {
        run_spec_test(
            "[link](foo\\(and\\(bar\\))",
            "<p><a href=\"foo(and(bar)\">link</a></p>\n",
        );
    }

    #[test]
    fn balanced_parens_in_destination() {
        run_spec_test("[link](foo(and(bar)))", "<p><a href=\"foo(and(bar))\">link</a></p>\n");
    }

    #[test]
    fn unmatched_inner_brackets_are_literal() {
        run_spec_test(
            "[link [foo [bar]]](/uri)",
            "<p><a href=\"/uri\">link [foo [bar]]</a></p>\n",
        );
    }

    #[test]
    fn emphasis_inside_link_text() {
        run_spec_test(
            "[link *foo **bar** `#`*](/uri)",
            "<p><a href=\"/uri\">link <em>foo <strong>bar</strong> <code>#</code></em></a></p>\n",
        );
    }

    #[test]
    fn full_reference_link() {
        run_spec_test(
            "[foo][bar]\n\n[bar]: /url \"title\"",
            "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
        );
    }

    #[test]
    fn collapsed_reference_link() {
        run_spec_test(
            "[foo][]\n\n[foo]: /url \"title\"",
            "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
        );
    }

    #[test]
    fn shortcut_reference_link() {
        run_spec_test(
            "[foo]\n\n[foo]: /url \"title\"",
            "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
        );
    }

    #[test]
    fn undefined_reference_is_literal() {
        run_spec_test("[bar][foo]", "<p>[bar][foo]</p>\n");
    }

    #[test]
    fn image_with_title() {
        run_spec_test(
            "![foo](/url \"title\")",
            "<p><img src=\"/url\" alt=\"foo\" title=\"title\" /></p>\n",
        );
    }

    #[test]
    fn image_alt_text_is_plain() {
        run_spec_test(
            "![foo *bar*](train.jpg)",
            "<p><img src=\"train.jpg\" alt=\"foo bar\" /></p>\n",
        );
    }
}

mod autolinks {
    use super::run_spec_test;

    #[test]
    fn uri_autolink() {
        run_spec_test(
            "<http://foo.bar.baz>",
            "<p><a href=\"http://foo.bar.baz\">http://foo.bar.baz</a></p>\n",
        );
    }

    #[test]
    fn uri_with_query() {
        run_spec_test(
            "<http://foo.bar.baz/test?q=hello&id=22&boolean>",
            "<p><a href=\"http://foo.bar.baz/test?q=hello&amp;id=22&amp;boolean\">http://foo.bar.baz/test?q=hello&amp;id=22&amp;boolean</a></p>\n",
        );
    }

    #[test]
    fn email_autolink() {
        run_spec_test(
            "<foo@bar.example.com>",
            "<p><a href=\"mailto:foo@bar.example.com\">foo@bar.example.com</a></p>\n",
        );
    }

    #[test]
    fn empty_angle_brackets() {
        run_spec_test("<>", "<p>&lt;&gt;</p>\n");
    }

    #[test]
    fn spaces_disqualify() {
        run_spec_test("<http://foo.bar/baz bim>", "<p>&lt;http://foo.bar/baz bim&gt;</p>\n");
    }
}

mod entities {
    use super::run_spec_test;

    #[test]
    fn named_entities() {
        run_spec_test(
            "&nbsp; &amp; &copy; &AElig;",
            "<p>\u{A0} &amp; \u{A9} \u{C6}</p>\n",
        );
    }

    #[test]
    fn numeric_references() {
        run_spec_test("&#35; &#1234; &#X22;", "<p># \u{4D2} &quot;</p>\n");
    }

    #[test]
    fn unknown_names_are_literal() {
        run_spec_test("&MadeUpEntity;", "<p>&amp;MadeUpEntity;</p>\n");
    }

    #[test]
    fn entities_are_literal_in_code() {
        run_spec_test("`&amp;`", "<p><code>&amp;amp;</code></p>\n");
    }
}

mod escapes {
    use super::run_spec_test;

    #[test]
    fn punctuation_can_be_escaped() {
        run_spec_test("\\*not emphasized\\*", "<p>*not emphasized*</p>\n");
    }

    #[test]
    fn escaped_backslash_before_emphasis() {
        run_spec_test("\\\\*emphasis*", "<p>\\<em>emphasis</em></p>\n");
    }

    #[test]
    fn non_punctuation_keeps_the_backslash() {
        run_spec_test("\\A\\a\\ \\3", "<p>\\A\\a\\ \\3</p>\n");
    }
}

mod breaks {
    use super::run_spec_test;

    #[test]
    fn two_spaces_make_a_hard_break() {
        run_spec_test("foo  \nbaz", "<p>foo<br />\nbaz</p>\n");
    }

    #[test]
    fn backslash_makes_a_hard_break() {
        run_spec_test("foo\\\nbaz", "<p>foo<br />\nbaz</p>\n");
    }

    #[test]
    fn single_space_is_a_soft_break() {
        run_spec_test("foo \nbaz", "<p>foo\nbaz</p>\n");
    }
}
