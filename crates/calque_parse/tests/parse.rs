//! Parser round-trip tests.
//!
//! Each case parses a fragment and re-serializes it, comparing against the
//! expected markup. Serialized output is normalized (attributes quoted,
//! entities re-escaped), so expectations are written in that form.

use calque_dom::{serialize, Document, NodeType};
use calque_parse::parse;

fn round_trip(src: &str) -> String {
    serialize(&parse(src))
}

// =============================================================================
// Basic structure
// =============================================================================

mod structure {
    use super::*;

    #[test]
    fn nested_elements() {
        assert_eq!(
            round_trip("<div><span>hello</span><span>bye</span></div>"),
            "<div><span>hello</span><span>bye</span></div>"
        );
    }

    #[test]
    fn multiple_top_level_nodes() {
        assert_eq!(
            round_trip("text<p>para</p><!-- c -->"),
            "text<p>para</p><!-- c -->"
        );
    }

    #[test]
    fn interpolation_braces_are_plain_text() {
        assert_eq!(
            round_trip("<p>Hello {{ name }}!</p>"),
            "<p>Hello {{ name }}!</p>"
        );
    }

    #[test]
    fn adjacent_text_runs_become_one_node() {
        let doc = parse("a<br>b");
        let root_children = doc.children(doc.root());
        assert_eq!(root_children.len(), 3);
        let doc = parse("a<3 b");
        let children = doc.children(doc.root());
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_type(children[0]), NodeType::Text);
        assert_eq!(doc.text(children[0]), Some("a<3 b"));
    }

    #[test]
    fn original_tag_case_is_preserved() {
        assert_eq!(round_trip("<DIV>x</div>"), "<DIV>x</DIV>");
    }
}

// =============================================================================
// Attributes
// =============================================================================

mod attributes {
    use super::*;

    #[test]
    fn quoted_unquoted_and_bare() {
        let doc = parse(r#"<input type="text" ng-model=user.name disabled>"#);
        let input = doc.children(doc.root())[0];
        assert_eq!(doc.attr(input, "type"), Some("text"));
        assert_eq!(doc.attr(input, "ng-model"), Some("user.name"));
        assert_eq!(doc.attr(input, "disabled"), Some(""));
    }

    #[test]
    fn single_quoted_value() {
        let doc = parse("<p title='a b'></p>");
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.attr(p, "title"), Some("a b"));
    }

    #[test]
    fn first_duplicate_wins() {
        let doc = parse(r#"<div class="a" class="b"></div>"#);
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.attr(div, "class"), Some("a"));
    }

    #[test]
    fn attribute_value_with_expression() {
        let doc = parse(r#"<li ng-repeat="item in items | orderBy:'name'"></li>"#);
        let li = doc.children(doc.root())[0];
        assert_eq!(doc.attr(li, "ng-repeat"), Some("item in items | orderBy:'name'"));
    }
}

// =============================================================================
// Recovery
// =============================================================================

mod recovery {
    use super::*;

    #[test]
    fn unmatched_end_tag_is_ignored() {
        assert_eq!(round_trip("<div></span></div>"), "<div></div>");
    }

    #[test]
    fn unclosed_elements_close_at_eof() {
        assert_eq!(round_trip("<ul><li>a<li>b"), "<ul><li>a<li>b</li></li></ul>");
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        assert_eq!(
            round_trip("<div><p><b>x</div>after"),
            "<div><p><b>x</b></p></div>after"
        );
    }

    #[test]
    fn doctype_is_dropped() {
        assert_eq!(round_trip("<!DOCTYPE html><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn unterminated_comment_swallows_rest() {
        assert_eq!(round_trip("a<!-- no end"), "a<!-- no end-->");
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        assert_eq!(round_trip("1 < 2"), "1 &lt; 2");
    }
}

// =============================================================================
// Void and raw-text elements
// =============================================================================

mod special_elements {
    use super::*;

    #[test]
    fn void_elements_take_no_children() {
        assert_eq!(
            round_trip(r#"<p>a<br>b<img src="x.png">c</p>"#),
            r#"<p>a<br>b<img src="x.png">c</p>"#
        );
    }

    #[test]
    fn self_closing_syntax_closes_normal_element() {
        assert_eq!(round_trip("<div/><p>x</p>"), "<div></div><p>x</p>");
    }

    #[test]
    fn script_content_is_not_parsed() {
        let doc = parse(r#"<script>if (a < b) { render("<div>"); }</script>"#);
        let script = doc.children(doc.root())[0];
        let children = doc.children(script);
        assert_eq!(children.len(), 1);
        assert_eq!(
            doc.text(children[0]),
            Some(r#"if (a < b) { render("<div>"); }"#)
        );
    }

    #[test]
    fn script_close_tag_is_case_insensitive() {
        let doc = parse("<script>x</SCRIPT><p>y</p>");
        assert_eq!(doc.children(doc.root()).len(), 2);
    }

    #[test]
    fn unterminated_script_runs_to_eof() {
        let doc = parse("<script>let x = 1;");
        let script = doc.children(doc.root())[0];
        assert_eq!(doc.text(doc.children(script)[0]), Some("let x = 1;"));
    }
}

// =============================================================================
// Document shape
// =============================================================================

mod document_shape {
    use super::*;

    #[test]
    fn empty_input_yields_empty_document() {
        let doc: Document = parse("");
        assert!(doc.children(doc.root()).is_empty());
    }

    #[test]
    fn full_page() {
        let src = "<html><head><title>t</title></head>\
                   <body><p ng-show=\"$visible\">hi</p></body></html>";
        assert_eq!(round_trip(src), src);
    }
}
