//! HTML fragments to and from surface trees.
//!
//! Parsing goes through `html5ever`, so the tree matches what a browser
//! builds for the same fragment: misnested and unclosed tags are repaired
//! by the HTML tree-construction rules. The reader never fails.

use log::debug;
use markup5ever_rcdom::{Handle, NodeData};

use super::{Element, SurfaceNode, dom};

/// Name of the synthetic element wrapping a parsed fragment.
pub const ROOT_TAG: &str = "div";

/// Element nesting kept by the reader. Deeper subtrees are flattened to
/// their text.
pub const MAX_DEPTH: usize = 128;

/// Elements whose content is never editable text.
const DROPPED: &[&str] = &["script", "style", "template"];

/// Reads an HTML fragment into a surface tree rooted at a synthetic `div`.
pub fn parse(html: &str) -> Element {
    let fragment = dom::Fragment::parse(html);
    let mut root = Element::new(ROOT_TAG);
    if let Some(body) = fragment.body() {
        read_children(&body, &mut root, 1);
    }
    root
}

fn read_children(parent: &Handle, into: &mut Element, depth: usize) {
    for child in parent.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => into.push(SurfaceNode::text(&**contents.borrow())),
            NodeData::Element { name, attrs, .. } => {
                let tag: &str = &name.local;
                if DROPPED.contains(&tag) {
                    debug!("dropping <{tag}> from surface");
                    continue;
                }
                if depth >= MAX_DEPTH {
                    into.push(SurfaceNode::text(dom::text_content(child)));
                    continue;
                }
                let mut el = Element::new(tag);
                for attr in attrs.borrow().iter() {
                    el.attrs
                        .entry(attr.name.local.to_string())
                        .or_insert_with(|| attr.value.to_string());
                }
                read_children(child, &mut el, depth + 1);
                into.push(el);
            }
            // comments, doctypes and processing instructions
            _ => {}
        }
    }
}

/// Serializes an element and its subtree.
pub fn write(el: &Element) -> String {
    dom::outer_html(&to_handle(el))
}

/// Serializes only the children of `el`; the inverse of [`parse`].
pub fn write_inner(el: &Element) -> String {
    dom::inner_html(&to_handle(el))
}

fn to_handle(el: &Element) -> Handle {
    let handle = dom::create_element(&el.tag, &el.attrs);
    for child in &el.children {
        match child {
            SurfaceNode::Text(text) => dom::append(&handle, dom::create_text(text)),
            SurfaceNode::Element(child) => dom::append(&handle, to_handle(child)),
        }
    }
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_elements() {
        let root = parse("<p>Hello <b>world</b></p>");
        assert_eq!(
            root,
            Element::new("div").with_child(
                Element::new("p")
                    .with_text("Hello ")
                    .with_child(Element::new("b").with_text("world"))
            )
        );
    }

    #[test]
    fn void_and_self_closing_elements_have_no_children() {
        let root = parse(r#"a<br>b<img src="x.png"/>c"#);
        assert_eq!(root.children.len(), 5);
        assert_eq!(root.children[1], SurfaceNode::from(Element::new("br")));
        assert_eq!(
            root.children[3],
            SurfaceNode::from(Element::new("img").with_attr("src", "x.png"))
        );
    }

    #[test]
    fn comments_and_doctype_are_skipped() {
        let root = parse("<!DOCTYPE html>a<!-- note -->b");
        assert_eq!(root.children, vec![SurfaceNode::text("ab")]);
    }

    #[test]
    fn entities_are_decoded() {
        let root = parse("<p>a &amp; b &lt;c&gt;</p>");
        assert_eq!(root.text_content(), "a & b <c>");
    }

    #[test]
    fn stray_close_is_ignored() {
        let root = parse("a</span>b");
        assert_eq!(root.children, vec![SurfaceNode::text("ab")]);
    }

    #[test]
    fn misnested_formatting_is_reopened() {
        let root = parse("<p><b>bold</p>after");
        assert_eq!(
            root,
            Element::new("div")
                .with_child(Element::new("p").with_child(Element::new("b").with_text("bold")))
                .with_child(Element::new("b").with_text("after"))
        );
    }

    #[test]
    fn implied_end_tags_close_siblings() {
        let root = parse("<ul><li>one<li>two");
        assert_eq!(
            root,
            Element::new("div").with_child(
                Element::new("ul")
                    .with_child(Element::new("li").with_text("one"))
                    .with_child(Element::new("li").with_text("two"))
            )
        );

        let root = parse("<p>a<p>b");
        assert_eq!(
            root,
            Element::new("div")
                .with_child(Element::new("p").with_text("a"))
                .with_child(Element::new("p").with_text("b"))
        );
    }

    #[test]
    fn script_and_style_are_dropped() {
        let root = parse("<style>p { color: red }</style><p>x<script>alert(1)</script></p>");
        assert_eq!(root, Element::new("div").with_child(Element::new("p").with_text("x")));
    }

    #[test]
    fn deep_nesting_is_flattened_to_text() {
        let n = 5_000;
        let html = format!("{}x{}", "<span>".repeat(n), "</span>".repeat(n));
        let root = parse(&html);

        let mut depth = 1;
        let mut el = &root;
        while let [SurfaceNode::Element(child)] = el.children.as_slice() {
            depth += 1;
            el = child;
        }
        assert_eq!(depth, MAX_DEPTH);
        assert_eq!(el.children, vec![SurfaceNode::text("x")]);
    }

    #[test]
    fn literal_lt_is_text() {
        let root = parse("1 < 2");
        assert_eq!(root.children, vec![SurfaceNode::text("1 < 2")]);
    }

    #[test]
    fn write_escapes_text_and_attributes() {
        let el = Element::new("a")
            .with_attr("href", "/q?a=1&b=2")
            .with_text("<tag> & more");
        assert_eq!(
            write(&el),
            r#"<a href="/q?a=1&amp;b=2">&lt;tag&gt; &amp; more</a>"#
        );
    }

    #[test]
    fn write_inner_round_trips_through_parse() {
        let html = r#"<p>Hi <em>there</em><br></p><div data-x="1"></div>"#;
        assert_eq!(write_inner(&parse(html)), html);
    }
}
