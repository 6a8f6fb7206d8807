//! `html5ever` DOM glue shared by the surface reader and the render-tree
//! writer.
//!
//! Fragments are parsed as the body of a full document and read back out of
//! the `body` element. Trees are serialized by building `RcDom` nodes and
//! handing them to the `html5ever` serializer.
//!
//! Dropping an `RcDom` empties every node it owned, including handles cloned
//! out of it, so a [`Fragment`] must outlive any use of its nodes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use html5ever::{
    Attribute, LocalName, QualName, ns, parse_document,
    serialize::{SerializeOpts, TraversalScope, serialize},
    tendril::TendrilSink,
};
use log::warn;
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

/// Opens the body explicitly so head-only elements such as `style` stay
/// where the fragment put them.
const BODY_OPEN: &str = "<body>";

/// A parsed HTML fragment.
pub struct Fragment {
    dom: RcDom,
}

impl Fragment {
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default())
            .one(format!("{BODY_OPEN}{html}"));
        Self { dom }
    }

    /// The `body` element holding the fragment's nodes.
    pub fn body(&self) -> Option<Handle> {
        child_element(&self.dom.document, "html").and_then(|root| child_element(&root, "body"))
    }

    /// Top-level nodes of the fragment.
    pub fn nodes(&self) -> Vec<Handle> {
        self.body()
            .map(|body| body.children.borrow().clone())
            .unwrap_or_default()
    }
}

/// The first child element of `parent` named `tag`.
pub fn child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| element_name(child).as_deref() == Some(tag))
        .cloned()
}

pub fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Concatenated text of every descendant, read without recursion.
pub fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Text { contents } = &node.data {
            out.push_str(&contents.borrow());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    out
}

pub fn create_element<N, V>(tag: &str, attrs: impl IntoIterator<Item = (N, V)>) -> Handle
where
    N: AsRef<str>,
    V: AsRef<str>,
{
    let attrs = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name.as_ref())),
            value: value.as_ref().to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(tag)),
            attrs: RefCell::new(attrs),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

pub fn create_bare_element(tag: &str) -> Handle {
    create_element(tag, std::iter::empty::<(&str, &str)>())
}

pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

pub fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

/// Serializes `handle` and its subtree.
pub fn outer_html(handle: &Handle) -> String {
    serialize_scope(handle, TraversalScope::IncludeNode)
}

/// Serializes the children of `handle` only.
pub fn inner_html(handle: &Handle) -> String {
    serialize_scope(handle, TraversalScope::ChildrenOnly(None))
}

fn serialize_scope(handle: &Handle, scope: TraversalScope) -> String {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    if let Err(e) = serialize(&mut output, &SerializableHandle::from(handle.clone()), opts) {
        warn!("HTML serialization failed: {e}");
    }
    match String::from_utf8(output) {
        Ok(html) => html,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn head_only_elements_stay_in_the_body() {
        let fragment = Fragment::parse("<style>p{}</style><p>x</p>");
        let names: Vec<_> = fragment.nodes().iter().filter_map(element_name).collect();
        assert_eq!(names, vec!["style", "p"]);
    }

    #[test]
    fn built_nodes_serialize() {
        let p = create_element("p", [("class", "a&b")]);
        append(&p, create_text("1 < 2"));
        append(&p, create_bare_element("br"));

        assert_eq!(outer_html(&p), r#"<p class="a&amp;b">1 &lt; 2<br></p>"#);
        assert_eq!(inner_html(&p), "1 &lt; 2<br>");
    }

    #[test]
    fn text_content_reads_nested_text() {
        let fragment = Fragment::parse("<p>a<b>b<i>c</i></b>d</p>");
        assert_eq!(text_content(&fragment.body().unwrap()), "abcd");
    }
}
