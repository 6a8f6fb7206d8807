use std::collections::BTreeMap;

use markup5ever_rcdom::Handle;
use serde::Serialize;

use crate::{
    parsing::inline::style::format_style,
    surface::dom::{self, Fragment},
};

/// What happens when the user activates a node. Forwarded to the hooks by
/// [`super::Renderer::activate`]; the tree itself never navigates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum Activation {
    /// Click-to-enlarge on an image, carrying the resolved source.
    Image(String),
    Link(String),
}

/// Presentation tree handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderNode {
    #[serde(rename_all = "camelCase")]
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<RenderNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_activate: Option<Activation>,
    },
    Text {
        content: String,
    },
    LineBreak,
    /// Trusted markup inserted without escaping.
    Raw {
        html: String,
    },
}

impl RenderNode {
    pub fn element(tag: impl Into<String>) -> Self {
        RenderNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
            on_activate: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        RenderNode::Text {
            content: content.into(),
        }
    }

    pub fn raw(html: impl Into<String>) -> Self {
        RenderNode::Raw { html: html.into() }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let RenderNode::Element { ref mut attributes, .. } = self {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let RenderNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_styles(mut self, new_styles: BTreeMap<String, String>) -> Self {
        if let RenderNode::Element { ref mut styles, .. } = self {
            styles.extend(new_styles);
        }
        self
    }

    pub fn with_child(mut self, child: RenderNode) -> Self {
        if let RenderNode::Element { ref mut children, .. } = self {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<RenderNode>) -> Self {
        if let RenderNode::Element { ref mut children, .. } = self {
            children.extend(new_children);
        }
        self
    }

    pub fn on_activate(mut self, activation: Activation) -> Self {
        if let RenderNode::Element {
            ref mut on_activate,
            ..
        } = self
        {
            *on_activate = Some(activation);
        }
        self
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Every activation in the subtree, in document order.
    pub fn activations(&self) -> Vec<&Activation> {
        let mut out = Vec::new();
        collect_activations(self, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut raw = Vec::new();
        let holder = dom::create_bare_element("div");
        build_dom(self, &holder, &mut raw);
        dom::inner_html(&holder)
    }

    /// HTML of the children only.
    pub fn inner_html(&self) -> String {
        let mut raw = Vec::new();
        let holder = dom::create_bare_element("div");
        for child in self.children() {
            build_dom(child, &holder, &mut raw);
        }
        dom::inner_html(&holder)
    }
}

fn collect_activations<'a>(node: &'a RenderNode, out: &mut Vec<&'a Activation>) {
    if let RenderNode::Element {
        on_activate,
        children,
        ..
    } = node
    {
        if let Some(a) = on_activate {
            out.push(a);
        }
        for child in children {
            collect_activations(child, out);
        }
    }
}

/// Appends `node` under `parent`. Raw markup is parsed and its nodes are
/// spliced in; the parsed fragments are kept in `raw` until serialization.
fn build_dom(node: &RenderNode, parent: &Handle, raw: &mut Vec<Fragment>) {
    match node {
        RenderNode::Text { content } => dom::append(parent, dom::create_text(content)),
        RenderNode::LineBreak => dom::append(parent, dom::create_bare_element("br")),
        RenderNode::Raw { html } => {
            let fragment = Fragment::parse(html);
            for child in fragment.nodes() {
                dom::append(parent, child);
            }
            raw.push(fragment);
        }
        RenderNode::Element {
            tag,
            attributes,
            styles,
            children,
            ..
        } => {
            let mut attrs = attributes.clone();
            if !styles.is_empty() {
                attrs.insert("style".to_string(), format_style(styles));
            }
            let el = dom::create_element(tag, &attrs);
            for child in children {
                build_dom(child, &el, raw);
            }
            dom::append(parent, el);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn builder_and_html() {
        let node = RenderNode::element("p")
            .with_class("lead")
            .with_style("color", "red")
            .with_child(RenderNode::text("a < b"))
            .with_child(RenderNode::LineBreak)
            .with_child(RenderNode::raw("<b>raw</b>"));
        assert_snapshot!(node.to_html(), @r#"<p class="lead" style="color:red">a &lt; b<br><b>raw</b></p>"#);
    }

    #[test]
    fn raw_markup_keeps_its_subtree() {
        let node = RenderNode::element("div")
            .with_child(RenderNode::raw(r#"<ul><li><a href="/x">x</a></li></ul>"#))
            .with_child(RenderNode::raw("<hr>"));
        assert_eq!(
            node.inner_html(),
            r#"<ul><li><a href="/x">x</a></li></ul><hr>"#
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let node = RenderNode::element("a")
            .with_attr("href", "/q?a=1&b=\"2\"")
            .with_child(RenderNode::text("<x>"));
        assert_eq!(
            node.to_html(),
            r#"<a href="/q?a=1&amp;b=&quot;2&quot;">&lt;x&gt;</a>"#
        );
    }

    #[test]
    fn void_elements_have_no_close() {
        let node = RenderNode::element("img").with_attr("src", "a.png");
        assert_eq!(node.to_html(), r#"<img src="a.png">"#);
    }

    #[test]
    fn builders_ignore_non_elements() {
        let node = RenderNode::text("x").with_attr("a", "b").with_child(RenderNode::LineBreak);
        assert_eq!(node, RenderNode::text("x"));
        assert!(node.children().is_empty());
    }

    #[test]
    fn activations_in_document_order() {
        let node = RenderNode::element("div")
            .with_child(
                RenderNode::element("img").on_activate(Activation::Image("a.png".into())),
            )
            .with_child(RenderNode::element("a").on_activate(Activation::Link("/x".into())));
        assert_eq!(
            node.activations(),
            vec![
                &Activation::Image("a.png".into()),
                &Activation::Link("/x".into())
            ]
        );
    }

    #[test]
    fn serializes_with_type_tags() {
        let node = RenderNode::element("a")
            .on_activate(Activation::Link("/x".into()))
            .with_child(RenderNode::text("go"));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "element");
        assert_eq!(value["onActivate"]["kind"], "link");
        assert_eq!(value["children"][0]["type"], "text");
    }
}
