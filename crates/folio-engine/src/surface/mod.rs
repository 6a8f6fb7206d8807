//! # Editable Surface
//!
//! The tree an editor widget exposes: text nodes and elements with a tag,
//! attributes and children. The encoder reads it; the loader writes a
//! document back into it when an article is reopened.
//!
//! - **`html`**: HTML-fragment reader and writer for surface trees
//! - **`dom`**: `html5ever` parsing and serialization helpers
//! - **`load`**: `Document` → surface (the editor loader)

pub(crate) mod dom;
pub mod html;
pub mod load;

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNode {
    Text(String),
    Element(Element),
}

impl SurfaceNode {
    pub fn text(text: impl Into<String>) -> Self {
        SurfaceNode::Text(text.into())
    }

    pub fn text_content(&self) -> String {
        match self {
            SurfaceNode::Text(t) => t.clone(),
            SurfaceNode::Element(el) => el.text_content(),
        }
    }
}

impl From<Element> for SurfaceNode {
    fn from(el: Element) -> Self {
        SurfaceNode::Element(el)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name.
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<SurfaceNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<SurfaceNode>) -> Self {
        self.push(child);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(SurfaceNode::text(text))
    }

    /// Appends a child, merging adjacent text nodes.
    pub fn push(&mut self, child: impl Into<SurfaceNode>) {
        match (child.into(), self.children.last_mut()) {
            (SurfaceNode::Text(t), Some(SurfaceNode::Text(prev))) => prev.push_str(&t),
            (child, _) => self.children.push(child),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        self.children.iter().map(SurfaceNode::text_content).collect()
    }
}
