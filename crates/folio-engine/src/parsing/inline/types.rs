use std::collections::BTreeMap;

/// Structured style list taken from a `style="key:value;..."` attribute.
pub type StyleMap = BTreeMap<String, String>;

/// A decoded inline node.
///
/// Nodes own their text; the decoder is not lossless and never needs to map
/// back to source offsets.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    /// Literal text.
    Text(String),
    /// An explicit newline.
    LineBreak,
    /// `[text](href)`. The text is never parsed further.
    Link { text: String, href: String },
    /// `**...**`
    Strong(Vec<InlineNode>),
    /// `*...*`
    Em(Vec<InlineNode>),
    /// One of the restricted raw container tags, with only its class and
    /// style carried over.
    Container {
        tag: ContainerTag,
        class: Option<String>,
        style: StyleMap,
        children: Vec<InlineNode>,
    },
    /// Self-closing image; rendered with a click-to-enlarge affordance.
    Media { src: String, alt: String },
    /// Framed embed; the body between the tags is discarded.
    Frame { src: String },
    /// Call-to-action; the label is literal text.
    Button { label: String, href: String },
    /// Trusted markup from a sentinel-marked span. Never produced from text.
    Raw(String),
}

impl InlineNode {
    /// Text content with markup removed, for previews and assertions.
    pub fn plain_text(&self) -> String {
        match self {
            InlineNode::Text(t) => t.clone(),
            InlineNode::LineBreak => "\n".to_string(),
            InlineNode::Link { text, .. } => text.clone(),
            InlineNode::Strong(children)
            | InlineNode::Em(children)
            | InlineNode::Container { children, .. } => {
                children.iter().map(InlineNode::plain_text).collect()
            }
            InlineNode::Media { alt, .. } => alt.clone(),
            InlineNode::Frame { .. } | InlineNode::Raw(_) => String::new(),
            InlineNode::Button { label, .. } => label.clone(),
        }
    }
}

/// The two raw container tags the inline grammar accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerTag {
    Div,
    Span,
}

impl ContainerTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "div" => Some(Self::Div),
            "span" => Some(Self::Span),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Span => "span",
        }
    }
}
