use serde::{Deserialize, Serialize};

use super::{
    keys::new_key,
    marks::{Mark, MarkDef},
};

/// Persisted structured content of one article: an ordered list of blocks.
///
/// Order is render order. A document handed to storage always holds at least
/// one block; see [`Document::placeholder`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// A single empty paragraph, used wherever a document would otherwise be
    /// empty.
    pub fn placeholder() -> Self {
        Self::new(vec![Block::Text(TextBlock::empty())])
    }

    /// Normalizes a legacy plain-text body into a single-block document.
    ///
    /// This is a render-time view only. The whole string is kept in one span so
    /// the inline decoder sees its newlines as line breaks rather than block
    /// boundaries.
    pub fn from_legacy(text: &str) -> Self {
        Self::new(vec![Block::Text(TextBlock::new(
            BlockStyle::Normal,
            vec![Span::new(text)],
        ))])
    }

    /// Returns `self`, or the placeholder if there are no blocks.
    pub fn or_placeholder(self) -> Self {
        if self.blocks.is_empty() {
            Self::placeholder()
        } else {
            self
        }
    }

    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Text(tb) => Some(tb),
            _ => None,
        })
    }
}

/// One structural unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),
    Image(ImageBlock),
    File(FileBlock),
    Code(CodeBlock),
    Button(ButtonBlock),
}

impl Block {
    pub fn key(&self) -> &str {
        match self {
            Block::Text(b) => &b.key,
            Block::Image(b) => &b.key,
            Block::File(b) => &b.key,
            Block::Code(b) => &b.key,
            Block::Button(b) => &b.key,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(tb) => Some(tb),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStyle {
    #[default]
    Normal,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Blockquote,
}

impl BlockStyle {
    /// Heading style for a level in `1..=6`.
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            5 => Some(Self::H5),
            6 => Some(Self::H6),
            _ => None,
        }
    }

    /// Presentational element name for this style.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Normal => "p",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Blockquote => "blockquote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bullet => "ul",
            Self::Number => "ol",
        }
    }
}

/// Styled text: paragraph, heading, quote or list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub key: String,
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListKind>,
    /// 1-based nesting depth, only set for list items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    pub children: Vec<Span>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
}

impl TextBlock {
    pub fn new(style: BlockStyle, children: Vec<Span>) -> Self {
        Self {
            key: new_key(),
            style,
            list_item: None,
            level: None,
            children,
            mark_defs: Vec::new(),
        }
    }

    /// A normal block holding exactly one empty span.
    pub fn empty() -> Self {
        Self::new(BlockStyle::Normal, vec![Span::new("")])
    }

    pub fn with_list_item(mut self, kind: ListKind, level: u8) -> Self {
        self.list_item = Some(kind);
        self.level = Some(level);
        self
    }

    pub fn with_mark_defs(mut self, defs: Vec<MarkDef>) -> Self {
        self.mark_defs = defs;
        self
    }

    pub fn is_list_item(&self) -> bool {
        self.list_item.is_some()
    }

    /// Concatenated text of all child spans.
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|d| d.key() == key)
    }

    /// Drops every definition that no child span references.
    pub fn prune_mark_defs(&mut self) {
        let children = &self.children;
        self.mark_defs
            .retain(|def| children.iter().any(|s| s.references(def.key())));
    }

    /// Removes def-backed marks whose key has no definition in this block.
    /// Returns how many marks were removed.
    pub fn strip_dangling_marks(&mut self) -> usize {
        let defs = &self.mark_defs;
        let mut removed = 0;
        for span in &mut self.children {
            let before = span.marks.len();
            span.marks.retain(|m| match m.def_key() {
                Some(key) => defs.iter().any(|d| d.key() == key),
                None => true,
            });
            removed += before - span.marks.len();
        }
        removed
    }
}

/// A run of text with a set of marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "span")]
pub struct Span {
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<Mark>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            key: new_key(),
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn with_marks(mut self, marks: impl IntoIterator<Item = Mark>) -> Self {
        for mark in marks {
            self.add_mark(mark);
        }
        self
    }

    /// Adds a mark unless it is already present.
    pub fn add_mark(&mut self, mark: Mark) {
        if !self.marks.contains(&mark) {
            self.marks.push(mark);
        }
    }

    pub fn has_mark(&self, mark: &Mark) -> bool {
        self.marks.contains(mark)
    }

    pub fn is_trusted_raw(&self) -> bool {
        self.has_mark(&Mark::TrustedRaw)
    }

    pub fn references(&self, def_key: &str) -> bool {
        self.marks.iter().any(|m| m.def_key() == Some(def_key))
    }

    pub(crate) fn trusted_raw(markup: String) -> Self {
        Self::new(markup).with_marks([Mark::TrustedRaw])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub key: String,
    pub asset_ref: String,
}

impl ImageBlock {
    pub fn new(asset_ref: impl Into<String>) -> Self {
        Self {
            key: new_key(),
            asset_ref: asset_ref.into(),
        }
    }
}

/// A downloadable attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBlock {
    pub key: String,
    pub url: String,
    pub name: String,
    pub size_mb: f64,
}

impl FileBlock {
    pub fn new(url: impl Into<String>, name: impl Into<String>, size_mb: f64) -> Self {
        Self {
            key: new_key(),
            url: url.into(),
            name: name.into(),
            size_mb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    /// Script evaluated by the external sandbox at render time.
    Scripted,
    /// Raw markup injected as trusted content.
    Markup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub key: String,
    pub kind: CodeKind,
    pub payload: String,
}

impl CodeBlock {
    pub fn new(kind: CodeKind, payload: impl Into<String>) -> Self {
        Self {
            key: new_key(),
            kind,
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonBlock {
    pub key: String,
    pub text: String,
    pub url: String,
}

impl ButtonBlock {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: new_key(),
            text: text.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn text_block_wire_shape() {
        let block = Block::Text(TextBlock {
            key: "b1".into(),
            style: BlockStyle::Normal,
            list_item: None,
            level: None,
            children: vec![Span {
                key: "s1".into(),
                text: "Visit".into(),
                marks: vec![Mark::Strong, Mark::Def("l1".into())],
            }],
            mark_defs: vec![MarkDef::Link {
                key: "l1".into(),
                href: "https://example.com".into(),
            }],
        });

        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "block",
                "key": "b1",
                "style": "normal",
                "children": [
                    {"type": "span", "key": "s1", "text": "Visit", "marks": ["strong", "l1"]}
                ],
                "markDefs": [{"type": "link", "key": "l1", "href": "https://example.com"}]
            })
        );
    }

    #[test]
    fn list_item_fields_serialize_when_present() {
        let block = Block::Text(
            TextBlock::new(BlockStyle::Normal, vec![Span::new("one")])
                .with_list_item(ListKind::Number, 2),
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["listItem"], json!("number"));
        assert_eq!(value["level"], json!(2));
    }

    #[test]
    fn special_blocks_are_tagged() {
        let blocks = vec![
            Block::Image(ImageBlock::new("asset-1")),
            Block::File(FileBlock::new("/f/report.pdf", "report.pdf", 1.5)),
            Block::Code(CodeBlock::new(CodeKind::Scripted, "print(1)")),
            Block::Button(ButtonBlock::new("Buy", "/shop")),
        ];
        let value = serde_json::to_value(&blocks).unwrap();
        assert_eq!(value[0]["type"], json!("image"));
        assert_eq!(value[0]["assetRef"], json!("asset-1"));
        assert_eq!(value[1]["type"], json!("file"));
        assert_eq!(value[1]["sizeMb"], json!(1.5));
        assert_eq!(value[2]["type"], json!("code"));
        assert_eq!(value[2]["kind"], json!("scripted"));
        assert_eq!(value[3]["type"], json!("button"));
    }

    #[test]
    fn document_round_trips_through_json() {
        let doc = Document::new(vec![
            Block::Text(TextBlock::new(BlockStyle::H2, vec![Span::new("Title")])),
            Block::Code(CodeBlock::new(CodeKind::Markup, "<b>x</b>")),
        ]);
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.starts_with('['));
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn missing_optional_fields_default() {
        let doc: Document = serde_json::from_str(
            r#"[{"type":"block","key":"b","children":[{"type":"span","key":"s","text":"hi"}]}]"#,
        )
        .unwrap();
        let tb = doc.blocks[0].as_text().unwrap();
        assert_eq!(tb.style, BlockStyle::Normal);
        assert!(tb.mark_defs.is_empty());
        assert!(tb.children[0].marks.is_empty());
    }

    #[test]
    fn placeholder_has_one_empty_span() {
        let doc = Document::placeholder();
        assert_eq!(doc.blocks.len(), 1);
        let tb = doc.blocks[0].as_text().unwrap();
        assert_eq!(tb.children.len(), 1);
        assert_eq!(tb.children[0].text, "");
    }

    #[test]
    fn legacy_text_stays_in_one_span() {
        let doc = Document::from_legacy("Line1\nLine2");
        assert_eq!(doc.blocks.len(), 1);
        let tb = doc.blocks[0].as_text().unwrap();
        assert_eq!(tb.children.len(), 1);
        assert_eq!(tb.plain_text(), "Line1\nLine2");
    }

    #[test]
    fn add_mark_is_idempotent() {
        let mut span = Span::new("x");
        span.add_mark(Mark::Strong);
        span.add_mark(Mark::Strong);
        assert_eq!(span.marks, vec![Mark::Strong]);
    }

    #[test]
    fn prune_drops_unreferenced_defs() {
        let used = MarkDef::link("https://used.example");
        let dead = MarkDef::link("https://dead.example");
        let mut tb = TextBlock::new(
            BlockStyle::Normal,
            vec![Span::new("a").with_marks([Mark::Def(used.key().to_string())])],
        )
        .with_mark_defs(vec![used.clone(), dead]);

        tb.prune_mark_defs();
        assert_eq!(tb.mark_defs, vec![used]);
    }

    #[test]
    fn strip_dangling_marks_keeps_intrinsics() {
        let mut tb = TextBlock::new(
            BlockStyle::Normal,
            vec![Span::new("a").with_marks([Mark::Strong, Mark::Def("missing".into())])],
        );
        assert_eq!(tb.strip_dangling_marks(), 1);
        assert_eq!(tb.children[0].marks, vec![Mark::Strong]);
    }
}
