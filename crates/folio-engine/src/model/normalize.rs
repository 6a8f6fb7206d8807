use serde::Serialize;

use super::{Block, Document, Mark, TextBlock};

/// Key-free view of a document for structural comparison.
///
/// Opaque keys are dropped and def-backed marks are replaced by what they
/// point at, so two encodes of the same surface compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snap {
    pub blocks: Vec<BlockSnap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block")]
pub enum BlockSnap {
    Text {
        style: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        list: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
        spans: Vec<SpanSnap>,
    },
    Image {
        asset_ref: String,
    },
    File {
        url: String,
        name: String,
        size_mb: f64,
    },
    Code {
        kind: String,
        payload: String,
    },
    Button {
        text: String,
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanSnap {
    pub text: String,
    /// Sorted mark labels; links appear as `link:<href>`.
    pub marks: Vec<String>,
}

pub fn normalize(doc: &Document) -> Snap {
    Snap {
        blocks: doc.blocks.iter().map(block_snap).collect(),
    }
}

fn block_snap(block: &Block) -> BlockSnap {
    match block {
        Block::Text(tb) => BlockSnap::Text {
            style: format!("{:?}", tb.style),
            list: tb.list_item.map(|k| format!("{k:?}")),
            level: tb.level,
            spans: tb.children.iter().map(|s| span_snap(tb, s)).collect(),
        },
        Block::Image(b) => BlockSnap::Image {
            asset_ref: b.asset_ref.clone(),
        },
        Block::File(b) => BlockSnap::File {
            url: b.url.clone(),
            name: b.name.clone(),
            size_mb: b.size_mb,
        },
        Block::Code(b) => BlockSnap::Code {
            kind: format!("{:?}", b.kind),
            payload: b.payload.clone(),
        },
        Block::Button(b) => BlockSnap::Button {
            text: b.text.clone(),
            url: b.url.clone(),
        },
    }
}

fn span_snap(tb: &TextBlock, span: &super::Span) -> SpanSnap {
    let mut marks: Vec<String> = span
        .marks
        .iter()
        .map(|m| match m {
            Mark::Def(key) => match tb.mark_def(key).and_then(|d| d.href()) {
                Some(href) => format!("link:{href}"),
                None => "dangling".to_string(),
            },
            other => other.as_str().to_string(),
        })
        .collect();
    marks.sort();
    SpanSnap {
        text: span.text.clone(),
        marks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockStyle, CodeBlock, CodeKind, MarkDef, Span};
    use pretty_assertions::assert_eq;

    fn linked_block(href: &str) -> Block {
        let def = MarkDef::link(href);
        Block::Text(
            TextBlock::new(
                BlockStyle::Normal,
                vec![Span::new("go").with_marks([Mark::Def(def.key().to_string()), Mark::Strong])],
            )
            .with_mark_defs(vec![def]),
        )
    }

    #[test]
    fn keys_do_not_affect_equality() {
        let a = Document::new(vec![linked_block("https://x.example")]);
        let b = Document::new(vec![linked_block("https://x.example")]);
        assert_ne!(a, b);
        assert_eq!(normalize(&a), normalize(&b));
    }

    #[test]
    fn links_resolve_to_href() {
        let snap = normalize(&Document::new(vec![linked_block("https://x.example")]));
        match &snap.blocks[0] {
            BlockSnap::Text { spans, .. } => {
                assert_eq!(spans[0].marks, vec!["link:https://x.example", "strong"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn code_snap_serializes_its_kind() {
        let doc = Document::new(vec![Block::Code(CodeBlock::new(CodeKind::Markup, "<hr>"))]);
        let value = serde_json::to_value(normalize(&doc)).unwrap();

        assert_eq!(value["blocks"][0]["block"], "Code");
        assert_eq!(value["blocks"][0]["kind"], "Markup");
        assert_eq!(value["blocks"][0]["payload"], "<hr>");
    }

    #[test]
    fn different_hrefs_differ() {
        let a = normalize(&Document::new(vec![linked_block("https://a.example")]));
        let b = normalize(&Document::new(vec![linked_block("https://b.example")]));
        assert_ne!(a, b);
    }
}
