//! The editor loader: writes a stored document back into an editable
//! surface when an article is reopened.
//!
//! The output is shaped so that encoding it again gives a structurally equal
//! document: lists are regrouped by level, consecutive spans sharing a link
//! share one anchor, and special blocks become the marker containers the
//! encoder detects.

use crate::{
    encoding::special::{Markers, encode_payload},
    model::{Block, BlockStyle, CodeKind, Document, ListKind, Mark, Span, TextBlock},
    rendering::groups::{ContentGroup, ListItem, group_blocks, kind_runs},
};

use super::{Element, SurfaceNode, html};

pub fn to_surface(doc: &Document) -> Element {
    let mut root = Element::new(html::ROOT_TAG);
    for group in group_blocks(&doc.blocks) {
        match group {
            ContentGroup::Single(block) => root.push(block_element(block)),
            ContentGroup::BulletList { items } => root.push(list_element(ListKind::Bullet, &items)),
            ContentGroup::NumberedList { items } => {
                root.push(list_element(ListKind::Number, &items))
            }
        }
    }
    root
}

fn list_element(kind: ListKind, items: &[ListItem<'_>]) -> Element {
    let mut list = Element::new(kind.tag());
    for item in items {
        let mut li = Element::new("li");
        if item.block.style == BlockStyle::Normal {
            push_spans(&mut li, item.block);
        } else {
            li.push(text_element(item.block));
        }
        for (kind, run) in kind_runs(&item.children) {
            li.push(list_element(kind, run));
        }
        list.push(li);
    }
    list
}

fn block_element(block: &Block) -> Element {
    match block {
        Block::Text(tb) => text_element(tb),
        Block::Image(img) => Element::new("div").with_attr(Markers::ASSET_REF, &img.asset_ref),
        Block::File(file) => Element::new("div")
            .with_attr(Markers::FILE_URL, &file.url)
            .with_attr(Markers::FILE_NAME, &file.name)
            .with_attr(Markers::FILE_SIZE, file.size_mb.to_string())
            .with_text(&file.name),
        Block::Code(code) => {
            let marker = match code.kind {
                CodeKind::Scripted => Markers::SNIPPET,
                CodeKind::Markup => Markers::MARKUP,
            };
            Element::new("div").with_attr(marker, encode_payload(&code.payload))
        }
        Block::Button(button) => Element::new("div")
            .with_attr(Markers::WIDGET, Markers::WIDGET_BUTTON)
            .with_attr(Markers::HREF, &button.url)
            .with_text(&button.text),
    }
}

fn text_element(tb: &TextBlock) -> Element {
    let mut el = Element::new(tb.style.tag());
    push_spans(&mut el, tb);
    el
}

/// Writes spans into `parent`, wrapping each run that shares a link in one
/// anchor.
fn push_spans(parent: &mut Element, tb: &TextBlock) {
    let spans = &tb.children;
    let mut i = 0;
    while i < spans.len() {
        let link = link_key(&spans[i]);
        let mut j = i + 1;
        while j < spans.len() && link_key(&spans[j]) == link {
            j += 1;
        }

        match link.and_then(|key| tb.mark_def(key)).and_then(|def| def.href()) {
            Some(href) => {
                let mut anchor = Element::new("a").with_attr("href", href);
                for span in &spans[i..j] {
                    push_span(&mut anchor, span);
                }
                parent.push(anchor);
            }
            None => {
                for span in &spans[i..j] {
                    push_span(parent, span);
                }
            }
        }
        i = j;
    }
}

fn link_key(span: &Span) -> Option<&str> {
    span.marks.iter().find_map(Mark::def_key)
}

/// Writes one span. An unmarked span holding a single newline is what a
/// `br` encodes to; any other text is written as it is.
fn push_span(parent: &mut Element, span: &Span) {
    if span.is_trusted_raw() {
        for child in html::parse(&span.text).children {
            parent.push(wrap(&span.marks, child));
        }
    } else if span.text == "\n" && span.marks.is_empty() {
        parent.push(Element::new("br"));
    } else if !span.text.is_empty() {
        parent.push(wrap(&span.marks, SurfaceNode::text(&span.text)));
    }
}

/// Wraps `node` in the intrinsic marks, first mark outermost.
fn wrap(marks: &[Mark], node: SurfaceNode) -> SurfaceNode {
    marks.iter().rev().fold(node, |inner, mark| {
        let tag = match mark {
            Mark::Strong => "strong",
            Mark::Em => "em",
            Mark::Underline => "u",
            Mark::TrustedRaw | Mark::Def(_) => return inner,
        };
        Element::new(tag).with_child(inner).into()
    })
}
