//! # Encoding
//!
//! Editable surface → [`Document`].
//!
//! The encoder walks the surface depth-first. Decorations are carried down
//! as an immutable [`ActiveMarks`] context and merged into leaf spans; block
//! level elements gather the inline pieces beneath them into text blocks on
//! the way back up.
//!
//! ## Modules
//!
//! - **`marks`**: `ActiveMarks` and the per-encode `MarkDefTable`
//! - **`special`**: marker attributes that produce code, file, button and image blocks
//! - **`embed`**: reconstructed `img`/`iframe` strings kept in trusted-raw spans
//!
//! ## Trust
//!
//! The trusted-raw sentinel is only ever attached here, to embed strings the
//! encoder rebuilt itself. Code blocks require an [`AuthorRole::Trusted`]
//! encoder.

pub mod embed;
pub mod marks;
pub mod special;

use log::{debug, warn};

use crate::{
    model::{Block, BlockStyle, Document, ListKind, Mark, Span, TextBlock},
    surface::{Element, SurfaceNode},
};

pub use embed::Embed;
pub use marks::{ActiveMarks, MarkDefTable};

/// Who is saving the content. Decides whether code markers are honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorRole {
    #[default]
    Contributor,
    Trusted,
}

impl AuthorRole {
    pub fn may_author_code(self) -> bool {
        matches!(self, AuthorRole::Trusted)
    }
}

/// Element names handled as generic containers.
pub const GENERIC_CONTAINERS: &[&str] = &[
    "div", "section", "article", "figure", "header", "footer", "main", "aside", "nav",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    role: AuthorRole,
}

impl Encoder {
    pub fn new(role: AuthorRole) -> Self {
        Self { role }
    }

    pub fn trusted() -> Self {
        Self::new(AuthorRole::Trusted)
    }

    /// Encodes the surface rooted at `root`. Never fails; the result always
    /// holds at least one block.
    pub fn encode(&self, root: &Element) -> Document {
        let mut walker = Walker {
            role: self.role,
            defs: MarkDefTable::default(),
        };
        let mut pieces = Vec::new();
        walker.walk_element(root, &Context::default(), &mut pieces);
        let pieces = assemble(pieces, &Shape::container());
        walker.finish(pieces)
    }
}

/// Encodes with the default (contributor) role.
pub fn encode(root: &Element) -> Document {
    Encoder::default().encode(root)
}

/// Intermediate walk result.
#[derive(Debug)]
enum Piece {
    Inline(Span),
    /// An explicit line break, kept apart from text so it is never mistaken
    /// for layout whitespace.
    Break(Span),
    Block(Block),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListFrame {
    kind: ListKind,
    depth: u8,
}

#[derive(Debug, Clone, Default)]
struct Context {
    marks: ActiveMarks,
    list: Option<ListFrame>,
}

impl Context {
    fn with_mark(&self, mark: Mark) -> Self {
        Self {
            marks: self.marks.with(mark),
            list: self.list,
        }
    }

    fn with_list(&self, kind: ListKind) -> Self {
        let depth = self.list.map_or(1, |l| l.depth.saturating_add(1));
        Self {
            marks: self.marks.clone(),
            list: Some(ListFrame { kind, depth }),
        }
    }
}

/// What a block-level or container element turns its pieces into.
#[derive(Debug, Clone, Copy)]
struct Shape {
    style: BlockStyle,
    list: Option<ListFrame>,
    /// Block-level elements always produce a block, even when empty.
    synthesize: bool,
}

impl Shape {
    fn container() -> Self {
        Self {
            style: BlockStyle::Normal,
            list: None,
            synthesize: false,
        }
    }

    fn block(style: BlockStyle) -> Self {
        Self {
            style,
            list: None,
            synthesize: true,
        }
    }

    fn list_item(frame: ListFrame) -> Self {
        Self {
            style: BlockStyle::Normal,
            list: Some(frame),
            synthesize: true,
        }
    }

    fn text_block(&self, spans: Vec<Span>) -> TextBlock {
        let tb = TextBlock::new(self.style, spans);
        match self.list {
            Some(frame) => tb.with_list_item(frame.kind, frame.depth),
            None => tb,
        }
    }

    /// Lets a nested text block inherit this element's style and list item.
    fn adopt(&self, block: Block) -> Block {
        let Block::Text(mut tb) = block else {
            return block;
        };
        if tb.style == BlockStyle::Normal {
            tb.style = self.style;
        }
        if let Some(frame) = self.list
            && !tb.is_list_item()
        {
            tb = tb.with_list_item(frame.kind, frame.depth);
        }
        Block::Text(tb)
    }
}

struct Walker {
    role: AuthorRole,
    defs: MarkDefTable,
}

impl Walker {
    fn walk_node(&mut self, node: &SurfaceNode, ctx: &Context, out: &mut Vec<Piece>) {
        match node {
            SurfaceNode::Text(text) if text.is_empty() => {}
            SurfaceNode::Text(text) => out.push(Piece::Inline(ctx.marks.apply(Span::new(text)))),
            SurfaceNode::Element(el) => self.walk_element(el, ctx, out),
        }
    }

    fn walk_children(&mut self, el: &Element, ctx: &Context, out: &mut Vec<Piece>) {
        for child in &el.children {
            self.walk_node(child, ctx, out);
        }
    }

    fn collect_children(&mut self, el: &Element, ctx: &Context) -> Vec<Piece> {
        let mut pieces = Vec::new();
        self.walk_children(el, ctx, &mut pieces);
        pieces
    }

    fn walk_element(&mut self, el: &Element, ctx: &Context, out: &mut Vec<Piece>) {
        match el.tag.as_str() {
            "br" => out.push(Piece::Break(Span::new("\n"))),
            "strong" | "b" => self.walk_children(el, &ctx.with_mark(Mark::Strong), out),
            "em" | "i" => self.walk_children(el, &ctx.with_mark(Mark::Em), out),
            "u" => self.walk_children(el, &ctx.with_mark(Mark::Underline), out),
            "a" => match el.attr("href").map(str::trim).filter(|h| !h.is_empty()) {
                Some(href) => {
                    let key = self.defs.register_link(href);
                    self.walk_children(el, &ctx.with_mark(Mark::Def(key)), out);
                }
                None => self.walk_children(el, ctx, out),
            },
            "p" | "pre" => self.block_level(el, ctx, Shape::block(BlockStyle::Normal), out),
            "blockquote" => self.block_level(el, ctx, Shape::block(BlockStyle::Blockquote), out),
            "li" => {
                let frame = ctx.list.unwrap_or(ListFrame {
                    kind: ListKind::Bullet,
                    depth: 1,
                });
                self.block_level(el, ctx, Shape::list_item(frame), out);
            }
            "ul" | "ol" => {
                let kind = if el.tag == "ol" {
                    ListKind::Number
                } else {
                    ListKind::Bullet
                };
                let pieces = self.collect_children(el, &ctx.with_list(kind));
                out.extend(assemble(pieces, &Shape::container()));
            }
            "img" | "iframe" => match Embed::from_element(el) {
                Some(embed) => {
                    debug!("keeping {} embed as trusted raw", el.tag);
                    let span = ctx.marks.apply(Span::trusted_raw(embed.to_markup()));
                    out.push(Piece::Block(Block::Text(TextBlock::new(
                        BlockStyle::Normal,
                        vec![span],
                    ))));
                }
                None => self.walk_children(el, ctx, out),
            },
            tag if heading_level(tag).is_some() => {
                let style = heading_level(tag)
                    .and_then(BlockStyle::heading)
                    .unwrap_or_default();
                self.block_level(el, ctx, Shape::block(style), out);
            }
            tag if GENERIC_CONTAINERS.contains(&tag) => {
                if let Some(block) = special::detect(el, self.role) {
                    out.push(Piece::Block(block));
                } else {
                    let pieces = self.collect_children(el, ctx);
                    out.extend(assemble(pieces, &Shape::container()));
                }
            }
            // unknown elements keep their content
            _ => self.walk_children(el, ctx, out),
        }
    }

    fn block_level(&mut self, el: &Element, ctx: &Context, shape: Shape, out: &mut Vec<Piece>) {
        let pieces = self.collect_children(el, ctx);
        out.extend(assemble(pieces, &shape));
    }

    /// Resolves link definitions per block and drops blocks left empty.
    fn finish(self, pieces: Vec<Piece>) -> Document {
        let mut blocks = Vec::new();
        for piece in pieces {
            let Piece::Block(mut block) = piece else {
                continue;
            };
            if let Block::Text(tb) = &mut block {
                tb.mark_defs = self.defs.referenced_by(&tb.children);
                let stripped = tb.strip_dangling_marks();
                if stripped > 0 {
                    warn!("stripped {stripped} unresolved mark(s) from block {}", tb.key);
                }
                tb.prune_mark_defs();
                if tb.children.is_empty() {
                    continue;
                }
            }
            blocks.push(block);
        }

        if blocks.is_empty() {
            debug!("surface produced no blocks; using placeholder");
            return Document::placeholder();
        }
        Document::new(blocks)
    }
}

/// Groups inline pieces into text blocks shaped by the enclosing element.
///
/// Blocks already produced below pass through, adopting the element's style.
/// When blocks are present, runs holding only unmarked whitespace are layout
/// noise between them and are dropped.
fn assemble(pieces: Vec<Piece>, shape: &Shape) -> Vec<Piece> {
    let has_blocks = pieces.iter().any(|p| matches!(p, Piece::Block(_)));
    let mut out = Vec::new();
    let mut run = Run::default();

    for piece in pieces {
        match piece {
            Piece::Inline(span) => run.push_text(span),
            Piece::Break(span) => {
                run.has_break = true;
                run.last_is_break = true;
                run.spans.push(span);
            }
            Piece::Block(block) => {
                run.flush(shape, has_blocks, &mut out);
                out.push(Piece::Block(shape.adopt(block)));
            }
        }
    }
    run.flush(shape, has_blocks, &mut out);

    if out.is_empty() && shape.synthesize {
        out.push(Piece::Block(Block::Text(shape.text_block(vec![Span::new("")]))));
    }
    out
}

#[derive(Default)]
struct Run {
    spans: Vec<Span>,
    has_break: bool,
    last_is_break: bool,
}

impl Run {
    /// Appends text, merging it into the previous span when the marks match.
    fn push_text(&mut self, span: Span) {
        match self.spans.last_mut() {
            Some(prev) if !self.last_is_break && prev.marks == span.marks => {
                prev.text.push_str(&span.text);
            }
            _ => self.spans.push(span),
        }
        self.last_is_break = false;
    }

    fn flush(&mut self, shape: &Shape, has_blocks: bool, out: &mut Vec<Piece>) {
        let spans = std::mem::take(&mut self.spans);
        let has_break = std::mem::take(&mut self.has_break);
        self.last_is_break = false;
        if spans.is_empty() {
            return;
        }
        let noise = !has_break
            && spans
                .iter()
                .all(|s| s.marks.is_empty() && s.text.trim().is_empty());
        if noise && (has_blocks || !shape.synthesize) {
            return;
        }
        out.push(Piece::Block(Block::Text(shape.text_block(spans))));
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
