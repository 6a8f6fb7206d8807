//! # Rendering
//!
//! [`Document`] → [`RenderNode`] tree.
//!
//! Text blocks pick a wrapper from their style. Their spans are decoded with
//! the inline parser and the span marks are applied around the decoded
//! nodes. Special blocks map to fixed templates. Activations on the tree are
//! reported through [`RenderHooks`]; the renderer performs no navigation.
//!
//! ## Modules
//!
//! - **`tree`**: `RenderNode`, `Activation` and HTML serialization
//! - **`groups`**: list grouping of consecutive list-item blocks
//! - **`templates`**: fixed templates for embeds and special blocks
//! - **`hooks`**: the `RenderHooks` notification trait
//! - **`sandbox`**: the `ScriptSandbox` collaborator for scripted code blocks

pub mod groups;
pub mod hooks;
pub mod sandbox;
pub mod templates;
pub mod tree;

use log::warn;

use crate::{
    encoding::Embed,
    model::{
        Block, BlockStyle, CodeBlock, CodeKind, Content, Document, ListKind, Mark, Span, TextBlock,
    },
    parsing::inline::{InlineNode, parse_inline},
};

pub use groups::{ContentGroup, ListItem, group_blocks};
pub use hooks::{NoHooks, RenderHooks};
pub use sandbox::{NoSandbox, SandboxError, ScriptSandbox};
pub use tree::{Activation, RenderNode};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Base URL that relative asset references are joined onto.
    pub asset_base_url: Option<String>,
    /// Width / height of framed embeds.
    pub frame_aspect_ratio: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            asset_base_url: None,
            frame_aspect_ratio: templates::DEFAULT_FRAME_ASPECT_RATIO,
        }
    }
}

pub struct Renderer {
    options: RenderOptions,
    hooks: Box<dyn RenderHooks>,
    sandbox: Box<dyn ScriptSandbox>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            hooks: Box::new(NoHooks),
            sandbox: Box::new(NoSandbox),
        }
    }

    pub fn with_hooks(mut self, hooks: impl RenderHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn with_sandbox(mut self, sandbox: impl ScriptSandbox + 'static) -> Self {
        self.sandbox = Box::new(sandbox);
        self
    }

    /// Renders a document into an `article` root.
    pub fn render(&self, doc: &Document) -> RenderNode {
        let mut children = Vec::new();
        for group in group_blocks(&doc.blocks) {
            match group {
                ContentGroup::Single(block) => children.push(self.render_block(block)),
                ContentGroup::BulletList { items } => {
                    children.push(self.render_list(ListKind::Bullet, &items))
                }
                ContentGroup::NumberedList { items } => {
                    children.push(self.render_list(ListKind::Number, &items))
                }
            }
        }
        RenderNode::element("article").with_children(children)
    }

    /// Renders stored content; legacy bodies are normalized here and only
    /// here.
    pub fn render_content(&self, content: &Content) -> RenderNode {
        self.render(&content.to_document())
    }

    /// Forwards an activation to the hooks.
    pub fn activate(&self, activation: &Activation) {
        match activation {
            Activation::Image(src) => self.hooks.image_activated(src),
            Activation::Link(href) => self.hooks.link_activated(href),
        }
    }

    /// Resolves an asset reference against the configured base URL.
    /// Absolute URLs, rooted paths and data URIs are kept as they are.
    pub fn resolve_asset(&self, asset_ref: &str) -> String {
        let is_absolute = asset_ref.contains("://")
            || asset_ref.starts_with('/')
            || asset_ref.starts_with("data:");
        match &self.options.asset_base_url {
            Some(base) if !is_absolute => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                asset_ref.trim_start_matches("./")
            ),
            _ => asset_ref.to_string(),
        }
    }

    fn render_list(&self, kind: ListKind, items: &[ListItem<'_>]) -> RenderNode {
        let mut list = RenderNode::element(kind.tag());
        for item in items {
            let content = self.render_spans(item.block);
            let mut li = RenderNode::element("li");
            li = if item.block.style == BlockStyle::Normal {
                li.with_children(content)
            } else {
                li.with_child(RenderNode::element(item.block.style.tag()).with_children(content))
            };
            for (kind, run) in groups::kind_runs(&item.children) {
                li = li.with_child(self.render_list(kind, run));
            }
            list = list.with_child(li);
        }
        list
    }

    fn render_block(&self, block: &Block) -> RenderNode {
        match block {
            Block::Text(tb) => {
                RenderNode::element(tb.style.tag()).with_children(self.render_spans(tb))
            }
            Block::Image(img) => templates::image_block(&self.resolve_asset(&img.asset_ref)),
            Block::File(file) => templates::file_download(&file.url, &file.name, file.size_mb),
            Block::Button(button) => templates::button(&button.text, &button.url),
            Block::Code(code) => self.render_code(code),
        }
    }

    /// Failure is contained to this block.
    fn render_code(&self, code: &CodeBlock) -> RenderNode {
        match code.kind {
            CodeKind::Markup => templates::trusted_markup(&code.payload),
            CodeKind::Scripted => match self.sandbox.evaluate(&code.payload) {
                Ok(html) => templates::script_output(html),
                Err(e) => {
                    warn!("code block {} failed to render: {e}", code.key);
                    templates::code_error(&e.to_string())
                }
            },
        }
    }

    /// Renders the spans of a text block.
    ///
    /// Consecutive spans with the same mark set are decoded as one text so
    /// tokens may straddle span boundaries; trusted-raw spans bypass the
    /// decoder.
    fn render_spans(&self, tb: &TextBlock) -> Vec<RenderNode> {
        let spans = &tb.children;
        let mut out = Vec::new();
        let mut i = 0;
        while i < spans.len() {
            let first = &spans[i];
            if first.is_trusted_raw() {
                let node = self.render_trusted(&first.text);
                out.extend(self.wrap_marks(tb, &first.marks, vec![node]));
                i += 1;
                continue;
            }

            let mut text = first.text.clone();
            let mut j = i + 1;
            while j < spans.len()
                && !spans[j].is_trusted_raw()
                && same_marks(&spans[j], first)
            {
                text.push_str(&spans[j].text);
                j += 1;
            }

            let nodes = parse_inline(&text)
                .into_iter()
                .map(|n| self.render_inline(n))
                .collect();
            out.extend(self.wrap_marks(tb, &first.marks, nodes));
            i = j;
        }
        out
    }

    /// Applies span marks around decoded nodes: link outermost, then strong,
    /// em and underline.
    fn wrap_marks(&self, tb: &TextBlock, marks: &[Mark], nodes: Vec<RenderNode>) -> Vec<RenderNode> {
        if nodes.is_empty() {
            return nodes;
        }
        let mut nodes = nodes;
        for (mark, tag) in [
            (Mark::Underline, "u"),
            (Mark::Em, "em"),
            (Mark::Strong, "strong"),
        ] {
            if marks.contains(&mark) {
                nodes = vec![RenderNode::element(tag).with_children(nodes)];
            }
        }
        let href = marks
            .iter()
            .find_map(Mark::def_key)
            .and_then(|key| tb.mark_def(key))
            .and_then(|def| def.href());
        match href {
            Some(href) => vec![templates::link(href, nodes)],
            None => nodes,
        }
    }

    fn render_inline(&self, node: InlineNode) -> RenderNode {
        match node {
            InlineNode::Text(t) => RenderNode::text(t),
            InlineNode::LineBreak => RenderNode::LineBreak,
            InlineNode::Link { text, href } => templates::link(&href, vec![RenderNode::text(text)]),
            InlineNode::Strong(children) => {
                RenderNode::element("strong").with_children(self.render_inlines(children))
            }
            InlineNode::Em(children) => {
                RenderNode::element("em").with_children(self.render_inlines(children))
            }
            InlineNode::Container {
                tag,
                class,
                style,
                children,
            } => {
                let mut el = RenderNode::element(tag.as_str()).with_styles(style);
                if let Some(class) = class {
                    el = el.with_class(class);
                }
                el.with_children(self.render_inlines(children))
            }
            InlineNode::Media { src, alt } => templates::zoomable_image(&src, &alt),
            InlineNode::Frame { src } => templates::framed(&src, self.options.frame_aspect_ratio),
            InlineNode::Button { label, href } => templates::button(&label, &href),
            InlineNode::Raw(html) => RenderNode::raw(html),
        }
    }

    fn render_inlines(&self, nodes: Vec<InlineNode>) -> Vec<RenderNode> {
        nodes.into_iter().map(|n| self.render_inline(n)).collect()
    }

    /// Trusted-raw spans hold embed strings rebuilt by the encoder. Known
    /// embeds get the same treatment as their decoded counterparts; anything
    /// else is inserted as is.
    fn render_trusted(&self, text: &str) -> RenderNode {
        match Embed::parse(text) {
            Some(Embed::Image {
                src,
                alt,
                class,
                loading,
            }) => {
                let img = templates::zoomable_image(&src, &alt).with_attr("loading", loading);
                match class {
                    Some(class) => img.with_class(format!("zoomable {class}")),
                    None => img,
                }
            }
            Some(Embed::Frame { src }) => {
                templates::framed(&src, self.options.frame_aspect_ratio)
            }
            None => RenderNode::raw(text),
        }
    }
}

fn same_marks(a: &Span, b: &Span) -> bool {
    a.marks.len() == b.marks.len() && a.marks.iter().all(|m| b.marks.contains(m))
}
