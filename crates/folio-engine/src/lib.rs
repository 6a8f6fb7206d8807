//! # folio-engine
//!
//! The rich-text content pipeline: editable surface → [`Document`] →
//! render tree.
//!
//! - [`encoding`] walks an editable surface and produces a document
//! - [`parsing`] holds the inline micro-syntax decoder used at render time
//! - [`rendering`] maps documents onto presentation templates
//! - [`surface`] is the editable tree, with an HTML reader and the editor loader
//! - [`io`] stores and fetches documents (and legacy plain-text bodies)

pub mod encoding;
pub mod io;
pub mod model;
pub mod parsing;
pub mod rendering;
pub mod surface;

#[cfg(test)]
pub mod tests;

pub use encoding::{AuthorRole, Encoder, encode};
pub use io::{ContentStore, FsContentStore, StoreError};
pub use model::{Block, Content, Document, Mark, MarkDef, Span, TextBlock};
pub use parsing::{decode_span, inline::parse_inline};
pub use rendering::{Activation, RenderHooks, RenderNode, RenderOptions, Renderer};
pub use surface::{Element, SurfaceNode, load::to_surface};
