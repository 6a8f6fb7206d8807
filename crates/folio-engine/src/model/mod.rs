//! # Document Model
//!
//! The structural schema shared by the encoder, the decoder and the renderer.
//! Pure data; the only behaviour here is construction and small invariant
//! helpers.
//!
//! ## Modules
//!
//! - **`document`**: `Document`, `Block` variants, `Span`
//! - **`marks`**: `Mark` (intrinsic, def-backed, trusted-raw sentinel) and `MarkDef`
//! - **`content`**: `Content`, the structured-or-legacy body read from storage
//! - **`normalize`**: key-free `Snap` view for structural comparison
//! - **`invariants`**: panicking checks used by tests
//!
//! ## Wire Shape
//!
//! A document serializes as a JSON array of blocks. Text blocks look like
//! `{type:"block", key, style, listItem?, level?, children:[{type:"span", key, text, marks}], markDefs}`.

pub mod content;
pub mod document;
pub mod invariants;
pub mod keys;
pub mod marks;
pub mod normalize;

pub use content::Content;
pub use document::{
    Block, BlockStyle, ButtonBlock, CodeBlock, CodeKind, Document, FileBlock, ImageBlock,
    ListKind, Span, TextBlock,
};
pub use marks::{Mark, MarkDef};
pub use normalize::{Snap, normalize};
