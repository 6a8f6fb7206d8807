//! # Inline Parsing
//!
//! Cursor-based recursive descent over a single text run.
//!
//! ## Architecture
//!
//! The decoder runs over the text of a span (or a run of spans sharing the
//! same marks) and produces [`InlineNode`]s for the renderer. It is total:
//! malformed or unterminated tokens degrade to literal text.
//!
//! ## Modules
//!
//! - **`types`**: `InlineNode` enum and `ContainerTag`
//! - **`kinds`**: Token types with owned delimiters
//! - **`cursor`**: `Cursor` for byte-wise scanning with an explicit position
//! - **`style`**: `key:value;` style lists to a structured map
//! - **`parser`**: `parse_inline()` / `parse()` entry points with `try_parse_*` helpers
//!
//! ## Grammar
//!
//! `[text](href)`, `**bold**`, `*italic*`, `<div>`/`<span>` with class and
//! style (same-name nesting matched by depth), `<img>`, `<iframe>`,
//! `<button href>`, newline. Everything else is literal.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod style;
pub mod types;

pub use parser::{parse, parse_inline};
pub use types::{ContainerTag, InlineNode, StyleMap};
