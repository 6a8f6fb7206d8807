//! # Parsing
//!
//! - **`inline`**: the micro-syntax decoder applied to span text at render time
//! - **`markup`**: tag scanning shared by the inline decoder and the embed reader

pub mod inline;
pub mod markup;

use crate::model::Span;

/// Decodes the text of one span.
///
/// Spans carrying the trusted-raw sentinel bypass the decoder and come back
/// as a single [`inline::InlineNode::Raw`].
pub fn decode_span(span: &Span) -> Vec<inline::InlineNode> {
    if span.is_trusted_raw() {
        return vec![inline::InlineNode::Raw(span.text.clone())];
    }
    inline::parse_inline(&span.text)
}
