//! # Inline Kinds
//!
//! Token types that own their syntax delimiters.
//!
//! ## Types
//!
//! - **`Strong`** / **`Emphasis`**: `**` and `*`
//! - **`MdLink`**: `[`, `](`, `)`
//! - **`Newline`**: `\n` and `\r\n`
//! - **`RawContainer`**: `div` / `span` with `class` and `style` only
//! - **`Media`**, **`Frame`**, **`Button`**: `img`, `iframe`, `button`
//!
//! ## Design Principle
//!
//! All delimiter constants live here, not scattered in parser code.

pub mod emphasis;
pub mod link;
pub mod tags;

pub use emphasis::{Emphasis, Strong};
pub use link::{MdLink, Newline};
pub use tags::{Button, Frame, Media, RawContainer, TAG_OPEN};

/// True if a token of some kind may start with byte `b`.
pub fn is_token_start(b: u8) -> bool {
    b == MdLink::OPEN || b == b'*' || b == TAG_OPEN || b == Newline::LF || b == b'\r'
}
