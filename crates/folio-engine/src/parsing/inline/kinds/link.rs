/// Markdown-style link `[text](href)`.
///
/// Self-contained: the text between the brackets is never re-parsed.
pub struct MdLink;

impl MdLink {
    pub const OPEN: u8 = b'[';
    pub const TEXT_CLOSE: &'static str = "]";
    pub const MID: &'static str = "](";
    pub const CLOSE: &'static str = ")";
}

/// Explicit newline, with or without a carriage return.
pub struct Newline;

impl Newline {
    pub const LF: u8 = b'\n';
    pub const CRLF: &'static [u8; 2] = b"\r\n";
}
