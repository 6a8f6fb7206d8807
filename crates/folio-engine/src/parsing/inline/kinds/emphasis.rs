/// Bold delimiter. Content between a pair is parsed recursively.
pub struct Strong;

impl Strong {
    pub const DELIM: &'static str = "**";
}

/// Italic delimiter. Same closing-scan rule as [`Strong`].
pub struct Emphasis;

impl Emphasis {
    pub const DELIM: &'static str = "*";
}
