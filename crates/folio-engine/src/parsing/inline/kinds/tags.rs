/// Restricted raw container tags. Nesting of the same name is matched by
/// depth counting.
pub struct RawContainer;

impl RawContainer {
    pub const NAMES: [&'static str; 2] = ["div", "span"];
    pub const CLASS: &'static str = "class";
    pub const STYLE: &'static str = "style";
}

/// Self-closing image tag.
pub struct Media;

impl Media {
    pub const NAME: &'static str = "img";
    pub const SRC: &'static str = "src";
    pub const ALT: &'static str = "alt";
}

/// Framed embed. Opening and closing pair, first close wins.
pub struct Frame;

impl Frame {
    pub const NAME: &'static str = "iframe";
    pub const SRC: &'static str = "src";
}

/// Call-to-action marker. First close wins; the label is literal.
pub struct Button;

impl Button {
    pub const NAME: &'static str = "button";
    pub const HREF: &'static str = "href";
}

/// Opening byte shared by every tag token.
pub const TAG_OPEN: u8 = b'<';
