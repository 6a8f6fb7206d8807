//! Special block detection on generic container elements.

use log::{debug, warn};

use crate::{
    model::{Block, ButtonBlock, CodeBlock, CodeKind, FileBlock, ImageBlock},
    surface::Element,
};

use super::AuthorRole;

/// Marker attributes recognised on generic containers.
pub struct Markers;

impl Markers {
    pub const SNIPPET: &'static str = "data-snippet";
    pub const MARKUP: &'static str = "data-markup";
    pub const FILE_URL: &'static str = "data-file-url";
    pub const FILE_NAME: &'static str = "data-file-name";
    pub const FILE_SIZE: &'static str = "data-file-size";
    pub const WIDGET: &'static str = "data-widget";
    pub const WIDGET_BUTTON: &'static str = "button";
    pub const HREF: &'static str = "data-href";
    pub const ASSET_REF: &'static str = "data-asset-ref";
}

/// Returns the dedicated block for a container carrying a marker, if any.
///
/// Code markers are only honoured for trusted authors; for anyone else the
/// container falls through to ordinary handling.
pub fn detect(el: &Element, role: AuthorRole) -> Option<Block> {
    for (marker, kind) in [
        (Markers::SNIPPET, CodeKind::Scripted),
        (Markers::MARKUP, CodeKind::Markup),
    ] {
        let Some(raw) = el.attr(marker) else {
            continue;
        };
        if !role.may_author_code() {
            debug!("ignoring {marker} marker from {role:?} author");
            continue;
        }
        debug!("detected {kind:?} code block");
        return Some(Block::Code(CodeBlock::new(kind, decode_payload(raw))));
    }

    if let (Some(url), Some(name), Some(size)) = (
        el.attr(Markers::FILE_URL),
        el.attr(Markers::FILE_NAME),
        el.attr(Markers::FILE_SIZE),
    ) {
        let size_mb = size
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|mb| mb.is_finite() && *mb >= 0.0)
            .unwrap_or_else(|| {
                warn!("unreadable file size {size:?} for {name}");
                0.0
            });
        return Some(Block::File(FileBlock::new(url, name, size_mb)));
    }

    if el.attr(Markers::WIDGET) == Some(Markers::WIDGET_BUTTON)
        && let Some(href) = el.attr(Markers::HREF)
    {
        return Some(Block::Button(ButtonBlock::new(
            el.text_content().trim(),
            href,
        )));
    }

    el.attr(Markers::ASSET_REF)
        .filter(|r| !r.trim().is_empty())
        .map(|r| Block::Image(ImageBlock::new(r.trim())))
}

/// Percent-encodes a code payload for a marker attribute.
pub fn encode_payload(payload: &str) -> String {
    urlencoding::encode(payload).into_owned()
}

/// Percent-decodes a marker payload, keeping the raw value if it does not
/// decode to UTF-8.
pub fn decode_payload(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!("keeping undecodable payload as written: {e}");
            raw.to_string()
        }
    }
}
