//! Minimal embed strings for already-hosted media.
//!
//! Images and framed players on the surface are not turned into asset
//! references. The encoder keeps a reconstructed tag in a trusted-raw span
//! and the renderer reads it back with [`Embed::parse`].

use crate::{parsing::markup::read_open_tag, surface::Element};

pub const LAZY: &str = "lazy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    Image {
        src: String,
        alt: String,
        class: Option<String>,
        loading: String,
    },
    /// Only the source is kept; the aspect wrapper is added at render time.
    Frame { src: String },
}

impl Embed {
    /// Reads an `img` or `iframe` surface element. Elements without a source
    /// are not embeds.
    pub fn from_element(el: &Element) -> Option<Self> {
        Self::from_attrs(&el.tag, |name| el.attr(name))
    }

    /// Reads back the markup produced by [`Embed::to_markup`].
    pub fn parse(markup: &str) -> Option<Self> {
        let start = markup.find('<')?;
        if !markup[..start].trim().is_empty() {
            return None;
        }
        let tag = read_open_tag(markup, start)?;
        Self::from_attrs(&tag.name, |name| tag.attr(name))
    }

    fn from_attrs<'a>(tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> Option<Self> {
        let src = attr("src").map(str::trim).filter(|s| !s.is_empty())?;
        match tag {
            "img" => Some(Embed::Image {
                src: src.to_string(),
                alt: attr("alt").unwrap_or_default().to_string(),
                class: attr("class")
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
                loading: attr("loading")
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .unwrap_or(LAZY)
                    .to_string(),
            }),
            "iframe" => Some(Embed::Frame {
                src: src.to_string(),
            }),
            _ => None,
        }
    }

    pub fn to_markup(&self) -> String {
        match self {
            Embed::Image {
                src,
                alt,
                class,
                loading,
            } => {
                let class = class
                    .as_deref()
                    .map(|c| format!(r#" class="{}""#, quote(c)))
                    .unwrap_or_default();
                format!(
                    r#"<img src="{}" alt="{}"{class} loading="{}">"#,
                    quote(src),
                    quote(alt),
                    quote(loading),
                )
            }
            Embed::Frame { src } => format!(r#"<iframe src="{}"></iframe>"#, quote(src)),
        }
    }
}

fn quote(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
