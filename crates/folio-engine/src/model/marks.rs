use serde::{Deserialize, Serialize};

/// An inline decoration carried by a [`Span`](super::Span).
///
/// Intrinsic marks (`Strong`, `Em`, `Underline`) need no definition. `Def`
/// marks are keys into the owning block's `mark_defs` table and must resolve.
///
/// `TrustedRaw` is the sentinel: the span's text is markup produced by the
/// encoder itself and is injected verbatim at render time, bypassing the
/// inline grammar. It is only ever attached by `crate::encoding`; text typed
/// by a user is never scanned for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mark {
    Strong,
    Em,
    Underline,
    TrustedRaw,
    Def(String),
}

impl Mark {
    pub const STRONG: &'static str = "strong";
    pub const EM: &'static str = "em";
    pub const UNDERLINE: &'static str = "underline";
    pub const TRUSTED_RAW: &'static str = "trusted-raw";

    /// Wire name of this mark.
    pub fn as_str(&self) -> &str {
        match self {
            Mark::Strong => Self::STRONG,
            Mark::Em => Self::EM,
            Mark::Underline => Self::UNDERLINE,
            Mark::TrustedRaw => Self::TRUSTED_RAW,
            Mark::Def(key) => key,
        }
    }

    /// The def key, if this mark is def-backed.
    pub fn def_key(&self) -> Option<&str> {
        match self {
            Mark::Def(key) => Some(key),
            _ => None,
        }
    }
}

impl From<String> for Mark {
    fn from(s: String) -> Self {
        match s.as_str() {
            Self::STRONG => Mark::Strong,
            Self::EM => Mark::Em,
            Self::UNDERLINE => Mark::Underline,
            Self::TRUSTED_RAW => Mark::TrustedRaw,
            _ => Mark::Def(s),
        }
    }
}

impl From<Mark> for String {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Def(key) => key,
            other => other.as_str().to_string(),
        }
    }
}

/// A block-scoped definition referenced by a `Mark::Def` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarkDef {
    Link { key: String, href: String },
}

impl MarkDef {
    /// Creates a link definition with a fresh key.
    pub fn link(href: impl Into<String>) -> Self {
        MarkDef::Link {
            key: super::keys::new_key(),
            href: href.into(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            MarkDef::Link { key, .. } => key,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            MarkDef::Link { href, .. } => Some(href),
        }
    }
}
