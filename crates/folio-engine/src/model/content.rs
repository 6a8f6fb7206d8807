use serde::{Deserialize, Serialize};

use super::Document;

/// Article body as it comes back from storage.
///
/// Older articles stored a bare string. Those are still accepted here but are
/// only ever normalized in memory; new content is always saved structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Structured(Document),
    Legacy(String),
}

impl Content {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Content::Legacy(_))
    }

    /// Renderable document view. Never empty.
    pub fn to_document(&self) -> Document {
        match self {
            Content::Structured(doc) => doc.clone().or_placeholder(),
            Content::Legacy(text) => Document::from_legacy(text),
        }
    }
}

impl From<Document> for Content {
    fn from(doc: Document) -> Self {
        Content::Structured(doc)
    }
}
