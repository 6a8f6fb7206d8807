//! Content storage collaborator.
//!
//! Articles live under a content root as `<id>.json` (structured). Older
//! articles may only have a `<id>.txt` plain-text body; those are read as
//! [`Content::Legacy`] and never written back in that form.

use log::{debug, warn};
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Content, Document};

pub const STRUCTURED_EXT: &str = "json";
pub const LEGACY_EXT: &str = "txt";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Content not found: {0}")]
    NotFound(RelativePathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed content in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Could not serialize document: {0}")]
    Serialize(serde_json::Error),
    #[error("Invalid content directory: {0}")]
    InvalidContentDir(String),
}

/// Where saved documents go and stored bodies come from.
pub trait ContentStore {
    fn fetch(&self, id: &RelativePath) -> Result<Content, StoreError>;

    /// Persists a document. Always writes the structured form.
    fn save(&self, id: &RelativePath, doc: &Document) -> Result<(), StoreError>;
}

/// A [`ContentStore`] over a directory tree.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    /// Opens a store rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        validate_content_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn structured_path(&self, id: &RelativePath) -> PathBuf {
        id.with_extension(STRUCTURED_EXT).to_path(&self.root)
    }

    pub fn legacy_path(&self, id: &RelativePath) -> PathBuf {
        id.with_extension(LEGACY_EXT).to_path(&self.root)
    }

    /// Ids of every stored article, sorted. An article with both forms is
    /// listed once.
    pub fn list(&self) -> Result<Vec<RelativePathBuf>, StoreError> {
        let mut files = Vec::new();
        scan_directory_recursive(&self.root, &mut files)?;

        let mut ids: Vec<RelativePathBuf> = files
            .iter()
            .filter_map(|path| {
                let rel = path.strip_prefix(&self.root).ok()?.with_extension("");
                RelativePathBuf::from_path(&rel).ok()
            })
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

impl ContentStore for FsContentStore {
    fn fetch(&self, id: &RelativePath) -> Result<Content, StoreError> {
        let structured = self.structured_path(id);
        if structured.exists() {
            let json = fs::read_to_string(&structured)?;
            return Content::from_json(&json).map_err(|source| StoreError::Malformed {
                path: structured,
                source,
            });
        }

        let legacy = self.legacy_path(id);
        if legacy.exists() {
            debug!("reading legacy body for {id}");
            return Ok(Content::Legacy(fs::read_to_string(&legacy)?));
        }

        Err(StoreError::NotFound(id.to_relative_path_buf()))
    }

    fn save(&self, id: &RelativePath, doc: &Document) -> Result<(), StoreError> {
        let path = self.structured_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let doc = if doc.blocks.is_empty() {
            warn!("refusing to store an empty document for {id}; storing placeholder");
            Document::placeholder()
        } else {
            doc.clone()
        };
        let json = serde_json::to_string_pretty(&doc).map_err(StoreError::Serialize)?;
        fs::write(&path, json)?;
        debug!("saved {} block(s) to {}", doc.blocks.len(), path.display());
        Ok(())
    }
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), StoreError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && (ext == STRUCTURED_EXT || ext == LEGACY_EXT)
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_content_dir(path: &Path) -> Result<(), StoreError> {
    if !path.is_dir() {
        return Err(StoreError::InvalidContentDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Block, BlockStyle, Span, TextBlock, normalize},
        tests::{create_test_content_dir, create_test_file},
    };

    fn sample() -> Document {
        Document::new(vec![Block::Text(TextBlock::new(
            BlockStyle::H1,
            vec![Span::new("Title")],
        ))])
    }

    #[test]
    fn test_save_then_fetch_structured() {
        let dir = create_test_content_dir();
        let store = FsContentStore::open(dir.path()).unwrap();
        let id = RelativePath::new("news/launch");

        store.save(id, &sample()).unwrap();

        assert!(dir.path().join("news/launch.json").exists());
        let content = store.fetch(id).unwrap();
        assert!(!content.is_legacy());
        assert_eq!(normalize(&content.to_document()), normalize(&sample()));
    }

    #[test]
    fn test_attachment_with_infinite_size_reloads() {
        let dir = create_test_content_dir();
        let store = FsContentStore::open(dir.path()).unwrap();
        let surface = crate::surface::html::parse(
            r#"<div data-file-url="/f.zip" data-file-name="f.zip" data-file-size="inf"></div>"#,
        );
        let doc = crate::encode(&surface);

        store.save(RelativePath::new("files"), &doc).unwrap();

        let content = store.fetch(RelativePath::new("files")).unwrap();
        assert!(!content.is_legacy());
        assert!(matches!(
            &content.to_document().blocks[..],
            [Block::File(file)] if file.size_mb == 0.0
        ));
    }

    #[test]
    fn test_fetch_falls_back_to_legacy_text() {
        let dir = create_test_content_dir();
        create_test_file(&dir, "old.txt", "Line1\nLine2");
        let store = FsContentStore::open(dir.path()).unwrap();

        let content = store.fetch(RelativePath::new("old")).unwrap();
        assert_eq!(content, Content::Legacy("Line1\nLine2".into()));
    }

    #[test]
    fn test_structured_wins_over_legacy() {
        let dir = create_test_content_dir();
        create_test_file(&dir, "a.txt", "old body");
        let store = FsContentStore::open(dir.path()).unwrap();
        store.save(RelativePath::new("a"), &sample()).unwrap();

        let content = store.fetch(RelativePath::new("a")).unwrap();
        assert!(!content.is_legacy());
        // the legacy file is left alone
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_fetch_missing_is_not_found() {
        let dir = create_test_content_dir();
        let store = FsContentStore::open(dir.path()).unwrap();
        let result = store.fetch(RelativePath::new("missing"));
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id.as_str() == "missing"));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let dir = create_test_content_dir();
        create_test_file(&dir, "bad.json", "{not json");
        let store = FsContentStore::open(dir.path()).unwrap();
        let result = store.fetch(RelativePath::new("bad"));
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_empty_document_is_stored_as_placeholder() {
        let dir = create_test_content_dir();
        let store = FsContentStore::open(dir.path()).unwrap();
        store.save(RelativePath::new("e"), &Document::default()).unwrap();

        let doc = store.fetch(RelativePath::new("e")).unwrap().to_document();
        assert_eq!(normalize(&doc), normalize(&Document::placeholder()));
    }

    #[test]
    fn test_list_ids() {
        let dir = create_test_content_dir();
        create_test_file(&dir, "b.txt", "x");
        create_test_file(&dir, "b.json", "[]");
        create_test_file(&dir, "nested/a.json", "[]");
        create_test_file(&dir, "image.png", "fake");
        let store = FsContentStore::open(dir.path()).unwrap();

        let ids = store.list().unwrap();
        assert_eq!(
            ids,
            vec![
                RelativePath::new("b").to_relative_path_buf(),
                RelativePath::new("nested/a").to_relative_path_buf(),
            ]
        );
    }

    #[test]
    fn test_open_rejects_missing_dir() {
        let result = FsContentStore::open("/this/path/does/not/exist");
        assert!(matches!(result, Err(StoreError::InvalidContentDir(_))));
    }
}
