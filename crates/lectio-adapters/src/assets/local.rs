//! Filesystem asset loader: one directory per version.
//!
//! A version directory holds one file per book, named by its code:
//! `GEN.usx`, `MAT.usfx`, or `GEN.xml` when the extension says nothing about
//! the format.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use lectio_core::application::{ApplicationError, ports::AssetLoader};
use lectio_core::domain::{BookCode, VersionId};
use lectio_core::error::LectioResult;

/// Candidate extensions, tried in order.
const EXTENSIONS: &[&str] = &["usx", "usfx", "xml"];

#[derive(Debug, Clone, Default)]
pub struct FilesystemAssetLoader {
    roots: HashMap<VersionId, PathBuf>,
}

impl FilesystemAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_version(mut self, version: VersionId, root: impl Into<PathBuf>) -> Self {
        self.register(version, root);
        self
    }

    pub fn register(&mut self, version: VersionId, root: impl Into<PathBuf>) {
        self.roots.insert(version, root.into());
    }

    pub fn root(&self, version: &VersionId) -> Option<&Path> {
        self.roots.get(version).map(PathBuf::as_path)
    }

    fn root_or_err(&self, version: &VersionId, book: &str) -> LectioResult<&Path> {
        self.root(version).ok_or_else(|| {
            ApplicationError::LoaderFailure {
                version: version.to_string(),
                book: book.to_string(),
                reason: "no directory registered for this version".into(),
            }
            .into()
        })
    }

    async fn locate(&self, version: &VersionId, book: &BookCode) -> LectioResult<Option<PathBuf>> {
        let root = self.root_or_err(version, book.as_str())?;
        for ext in EXTENSIONS {
            let candidate = root.join(format!("{book}.{ext}"));
            let exists = tokio::fs::try_exists(&candidate)
                .await
                .map_err(|e| io_failure(version, book.as_str(), &candidate, e))?;
            if exists {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl AssetLoader for FilesystemAssetLoader {
    #[instrument(skip_all, fields(version = %version, book = %book))]
    async fn load_raw(&self, version: &VersionId, book: &BookCode) -> LectioResult<String> {
        let path = self.locate(version, book).await?.ok_or_else(|| {
            ApplicationError::AssetNotFound {
                version: version.to_string(),
                book: book.to_string(),
            }
        })?;

        debug!(path = %path.display(), "reading book document");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_failure(version, book.as_str(), &path, e).into())
    }

    async fn list_available_books(&self, version: &VersionId) -> LectioResult<Vec<BookCode>> {
        let root = self.root_or_err(version, "*")?.to_path_buf();
        let listing_root = root.clone();

        let names = tokio::task::spawn_blocking(move || scan_directory(&listing_root))
            .await
            .map_err(|e| ApplicationError::LoaderFailure {
                version: version.to_string(),
                book: "*".into(),
                reason: format!("directory scan task failed: {e}"),
            })?
            .map_err(|e| ApplicationError::LoaderFailure {
                version: version.to_string(),
                book: "*".into(),
                reason: format!("cannot list {}: {e}", root.display()),
            })?;

        let mut books: Vec<BookCode> = names
            .into_iter()
            .filter_map(|stem| BookCode::new(stem).ok())
            .collect();
        books.sort();
        books.dedup();
        Ok(books)
    }

    async fn is_available(&self, version: &VersionId, book: &BookCode) -> bool {
        matches!(self.locate(version, book).await, Ok(Some(_)))
    }
}

/// File stems of every book-shaped file directly inside `root`.
fn scan_directory(root: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut stems = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let known_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if let (true, Some(stem)) = (known_ext, path.file_stem().and_then(|s| s.to_str())) {
            stems.push(stem.to_string());
        }
    }
    Ok(stems)
}

fn io_failure(version: &VersionId, book: &str, path: &Path, e: io::Error) -> ApplicationError {
    ApplicationError::LoaderFailure {
        version: version.to_string(),
        book: book.to_string(),
        reason: format!("{}: {e}", path.display()),
    }
}
