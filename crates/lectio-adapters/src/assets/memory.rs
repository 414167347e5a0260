//! In-memory asset loader for tests and embedded content.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use lectio_core::application::{ApplicationError, ports::AssetLoader};
use lectio_core::domain::{BookCode, VersionId};
use lectio_core::error::LectioResult;

/// Documents keyed by `(version, book)`, with a per-key load counter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetLoader {
    inner: Arc<RwLock<InMemoryInner>>,
}

#[derive(Debug, Default)]
struct InMemoryInner {
    documents: HashMap<(VersionId, BookCode), String>,
    loads: HashMap<(VersionId, BookCode), usize>,
}

impl InMemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_document(self, version: &VersionId, book: &BookCode, raw: impl Into<String>) -> Self {
        self.insert(version, book, raw);
        self
    }

    /// Add or replace a document. Replacing does not evict a copy the
    /// registry has already parsed.
    pub fn insert(&self, version: &VersionId, book: &BookCode, raw: impl Into<String>) {
        if let Ok(mut inner) = self.inner.write() {
            inner
                .documents
                .insert((version.clone(), book.clone()), raw.into());
        }
    }

    /// How many times `load_raw` has returned this document.
    pub fn load_count(&self, version: &VersionId, book: &BookCode) -> usize {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.loads.get(&(version.clone(), book.clone())).copied())
            .unwrap_or(0)
    }

    fn lock_error(version: &VersionId, book: &BookCode) -> ApplicationError {
        ApplicationError::LoaderFailure {
            version: version.to_string(),
            book: book.to_string(),
            reason: "in-memory store lock poisoned".into(),
        }
    }
}

#[async_trait]
impl AssetLoader for InMemoryAssetLoader {
    async fn load_raw(&self, version: &VersionId, book: &BookCode) -> LectioResult<String> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_error(version, book))?;

        let key = (version.clone(), book.clone());
        let raw = inner
            .documents
            .get(&key)
            .cloned()
            .ok_or_else(|| ApplicationError::AssetNotFound {
                version: version.to_string(),
                book: book.to_string(),
            })?;

        *inner.loads.entry(key).or_default() += 1;
        Ok(raw)
    }

    async fn list_available_books(&self, version: &VersionId) -> LectioResult<Vec<BookCode>> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LoaderFailure {
            version: version.to_string(),
            book: "*".into(),
            reason: "in-memory store lock poisoned".into(),
        })?;

        Ok(inner
            .documents
            .keys()
            .filter(|(v, _)| v == version)
            .map(|(_, book)| book.clone())
            .collect())
    }

    async fn is_available(&self, version: &VersionId, book: &BookCode) -> bool {
        self.inner
            .read()
            .map(|inner| inner.documents.contains_key(&(version.clone(), book.clone())))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_core::error::LectioError;

    fn ids() -> (VersionId, BookCode) {
        (VersionId::new("web").unwrap(), BookCode::new("GEN").unwrap())
    }

    #[tokio::test]
    async fn loads_inserted_documents_and_counts() {
        let (version, book) = ids();
        let loader = InMemoryAssetLoader::new().with_document(&version, &book, "<usx/>");

        assert_eq!(loader.load_raw(&version, &book).await.unwrap(), "<usx/>");
        assert_eq!(loader.load_raw(&version, &book).await.unwrap(), "<usx/>");
        assert_eq!(loader.load_count(&version, &book), 2);
    }

    #[tokio::test]
    async fn missing_document_is_asset_not_found() {
        let (version, book) = ids();
        let err = InMemoryAssetLoader::new()
            .load_raw(&version, &book)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LectioError::Application(ApplicationError::AssetNotFound { .. })
        ));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn lists_only_the_requested_version() {
        let (web, gen_code) = ids();
        let kjv = VersionId::new("kjv").unwrap();
        let exo = BookCode::new("EXO").unwrap();
        let loader = InMemoryAssetLoader::new()
            .with_document(&web, &gen_code, "a")
            .with_document(&kjv, &exo, "b");

        assert_eq!(loader.list_available_books(&web).await.unwrap(), vec![gen_code.clone()]);
        assert!(loader.is_available(&kjv, &exo).await);
        assert!(!loader.is_available(&kjv, &gen_code).await);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let (version, book) = ids();
        let loader = InMemoryAssetLoader::new();
        let handle = loader.clone();
        handle.insert(&version, &book, "late");

        assert!(loader.is_available(&version, &book).await);
    }
}
