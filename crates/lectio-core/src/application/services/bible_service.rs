//! Bible Service - version registry and passage orchestrator.
//!
//! This service ties the pieces together for every request:
//! 1. Parse the citation (domain grammar)
//! 2. Load the book, from cache or via the version's loader and parser
//! 3. Assemble the verse range (domain assembler)
//!
//! ## Cache
//!
//! Parsed books are cached per `(VersionId, BookCode)`. Each key owns an
//! async once-cell: concurrent callers for one key await the same load, a
//! successful parse is kept until `clear_cache`, and a failed load removes its
//! cell from the map so the next caller retries. The map lock is only held to
//! fetch, insert or remove a cell, never across an await.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{AssetLoader, DocumentParser},
    },
    domain::{
        BibleVersion, BookCode, CategoryTag, ComplexReference, DomainError, Format,
        NormalizedRange, ParsedBook, ParsedChapter, ParsedVerse, Passage, ReferenceStyle,
        VersionId, books_in, collect_range, format_complex_reference, format_reference,
        normalize_range_order, parse_complex_reference, parse_reference, resolve_book_code,
        sort_canonical,
    },
    error::LectioResult,
};

/// Number of books searched when no scope is given.
pub const DEFAULT_SEARCH_BOOK_LIMIT: usize = 10;

type BookCell = Arc<OnceCell<Arc<ParsedBook>>>;

/// How `get_passage_text` joins verses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassageTextOptions {
    pub include_verse_numbers: bool,
    pub separator: String,
}

impl Default for PassageTextOptions {
    fn default() -> Self {
        Self {
            include_verse_numbers: false,
            separator: " ".to_string(),
        }
    }
}

/// One search hit tagged with the version it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionedVerse {
    pub version: VersionId,
    pub verse: ParsedVerse,
}

/// A version whose search failed, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionFailure {
    pub version: VersionId,
    pub reason: String,
}

/// Result of searching several versions at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiVersionSearch {
    pub hits: Vec<VersionedVerse>,
    pub failures: Vec<VersionFailure>,
}

struct RegisteredVersion {
    version: BibleVersion,
    loader: Arc<dyn AssetLoader>,
}

/// What a search should look at.
enum SearchScope {
    Book(BookCode),
    Books(Vec<BookCode>),
}

// ============================================================================
// Builder
// ============================================================================

/// Collects parsers and versions, then validates them as a whole in `build`.
pub struct BibleServiceBuilder {
    parsers: HashMap<Format, Arc<dyn DocumentParser>>,
    versions: Vec<(BibleVersion, Arc<dyn AssetLoader>)>,
    default_version: Option<VersionId>,
    search_book_limit: usize,
}

impl Default for BibleServiceBuilder {
    fn default() -> Self {
        Self {
            parsers: HashMap::new(),
            versions: Vec::new(),
            default_version: None,
            search_book_limit: DEFAULT_SEARCH_BOOK_LIMIT,
        }
    }
}

impl BibleServiceBuilder {
    /// Register the parser for its format. A later parser for the same format
    /// replaces the earlier one.
    pub fn parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parsers.insert(parser.format(), parser);
        self
    }

    pub fn version(mut self, version: BibleVersion, loader: Arc<dyn AssetLoader>) -> Self {
        self.versions.push((version, loader));
        self
    }

    pub fn default_version(mut self, id: VersionId) -> Self {
        self.default_version = Some(id);
        self
    }

    pub fn search_book_limit(mut self, limit: usize) -> Self {
        self.search_book_limit = limit;
        self
    }

    /// # Errors
    ///
    /// - `NoVersionsRegistered` without any version
    /// - `DuplicateVersion` when two versions share an id
    /// - `UnsupportedFormat` when a version's format has no parser
    /// - `UnknownVersion` when the default version is not registered
    pub fn build(self) -> LectioResult<BibleService> {
        if self.versions.is_empty() {
            return Err(ApplicationError::NoVersionsRegistered.into());
        }

        let mut index = HashMap::new();
        let mut versions = Vec::with_capacity(self.versions.len());
        for (version, loader) in self.versions {
            if !self.parsers.contains_key(&version.format) {
                return Err(ApplicationError::UnsupportedFormat {
                    format: version.format.to_string(),
                }
                .into());
            }
            if index.insert(version.id.clone(), versions.len()).is_some() {
                return Err(ApplicationError::DuplicateVersion {
                    id: version.id.to_string(),
                }
                .into());
            }
            versions.push(RegisteredVersion { version, loader });
        }

        let current = match self.default_version {
            Some(id) if index.contains_key(&id) => id,
            Some(id) => {
                return Err(ApplicationError::UnknownVersion { id: id.to_string() }.into());
            }
            None => versions[0].version.id.clone(),
        };

        info!(
            versions = versions.len(),
            parsers = self.parsers.len(),
            current = %current,
            "Bible service ready"
        );

        Ok(BibleService {
            versions,
            index,
            parsers: self.parsers,
            current: RwLock::new(current),
            cache: Mutex::new(HashMap::new()),
            search_book_limit: self.search_book_limit,
        })
    }
}

// ============================================================================
// Service
// ============================================================================

/// Multi-version scripture registry.
///
/// `Send + Sync`; share it behind an `Arc`.
pub struct BibleService {
    versions: Vec<RegisteredVersion>,
    index: HashMap<VersionId, usize>,
    parsers: HashMap<Format, Arc<dyn DocumentParser>>,
    current: RwLock<VersionId>,
    cache: Mutex<HashMap<(VersionId, BookCode), BookCell>>,
    search_book_limit: usize,
}

impl fmt::Debug for BibleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BibleService")
            .field(
                "versions",
                &self.versions.iter().map(|r| r.version.id.as_str()).collect::<Vec<_>>(),
            )
            .field("current", &self.current_version().as_str())
            .field("cached_books", &self.cached_book_count())
            .field("search_book_limit", &self.search_book_limit)
            .finish()
    }
}

impl BibleService {
    pub fn builder() -> BibleServiceBuilder {
        BibleServiceBuilder::default()
    }

    // -------------------------------------------------------------------------
    // Versions
    // -------------------------------------------------------------------------

    /// Switch the version used when a call passes no explicit version.
    ///
    /// The cache is untouched.
    pub fn set_current_version(&self, id: &VersionId) -> LectioResult<()> {
        self.registered(id)?;
        let mut current = self
            .current
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;
        *current = id.clone();
        info!(version = %id, "Current version changed");
        Ok(())
    }

    pub fn current_version(&self) -> VersionId {
        match self.current.read() {
            Ok(id) => id.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Registered versions in registration order.
    pub fn available_versions(&self) -> Vec<&BibleVersion> {
        self.versions.iter().map(|r| &r.version).collect()
    }

    pub fn version(&self, id: &VersionId) -> LectioResult<&BibleVersion> {
        self.registered(id).map(|r| &r.version)
    }

    pub fn search_book_limit(&self) -> usize {
        self.search_book_limit
    }

    // -------------------------------------------------------------------------
    // Books
    // -------------------------------------------------------------------------

    /// Return the parsed book, loading and parsing it on first use.
    ///
    /// # Errors
    ///
    /// - `UnknownVersion` for an unregistered version
    /// - `AssetNotFound` / `LoaderFailure` from the loader
    /// - `ParseFailure` wrapping the parser's reason
    #[instrument(skip(self))]
    pub async fn load_book(
        &self,
        book: &BookCode,
        version: Option<&VersionId>,
    ) -> LectioResult<Arc<ParsedBook>> {
        let id = self.resolve_version(version);
        let registered = self.registered(&id)?;

        let key = (id.clone(), book.clone());
        let cell = {
            let mut cache = self
                .cache
                .lock()
                .map_err(|_| ApplicationError::CacheLockError)?;
            cache.entry(key.clone()).or_default().clone()
        };

        if let Some(parsed) = cell.get() {
            debug!(book = %book, version = %id, "Cache hit");
            return Ok(Arc::clone(parsed));
        }

        match cell
            .get_or_try_init(|| self.fetch_and_parse(registered, book))
            .await
        {
            Ok(parsed) => Ok(Arc::clone(parsed)),
            Err(e) => {
                self.forget_failed(&key, &cell);
                Err(e)
            }
        }
    }

    /// Drop an entry whose load failed so the map only holds live cells.
    /// A cell another caller is still waiting on stays; that caller retries
    /// the load on it.
    fn forget_failed(&self, key: &(VersionId, BookCode), cell: &BookCell) {
        if let Ok(mut cache) = self.cache.lock() {
            let unshared = cache.get(key).is_some_and(|held| {
                Arc::ptr_eq(held, cell) && Arc::strong_count(cell) == 2 && !cell.initialized()
            });
            if unshared {
                cache.remove(key);
            }
        }
    }

    /// Whether the version's loader has a document for `book`.
    pub async fn has_book(&self, book: &BookCode, version: Option<&VersionId>) -> LectioResult<bool> {
        let id = self.resolve_version(version);
        let registered = self.registered(&id)?;
        Ok(registered.loader.is_available(&id, book).await)
    }

    /// Books available in a version, in canonical order.
    pub async fn available_books(&self, version: Option<&VersionId>) -> LectioResult<Vec<BookCode>> {
        let id = self.resolve_version(version);
        let registered = self.registered(&id)?;
        let mut books = registered.loader.list_available_books(&id).await?;
        sort_canonical(&mut books);
        books.dedup();
        Ok(books)
    }

    pub fn clear_cache(&self) -> LectioResult<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| ApplicationError::CacheLockError)?;
        let dropped = cache.len();
        cache.clear();
        debug!(entries = dropped, "Cache cleared");
        Ok(())
    }

    /// Books currently parsed and held, across all versions.
    pub fn cached_book_count(&self) -> usize {
        self.cache
            .lock()
            .map(|cache| cache.values().filter(|cell| cell.initialized()).count())
            .unwrap_or(0)
    }

    /// The parser registered for a version's format.
    pub fn parser_for(&self, version: Option<&VersionId>) -> LectioResult<Arc<dyn DocumentParser>> {
        let id = self.resolve_version(version);
        let registered = self.registered(&id)?;
        self.parser(&registered.version).cloned()
    }

    // -------------------------------------------------------------------------
    // Passages
    // -------------------------------------------------------------------------

    /// Fetch a passage; every failure becomes `None` after being logged.
    ///
    /// A reference with a comma is tried as a multi-range list first.
    pub async fn get_passage_by_reference(
        &self,
        reference: &str,
        version: Option<&VersionId>,
    ) -> Option<Passage> {
        match self.try_get_passage(reference, version).await {
            Ok(passage) => Some(passage),
            Err(e) => {
                warn!(reference, error = %e, "Passage lookup failed");
                None
            }
        }
    }

    /// Fetch a passage with the failure reason.
    ///
    /// # Errors
    ///
    /// Grammar errors (`EmptyReference`, `InvalidReference`, `UnknownBook`),
    /// load errors as in [`Self::load_book`], and `VerseNotFound` when the
    /// range holds no verse.
    #[instrument(skip(self))]
    pub async fn try_get_passage(
        &self,
        reference: &str,
        version: Option<&VersionId>,
    ) -> LectioResult<Passage> {
        if reference.contains(',') {
            if let Some(complex) = parse_complex_reference(reference) {
                return self.assemble_complex(&complex, version).await;
            }
        }

        let range = normalize_range_order(parse_reference(reference)?);
        let book = self.load_book(&range.book_code, version).await?;
        let verses = collect_range(
            &book,
            range.start_chapter,
            range.start_verse,
            range.end_chapter,
            range.end_verse,
        );

        let display_reference = format_reference(&range, ReferenceStyle::Code);
        if verses.is_empty() {
            return Err(DomainError::VerseNotFound {
                reference: display_reference,
            }
            .into());
        }

        debug!(reference = %display_reference, verses = verses.len(), "Passage assembled");
        Ok(Passage::new(&range, verses, display_reference))
    }

    /// Passage text joined per `options`; `None` on any failure.
    pub async fn get_passage_text(
        &self,
        reference: &str,
        options: &PassageTextOptions,
        version: Option<&VersionId>,
    ) -> Option<String> {
        let passage = self.get_passage_by_reference(reference, version).await?;
        Some(passage.text(options.include_verse_numbers, &options.separator))
    }

    /// One verse by citation, e.g. `Jn 3:16`.
    ///
    /// # Errors
    ///
    /// `InvalidReference` when the citation names a range, `VerseNotFound`
    /// when the book has no such verse.
    pub async fn get_verse(
        &self,
        reference: &str,
        version: Option<&VersionId>,
    ) -> LectioResult<ParsedVerse> {
        let range = parse_reference(reference)?;
        if !range.is_single_verse() {
            return Err(DomainError::invalid_reference(reference, "expected a single verse").into());
        }

        let book = self.load_book(&range.book_code, version).await?;
        book.verse(range.start_chapter, range.start_verse)
            .cloned()
            .ok_or_else(|| {
                DomainError::VerseNotFound {
                    reference: range.to_string(),
                }
                .into()
            })
    }

    /// A whole chapter.
    pub async fn get_chapter(
        &self,
        book: &BookCode,
        chapter: u32,
        version: Option<&VersionId>,
    ) -> LectioResult<ParsedChapter> {
        let parsed = self.load_book(book, version).await?;
        parsed.chapter(chapter).cloned().ok_or_else(|| {
            DomainError::VerseNotFound {
                reference: format!("{book} {chapter}"),
            }
            .into()
        })
    }

    /// Format a range, preferring the version's own book names.
    pub fn format_reference(
        &self,
        range: &NormalizedRange,
        style: ReferenceStyle,
        version: Option<&VersionId>,
    ) -> LectioResult<String> {
        let id = self.resolve_version(version);
        let registered = self.registered(&id)?;
        Ok(registered.version.format_reference(range, style))
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Search the current version.
    ///
    /// `scope` is a category tag (`gospels`, `nt`), a book name, or `None`
    /// for the first books of the version in canonical order. A category tag
    /// wins over a book of the same name (`wisdom`); use the code (`WIS`) for
    /// the book.
    pub async fn search(
        &self,
        text: &str,
        scope: Option<&str>,
        case_sensitive: bool,
    ) -> LectioResult<Vec<ParsedVerse>> {
        let id = self.current_version();
        self.search_in_version(&id, text, scope, case_sensitive).await
    }

    /// Search an explicit version; the current version is not consulted.
    ///
    /// # Errors
    ///
    /// `UnknownVersion`, `UnknownBook` for an unresolvable scope, and load
    /// errors for a single-book scope. In multi-book scopes a book that fails
    /// to load is skipped with a warning.
    #[instrument(skip(self, text), fields(needle_len = text.len()))]
    pub async fn search_in_version(
        &self,
        version: &VersionId,
        text: &str,
        scope: Option<&str>,
        case_sensitive: bool,
    ) -> LectioResult<Vec<ParsedVerse>> {
        let registered = self.registered(version)?;
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let parser = Arc::clone(self.parser(&registered.version)?);

        match self.resolve_scope(registered, scope).await? {
            SearchScope::Book(code) => {
                let book = self.load_book(&code, Some(version)).await?;
                Ok(parser.search_in_book(&book, text, case_sensitive))
            }
            SearchScope::Books(codes) => {
                let mut hits = Vec::new();
                for code in codes {
                    match self.load_book(&code, Some(version)).await {
                        Ok(book) => hits.extend(parser.search_in_book(&book, text, case_sensitive)),
                        Err(e) => warn!(book = %code, error = %e, "Skipping book in search"),
                    }
                }
                debug!(hits = hits.len(), "Search finished");
                Ok(hits)
            }
        }
    }

    /// Run one search per version (all registered when `versions` is `None`).
    ///
    /// A failing version is recorded in `failures` and never stops the
    /// others. The current version is unchanged afterwards.
    pub async fn search_multiple_versions(
        &self,
        text: &str,
        versions: Option<&[VersionId]>,
        case_sensitive: bool,
    ) -> MultiVersionSearch {
        let targets: Vec<VersionId> = match versions {
            Some(ids) => ids.to_vec(),
            None => self.versions.iter().map(|r| r.version.id.clone()).collect(),
        };

        let mut result = MultiVersionSearch::default();
        for id in targets {
            match self.search_in_version(&id, text, None, case_sensitive).await {
                Ok(verses) => result.hits.extend(verses.into_iter().map(|verse| VersionedVerse {
                    version: id.clone(),
                    verse,
                })),
                Err(e) => {
                    warn!(version = %id, error = %e, "Version search failed");
                    result.failures.push(VersionFailure {
                        version: id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        result
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn resolve_version(&self, version: Option<&VersionId>) -> VersionId {
        version.cloned().unwrap_or_else(|| self.current_version())
    }

    fn registered(&self, id: &VersionId) -> LectioResult<&RegisteredVersion> {
        self.index
            .get(id)
            .map(|&idx| &self.versions[idx])
            .ok_or_else(|| ApplicationError::UnknownVersion { id: id.to_string() }.into())
    }

    fn parser(&self, version: &BibleVersion) -> LectioResult<&Arc<dyn DocumentParser>> {
        self.parsers.get(&version.format).ok_or_else(|| {
            ApplicationError::UnsupportedFormat {
                format: version.format.to_string(),
            }
            .into()
        })
    }

    async fn fetch_and_parse(
        &self,
        registered: &RegisteredVersion,
        book: &BookCode,
    ) -> LectioResult<Arc<ParsedBook>> {
        let id = &registered.version.id;
        debug!(book = %book, version = %id, "Cache miss, loading");

        let raw = registered.loader.load_raw(id, book).await?;
        let parser = self.parser(&registered.version)?;
        let result = parser
            .parse(&raw)
            .map_err(|e| ApplicationError::ParseFailure {
                version: id.to_string(),
                book: book.to_string(),
                reason: e.to_string(),
            })?;

        let meta = &result.metadata;
        if meta.dropped_verses > 0 {
            warn!(
                book = %book,
                version = %id,
                dropped = meta.dropped_verses,
                "Dropped malformed verse markers"
            );
        }
        if result.book.code != *book {
            warn!(
                requested = %book,
                declared = %result.book.code,
                "Document declares a different book code"
            );
        }
        debug!(
            book = %book,
            version = %id,
            chapters = meta.chapter_count,
            verses = meta.verse_count,
            "Book parsed"
        );

        Ok(Arc::new(result.book))
    }

    async fn assemble_complex(
        &self,
        complex: &ComplexReference,
        version: Option<&VersionId>,
    ) -> LectioResult<Passage> {
        let book = self.load_book(&complex.book_code, version).await?;

        let mut verses = Vec::new();
        for range in complex.to_ranges() {
            let range = normalize_range_order(range);
            verses.extend(collect_range(
                &book,
                range.start_chapter,
                range.start_verse,
                range.end_chapter,
                range.end_verse,
            ));
        }

        let display_reference = format_complex_reference(complex, ReferenceStyle::Code);
        let bounds = match complex.bounds() {
            Some(bounds) if !verses.is_empty() => bounds,
            _ => return Err(DomainError::VerseNotFound { reference: display_reference }.into()),
        };

        Ok(Passage::new(&bounds, verses, display_reference))
    }

    async fn resolve_scope(
        &self,
        registered: &RegisteredVersion,
        scope: Option<&str>,
    ) -> LectioResult<SearchScope> {
        let id = &registered.version.id;
        let scope = scope.map(str::trim).filter(|s| !s.is_empty());

        match scope {
            None => {
                let mut books = registered.loader.list_available_books(id).await?;
                sort_canonical(&mut books);
                books.dedup();
                books.truncate(self.search_book_limit);
                Ok(SearchScope::Books(books))
            }
            Some(tag) => {
                if let Some(category) = CategoryTag::parse(tag) {
                    let available: HashSet<BookCode> = registered
                        .loader
                        .list_available_books(id)
                        .await?
                        .into_iter()
                        .collect();
                    let books = books_in(category)
                        .into_iter()
                        .filter(|code| available.contains(code))
                        .collect();
                    return Ok(SearchScope::Books(books));
                }

                resolve_book_code(tag).map(SearchScope::Book).ok_or_else(|| {
                    DomainError::UnknownBook {
                        name: tag.to_string(),
                    }
                    .into()
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::application::ports::MockAssetLoader;
    use crate::domain::{BookNameTable, BookNames, DocumentMetadata, ParseResult};
    use crate::error::LectioError;

    /// Reads `BOOK=<code>` on the first line, then `C:V text` lines.
    struct LineParser;

    impl DocumentParser for LineParser {
        fn format(&self) -> Format {
            Format::Usx
        }

        fn parse(&self, raw: &str) -> Result<ParseResult, DomainError> {
            let mut lines = raw.lines();
            let code = lines
                .next()
                .and_then(|l| l.strip_prefix("BOOK="))
                .ok_or_else(|| DomainError::malformed("missing BOOK line"))
                .and_then(|c| BookCode::new(c))?;

            let mut chapters: Vec<ParsedChapter> = Vec::new();
            for line in lines {
                let (cv, text) = line.split_once(' ').unwrap_or((line, ""));
                let (c, v) = cv
                    .split_once(':')
                    .ok_or_else(|| DomainError::malformed(format!("bad line '{line}'")))?;
                let (c, v): (u32, u32) = (c.parse().unwrap(), v.parse().unwrap());
                let verse = ParsedVerse::new(&code, c, v, text);
                match chapters.iter_mut().find(|ch| ch.number == c) {
                    Some(ch) => ch.verses.push(verse),
                    None => chapters.push(ParsedChapter::new(c, vec![verse])),
                }
            }

            let mut metadata = DocumentMetadata::new(Format::Usx);
            metadata.chapter_count = chapters.len();
            Ok(ParseResult {
                book: ParsedBook::new(code.clone(), code.as_str(), code.as_str(), code.as_str(), chapters),
                metadata,
            })
        }
    }

    const GEN: &str = "BOOK=GEN\n1:1 In the beginning\n1:2 And the earth\n2:1 Thus the heavens\n2:7 And the LORD God formed man";
    const MAT: &str = "BOOK=MAT\n5:3 Blessed are the poor in spirit\n5:4 Blessed are they that mourn";

    fn vid(s: &str) -> VersionId {
        VersionId::new(s).unwrap()
    }

    fn code(s: &str) -> BookCode {
        BookCode::new(s).unwrap()
    }

    fn version(id: &str) -> BibleVersion {
        BibleVersion::new(vid(id), id.to_uppercase(), "en", Format::Usx)
    }

    fn document(book: &BookCode) -> LectioResult<String> {
        match book.as_str() {
            "GEN" => Ok(GEN.to_string()),
            "MAT" => Ok(MAT.to_string()),
            other => Err(ApplicationError::AssetNotFound {
                version: "test".into(),
                book: other.into(),
            }
            .into()),
        }
    }

    fn library_loader() -> MockAssetLoader {
        let mut loader = MockAssetLoader::new();
        loader.expect_load_raw().returning(|_, book| document(book));
        loader
            .expect_list_available_books()
            .returning(|_| Ok(vec![code("MAT"), code("GEN")]));
        loader
            .expect_is_available()
            .returning(|_, book| matches!(book.as_str(), "GEN" | "MAT"));
        loader
    }

    fn service_with(loader: MockAssetLoader) -> BibleService {
        BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv"), Arc::new(loader))
            .build()
            .unwrap()
    }

    // ========================================================================
    // Builder
    // ========================================================================

    #[test]
    fn build_without_versions_fails() {
        let err = BibleService::builder()
            .parser(Arc::new(LineParser))
            .build()
            .err()
            .unwrap();
        assert_eq!(err, ApplicationError::NoVersionsRegistered.into());
    }

    #[test]
    fn build_rejects_duplicate_versions() {
        let err = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv"), Arc::new(MockAssetLoader::new()))
            .version(version("kjv"), Arc::new(MockAssetLoader::new()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            LectioError::Application(ApplicationError::DuplicateVersion { .. })
        ));
    }

    #[test]
    fn build_rejects_format_without_parser() {
        let usfx = BibleVersion::new(vid("vulgate"), "Vulgata", "la", Format::Usfx);
        let err = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(usfx, Arc::new(MockAssetLoader::new()))
            .build()
            .err()
            .unwrap();
        assert_eq!(
            err,
            ApplicationError::UnsupportedFormat {
                format: "usfx".into()
            }
            .into()
        );
    }

    #[test]
    fn build_rejects_unknown_default() {
        let err = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv"), Arc::new(MockAssetLoader::new()))
            .default_version(vid("dra"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            LectioError::Application(ApplicationError::UnknownVersion { .. })
        ));
    }

    #[test]
    fn first_version_is_current_by_default() {
        let service = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv"), Arc::new(MockAssetLoader::new()))
            .version(version("dra"), Arc::new(MockAssetLoader::new()))
            .build()
            .unwrap();
        assert_eq!(service.current_version(), vid("kjv"));
        assert_eq!(service.available_versions().len(), 2);
    }

    // ========================================================================
    // Versions
    // ========================================================================

    #[test]
    fn set_current_version_rejects_unknown_ids() {
        let service = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv"), Arc::new(MockAssetLoader::new()))
            .version(version("dra"), Arc::new(MockAssetLoader::new()))
            .build()
            .unwrap();

        assert!(service.set_current_version(&vid("nope")).is_err());
        assert_eq!(service.current_version(), vid("kjv"));

        service.set_current_version(&vid("dra")).unwrap();
        assert_eq!(service.current_version(), vid("dra"));
    }

    // ========================================================================
    // Loading and cache
    // ========================================================================

    #[tokio::test]
    async fn load_book_parses_once_per_key() {
        let mut loader = MockAssetLoader::new();
        loader
            .expect_load_raw()
            .withf(|_, book| book.as_str() == "GEN")
            .times(1)
            .returning(|_, _| Ok(GEN.to_string()));
        let service = service_with(loader);

        let first = service.load_book(&code("GEN"), None).await.unwrap();
        let second = service.load_book(&code("GEN"), None).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.cached_book_count(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut loader = MockAssetLoader::new();
        loader.expect_load_raw().times(2).returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ApplicationError::LoaderFailure {
                    version: "kjv".into(),
                    book: "GEN".into(),
                    reason: "connection reset".into(),
                }
                .into())
            } else {
                Ok(GEN.to_string())
            }
        });
        let service = service_with(loader);

        let err = service.load_book(&code("GEN"), None).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(service.cached_book_count(), 0);
        assert!(service.cache.lock().unwrap().is_empty());

        assert!(service.load_book(&code("GEN"), None).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn parse_failure_wraps_reason() {
        let mut loader = MockAssetLoader::new();
        loader
            .expect_load_raw()
            .returning(|_, _| Ok("no header".to_string()));
        let service = service_with(loader);

        let err = service.load_book(&code("GEN"), None).await.unwrap_err();
        match err {
            LectioError::Application(ApplicationError::ParseFailure { book, reason, .. }) => {
                assert_eq!(book, "GEN");
                assert!(reason.contains("BOOK"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_asset_is_not_found() {
        let service = service_with(library_loader());
        let err = service.load_book(&code("EXO"), None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn debug_lists_versions_without_loaders() {
        let service = service_with(MockAssetLoader::new());
        let rendered = format!("{service:?}");
        assert!(rendered.contains("BibleService"));
        assert!(rendered.contains("\"kjv\""));
        assert!(rendered.contains("cached_books: 0"));
    }

    #[tokio::test]
    async fn clear_cache_forces_reload() {
        let mut loader = MockAssetLoader::new();
        loader
            .expect_load_raw()
            .times(2)
            .returning(|_, _| Ok(GEN.to_string()));
        let service = service_with(loader);

        service.load_book(&code("GEN"), None).await.unwrap();
        service.clear_cache().unwrap();
        assert_eq!(service.cached_book_count(), 0);
        service.load_book(&code("GEN"), None).await.unwrap();
    }

    #[tokio::test]
    async fn has_book_and_available_books_use_the_loader() {
        let service = service_with(library_loader());
        assert!(service.has_book(&code("GEN"), None).await.unwrap());
        assert!(!service.has_book(&code("EXO"), None).await.unwrap());

        let books = service.available_books(None).await.unwrap();
        assert_eq!(books, vec![code("GEN"), code("MAT")]);
    }

    // ========================================================================
    // Passages
    // ========================================================================

    #[tokio::test]
    async fn passage_spans_chapters() {
        let service = service_with(library_loader());

        let passage = service
            .get_passage_by_reference("Genesis 1:2-2:7", None)
            .await
            .unwrap();

        let refs: Vec<_> = passage.verses.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, ["GEN 1:2", "GEN 2:1", "GEN 2:7"]);
        assert_eq!(passage.display_reference, "GEN 1:2-2:7");
    }

    #[tokio::test]
    async fn reversed_passage_is_normalized() {
        let service = service_with(library_loader());
        let passage = service
            .get_passage_by_reference("Genesis 2:1-1:2", None)
            .await
            .unwrap();
        assert_eq!(passage.display_reference, "GEN 1:2-2:1");
        assert_eq!(passage.verses.len(), 2);
    }

    #[tokio::test]
    async fn bad_references_are_none() {
        let service = service_with(library_loader());
        assert!(service.get_passage_by_reference("Invalid 3:17", None).await.is_none());
        assert!(service.get_passage_by_reference("Genesis", None).await.is_none());
        assert!(service.get_passage_by_reference("Exodus 1:1", None).await.is_none());
    }

    #[tokio::test]
    async fn empty_passage_is_none_but_detailed_call_says_why() {
        let service = service_with(library_loader());
        assert!(service.get_passage_by_reference("Genesis 9:1-5", None).await.is_none());

        let err = service.try_get_passage("Genesis 9:1-5", None).await.unwrap_err();
        assert!(matches!(
            err,
            LectioError::Domain(DomainError::VerseNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn comma_reference_assembles_each_piece() {
        let service = service_with(library_loader());
        let passage = service
            .get_passage_by_reference("Gen 1:1, 2:7", None)
            .await
            .unwrap();

        let refs: Vec<_> = passage.verses.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, ["GEN 1:1", "GEN 2:7"]);
        assert_eq!(passage.display_reference, "GEN 1:1, 2:7");
        assert_eq!((passage.start_chapter, passage.end_chapter), (1, 2));
    }

    #[tokio::test]
    async fn passage_text_joins_with_options() {
        let service = service_with(library_loader());

        let plain = service
            .get_passage_text("Mat 5:3-4", &PassageTextOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(plain, "Blessed are the poor in spirit Blessed are they that mourn");

        let numbered = PassageTextOptions {
            include_verse_numbers: true,
            separator: "\n".into(),
        };
        let text = service
            .get_passage_text("Mat 5:3-4", &numbered, None)
            .await
            .unwrap();
        assert_eq!(
            text,
            "3 Blessed are the poor in spirit\n4 Blessed are they that mourn"
        );
    }

    #[tokio::test]
    async fn get_verse_and_chapter() {
        let service = service_with(library_loader());

        let verse = service.get_verse("Gen 2:7", None).await.unwrap();
        assert_eq!(verse.reference, "GEN 2:7");
        assert!(service.get_verse("Gen 2:1-7", None).await.is_err());
        assert!(service.get_verse("Gen 2:2", None).await.unwrap_err().is_not_found());

        let chapter = service.get_chapter(&code("GEN"), 1, None).await.unwrap();
        assert_eq!(chapter.verses.len(), 2);
        assert!(service.get_chapter(&code("GEN"), 3, None).await.is_err());
    }

    #[test]
    fn format_reference_prefers_version_names() {
        let mut names = BookNameTable::new();
        names.insert(code("GEN"), BookNames::new("Liber Genesis", "Genesis", "Gn"));
        let service = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv").with_book_names(names), Arc::new(MockAssetLoader::new()))
            .build()
            .unwrap();

        let range = NormalizedRange::new(code("GEN"), 1, 1, 2, 7);
        assert_eq!(
            service.format_reference(&range, ReferenceStyle::Full, None).unwrap(),
            "Liber Genesis 1:1-2:7"
        );
        assert!(
            service
                .format_reference(&range, ReferenceStyle::Full, Some(&vid("dra")))
                .is_err()
        );
    }

    // ========================================================================
    // Search
    // ========================================================================

    #[tokio::test]
    async fn search_without_scope_covers_available_books() {
        let service = service_with(library_loader());
        let hits = service.search("and", None, false).await.unwrap();
        let refs: Vec<_> = hits.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, ["GEN 1:2", "GEN 2:7"]);
    }

    #[tokio::test]
    async fn search_limit_truncates_in_canonical_order() {
        let service = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv"), Arc::new(library_loader()))
            .search_book_limit(1)
            .build()
            .unwrap();

        let hits = service.search("Blessed", None, false).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn search_scopes() {
        let service = service_with(library_loader());

        let gospels = service.search("blessed", Some("gospels"), false).await.unwrap();
        assert_eq!(gospels.len(), 2);

        let genesis = service.search("the", Some("Genesis"), true).await.unwrap();
        assert_eq!(genesis.len(), 4);

        let err = service.search("the", Some("Nowhere"), false).await.unwrap_err();
        assert!(matches!(err, LectioError::Domain(DomainError::UnknownBook { .. })));

        assert!(service.search("", None, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_book_scope_propagates_load_errors() {
        let service = service_with(library_loader());
        assert!(service.search("x", Some("Exodus"), false).await.is_err());
    }

    #[tokio::test]
    async fn multi_version_search_isolates_failures() {
        let mut broken = MockAssetLoader::new();
        broken.expect_list_available_books().returning(|_| {
            Err(ApplicationError::LoaderFailure {
                version: "dra".into(),
                book: "*".into(),
                reason: "disk gone".into(),
            }
            .into())
        });

        let service = BibleService::builder()
            .parser(Arc::new(LineParser))
            .version(version("kjv"), Arc::new(library_loader()))
            .version(version("dra"), Arc::new(broken))
            .default_version(vid("dra"))
            .build()
            .unwrap();

        let result = service.search_multiple_versions("Blessed", None, false).await;
        assert_eq!(result.hits.len(), 2);
        assert!(result.hits.iter().all(|h| h.version == vid("kjv")));
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].version, vid("dra"));
        assert_eq!(service.current_version(), vid("dra"));
    }

    #[tokio::test]
    async fn multi_version_search_reports_unknown_ids() {
        let service = service_with(library_loader());
        let ids = [vid("kjv"), vid("nope")];
        let result = service.search_multiple_versions("Blessed", Some(&ids), false).await;
        assert_eq!(result.hits.len(), 2);
        assert_eq!(result.failures.len(), 1);
    }
}
