//! The parsed book tree: `ParsedBook` → `ParsedChapter` → `ParsedVerse`.
//!
//! A tree is produced once by a document parser and never mutated afterwards;
//! the registry shares it behind an `Arc`. Everything here is independent of
//! the source format, so lookups, search and statistics are implemented once
//! on the tree rather than per parser.

use serde::{Deserialize, Serialize};

use crate::domain::assembly::collect_range;
use crate::domain::books::resolve_book_code;
use crate::domain::value_objects::{BookCode, Format};

/// One verse with its markup removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVerse {
    pub number: u32,
    pub text: String,
    /// Canonical `"BOOK C:V"`.
    pub reference: String,
}

impl ParsedVerse {
    pub fn new(book: &BookCode, chapter: u32, number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            reference: format!("{book} {chapter}:{number}"),
        }
    }
}

/// One chapter; verses ascending by number, gaps allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedChapter {
    pub number: u32,
    pub verses: Vec<ParsedVerse>,
}

impl ParsedChapter {
    /// Build a chapter, sorting verses so the ordering invariant holds
    /// whatever order the source listed them in.
    pub fn new(number: u32, mut verses: Vec<ParsedVerse>) -> Self {
        verses.sort_by_key(|v| v.number);
        Self { number, verses }
    }

    pub fn verse(&self, number: u32) -> Option<&ParsedVerse> {
        self.verses
            .binary_search_by_key(&number, |v| v.number)
            .ok()
            .map(|idx| &self.verses[idx])
    }
}

/// Summed counts over a whole book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStats {
    pub chapters: usize,
    pub verses: usize,
    pub words: usize,
    pub characters: usize,
}

/// One book of one version, fully parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBook {
    pub code: BookCode,
    pub title: String,
    pub short_title: String,
    pub abbreviation: String,
    pub chapters: Vec<ParsedChapter>,
}

impl ParsedBook {
    /// Build a book, sorting chapters ascending.
    pub fn new(
        code: BookCode,
        title: impl Into<String>,
        short_title: impl Into<String>,
        abbreviation: impl Into<String>,
        mut chapters: Vec<ParsedChapter>,
    ) -> Self {
        chapters.sort_by_key(|c| c.number);
        Self {
            code,
            title: title.into(),
            short_title: short_title.into(),
            abbreviation: abbreviation.into(),
            chapters,
        }
    }

    pub fn chapter(&self, number: u32) -> Option<&ParsedChapter> {
        self.chapters
            .binary_search_by_key(&number, |c| c.number)
            .ok()
            .map(|idx| &self.chapters[idx])
    }

    pub fn verse(&self, chapter: u32, verse: u32) -> Option<&ParsedVerse> {
        self.chapter(chapter).and_then(|c| c.verse(verse))
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Look a verse up by its `"BOOK C:V"` string.
    ///
    /// The book part must name this book, either by code or by any alias the
    /// resolver accepts.
    pub fn verse_by_reference(&self, reference: &str) -> Option<&ParsedVerse> {
        let (chapter, verse) = self.locate(reference)?;
        self.verse(chapter, verse)
    }

    /// Verses from `start_ref` to `end_ref` inclusive, in book order.
    ///
    /// Empty when either reference cannot be located in this book.
    pub fn verse_range(&self, start_ref: &str, end_ref: &str) -> Vec<ParsedVerse> {
        let (Some((sc, sv)), Some((ec, ev))) = (self.locate(start_ref), self.locate(end_ref))
        else {
            return Vec::new();
        };
        if self.verse(sc, sv).is_none() || self.verse(ec, ev).is_none() {
            return Vec::new();
        }

        collect_range(self, sc, sv, ec, ev)
    }

    /// Verses whose text contains `needle`.
    pub fn search(&self, needle: &str, case_sensitive: bool) -> Vec<ParsedVerse> {
        if needle.is_empty() {
            return Vec::new();
        }

        let folded = (!case_sensitive).then(|| needle.to_lowercase());
        self.chapters
            .iter()
            .flat_map(|c| c.verses.iter())
            .filter(|v| match &folded {
                Some(needle) => v.text.to_lowercase().contains(needle.as_str()),
                None => v.text.contains(needle),
            })
            .cloned()
            .collect()
    }

    /// Counts computed by summation on every call.
    pub fn stats(&self) -> BookStats {
        let verses = self.chapters.iter().flat_map(|c| c.verses.iter());
        let (count, words, characters) = verses.fold((0, 0, 0), |(n, w, ch), v| {
            (
                n + 1,
                w + v.text.split_whitespace().count(),
                ch + v.text.chars().count(),
            )
        });

        BookStats {
            chapters: self.chapters.len(),
            verses: count,
            words,
            characters,
        }
    }

    /// Split `"BOOK C:V"` into chapter and verse if the book part is this book.
    fn locate(&self, reference: &str) -> Option<(u32, u32)> {
        let reference = reference.trim();
        let split = reference.rfind(|c: char| c.is_whitespace())?;
        let (book, cv) = reference.split_at(split);
        let (chapter, verse) = cv.trim().split_once(':')?;
        let chapter: u32 = chapter.trim().parse().ok()?;
        let verse: u32 = verse.trim().parse().ok()?;

        let book = book.trim();
        let same_book = book.eq_ignore_ascii_case(self.code.as_str())
            || resolve_book_code(book).as_ref() == Some(&self.code);
        same_book.then_some((chapter, verse))
    }
}

/// What a parser learned besides the tree itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub format: Format,
    /// `version` attribute of the root element, when present.
    pub schema_version: Option<String>,
    pub chapter_count: usize,
    pub verse_count: usize,
    /// Verse markers that produced no verse (unterminated, interrupted,
    /// mismatched or unnumbered).
    pub dropped_verses: usize,
    pub warnings: Vec<String>,
}

impl DocumentMetadata {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            schema_version: None,
            chapter_count: 0,
            verse_count: 0,
            dropped_verses: 0,
            warnings: Vec::new(),
        }
    }
}

/// Output of `DocumentParser::parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub book: ParsedBook,
    pub metadata: DocumentMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis() -> ParsedBook {
        let code = BookCode::new("GEN").unwrap();
        ParsedBook::new(
            code.clone(),
            "Genesis",
            "Genesis",
            "Gen",
            vec![
                ParsedChapter::new(
                    2,
                    vec![
                        ParsedVerse::new(&code, 2, 7, "The Lord God formed man"),
                        ParsedVerse::new(&code, 2, 1, "Thus the heavens were finished"),
                    ],
                ),
                ParsedChapter::new(
                    1,
                    vec![
                        ParsedVerse::new(&code, 1, 1, "In the beginning God created"),
                        ParsedVerse::new(&code, 1, 2, "And the earth was without form"),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn construction_sorts_chapters_and_verses() {
        let book = genesis();
        let numbers: Vec<_> = book.chapters.iter().map(|c| c.number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(book.chapters[1].verses[0].number, 1);
    }

    #[test]
    fn verse_by_reference_accepts_code_and_alias() {
        let book = genesis();
        assert_eq!(book.verse_by_reference("GEN 1:2").unwrap().number, 2);
        assert_eq!(book.verse_by_reference("Genesis 2:7").unwrap().number, 7);
        assert!(book.verse_by_reference("EXO 1:1").is_none());
        assert!(book.verse_by_reference("GEN 9:9").is_none());
        assert!(book.verse_by_reference("GEN").is_none());
    }

    #[test]
    fn verse_range_spans_chapters() {
        let refs: Vec<_> = genesis()
            .verse_range("GEN 1:2", "GEN 2:7")
            .into_iter()
            .map(|v| v.reference)
            .collect();
        assert_eq!(refs, ["GEN 1:2", "GEN 2:1", "GEN 2:7"]);
    }

    #[test]
    fn verse_range_with_unknown_endpoint_is_empty() {
        assert!(genesis().verse_range("GEN 1:1", "GEN 2:3").is_empty());
    }

    #[test]
    fn search_respects_case_flag() {
        let book = genesis();
        assert_eq!(book.search("god", false).len(), 2);
        assert!(book.search("god", true).is_empty());
        assert!(book.search("", false).is_empty());
    }

    #[test]
    fn stats_sum_over_verses() {
        let stats = genesis().stats();
        assert_eq!(stats.chapters, 2);
        assert_eq!(stats.verses, 4);
        assert_eq!(stats.words, 21);
        assert!(stats.characters > stats.words);
    }
}
