use serde::{Deserialize, Serialize};

use crate::domain::entities::book::ParsedVerse;
use crate::domain::reference::NormalizedRange;
use crate::domain::value_objects::BookCode;

/// An assembled run of verses handed back to the caller.
///
/// Built fresh on every request; the registry caches books, never passages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub book_code: BookCode,
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
    pub verses: Vec<ParsedVerse>,
    pub display_reference: String,
}

impl Passage {
    pub fn new(
        range: &NormalizedRange,
        verses: Vec<ParsedVerse>,
        display_reference: impl Into<String>,
    ) -> Self {
        Self {
            book_code: range.book_code.clone(),
            start_chapter: range.start_chapter,
            start_verse: range.start_verse,
            end_chapter: range.end_chapter,
            end_verse: range.end_verse,
            verses,
            display_reference: display_reference.into(),
        }
    }

    pub fn range(&self) -> NormalizedRange {
        NormalizedRange::new(
            self.book_code.clone(),
            self.start_chapter,
            self.start_verse,
            self.end_chapter,
            self.end_verse,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Verse texts joined by `separator`, each optionally prefixed with its
    /// number.
    pub fn text(&self, include_verse_numbers: bool, separator: &str) -> String {
        self.verses
            .iter()
            .map(|v| {
                if include_verse_numbers {
                    format!("{} {}", v.number, v.text)
                } else {
                    v.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}
