use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::reference::{NormalizedRange, book_label};
use crate::domain::value_objects::{BookCode, Format, ReferenceStyle, VersionId};

/// Display strings one version uses for one book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookNames {
    pub title: String,
    pub short_title: String,
    pub abbreviation: String,
}

impl BookNames {
    pub fn new(
        title: impl Into<String>,
        short_title: impl Into<String>,
        abbreviation: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            short_title: short_title.into(),
            abbreviation: abbreviation.into(),
        }
    }
}

/// Per-version book names keyed by code.
pub type BookNameTable = BTreeMap<BookCode, BookNames>;

/// Static description of one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleVersion {
    pub id: VersionId,
    pub name: String,
    pub language: String,
    pub format: Format,
    #[serde(default)]
    pub book_names: BookNameTable,
}

impl BibleVersion {
    pub fn new(
        id: VersionId,
        name: impl Into<String>,
        language: impl Into<String>,
        format: Format,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            language: language.into(),
            format,
            book_names: BookNameTable::new(),
        }
    }

    pub fn with_book_names(mut self, names: BookNameTable) -> Self {
        self.book_names = names;
        self
    }

    /// Label for `code`: the version's own name when it has one, otherwise
    /// the catalogue's. `Code` style always prints the code.
    pub fn book_label(&self, code: &BookCode, style: ReferenceStyle) -> String {
        let own = self.book_names.get(code).and_then(|names| match style {
            ReferenceStyle::Code => None,
            ReferenceStyle::Abbreviated => non_empty(&names.abbreviation),
            ReferenceStyle::Full => non_empty(&names.title),
        });
        own.unwrap_or_else(|| book_label(code, style))
    }

    pub fn format_reference(&self, range: &NormalizedRange, style: ReferenceStyle) -> String {
        format!("{} {}", self.book_label(&range.book_code, style), range.span())
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}
