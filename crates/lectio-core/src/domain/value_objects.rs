//! Domain value objects: BookCode, VersionId, Format, BookCategory,
//! ReferenceStyle, TextOptions.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. The
//! book catalogue (names, aliases, categories per book) lives in `books.rs`;
//! this file only defines the types, their string representations and their
//! `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── BookCode ─────────────────────────────────────────────────────────────────

/// Canonical identifier of one logical book (`GEN`, `1CO`, `BAR_LjeInBar`).
///
/// Construction validates the shape only. Whether the code names a book in
/// the catalogue is the resolver's concern (`books::resolve_book_code`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookCode(String);

impl BookCode {
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        let valid_len = (2..=16).contains(&code.len());
        let valid_chars = code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let valid_start = code.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());

        if valid_len && valid_chars && valid_start {
            Ok(Self(code))
        } else {
            Err(DomainError::InvalidBookCode(code))
        }
    }

    /// Codes taken from the static catalogue, which are valid by construction.
    pub(crate) fn from_catalogue(code: &'static str) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BookCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for BookCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookCode> for String {
    fn from(code: BookCode) -> Self {
        code.0
    }
}

impl AsRef<str> for BookCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── VersionId ────────────────────────────────────────────────────────────────

/// Identifier of one translation/edition (`vulgate`, `kjv`, `nvi-pt`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.len() <= 64
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if valid {
            Ok(Self(id))
        } else {
            Err(DomainError::InvalidVersionId(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VersionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for VersionId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VersionId> for String {
    fn from(id: VersionId) -> Self {
        id.0
    }
}

// ── Format ───────────────────────────────────────────────────────────────────

/// Serialization format of a version's source documents.
///
/// Closed set: each variant is bound to exactly one parser when a version is
/// registered, and a name outside this set is rejected while reading
/// configuration rather than at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Paired start/end milestones around each verse.
    Usx,
    /// Start milestone plus a separate verse-end marker, footnotes inline.
    Usfx,
}

impl Format {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usx => "usx",
            Self::Usfx => "usfx",
        }
    }

    /// File extension conventionally used for documents in this format.
    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::Usx => "usx",
            Self::Usfx => "usfx",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usx" => Ok(Self::Usx),
            "usfx" => Ok(Self::Usfx),
            other => Err(DomainError::UnknownFormat(other.to_string())),
        }
    }
}

// ── BookCategory ─────────────────────────────────────────────────────────────

/// Traditional grouping of books, used to scope searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookCategory {
    Pentateuch,
    Historical,
    Wisdom,
    MajorProphets,
    MinorProphets,
    Gospels,
    Acts,
    PaulineEpistles,
    CatholicEpistles,
    Apocalypse,
}

impl BookCategory {
    pub const ALL: [BookCategory; 10] = [
        Self::Pentateuch,
        Self::Historical,
        Self::Wisdom,
        Self::MajorProphets,
        Self::MinorProphets,
        Self::Gospels,
        Self::Acts,
        Self::PaulineEpistles,
        Self::CatholicEpistles,
        Self::Apocalypse,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pentateuch => "pentateuch",
            Self::Historical => "historical",
            Self::Wisdom => "wisdom",
            Self::MajorProphets => "major-prophets",
            Self::MinorProphets => "minor-prophets",
            Self::Gospels => "gospels",
            Self::Acts => "acts",
            Self::PaulineEpistles => "pauline-epistles",
            Self::CatholicEpistles => "catholic-epistles",
            Self::Apocalypse => "apocalypse",
        }
    }

    pub const fn is_old_testament(self) -> bool {
        matches!(
            self,
            Self::Pentateuch
                | Self::Historical
                | Self::Wisdom
                | Self::MajorProphets
                | Self::MinorProphets
        )
    }
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search scope tag: one category or a whole testament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryTag {
    Category(BookCategory),
    OldTestament,
    NewTestament,
}

impl CategoryTag {
    /// Parse a tag such as `gospels`, `Minor Prophets` or `nt`.
    ///
    /// Returns `None` for anything that is not a tag, so callers can fall
    /// back to treating the input as a book name.
    pub fn parse(tag: &str) -> Option<Self> {
        let key: String = tag
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match key.as_str() {
            "ot" | "oldtestament" => Some(Self::OldTestament),
            "nt" | "newtestament" => Some(Self::NewTestament),
            "law" | "torah" => Some(Self::Category(BookCategory::Pentateuch)),
            _ => BookCategory::ALL
                .into_iter()
                .find(|c| c.as_str().replace('-', "") == key)
                .map(Self::Category),
        }
    }

    pub fn contains(self, category: BookCategory) -> bool {
        match self {
            Self::Category(c) => c == category,
            Self::OldTestament => category.is_old_testament(),
            Self::NewTestament => !category.is_old_testament(),
        }
    }
}

// ── ReferenceStyle ───────────────────────────────────────────────────────────

/// How a book is named when a range is formatted for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStyle {
    /// `GEN 1:1`
    #[default]
    Code,
    /// `Gen 1:1`
    Abbreviated,
    /// `Genesis 1:1`
    Full,
}

// ── TextOptions ──────────────────────────────────────────────────────────────

/// Text-cleaning policy shared by every document parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Collapse whitespace runs to single spaces.
    pub normalize_whitespace: bool,
    /// Keep paragraph/line breaks as `\n` instead of turning them into spaces.
    pub preserve_line_breaks: bool,
    /// Render footnotes inline as ` [text] ` instead of removing them.
    pub include_footnotes: bool,
    /// Render cross-references inline as ` [text] ` instead of removing them.
    pub include_cross_references: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            preserve_line_breaks: false,
            include_footnotes: false,
            include_cross_references: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_code_accepts_canonical_shapes() {
        assert!(BookCode::new("GEN").is_ok());
        assert!(BookCode::new("1CO").is_ok());
        assert!(BookCode::new("BAR_LjeInBar").is_ok());
    }

    #[test]
    fn book_code_rejects_bad_shapes() {
        assert!(BookCode::new("").is_err());
        assert!(BookCode::new("G").is_err());
        assert!(BookCode::new("GE N").is_err());
        assert!(BookCode::new("_GEN").is_err());
    }

    #[test]
    fn version_id_rejects_whitespace() {
        assert!(VersionId::new("vulgate").is_ok());
        assert!(VersionId::new("nvi-pt").is_ok());
        assert!(VersionId::new("my version").is_err());
        assert!(VersionId::new("").is_err());
    }

    #[test]
    fn format_from_str_is_closed() {
        assert_eq!("USX".parse::<Format>().unwrap(), Format::Usx);
        assert_eq!(" usfx ".parse::<Format>().unwrap(), Format::Usfx);
        assert_eq!(
            "osis".parse::<Format>(),
            Err(DomainError::UnknownFormat("osis".into()))
        );
    }

    #[test]
    fn category_tags_parse_loosely() {
        assert_eq!(
            CategoryTag::parse("Gospels"),
            Some(CategoryTag::Category(BookCategory::Gospels))
        );
        assert_eq!(
            CategoryTag::parse("minor prophets"),
            Some(CategoryTag::Category(BookCategory::MinorProphets))
        );
        assert_eq!(CategoryTag::parse("NT"), Some(CategoryTag::NewTestament));
        assert_eq!(CategoryTag::parse("GEN"), None);
    }

    #[test]
    fn testament_tags_cover_categories() {
        assert!(CategoryTag::OldTestament.contains(BookCategory::Wisdom));
        assert!(!CategoryTag::OldTestament.contains(BookCategory::Gospels));
        assert!(CategoryTag::NewTestament.contains(BookCategory::Apocalypse));
    }

    #[test]
    fn text_options_defaults() {
        let opts = TextOptions::default();
        assert!(opts.normalize_whitespace);
        assert!(!opts.preserve_line_breaks);
        assert!(!opts.include_footnotes);
        assert!(!opts.include_cross_references);
    }
}
