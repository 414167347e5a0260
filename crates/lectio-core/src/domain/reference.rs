//! Citation grammar: human-written references to normalized ranges and back.
//!
//! Accepted single-range forms, tried in this order:
//!
//! | Form                  | Example              |
//! |-----------------------|----------------------|
//! | `Book C1:V1-C2:V2`    | `Genesis 1:1-2:7`    |
//! | `Book C:V1-V2`        | `Mat 5:3-9`          |
//! | `Book C:V`            | `Jn 3:16`            |
//!
//! Comma lists (`Col 3:17, 23-24`, `Col 3:17, 4:2`) go through
//! [`parse_complex_reference`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::books::{book_info, resolve_book_code};
use crate::domain::error::DomainError;
use crate::domain::value_objects::{BookCode, ReferenceStyle};

/// Spaces hugging a separator.
static SEPARATOR_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([:,\-])\s*").expect("separator pattern is valid"));

/// The book name is everything before the first `C:V`.
static SINGLE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<book>.+?)\s*(?P<c1>\d+):(?P<v1>\d+)(?:-(?:(?P<c2>\d+):)?(?P<v2>\d+))?$")
        .expect("single range pattern is valid")
});

static COMPLEX_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<book>.+?)\s*(?P<chapter>\d+):(?P<rest>.+)$")
        .expect("complex prefix pattern is valid")
});

static COMPLEX_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<c1>\d+):)?(?P<v1>\d+)(?:-(?:(?P<c2>\d+):)?(?P<v2>\d+))?$")
        .expect("complex segment pattern is valid")
});

// ── Types ────────────────────────────────────────────────────────────────────

/// A verse span within one book.
///
/// Endpoints are kept as written; a reversed range is only reordered by
/// [`normalize_range_order`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRange {
    pub book_code: BookCode,
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
}

impl NormalizedRange {
    pub fn new(
        book_code: BookCode,
        start_chapter: u32,
        start_verse: u32,
        end_chapter: u32,
        end_verse: u32,
    ) -> Self {
        Self {
            book_code,
            start_chapter,
            start_verse,
            end_chapter,
            end_verse,
        }
    }

    pub fn single(book_code: BookCode, chapter: u32, verse: u32) -> Self {
        Self::new(book_code, chapter, verse, chapter, verse)
    }

    pub fn is_ordered(&self) -> bool {
        (self.start_chapter, self.start_verse) <= (self.end_chapter, self.end_verse)
    }

    pub fn is_single_verse(&self) -> bool {
        self.start_chapter == self.end_chapter && self.start_verse == self.end_verse
    }

    /// The numeric part only: `1:1`, `5:3-9` or `1:1-2:7`.
    pub fn span(&self) -> String {
        format_span(
            self.start_chapter,
            self.start_verse,
            self.end_chapter,
            self.end_verse,
        )
    }
}

impl fmt::Display for NormalizedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book_code, self.span())
    }
}

/// One comma-separated piece of a [`ComplexReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubRange {
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
}

impl SubRange {
    pub fn new(start_chapter: u32, start_verse: u32, end_chapter: u32, end_verse: u32) -> Self {
        Self {
            start_chapter,
            start_verse,
            end_chapter,
            end_verse,
        }
    }
}

/// A list of ranges in one book, e.g. `Col 3:17, 23-24`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexReference {
    pub book_code: BookCode,
    pub ranges: Vec<SubRange>,
}

impl ComplexReference {
    /// Each piece as a standalone range.
    pub fn to_ranges(&self) -> Vec<NormalizedRange> {
        self.ranges
            .iter()
            .map(|r| {
                NormalizedRange::new(
                    self.book_code.clone(),
                    r.start_chapter,
                    r.start_verse,
                    r.end_chapter,
                    r.end_verse,
                )
            })
            .collect()
    }

    /// Smallest single range covering every piece.
    pub fn bounds(&self) -> Option<NormalizedRange> {
        let start = self
            .ranges
            .iter()
            .flat_map(|r| [(r.start_chapter, r.start_verse), (r.end_chapter, r.end_verse)])
            .min()?;
        let end = self
            .ranges
            .iter()
            .flat_map(|r| [(r.start_chapter, r.start_verse), (r.end_chapter, r.end_verse)])
            .max()?;
        Some(NormalizedRange::new(
            self.book_code.clone(),
            start.0,
            start.1,
            end.0,
            end.1,
        ))
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Collapse whitespace, fold typographic dashes to `-` and drop spaces around
/// `:`, `-` and `,`.
fn normalize_input(input: &str) -> String {
    let dashed: String = input
        .chars()
        .map(|c| match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            other => other,
        })
        .collect();
    let collapsed = dashed.split_whitespace().collect::<Vec<_>>().join(" ");
    SEPARATOR_SPACES.replace_all(&collapsed, "$1").into_owned()
}

fn positive(input: &str, digits: &str) -> Result<u32, DomainError> {
    match digits.parse::<u32>() {
        Ok(0) => Err(DomainError::invalid_reference(
            input,
            "chapter and verse numbers start at 1",
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(DomainError::invalid_reference(input, "number is too large")),
    }
}

fn resolve(book: &str) -> Result<BookCode, DomainError> {
    resolve_book_code(book).ok_or_else(|| DomainError::UnknownBook {
        name: book.trim().to_string(),
    })
}

/// Parse one citation into a range.
///
/// # Errors
///
/// - [`DomainError::EmptyReference`] for blank input
/// - [`DomainError::InvalidReference`] when no form matches, or a number is
///   zero or does not fit
/// - [`DomainError::UnknownBook`] when the book part does not resolve
pub fn parse_reference(input: &str) -> Result<NormalizedRange, DomainError> {
    let normalized = normalize_input(input);
    if normalized.is_empty() {
        return Err(DomainError::EmptyReference);
    }

    let caps = SINGLE_RANGE.captures(&normalized).ok_or_else(|| {
        DomainError::invalid_reference(input, "expected 'Book C:V', 'Book C:V1-V2' or 'Book C1:V1-C2:V2'")
    })?;

    let book_code = resolve(&caps["book"])?;
    let start_chapter = positive(input, &caps["c1"])?;
    let start_verse = positive(input, &caps["v1"])?;

    let (end_chapter, end_verse) = match (caps.name("c2"), caps.name("v2")) {
        (Some(c2), Some(v2)) => (positive(input, c2.as_str())?, positive(input, v2.as_str())?),
        (None, Some(v2)) => (start_chapter, positive(input, v2.as_str())?),
        _ => (start_chapter, start_verse),
    };

    Ok(NormalizedRange::new(
        book_code,
        start_chapter,
        start_verse,
        end_chapter,
        end_verse,
    ))
}

/// Parse a comma-separated list of ranges sharing one book.
///
/// Returns `None` when the input has no comma, the book is unknown, or any
/// segment is malformed. A segment that restates a chapter (`4:2`) sets the
/// chapter for the segments after it.
pub fn parse_complex_reference(input: &str) -> Option<ComplexReference> {
    if !input.contains(',') {
        return None;
    }

    let normalized = normalize_input(input);
    let caps = COMPLEX_PREFIX.captures(&normalized)?;
    let book_code = resolve_book_code(&caps["book"])?;
    let mut chapter = nonzero(&caps["chapter"])?;

    let mut ranges = Vec::new();
    for (idx, segment) in caps["rest"].split(',').enumerate() {
        let seg = COMPLEX_SEGMENT.captures(segment)?;

        // The prefix already consumed the first segment's chapter.
        if idx > 0 {
            if let Some(c) = seg.name("c1") {
                chapter = nonzero(c.as_str())?;
            }
        } else if seg.name("c1").is_some() {
            return None;
        }

        let start_chapter = chapter;
        let start_verse = nonzero(&seg["v1"])?;
        let (end_chapter, end_verse) = match (seg.name("c2"), seg.name("v2")) {
            (Some(c2), Some(v2)) => (nonzero(c2.as_str())?, nonzero(v2.as_str())?),
            (None, Some(v2)) => (start_chapter, nonzero(v2.as_str())?),
            _ => (start_chapter, start_verse),
        };

        chapter = end_chapter;
        ranges.push(SubRange::new(start_chapter, start_verse, end_chapter, end_verse));
    }

    Some(ComplexReference { book_code, ranges })
}

fn nonzero(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Swap endpoints when the range is written back to front.
pub fn normalize_range_order(range: NormalizedRange) -> NormalizedRange {
    if range.is_ordered() {
        return range;
    }
    NormalizedRange::new(
        range.book_code,
        range.end_chapter,
        range.end_verse,
        range.start_chapter,
        range.start_verse,
    )
}

// ── Formatting ───────────────────────────────────────────────────────────────

pub(crate) fn format_span(sc: u32, sv: u32, ec: u32, ev: u32) -> String {
    if sc == ec && sv == ev {
        format!("{sc}:{sv}")
    } else if sc == ec {
        format!("{sc}:{sv}-{ev}")
    } else {
        format!("{sc}:{sv}-{ec}:{ev}")
    }
}

/// Catalogue label for `code` in `style`; unknown codes print as themselves.
pub fn book_label(code: &BookCode, style: ReferenceStyle) -> String {
    match (style, book_info(code)) {
        (ReferenceStyle::Abbreviated, Some(info)) => info.abbreviation().to_string(),
        (ReferenceStyle::Full, Some(info)) => info.name().to_string(),
        _ => code.to_string(),
    }
}

/// `GEN 1:1`, `Gen 1:1-5` or `Genesis 1:1-2:7` depending on `style`.
pub fn format_reference(range: &NormalizedRange, style: ReferenceStyle) -> String {
    format!("{} {}", book_label(&range.book_code, style), range.span())
}

/// `COL 3:17, 23-24`; the chapter is repeated only when it changes.
pub fn format_complex_reference(reference: &ComplexReference, style: ReferenceStyle) -> String {
    let mut out = book_label(&reference.book_code, style);
    let mut chapter = None;

    for (idx, r) in reference.ranges.iter().enumerate() {
        out.push_str(if idx == 0 { " " } else { ", " });
        if chapter != Some(r.start_chapter) {
            out.push_str(&format!("{}:", r.start_chapter));
        }
        out.push_str(&r.start_verse.to_string());

        if (r.start_chapter, r.start_verse) != (r.end_chapter, r.end_verse) {
            if r.end_chapter == r.start_chapter {
                out.push_str(&format!("-{}", r.end_verse));
            } else {
                out.push_str(&format!("-{}:{}", r.end_chapter, r.end_verse));
            }
        }
        chapter = Some(r.end_chapter);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> BookCode {
        BookCode::new(s).unwrap()
    }

    #[test]
    fn cross_chapter_range() {
        let range = parse_reference("Genesis 1:1-2:7").unwrap();
        assert_eq!(range, NormalizedRange::new(code("GEN"), 1, 1, 2, 7));
    }

    #[test]
    fn intra_chapter_range() {
        let range = parse_reference("Mat 5:3-9").unwrap();
        assert_eq!(range, NormalizedRange::new(code("MAT"), 5, 3, 5, 9));
    }

    #[test]
    fn single_verse() {
        let range = parse_reference("Jn 3:16").unwrap();
        assert_eq!(range, NormalizedRange::single(code("JHN"), 3, 16));
        assert!(range.is_single_verse());
    }

    #[test]
    fn multi_word_and_numbered_books() {
        assert_eq!(
            parse_reference("Song of Songs 2:1").unwrap().book_code,
            code("SNG")
        );
        assert_eq!(parse_reference("1 Samuel 3:4").unwrap().book_code, code("1SA"));
        assert_eq!(parse_reference("1Co 13:4-7").unwrap().book_code, code("1CO"));
    }

    #[test]
    fn spaces_around_separators_are_tolerated() {
        let range = parse_reference("  Genesis  1 : 1 -  2 : 7 ").unwrap();
        assert_eq!(range, NormalizedRange::new(code("GEN"), 1, 1, 2, 7));
    }

    #[test]
    fn typographic_dashes_are_folded() {
        let range = parse_reference("Mat 5:3\u{2013}9").unwrap();
        assert_eq!(range.end_verse, 9);
    }

    #[test]
    fn unknown_book_fails() {
        assert!(matches!(
            parse_reference("Invalid 3:17"),
            Err(DomainError::UnknownBook { .. })
        ));
    }

    #[test]
    fn bare_chapter_fails() {
        assert!(matches!(
            parse_reference("Genesis 1"),
            Err(DomainError::InvalidReference { .. })
        ));
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(parse_reference("   "), Err(DomainError::EmptyReference));
    }

    #[test]
    fn zero_and_overflow_fail() {
        assert!(parse_reference("Genesis 0:1").is_err());
        assert!(parse_reference("Genesis 1:0").is_err());
        assert!(parse_reference("Genesis 1:99999999999").is_err());
    }

    #[test]
    fn reversed_range_is_kept_until_normalized() {
        let range = parse_reference("Genesis 2:7-1:1").unwrap();
        assert!(!range.is_ordered());

        let ordered = normalize_range_order(range);
        assert_eq!(ordered, NormalizedRange::new(code("GEN"), 1, 1, 2, 7));
    }

    #[test]
    fn normalizing_an_ordered_range_is_identity() {
        let range = NormalizedRange::new(code("MAT"), 5, 3, 5, 9);
        assert_eq!(normalize_range_order(range.clone()), range);
    }

    #[test]
    fn complex_reference_shares_chapter() {
        let complex = parse_complex_reference("Col 3:17, 23-24").unwrap();
        assert_eq!(complex.book_code, code("COL"));
        assert_eq!(
            complex.ranges,
            vec![SubRange::new(3, 17, 3, 17), SubRange::new(3, 23, 3, 24)]
        );
    }

    #[test]
    fn complex_reference_restates_chapter() {
        let complex = parse_complex_reference("Col 3:17, 4:2, 5").unwrap();
        assert_eq!(
            complex.ranges,
            vec![
                SubRange::new(3, 17, 3, 17),
                SubRange::new(4, 2, 4, 2),
                SubRange::new(4, 5, 4, 5),
            ]
        );
    }

    #[test]
    fn complex_reference_requires_comma() {
        assert_eq!(parse_complex_reference("Col 3:17"), None);
    }

    #[test]
    fn complex_reference_fails_whole_on_bad_segment() {
        assert_eq!(parse_complex_reference("Col 3:17, abc"), None);
        assert_eq!(parse_complex_reference("Col 3:17,"), None);
        assert_eq!(parse_complex_reference("Nowhere 3:17, 18"), None);
    }

    #[test]
    fn format_collapses_spans() {
        let genesis = code("GEN");
        assert_eq!(
            format_reference(&NormalizedRange::single(genesis.clone(), 1, 1), ReferenceStyle::Code),
            "GEN 1:1"
        );
        assert_eq!(
            format_reference(&NormalizedRange::new(genesis.clone(), 1, 1, 1, 5), ReferenceStyle::Abbreviated),
            "Gen 1:1-5"
        );
        assert_eq!(
            format_reference(&NormalizedRange::new(genesis, 1, 1, 2, 7), ReferenceStyle::Full),
            "Genesis 1:1-2:7"
        );
    }

    #[test]
    fn format_complex_restates_changed_chapter_only() {
        let complex = parse_complex_reference("Col 3:17, 23-24, 4:2").unwrap();
        assert_eq!(
            format_complex_reference(&complex, ReferenceStyle::Code),
            "COL 3:17, 23-24, 4:2"
        );
    }

    #[test]
    fn complex_bounds_cover_all_pieces() {
        let complex = parse_complex_reference("Col 3:17, 4:2").unwrap();
        assert_eq!(
            complex.bounds().unwrap(),
            NormalizedRange::new(code("COL"), 3, 17, 4, 2)
        );
    }
}
