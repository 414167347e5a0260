//! Document parsers: one per supported serialization.
//!
//! Parsing runs in two passes over the same input. [`header::read_header`]
//! validates the XML and reads the book identification. Chapter and verse
//! boundaries are then found by re-scanning the raw text with the linear
//! scanner in [`markup`], which keeps verse extraction independent of how
//! deeply a verse happens to be nested in paragraphs.

mod header;
mod markup;
mod usfx;
mod usx;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use lectio_core::application::ports::DocumentParser;
use lectio_core::domain::{
    BookCode, DocumentMetadata, DomainError, Format, ParseResult, ParsedBook, ParsedChapter,
    ParsedVerse, TextOptions,
};

use header::DocumentHeader;
use markup::{TagScanner, leading_number};

pub use usfx::UsfxParser;
pub use usx::UsxParser;

/// One parser per supported format, sharing the same text options.
pub fn default_parsers(options: TextOptions) -> Vec<Arc<dyn DocumentParser>> {
    vec![
        Arc::new(UsxParser::with_options(options)),
        Arc::new(UsfxParser::with_options(options)),
    ]
}

/// A chapter's raw markup, from just after its marker to the next marker.
pub(crate) struct ChapterSpan<'a> {
    pub number: u32,
    pub body: &'a str,
}

/// Split `raw` at every `<element number_attr="N">` marker. Markers without
/// a usable number (USX end markers, for instance) are not boundaries.
pub(crate) fn chapter_spans<'a>(
    raw: &'a str,
    element: &str,
    number_attr: &str,
) -> Vec<ChapterSpan<'a>> {
    let markers: Vec<(usize, usize, u32)> = TagScanner::new(raw)
        .filter(|tag| tag.is_start() && tag.name == element)
        .filter_map(|tag| {
            let number = leading_number(&tag.attr(number_attr)?)?;
            Some((tag.start, tag.end, number))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(idx, &(_, body_start, number))| {
            let body_end = markers.get(idx + 1).map_or(raw.len(), |next| next.0);
            ChapterSpan {
                number,
                body: &raw[body_start..body_end],
            }
        })
        .collect()
}

/// Collects verses while a parser walks the chapter spans, then builds the
/// final tree and its metadata.
pub(crate) struct BookAssembler {
    code: BookCode,
    chapters: BTreeMap<u32, BTreeMap<u32, String>>,
    metadata: DocumentMetadata,
}

impl BookAssembler {
    pub fn new(format: Format, header: &DocumentHeader) -> Result<Self, DomainError> {
        let raw_code = header
            .book_code
            .as_deref()
            .ok_or_else(|| DomainError::malformed("document has no book code"))?;
        let code = BookCode::new(raw_code)
            .map_err(|_| DomainError::malformed(format!("invalid book code '{raw_code}'")))?;

        let mut metadata = DocumentMetadata::new(format);
        metadata.schema_version = header.schema_version.clone();

        Ok(Self {
            code,
            chapters: BTreeMap::new(),
            metadata,
        })
    }

    pub fn code(&self) -> &BookCode {
        &self.code
    }

    /// Record one verse. A label without digits is skipped; a number already
    /// seen in this chapter extends the earlier verse.
    pub fn add_verse(&mut self, chapter: u32, label: &str, text: String) {
        let Some(number) = leading_number(label) else {
            self.drop_verse(format!(
                "{} {chapter}: verse marker '{label}' has no number",
                self.code
            ));
            return;
        };

        let verses = self.chapters.entry(chapter).or_default();
        match verses.get_mut(&number) {
            Some(existing) => {
                if !text.is_empty() {
                    if !existing.is_empty() {
                        existing.push(' ');
                    }
                    existing.push_str(&text);
                }
            }
            None => {
                verses.insert(number, text);
            }
        }
    }

    /// A verse marker that yields no verse.
    pub fn drop_verse(&mut self, reason: String) {
        self.metadata.dropped_verses += 1;
        self.warn(reason);
    }

    pub fn warn(&mut self, message: String) {
        debug!(book = %self.code, "{message}");
        self.metadata.warnings.push(message);
    }

    pub fn finish(self, header: DocumentHeader) -> ParseResult {
        let code = self.code;
        let mut metadata = self.metadata;

        let chapters: Vec<ParsedChapter> = self
            .chapters
            .into_iter()
            .filter(|(_, verses)| !verses.is_empty())
            .map(|(number, verses)| {
                let verses = verses
                    .into_iter()
                    .map(|(verse, text)| ParsedVerse::new(&code, number, verse, text))
                    .collect();
                ParsedChapter::new(number, verses)
            })
            .collect();

        metadata.chapter_count = chapters.len();
        metadata.verse_count = chapters.iter().map(|c| c.verses.len()).sum();

        let title = header.title.unwrap_or_else(|| code.to_string());
        let short_title = header.short_title.unwrap_or_else(|| title.clone());
        let abbreviation = header.abbreviation.unwrap_or_else(|| code.to_string());

        ParseResult {
            book: ParsedBook::new(code, title, short_title, abbreviation, chapters),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_run_to_next_marker() {
        let raw = r#"<book><chapter number="1"/>one<chapter eid="X 1"/><chapter number="2"/>two</book>"#;
        let spans = chapter_spans(raw, "chapter", "number");

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].number, 1);
        assert_eq!(spans[0].body, r#"one<chapter eid="X 1"/>"#);
        assert_eq!(spans[1].number, 2);
        assert_eq!(spans[1].body, "two</book>");
    }

    #[test]
    fn no_markers_no_spans() {
        assert!(chapter_spans("<book>text</book>", "c", "id").is_empty());
    }

    fn header(code: Option<&str>) -> DocumentHeader {
        DocumentHeader {
            book_code: code.map(str::to_string),
            ..DocumentHeader::default()
        }
    }

    #[test]
    fn assembler_requires_a_valid_code() {
        assert!(matches!(
            BookAssembler::new(Format::Usx, &header(None)),
            Err(DomainError::MalformedDocument { ref reason }) if reason.contains("no book code")
        ));
        assert!(matches!(
            BookAssembler::new(Format::Usx, &header(Some("G E N"))),
            Err(DomainError::MalformedDocument { ref reason }) if reason.contains("'G E N'")
        ));
    }

    #[test]
    fn repeated_numbers_append_and_empty_chapters_drop() {
        let mut assembler = BookAssembler::new(Format::Usfx, &header(Some("PSA"))).unwrap();
        assembler.add_verse(3, "4a", "first half".into());
        assembler.add_verse(3, "4b", "second half".into());
        assembler.add_verse(5, "x", "unnumbered".into());

        let result = assembler.finish(header(Some("PSA")));
        assert_eq!(result.book.chapters.len(), 1);
        assert_eq!(result.book.verse(3, 4).unwrap().text, "first half second half");
        assert_eq!(result.metadata.dropped_verses, 1);
        assert_eq!(result.metadata.verse_count, 1);
    }

    #[test]
    fn titles_fall_back() {
        let assembler = BookAssembler::new(Format::Usx, &header(Some("JUD"))).unwrap();
        let mut names = header(Some("JUD"));
        names.title = Some("Jude".into());

        let book = assembler.finish(names).book;
        assert_eq!(book.title, "Jude");
        assert_eq!(book.short_title, "Jude");
        assert_eq!(book.abbreviation, "JUD");
    }

    #[test]
    fn default_parsers_cover_both_formats() {
        let formats: Vec<_> = default_parsers(TextOptions::default())
            .iter()
            .map(|p| p.format())
            .collect();
        assert_eq!(formats, [Format::Usx, Format::Usfx]);
    }
}
