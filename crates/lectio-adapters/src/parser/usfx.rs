//! USFX: verses start at `<v id="N"/>` and end at `<ve/>`.
//!
//! Unlike USX, a missing end marker is tolerated: the verse runs to the next
//! `<v>` or to the end of the chapter, and a warning is recorded.

use tracing::{debug, instrument};

use lectio_core::application::ports::DocumentParser;
use lectio_core::domain::{DomainError, Format, ParseResult, TextOptions};

use super::header::{Dialect, read_header};
use super::markup::{Disposition, Tag, TagScanner, clean_text, rewrite_elements};
use super::{BookAssembler, chapter_spans};

#[derive(Debug, Clone, Copy, Default)]
pub struct UsfxParser {
    options: TextOptions,
}

impl UsfxParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TextOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    fn note_disposition(&self, tag: &Tag<'_>) -> Disposition {
        let include = match tag.name {
            "f" | "fe" | "ef" => self.options.include_footnotes,
            "x" | "ex" => self.options.include_cross_references,
            _ => return Disposition::Keep,
        };
        if include {
            Disposition::Inline
        } else {
            Disposition::Remove
        }
    }

    fn extract_chapter(&self, book: &mut BookAssembler, chapter: u32, body: &str) {
        // (label, offset where its text starts)
        let mut open: Option<(String, usize)> = None;

        for tag in TagScanner::new(body).filter(|t| t.is_start()) {
            match tag.name {
                "v" => {
                    let Some(label) = tag.attr("id") else {
                        continue;
                    };
                    if let Some((previous, start)) = open.take() {
                        book.warn(format!(
                            "{} {chapter}:{previous} has no <ve/>; ended at verse {label}",
                            book.code()
                        ));
                        self.emit(book, chapter, &previous, &body[start..tag.start]);
                    }
                    open = Some((label, tag.end));
                }
                "ve" => {
                    if let Some((label, start)) = open.take() {
                        self.emit(book, chapter, &label, &body[start..tag.start]);
                    }
                }
                _ => {}
            }
        }

        if let Some((label, start)) = open {
            book.warn(format!(
                "{} {chapter}:{label} has no <ve/>; ended at chapter end",
                book.code()
            ));
            self.emit(book, chapter, &label, &body[start..]);
        }
    }

    fn emit(&self, book: &mut BookAssembler, chapter: u32, label: &str, fragment: &str) {
        book.add_verse(chapter, label, clean_text(fragment, &self.options));
    }
}

impl DocumentParser for UsfxParser {
    fn format(&self) -> Format {
        Format::Usfx
    }

    #[instrument(skip_all, fields(bytes = raw.len()))]
    fn parse(&self, raw: &str) -> Result<ParseResult, DomainError> {
        let header = read_header(raw, Dialect::Usfx)?;
        let mut book = BookAssembler::new(Format::Usfx, &header)?;

        let body = rewrite_elements(raw, |tag| self.note_disposition(tag));
        for span in chapter_spans(&body, "c", "id") {
            self.extract_chapter(&mut book, span.number, span.body);
        }

        let result = book.finish(header);
        debug!(
            book = %result.book.code,
            chapters = result.metadata.chapter_count,
            verses = result.metadata.verse_count,
            warnings = result.metadata.warnings.len(),
            "parsed USFX document"
        );
        Ok(result)
    }
}
