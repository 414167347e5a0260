//! USX: milestone verses paired by `sid`/`eid`.
//!
//! ```xml
//! <chapter number="1" style="c" sid="GEN 1"/>
//! <para style="p">
//!   <verse number="1" style="v" sid="GEN 1:1"/>In the beginning...<verse eid="GEN 1:1"/>
//! </para>
//! ```
//!
//! Extraction fails closed. A start marker that is never closed inside its
//! chapter, is interrupted by another start, or is closed by an end marker
//! with a different id produces no verse.

use tracing::{debug, instrument};

use lectio_core::application::ports::DocumentParser;
use lectio_core::domain::{DomainError, Format, ParseResult, TextOptions};

use super::header::{Dialect, read_header};
use super::markup::{Disposition, Tag, TagScanner, clean_text, rewrite_elements};
use super::{BookAssembler, chapter_spans};

#[derive(Debug, Clone, Copy, Default)]
pub struct UsxParser {
    options: TextOptions,
}

struct OpenVerse {
    label: String,
    sid: Option<String>,
    text_start: usize,
}

impl UsxParser {
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
        if tag.name != "note" {
            return Disposition::Keep;
        }
        let include = match tag.attr("style").as_deref() {
            Some("f" | "fe" | "ef") => self.options.include_footnotes,
            Some("x" | "ex") => self.options.include_cross_references,
            _ => false,
        };
        if include {
            Disposition::Inline
        } else {
            Disposition::Remove
        }
    }

    fn extract_chapter(&self, book: &mut BookAssembler, chapter: u32, body: &str) {
        let mut open: Option<OpenVerse> = None;

        for tag in TagScanner::new(body).filter(|t| t.is_start() && t.name == "verse") {
            if let Some(label) = tag.attr("number") {
                if let Some(interrupted) = open.take() {
                    book.drop_verse(format!(
                        "{} {chapter}:{} interrupted by verse {label} before its end marker",
                        book.code(),
                        interrupted.label
                    ));
                }
                open = Some(OpenVerse {
                    label,
                    sid: tag.attr("sid"),
                    text_start: tag.end,
                });
                continue;
            }

            let Some(eid) = tag.attr("eid") else {
                continue;
            };
            let Some(verse) = open.take() else {
                continue;
            };

            if verse.sid.as_deref().is_none_or(|sid| sid == eid) {
                let text = clean_text(&body[verse.text_start..tag.start], &self.options);
                book.add_verse(chapter, &verse.label, text);
            } else {
                book.drop_verse(format!(
                    "{} {chapter}:{} closed by mismatched end marker '{eid}'",
                    book.code(),
                    verse.label
                ));
            }
        }

        if let Some(verse) = open {
            book.drop_verse(format!(
                "{} {chapter}:{} has no end marker",
                book.code(),
                verse.label
            ));
        }
    }
}

impl DocumentParser for UsxParser {
    fn format(&self) -> Format {
        Format::Usx
    }

    #[instrument(skip_all, fields(bytes = raw.len()))]
    fn parse(&self, raw: &str) -> Result<ParseResult, DomainError> {
        let header = read_header(raw, Dialect::Usx)?;
        let mut book = BookAssembler::new(Format::Usx, &header)?;

        let body = rewrite_elements(raw, |tag| self.note_disposition(tag));
        for span in chapter_spans(&body, "chapter", "number") {
            self.extract_chapter(&mut book, span.number, span.body);
        }

        let result = book.finish(header);
        debug!(
            book = %result.book.code,
            chapters = result.metadata.chapter_count,
            verses = result.metadata.verse_count,
            dropped = result.metadata.dropped_verses,
            "parsed USX document"
        );
        Ok(result)
    }
}
