//! First pass: well-formedness check and book identification.
//!
//! A streaming `quick-xml` reader walks the whole document once. Any syntax
//! error, mismatched end tag or element left open at end of input rejects the
//! document before verse extraction starts.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

use lectio_core::domain::DomainError;

use super::markup::decode_entities;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Usx,
    Usfx,
}

/// Identification fields found in the document head.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct DocumentHeader {
    pub book_code: Option<String>,
    pub schema_version: Option<String>,
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// Title candidate; lower rank wins.
    Title(u8),
    ShortTitle,
    Abbreviation,
}

struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

pub(crate) fn read_header(raw: &str, dialect: Dialect) -> Result<DocumentHeader, DomainError> {
    let mut reader = Reader::from_str(raw);
    let mut header = DocumentHeader::default();
    let mut title_rank = u8::MAX;
    let mut capture: Option<Capture> = None;
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            DomainError::malformed(format!("XML error at byte {}: {e}", reader.error_position()))
        })?;

        match event {
            Event::Start(start) => {
                if depth == 0 {
                    saw_root = true;
                    header.schema_version = attribute(&start, "version");
                }
                depth += 1;
                inspect(&start, dialect, &mut header);
                if capture.is_none() {
                    capture = field_for(&start, dialect).map(|field| Capture {
                        field,
                        depth,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(start) => {
                if depth == 0 {
                    saw_root = true;
                    header.schema_version = attribute(&start, "version");
                }
                inspect(&start, dialect, &mut header);
            }
            Event::End(_) => {
                if capture.as_ref().is_some_and(|c| c.depth == depth) {
                    if let Some(done) = capture.take() {
                        store(&mut header, &mut title_rank, done);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(text) => {
                if let Some(capture) = capture.as_mut() {
                    capture.text.push_str(&text_of(&text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(DomainError::malformed(format!(
            "document ends with {depth} unclosed element(s)"
        )));
    }
    if !saw_root {
        return Err(DomainError::malformed("document has no root element"));
    }
    Ok(header)
}

/// Book code attribute of the dialect's book element.
fn inspect(start: &BytesStart<'_>, dialect: Dialect, header: &mut DocumentHeader) {
    if header.book_code.is_some() || start.local_name().as_ref() != b"book" {
        return;
    }
    let key = match dialect {
        Dialect::Usx => "code",
        Dialect::Usfx => "id",
    };
    header.book_code = attribute(start, key)
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty());
}

fn field_for(start: &BytesStart<'_>, dialect: Dialect) -> Option<Field> {
    let name = start.local_name();
    match dialect {
        Dialect::Usx => {
            if name.as_ref() != b"para" {
                return None;
            }
            match attribute(start, "style")?.as_str() {
                "h" => Some(Field::Title(0)),
                "toc1" => Some(Field::Title(1)),
                "mt" | "mt1" => Some(Field::Title(2)),
                "toc2" => Some(Field::ShortTitle),
                "toc3" => Some(Field::Abbreviation),
                _ => None,
            }
        }
        Dialect::Usfx => match name.as_ref() {
            b"h" => Some(Field::Title(0)),
            b"mt" => Some(Field::Title(2)),
            b"toc" => match attribute(start, "level")?.trim() {
                "1" => Some(Field::Title(1)),
                "2" => Some(Field::ShortTitle),
                "3" => Some(Field::Abbreviation),
                _ => None,
            },
            _ => None,
        },
    }
}

fn store(header: &mut DocumentHeader, title_rank: &mut u8, capture: Capture) {
    let text = capture.text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return;
    }
    match capture.field {
        Field::Title(rank) if rank < *title_rank => {
            *title_rank = rank;
            header.title = Some(text);
        }
        Field::Title(_) => {}
        Field::ShortTitle => {
            header.short_title.get_or_insert(text);
        }
        Field::Abbreviation => {
            header.abbreviation.get_or_insert(text);
        }
    }
}

fn attribute(start: &BytesStart<'_>, key: &str) -> Option<String> {
    start
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key.as_bytes())
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => decode_entities(&String::from_utf8_lossy(&attr.value)),
        })
}

fn text_of(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(value) => value.into_owned(),
        Err(_) => decode_entities(&String::from_utf8_lossy(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usx_header_prefers_running_head() {
        let raw = r#"<usx version="3.0">
            <book code="GEN" style="id">World English Bible</book>
            <para style="mt1">The First Book of Moses</para>
            <para style="toc1">The First Book of Moses, Commonly Called Genesis</para>
            <para style="h">Genesis</para>
            <para style="toc2">Gen.</para>
            <para style="toc3">Gn</para>
        </usx>"#;

        let header = read_header(raw, Dialect::Usx).unwrap();
        assert_eq!(header.book_code.as_deref(), Some("GEN"));
        assert_eq!(header.schema_version.as_deref(), Some("3.0"));
        assert_eq!(header.title.as_deref(), Some("Genesis"));
        assert_eq!(header.short_title.as_deref(), Some("Gen."));
        assert_eq!(header.abbreviation.as_deref(), Some("Gn"));
    }

    #[test]
    fn usx_title_falls_back_to_main_title() {
        let raw = r#"<usx><book code="RUT"/><para style="mt">Ruth &amp; Naomi</para></usx>"#;
        let header = read_header(raw, Dialect::Usx).unwrap();
        assert_eq!(header.title.as_deref(), Some("Ruth & Naomi"));
        assert_eq!(header.short_title, None);
    }

    #[test]
    fn usfx_header_reads_toc_levels() {
        let raw = r#"<usfx><book id="MAT"><toc level="1">Matthew</toc><toc level="2">Mat</toc><toc level="3">Mt</toc><c id="1"/></book></usfx>"#;
        let header = read_header(raw, Dialect::Usfx).unwrap();
        assert_eq!(header.book_code.as_deref(), Some("MAT"));
        assert_eq!(header.title.as_deref(), Some("Matthew"));
        assert_eq!(header.short_title.as_deref(), Some("Mat"));
        assert_eq!(header.abbreviation.as_deref(), Some("Mt"));
        assert_eq!(header.schema_version, None);
    }

    #[test]
    fn mismatched_end_tag_is_malformed() {
        let err = read_header("<usx><book code=\"GEN\"></para></usx>", Dialect::Usx).unwrap_err();
        assert!(matches!(err, DomainError::MalformedDocument { .. }));
    }

    #[test]
    fn unclosed_root_is_malformed() {
        let err = read_header("<usx><book code=\"GEN\"/>", Dialect::Usx).unwrap_err();
        assert!(matches!(err, DomainError::MalformedDocument { .. }));
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(read_header("   ", Dialect::Usfx).is_err());
    }

    #[test]
    fn missing_book_code_is_not_an_error_here() {
        let header = read_header("<usx><para style=\"p\">x</para></usx>", Dialect::Usx).unwrap();
        assert_eq!(header.book_code, None);
    }
}
