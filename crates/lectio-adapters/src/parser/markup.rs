//! Linear tag scanning and text cleaning shared by both parsers.
//!
//! The scanner walks raw markup once, left to right, yielding each tag with
//! its byte span. It never backtracks and never allocates per tag; attribute
//! values are only decoded when asked for. Comments, processing instructions,
//! CDATA and doctype declarations are skipped.

use lectio_core::domain::TextOptions;

/// Elements that end a line when line breaks are preserved.
const BLOCK_TAGS: &[&str] = &["para", "p", "q", "l", "d", "b"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    Open,
    Close,
    Empty,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Tag<'a> {
    /// Offset of `<`.
    pub start: usize,
    /// Offset just past `>`.
    pub end: usize,
    /// Local name, namespace prefix removed.
    pub name: &'a str,
    pub kind: TagKind,
    attrs: &'a str,
}

impl Tag<'_> {
    pub fn is_start(&self) -> bool {
        self.kind != TagKind::Close
    }

    /// Decoded value of the attribute with local name `key`.
    pub fn attr(&self, key: &str) -> Option<String> {
        let mut rest = self.attrs;
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                return None;
            }
            let eq = rest.find('=')?;
            let name = rest[..eq].trim();
            let after = rest[eq + 1..].trim_start();
            let quote = after.chars().next().filter(|c| matches!(c, '"' | '\''))?;
            let close = after[1..].find(quote)?;
            if local_name(name) == key {
                return Some(decode_entities(&after[1..1 + close]));
            }
            rest = &after[close + 2..];
        }
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

pub(crate) struct TagScanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> TagScanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Move past `terminator`, or to the end when it never appears.
    fn skip_past(&mut self, from: usize, terminator: &str) {
        self.pos = self.src[from..]
            .find(terminator)
            .map_or(self.src.len(), |idx| from + idx + terminator.len());
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let start = self.pos + self.src.get(self.pos..)?.find('<')?;
            let rest = &self.src[start..];

            if rest.starts_with("<!--") {
                self.skip_past(start, "-->");
                continue;
            }
            if rest.starts_with("<![CDATA[") {
                self.skip_past(start, "]]>");
                continue;
            }
            if rest.starts_with("<?") {
                self.skip_past(start, "?>");
                continue;
            }
            if rest.starts_with("<!") {
                self.skip_past(start, ">");
                continue;
            }

            let end = start + tag_length(rest)?;
            self.pos = end;

            let inner = &self.src[start + 1..end - 1];
            let (kind, body) = if let Some(body) = inner.strip_prefix('/') {
                (TagKind::Close, body)
            } else if let Some(body) = inner.strip_suffix('/') {
                (TagKind::Empty, body)
            } else {
                (TagKind::Open, inner)
            };

            let body = body.trim();
            let name_end = body
                .find(|c: char| c.is_whitespace())
                .unwrap_or(body.len());
            if name_end == 0 {
                continue;
            }

            return Some(Tag {
                start,
                end,
                name: local_name(&body[..name_end]),
                kind,
                attrs: &body[name_end..],
            });
        }
    }
}

/// Length of the tag at the start of `rest`, up to and including the `>`
/// that is not inside a quoted attribute value.
fn tag_length(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (idx, c) in rest.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(idx + 1),
            _ => {}
        }
    }
    None
}

/// What to do with an element found by [`rewrite_elements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    Keep,
    /// Drop the element and everything inside it.
    Remove,
    /// Replace the element with ` [inner text] `.
    Inline,
}

/// Remove or inline selected elements (with their whole content).
pub(crate) fn rewrite_elements(src: &str, classify: impl Fn(&Tag<'_>) -> Disposition) -> String {
    let mut out = String::with_capacity(src.len());
    let mut copied = 0;
    let mut tags = TagScanner::new(src);

    while let Some(tag) = tags.next() {
        if !tag.is_start() {
            continue;
        }
        let action = classify(&tag);
        if action == Disposition::Keep {
            continue;
        }

        out.push_str(&src[copied..tag.start]);
        copied = tag.end;
        if tag.kind == TagKind::Empty {
            continue;
        }

        let mut depth = 1;
        let (mut content_end, mut after) = (src.len(), src.len());
        for inner in tags.by_ref() {
            if inner.name != tag.name {
                continue;
            }
            match inner.kind {
                TagKind::Open => depth += 1,
                TagKind::Close => {
                    depth -= 1;
                    if depth == 0 {
                        (content_end, after) = (inner.start, inner.end);
                        break;
                    }
                }
                TagKind::Empty => {}
            }
        }

        if action == Disposition::Inline {
            let text = plain_text(&src[tag.end..content_end]);
            if !text.is_empty() {
                out.push_str(" [");
                out.push_str(&text);
                out.push_str("] ");
            }
        }
        copied = after;
    }

    out.push_str(&src[copied..]);
    out
}

/// All tags removed, entities decoded, whitespace collapsed.
pub(crate) fn plain_text(fragment: &str) -> String {
    clean_text(fragment, &TextOptions::default())
}

/// Turn a markup fragment into display text.
///
/// Source whitespace (indentation, newlines between tags) counts as plain
/// spacing; only block-level elements produce line breaks, and those become
/// spaces unless `preserve_line_breaks` is set.
pub(crate) fn clean_text(fragment: &str, options: &TextOptions) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut copied = 0;

    for tag in TagScanner::new(fragment) {
        push_spaced(&mut out, &fragment[copied..tag.start]);
        if BLOCK_TAGS.contains(&tag.name) {
            out.push('\n');
        }
        copied = tag.end;
    }
    push_spaced(&mut out, &fragment[copied..]);

    let decoded = decode_entities(&out);
    if options.preserve_line_breaks {
        decoded
            .split('\n')
            .map(|line| tidy(line, options.normalize_whitespace))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        tidy(&decoded.replace('\n', " "), options.normalize_whitespace)
    }
}

fn push_spaced(out: &mut String, text: &str) {
    out.extend(text.chars().map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c }));
}

fn tidy(text: &str, collapse: bool) -> String {
    if collapse {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.trim().to_string()
    }
}

/// Decode the five XML entities and numeric character references. Anything
/// else is left as written.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 12)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Leading ASCII digits of a verse or chapter label (`"4a"` is 4, `"1-2"`
/// is 1). Zero and labels without digits give `None`.
pub(crate) fn leading_number(label: &str) -> Option<u32> {
    let label = label.trim();
    let digits = label
        .find(|c: char| !c.is_ascii_digit())
        .map_or(label, |idx| &label[..idx]);
    digits.parse().ok().filter(|n| *n > 0)
}
