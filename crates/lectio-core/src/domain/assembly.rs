//! Verse-range assembly over a parsed book.
//!
//! Works on the tree shape only, so it behaves the same whichever parser
//! built the book.

use crate::domain::entities::{ParsedBook, ParsedVerse};

/// Collect the verses between two endpoints, inclusive, in book order.
///
/// Within one chapter this is `[start_verse, end_verse]`. Across chapters the
/// start chapter contributes from `start_verse` on, middle chapters
/// contribute everything and the end chapter contributes up to `end_verse`.
/// Missing chapters or verses simply contribute nothing. A reversed range
/// yields an empty list.
pub fn collect_range(
    book: &ParsedBook,
    start_chapter: u32,
    start_verse: u32,
    end_chapter: u32,
    end_verse: u32,
) -> Vec<ParsedVerse> {
    if (start_chapter, start_verse) > (end_chapter, end_verse) {
        return Vec::new();
    }

    book.chapters
        .iter()
        .filter(|c| (start_chapter..=end_chapter).contains(&c.number))
        .flat_map(|chapter| {
            let lower = if chapter.number == start_chapter { start_verse } else { 0 };
            let upper = if chapter.number == end_chapter { end_verse } else { u32::MAX };
            chapter
                .verses
                .iter()
                .filter(move |v| (lower..=upper).contains(&v.number))
        })
        .cloned()
        .collect()
}
