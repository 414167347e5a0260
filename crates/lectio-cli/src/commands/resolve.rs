//! `lectio resolve`: look a book name up in the catalogue.
//!
//! Names that are not books but are search categories (`gospels`, `nt`)
//! list the books the category covers.

use serde::Serialize;

use lectio_core::domain::{
    BookCategory, BookInfo, CategoryTag, DomainError, book_info, books_in, resolve_book_code,
};
use lectio_core::error::LectioError;

use crate::{cli::ResolveArgs, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct BookView {
    code: &'static str,
    name: &'static str,
    abbreviation: &'static str,
    category: BookCategory,
}

impl From<&BookInfo> for BookView {
    fn from(info: &BookInfo) -> Self {
        Self {
            code: info.code_str(),
            name: info.name(),
            abbreviation: info.abbreviation(),
            category: info.category(),
        }
    }
}

pub fn execute(args: ResolveArgs, output: OutputManager) -> CliResult<()> {
    let books = lookup(&args.name)?;

    if output.is_json() {
        match books.as_slice() {
            [single] => output.json(single)?,
            many => output.json(&many)?,
        }
        return Ok(());
    }

    for book in &books {
        output.result(&format!(
            "{}  {} ({}, {})",
            book.code, book.name, book.abbreviation, book.category
        ))?;
    }
    Ok(())
}

/// The book `name` resolves to, or every book of the category it names.
fn lookup(name: &str) -> Result<Vec<BookView>, LectioError> {
    if let Some(info) = resolve_book_code(name).as_ref().and_then(book_info) {
        return Ok(vec![BookView::from(info)]);
    }

    let books: Vec<BookView> = CategoryTag::parse(name)
        .map(books_in)
        .unwrap_or_default()
        .iter()
        .filter_map(book_info)
        .map(BookView::from)
        .collect();

    if books.is_empty() {
        return Err(DomainError::UnknownBook {
            name: name.to_string(),
        }
        .into());
    }
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_full_names() {
        let books = lookup("1 Corinthians").unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].code, "1CO");
        assert_eq!(books[0].category, BookCategory::PaulineEpistles);
    }

    #[test]
    fn category_lists_its_books() {
        let codes: Vec<_> = lookup("gospels").unwrap().iter().map(|b| b.code).collect();
        assert_eq!(codes, ["MAT", "MRK", "LUK", "JHN"]);
    }

    #[test]
    fn unknown_names_are_not_found() {
        let err = lookup("Hezekiah").unwrap_err();
        assert!(err.is_not_found());
    }
}
