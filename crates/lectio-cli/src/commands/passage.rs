//! `lectio passage`: print the text of a citation.

use serde::Serialize;
use tracing::debug;

use lectio_core::domain::{ParsedVerse, Passage, ReferenceStyle};

use crate::{
    cli::PassageArgs,
    config::AppConfig,
    error::CliResult,
    library::{build_service, version_id},
    output::OutputManager,
};

#[derive(Serialize)]
struct PassageView<'a> {
    version: &'a str,
    reference: String,
    verses: &'a [ParsedVerse],
    text: String,
}

pub async fn execute(args: PassageArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;
    let version = args.bible.as_deref().map(version_id).transpose()?;
    let id = version.unwrap_or_else(|| service.current_version());

    let passage = service.try_get_passage(&args.reference, Some(&id)).await?;
    debug!(reference = %passage.display_reference, verses = passage.verses.len(), "Passage found");

    let style: ReferenceStyle = args.style.into();
    let label = service.version(&id)?.book_label(&passage.book_code, style);
    let heading = heading(&passage, &label);
    let text = passage.text(args.numbers, &unescape(&args.separator));

    if output.is_json() {
        output.json(&PassageView {
            version: id.as_str(),
            reference: heading,
            verses: &passage.verses,
            text,
        })?;
        return Ok(());
    }

    output.header(&heading)?;
    output.result(&text)?;
    Ok(())
}

/// `display_reference` with its leading book code swapped for `label`.
fn heading(passage: &Passage, label: &str) -> String {
    match passage
        .display_reference
        .strip_prefix(passage.book_code.as_str())
    {
        Some(rest) => format!("{label}{rest}"),
        None => passage.display_reference.clone(),
    }
}

/// Shell-friendly escapes in `--separator`.
fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t")
}
