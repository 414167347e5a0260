//! `lectio stats`: chapter, verse and word counts for one book.

use serde::Serialize;

use lectio_core::domain::{BookStats, DomainError, resolve_book_code};
use lectio_core::error::LectioError;

use crate::{
    cli::StatsArgs,
    config::AppConfig,
    error::CliResult,
    library::{build_service, version_id},
    output::OutputManager,
};

#[derive(Serialize)]
struct StatsView<'a> {
    version: &'a str,
    book: &'a str,
    title: &'a str,
    #[serde(flatten)]
    stats: BookStats,
}

pub async fn execute(args: StatsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let code = resolve_book_code(&args.book).ok_or_else(|| {
        LectioError::from(DomainError::UnknownBook {
            name: args.book.clone(),
        })
    })?;

    let service = build_service(&config)?;
    let version = args.bible.as_deref().map(version_id).transpose()?;
    let id = version.unwrap_or_else(|| service.current_version());

    let book = service.load_book(&code, Some(&id)).await?;
    let stats = service.parser_for(Some(&id))?.book_stats(&book);

    if output.is_json() {
        output.json(&StatsView {
            version: id.as_str(),
            book: book.code.as_str(),
            title: &book.title,
            stats,
        })?;
        return Ok(());
    }

    output.header(&format!("{} ({}, {})", book.title, book.code, id))?;
    output.result(&format!("chapters    {}", stats.chapters))?;
    output.result(&format!("verses      {}", stats.verses))?;
    output.result(&format!("words       {}", stats.words))?;
    output.result(&format!("characters  {}", stats.characters))?;
    Ok(())
}
