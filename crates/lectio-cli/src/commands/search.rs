//! `lectio search`: substring search over one or several versions.

use lectio_core::prelude::*;

use crate::{
    cli::SearchArgs,
    config::AppConfig,
    error::CliResult,
    library::{build_service, version_id},
    output::OutputManager,
};

pub async fn execute(args: SearchArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;

    if args.all_versions || args.versions.is_some() {
        let ids = args
            .versions
            .as_deref()
            .map(|ids| ids.iter().map(|id| version_id(id)).collect::<CliResult<Vec<_>>>())
            .transpose()?;
        let result = service
            .search_multiple_versions(&args.text, ids.as_deref(), args.case_sensitive)
            .await;
        return print_multi(&result, &output);
    }

    let version = args.bible.as_deref().map(version_id).transpose()?;
    let id = version.unwrap_or_else(|| service.current_version());
    let hits = service
        .search_in_version(&id, &args.text, args.scope.as_deref(), args.case_sensitive)
        .await?;

    if output.is_json() {
        output.json(&hits)?;
        return Ok(());
    }
    for verse in &hits {
        output.result(&format!("{}  {}", output.dim(&verse.reference), verse.text))?;
    }
    output.info(&summary(hits.len()))?;
    Ok(())
}

fn print_multi(result: &MultiVersionSearch, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(result)?;
        return Ok(());
    }

    for hit in &result.hits {
        let tag = format!("[{}] {}", hit.version, hit.verse.reference);
        output.result(&format!("{}  {}", output.dim(&tag), hit.verse.text))?;
    }
    for failure in &result.failures {
        output.warning(&format!("{}: {}", failure.version, failure.reason))?;
    }
    output.info(&summary(result.hits.len()))?;
    Ok(())
}

fn summary(count: usize) -> String {
    match count {
        0 => "No matches".to_string(),
        1 => "1 match".to_string(),
        n => format!("{n} matches"),
    }
}
