//! `lectio versions`: list configured versions.

use serde::Serialize;

use lectio_core::domain::Format;

use crate::{config::AppConfig, error::CliResult, library::build_service, output::OutputManager};

#[derive(Serialize)]
struct VersionView<'a> {
    id: &'a str,
    name: &'a str,
    language: &'a str,
    format: Format,
    current: bool,
}

pub fn execute(config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;
    let current = service.current_version();

    let views: Vec<VersionView<'_>> = service
        .available_versions()
        .into_iter()
        .map(|v| VersionView {
            id: v.id.as_str(),
            name: &v.name,
            language: &v.language,
            format: v.format,
            current: v.id == current,
        })
        .collect();

    if output.is_json() {
        output.json(&views)?;
        return Ok(());
    }

    for view in &views {
        let marker = if view.current { "*" } else { " " };
        output.result(&format!(
            "{marker} {:<10} {:<5} {:<4} {}",
            view.id,
            view.format.as_str(),
            view.language,
            view.name
        ))?;
    }
    Ok(())
}
