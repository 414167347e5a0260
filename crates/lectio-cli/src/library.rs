//! Wires configuration into a ready [`BibleService`].
//!
//! Every configured version shares one [`FilesystemAssetLoader`]; the
//! parsers come from `lectio-adapters` and all see the `[text]` options.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use lectio_adapters::{FilesystemAssetLoader, default_parsers};
use lectio_core::domain::{BookNameTable, resolve_book_code};
use lectio_core::prelude::*;

use crate::config::{AppConfig, VersionConfig};
use crate::error::{CliError, CliResult};

/// Build the registry described by `config`.
pub fn build_service(config: &AppConfig) -> CliResult<BibleService> {
    if config.versions.is_empty() {
        return Err(CliError::NoVersions {
            config: config.source.clone(),
        });
    }

    let mut loader = FilesystemAssetLoader::new();
    let mut versions = Vec::with_capacity(config.versions.len());
    for entry in &config.versions {
        let version = bible_version(entry)?;
        let root = config.version_root(entry);
        debug!(version = %version.id, root = %root.display(), "Registering version");
        loader = loader.with_version(version.id.clone(), root);
        versions.push(version);
    }
    let loader: Arc<dyn AssetLoader> = Arc::new(loader);

    let mut builder = BibleService::builder().search_book_limit(config.search.book_limit);
    for parser in default_parsers(config.text) {
        builder = builder.parser(parser);
    }
    for version in versions {
        builder = builder.version(version, Arc::clone(&loader));
    }
    if let Some(id) = &config.default_version {
        builder = builder.default_version(version_id(id)?);
    }

    let service = builder.build()?;
    info!(
        versions = config.versions.len(),
        current = %service.current_version(),
        "Library ready"
    );
    Ok(service)
}

/// Parse a version id given on the command line or in config.
pub fn version_id(raw: &str) -> CliResult<VersionId> {
    VersionId::new(raw).map_err(|e| config_error(format!("version id '{raw}'"), e))
}

fn bible_version(entry: &VersionConfig) -> CliResult<BibleVersion> {
    let id = version_id(&entry.id)?;
    let format = Format::from_str(&entry.format)
        .map_err(|e| config_error(format!("version '{}'", entry.id), e))?;

    let mut names = BookNameTable::new();
    for (key, book_names) in &entry.book_names {
        let code = resolve_book_code(key).ok_or_else(|| CliError::ConfigError {
            message: format!("version '{}' names unknown book '{key}'", entry.id),
            source: None,
        })?;
        names.insert(code, book_names.clone());
    }

    let name = if entry.name.is_empty() {
        entry.id.clone()
    } else {
        entry.name.clone()
    };
    Ok(BibleVersion::new(id, name, entry.language.clone(), format).with_book_names(names))
}

fn config_error(subject: String, err: impl std::error::Error + Send + Sync + 'static) -> CliError {
    CliError::ConfigError {
        message: format!("{subject}: {err}"),
        source: Some(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;

    fn entry(id: &str, format: &str) -> VersionConfig {
        VersionConfig {
            id: id.into(),
            name: String::new(),
            language: "en".into(),
            format: format.into(),
            path: PathBuf::from("/srv/bibles").join(id),
            book_names: BTreeMap::new(),
        }
    }

    fn config_with(versions: Vec<VersionConfig>) -> AppConfig {
        AppConfig {
            versions,
            ..AppConfig::default()
        }
    }

    #[test]
    fn empty_config_has_no_versions() {
        let err = build_service(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::NoVersions { .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn unknown_format_is_a_config_error() {
        let err = build_service(&config_with(vec![entry("web", "osis")])).unwrap_err();
        assert!(matches!(err, CliError::ConfigError { ref message, .. } if message.contains("osis")));
    }

    #[test]
    fn book_name_keys_resolve_like_citations() {
        let mut vulgate = entry("vulgate", "usfx");
        vulgate.book_names.insert(
            "genesis".into(),
            BookNames::new("Liber Genesis", "Genesis", "Gn"),
        );
        let version = bible_version(&vulgate).unwrap();
        assert_eq!(version.name, "vulgate");
        assert_eq!(
            version.book_label(&BookCode::new("GEN").unwrap(), ReferenceStyle::Full),
            "Liber Genesis"
        );
    }

    #[test]
    fn unknown_book_name_key_is_rejected() {
        let mut vulgate = entry("vulgate", "usx");
        vulgate
            .book_names
            .insert("Hezekiah".into(), BookNames::default());
        assert!(matches!(
            bible_version(&vulgate),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn default_version_is_honoured() {
        let mut config = config_with(vec![entry("web", "usx"), entry("vulgate", "usfx")]);
        config.default_version = Some("vulgate".into());
        let service = build_service(&config).unwrap();
        assert_eq!(service.current_version().as_str(), "vulgate");
        assert_eq!(service.available_versions().len(), 2);
    }

    #[test]
    fn unknown_default_version_fails() {
        let mut config = config_with(vec![entry("web", "usx")]);
        config.default_version = Some("kjv".into());
        let err = build_service(&config).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
