//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables prefixed `LECTIO__` (`LECTIO__SEARCH__BOOK_LIMIT=20`)
//! 3. Config file: `--config`, else the platform config path, else
//!    `lectio.toml` in the working directory
//! 4. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use lectio_core::application::services::bible_service::DEFAULT_SEARCH_BOOK_LIMIT;
use lectio_core::domain::{BookNames, TextOptions};

const LOCAL_CONFIG_FILE: &str = "lectio.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version used when a command does not name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
    /// Search settings.
    pub search: SearchConfig,
    /// Text cleaning applied by the parsers.
    pub text: TextOptions,
    /// Output settings.
    pub output: OutputConfig,
    /// Configured versions, in registration order.
    pub versions: Vec<VersionConfig>,

    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Books searched when no scope is given.
    pub book_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            book_limit: DEFAULT_SEARCH_BOOK_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

/// One `[[versions]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// `usx` or `usfx`; checked when the library is built.
    pub format: String,
    /// Directory holding one file per book. Relative paths are resolved
    /// against the config file's directory.
    pub path: PathBuf,
    /// Per-book display names keyed by book name or code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub book_names: BTreeMap<String, BookNames>,
}

fn default_language() -> String {
    "en".into()
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// `config_file` is the path the user passed via `--config`. An explicit
    /// path must exist; the implicit locations are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) if !path.is_file() => {
                bail!("config file '{}' does not exist", path.display())
            }
            Some(path) => Some(path.clone()),
            None => Self::discover(),
        };

        let mut builder = Config::builder()
            .set_default("search.book_limit", DEFAULT_SEARCH_BOOK_LIMIT as i64)?
            .set_default("output.no_color", false)?;

        if let Some(path) = &file {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("LECTIO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: AppConfig = builder
            .build()
            .context("reading configuration sources")?
            .try_deserialize()
            .context("invalid configuration")?;
        loaded.source = file;
        Ok(loaded)
    }

    /// First existing implicit config file.
    fn discover() -> Option<PathBuf> {
        [Self::config_path(), PathBuf::from(LOCAL_CONFIG_FILE)]
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `lectio.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "lectio", "lectio")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// A version's directory, relative paths anchored at the config file.
    pub fn version_root(&self, version: &VersionConfig) -> PathBuf {
        match self.source.as_deref().and_then(Path::parent) {
            Some(base) if version.path.is_relative() => base.join(&version.path),
            _ => version.path.clone(),
        }
    }

    /// Contents `lectio init` writes.
    pub fn starter() -> Self {
        Self {
            default_version: Some("web".into()),
            versions: vec![VersionConfig {
                id: "web".into(),
                name: "World English Bible".into(),
                language: "en".into(),
                format: "usx".into(),
                path: PathBuf::from("bibles/web"),
                book_names: BTreeMap::new(),
            }],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_without_versions() {
        let cfg = AppConfig::default();
        assert!(cfg.versions.is_empty());
        assert_eq!(cfg.search.book_limit, DEFAULT_SEARCH_BOOK_LIMIT);
        assert!(cfg.text.normalize_whitespace);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/lectio/config.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn reads_versions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lectio.toml");
        fs::write(
            &path,
            r#"
default_version = "vulgate"

[search]
book_limit = 3

[text]
include_footnotes = true

[[versions]]
id = "vulgate"
name = "Biblia Sacra Vulgata"
language = "la"
format = "usfx"
path = "texts/vulgate"

[versions.book_names.GEN]
title = "Liber Genesis"
abbreviation = "Gn"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.default_version.as_deref(), Some("vulgate"));
        assert_eq!(cfg.search.book_limit, 3);
        assert!(cfg.text.include_footnotes);
        assert!(cfg.text.normalize_whitespace);

        let vulgate = &cfg.versions[0];
        assert_eq!(vulgate.format, "usfx");
        assert_eq!(cfg.version_root(vulgate), dir.path().join("texts/vulgate"));
        let names: Vec<_> = vulgate.book_names.values().map(|n| n.title.as_str()).collect();
        assert_eq!(names, ["Liber Genesis"]);
    }

    #[test]
    fn absolute_version_paths_are_kept() {
        let mut cfg = AppConfig::starter();
        cfg.source = Some(PathBuf::from("/etc/lectio/config.toml"));
        cfg.versions[0].path = PathBuf::from("/srv/bibles/web");
        assert_eq!(cfg.version_root(&cfg.versions[0]), PathBuf::from("/srv/bibles/web"));
    }

    #[test]
    fn starter_round_trips_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::starter()).unwrap();
        assert!(text.contains("[[versions]]"));
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.versions[0].id, "web");
        assert_eq!(back.default_version.as_deref(), Some("web"));
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
