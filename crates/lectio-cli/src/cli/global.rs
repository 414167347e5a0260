//! Flags shared by every `lectio` subcommand.

use clap::Args;
use std::path::PathBuf;

/// Logging, colour, config and output-format switches.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Log more (-v, -vv, -vvv)",
        long_help = "Log more about what lectio is doing, on stderr:
    (none)  - warnings only, e.g. a version skipped by a search
    -v      - registered versions and the version in use
    -vv     - book loads, cache hits, parse summaries, search totals
    -vvv    - trace level, for debugging lectio itself"
    )]
    pub verbose: u8,

    /// Print only the passage text or search hits.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Drop headings, summaries and warnings"
    )]
    pub quiet: bool,

    /// Plain text even on a terminal. `NO_COLOR=1` does the same.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read versions from this TOML file instead of the usual locations.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Library config file (lectio.toml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How passages and hits are printed"
    )]
    pub output_format: OutputFormat,
}

/// Rendering for passages, hits and listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored on a terminal, plain when piped.
    #[default]
    Auto,
    /// Colored headings and dimmed references.
    Human,
    /// Text only.
    Plain,
    /// One JSON document per command.
    Json,
}
