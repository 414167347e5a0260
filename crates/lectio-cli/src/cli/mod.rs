//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use lectio_core::domain::ReferenceStyle;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "lectio",
    bin_name = "lectio",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scripture references, passages and search over USX/USFX libraries",
    long_about = "Lectio resolves scripture citations, assembles passages and \
                  searches verse text across one or more configured versions.",
    after_help = "EXAMPLES:\n\
        \x20 lectio passage \"Genesis 1:1-2:7\"\n\
        \x20 lectio passage \"Col 3:17, 23-24\" --numbers -b vulgate\n\
        \x20 lectio search mercy --in gospels\n\
        \x20 lectio completions bash > /usr/share/bash-completion/completions/lectio",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the text of a passage.
    #[command(
        visible_alias = "p",
        about = "Print a passage",
        after_help = "EXAMPLES:\n\
            \x20 lectio passage \"Jn 3:16\"\n\
            \x20 lectio passage \"Mat 5:3-9\" --numbers --separator '\\n'\n\
            \x20 lectio passage \"Col 3:17, 4:2\" -b vulgate --style full"
    )]
    Passage(PassageArgs),

    /// Search verse text.
    #[command(
        visible_alias = "s",
        about = "Search verse text",
        after_help = "EXAMPLES:\n\
            \x20 lectio search light\n\
            \x20 lectio search \"kingdom of heaven\" --in Matthew\n\
            \x20 lectio search Lord --in wisdom --case-sensitive\n\
            \x20 lectio search grace --all-versions"
    )]
    Search(SearchArgs),

    /// Resolve a book name or alias to its code.
    #[command(about = "Resolve a book name")]
    Resolve(ResolveArgs),

    /// Parse a citation without loading any text.
    #[command(about = "Parse a reference")]
    Parse(ParseArgs),

    /// Chapter, verse and word counts for one book.
    #[command(about = "Show book statistics")]
    Stats(StatsArgs),

    /// List configured versions.
    #[command(visible_alias = "ls", about = "List configured versions")]
    Versions,

    /// Initialise a Lectio configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 lectio init                     # platform config location\n\
            \x20 lectio init --path lectio.toml  # local config in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 lectio completions bash > ~/.local/share/bash-completion/completions/lectio\n\
            \x20 lectio completions zsh  > ~/.zfunc/_lectio\n\
            \x20 lectio completions fish > ~/.config/fish/completions/lectio.fish"
    )]
    Completions(CompletionsArgs),
}

// ── passage ───────────────────────────────────────────────────────────────────

/// Arguments for `lectio passage`.
#[derive(Debug, Args)]
pub struct PassageArgs {
    /// Citation, e.g. `Genesis 1:1-2:7` or `Col 3:17, 23-24`.
    #[arg(value_name = "REF", help = "Scripture reference")]
    pub reference: String,

    /// Version to read from (defaults to the configured default).
    #[arg(short = 'b', long = "bible", value_name = "VERSION", help = "Version id")]
    pub bible: Option<String>,

    /// Prefix every verse with its number.
    #[arg(short = 'n', long = "numbers", help = "Include verse numbers")]
    pub numbers: bool,

    /// Text placed between verses.
    #[arg(
        long = "separator",
        value_name = "TEXT",
        default_value = " ",
        help = "Separator between verses (\\n for newline)"
    )]
    pub separator: String,

    /// How the heading names the book.
    #[arg(long = "style", value_enum, default_value = "full", help = "Heading style")]
    pub style: StyleArg,
}

// ── search ────────────────────────────────────────────────────────────────────

/// Arguments for `lectio search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for.
    #[arg(value_name = "TEXT", help = "Text to search for")]
    pub text: String,

    /// A book name or a category (`gospels`, `wisdom`, `nt`, ...).
    /// Multi-version searches always cover the default book set.
    #[arg(
        long = "in",
        value_name = "SCOPE",
        conflicts_with_all = ["all_versions", "versions"],
        help = "Book or category to search"
    )]
    pub scope: Option<String>,

    /// Match case exactly.
    #[arg(long = "case-sensitive", help = "Case-sensitive match")]
    pub case_sensitive: bool,

    /// Version to search.
    #[arg(
        short = 'b',
        long = "bible",
        value_name = "VERSION",
        conflicts_with_all = ["all_versions", "versions"],
        help = "Version id"
    )]
    pub bible: Option<String>,

    /// Search every configured version.
    #[arg(long = "all-versions", conflicts_with = "versions", help = "Search every version")]
    pub all_versions: bool,

    /// Search the listed versions.
    #[arg(
        long = "versions",
        value_name = "IDS",
        value_delimiter = ',',
        help = "Comma-separated version ids"
    )]
    pub versions: Option<Vec<String>>,
}

// ── resolve / parse / stats ───────────────────────────────────────────────────

/// Arguments for `lectio resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Book name, abbreviation or code.
    #[arg(value_name = "NAME", help = "Book name or alias")]
    pub name: String,
}

/// Arguments for `lectio parse`.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Citation to parse.
    #[arg(value_name = "REF", help = "Scripture reference")]
    pub reference: String,

    /// Swap a reversed range before printing.
    #[arg(long = "normalize", help = "Put reversed ranges in order")]
    pub normalize: bool,

    /// Output style for the canonical form.
    #[arg(long = "style", value_enum, default_value = "code", help = "Output style")]
    pub style: StyleArg,
}

/// Arguments for `lectio stats`.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Book name or code.
    #[arg(value_name = "BOOK", help = "Book name or code")]
    pub book: String,

    /// Version to read from.
    #[arg(short = 'b', long = "bible", value_name = "VERSION", help = "Version id")]
    pub bible: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `lectio init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to this file instead of the platform config location.
    #[arg(long = "path", value_name = "FILE", help = "Where to write the file")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `lectio completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Reference styles accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StyleArg {
    /// `GEN 1:1`
    Code,
    /// `Gen 1:1`
    #[value(alias = "abbr")]
    Abbreviated,
    /// `Genesis 1:1`
    Full,
}

impl From<StyleArg> for ReferenceStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Code => Self::Code,
            StyleArg::Abbreviated => Self::Abbreviated,
            StyleArg::Full => Self::Full,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
