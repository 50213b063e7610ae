//! Command-line definitions.

use clap::{Parser, Subcommand, ValueEnum};
use quicknotes_core::{ExportFormat, Theme};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quicknotes", version, about = "Create, tag, search and pin short notes")]
pub struct Cli {
    /// Notes store to use instead of the one in settings.json.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a note. Title or content must be non-empty.
    Add {
        /// Note title.
        #[arg(default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        /// Comma-separated tags, at most six are kept.
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Edit a note. Fields that are not given keep their current value.
    Edit {
        /// Note id or a unique prefix of it.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Delete a note.
    Rm {
        id: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Duplicate a note.
    Clone { id: String },
    /// Pin or unpin a note.
    Pin { id: String },
    /// Show one note in full.
    Show { id: String },
    /// List notes, pinned first.
    List {
        /// Case-insensitive text to look for in titles, contents and tags.
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only notes with this exact tag; `*` for all.
        #[arg(short, long, default_value = "*")]
        tag: String,
        /// Only pinned notes.
        #[arg(short, long)]
        pinned: bool,
        /// Least recently updated first.
        #[arg(long, conflicts_with = "recent")]
        oldest: bool,
        /// Most recently updated first.
        #[arg(long)]
        recent: bool,
    },
    /// List every tag in use.
    Tags,
    /// Export all notes.
    Export {
        #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
        /// Write to this file instead of standard output.
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Replace all notes with the contents of an exported JSON file.
    Import {
        file: PathBuf,
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete ALL notes.
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change the theme preference.
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
    /// Show or change settings.
    Config {
        /// Store path to use from now on.
        #[arg(long, value_name = "PATH")]
        store_path: Option<PathBuf>,
        /// Default list order: `true` for most recent first.
        #[arg(long, value_name = "BOOL")]
        sort_recent: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Txt,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Txt => ExportFormat::Txt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl ThemeArg {
    /// Resolves the requested theme given the current one.
    pub fn resolve(self, current: Theme) -> Theme {
        match self {
            Self::Light => Theme::Light,
            Self::Dark => Theme::Dark,
            Self::Toggle => current.toggled(),
        }
    }
}
