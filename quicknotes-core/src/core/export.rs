//! JSON and plain-text export, and JSON import.

use crate::{Note, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of the human-readable `Updated:` line.
const TEXT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array of notes; re-importable.
    Json,
    /// Plain-text blocks, one per note.
    Txt,
}

impl ExportFormat {
    /// Conventional filename for a download in this format.
    pub fn default_filename(self) -> &'static str {
        match self {
            Self::Json => "notes.json",
            Self::Txt => "notes.txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Txt => "txt",
        })
    }
}

/// Serialises `notes` as a pretty-printed JSON array.
pub fn export_json(notes: &[Note]) -> Result<String> {
    Ok(serde_json::to_string_pretty(notes)?)
}

/// Parses a JSON array previously produced by [`export_json`].
///
/// Unlike loading from the store, malformed input is reported as an error.
pub fn parse_json(text: &str) -> Result<Vec<Note>> {
    Ok(serde_json::from_str(text)?)
}

/// Renders `notes` as plain text with timestamps shown in UTC.
pub fn export_text(notes: &[Note]) -> String {
    export_text_in(notes, &Utc)
}

/// Renders `notes` as plain text with timestamps shown in `tz`.
///
/// Each note becomes a block:
///
/// ```text
/// # <title>
/// Tags: <tag>, <tag>
/// Updated: <timestamp>
///
/// <content>
/// ---
/// ```
///
/// Blocks are separated by a blank line.
pub fn export_text_in<Tz>(notes: &[Note], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    notes
        .iter()
        .map(|n| {
            format!(
                "# {}\nTags: {}\nUpdated: {}\n\n{}\n---\n",
                n.title,
                n.tags.join(", "),
                format_timestamp(&n.updated_at, tz),
                n.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats a timestamp for people rather than machines.
pub fn format_timestamp<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.with_timezone(tz).format(TEXT_TIMESTAMP_FORMAT).to_string()
}
