//! Plain-text rendering of notes for the terminal.

use chrono::TimeZone;
use quicknotes_core::{format_timestamp, Listing, Note};
use std::fmt::{Display, Write};

/// Length of the id prefix shown in listings.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

pub fn display_title(note: &Note) -> &str {
    if note.title.is_empty() {
        "(no title)"
    } else {
        &note.title
    }
}

/// `"1 note"`, `"3 notes"`.
pub fn count_label(count: usize) -> String {
    format!("{count} note{}", if count == 1 { "" } else { "s" })
}

/// One line per visible note followed by a count footer.
pub fn render_listing<Tz>(listing: &Listing<'_>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    if listing.notes.is_empty() {
        out.push_str("No notes to show.\n");
    }
    for note in &listing.notes {
        let pin = if note.pinned { "*" } else { " " };
        let _ = write!(
            out,
            "{pin} {:<8}  {}  {}",
            short_id(&note.id),
            format_timestamp(&note.updated_at, tz),
            display_title(note),
        );
        if !note.tags.is_empty() {
            let tags: Vec<String> = note.tags.iter().map(|t| format!("#{t}")).collect();
            let _ = write!(out, "  {}", tags.join(" "));
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} shown, {}",
        listing.notes.len(),
        count_label(listing.total)
    );
    out
}

/// Full view of a single note.
pub fn render_note<Tz>(note: &Note, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let marker = if note.pinned { " [pinned]" } else { "" };
    let _ = writeln!(out, "{}{marker}", display_title(note));
    let _ = writeln!(out, "id: {}", note.id);
    if !note.tags.is_empty() {
        let _ = writeln!(out, "tags: {}", note.tags.join(", "));
    }
    let _ = writeln!(
        out,
        "Created: {} • Updated: {}",
        format_timestamp(&note.created_at, tz),
        format_timestamp(&note.updated_at, tz)
    );
    if !note.content.is_empty() {
        let _ = writeln!(out, "\n{}", note.content);
    }
    out
}
