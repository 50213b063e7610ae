//! Core library for Quicknotes, a local-first list of short, tagged notes.
//!
//! The primary entry point is [`Notebook`], which owns the note list through a
//! [`NoteStore`] and applies user [`Intent`]s to it. Persistence goes through
//! any [`KeyValueStore`]; [`SqliteStore`] and [`MemoryStore`] are provided.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use crate::core::{
    clock::{Clock, FixedClock, SystemClock},
    error::{QuicknotesError, Result},
    export::{
        export_json, export_text, export_text_in, format_timestamp, parse_json, ExportFormat,
    },
    intent::{Intent, Outcome},
    note::{clean_tag_list, clean_tags, Note, MAX_TAGS},
    notebook::{Notebook, EMPTY_NOTE_MESSAGE},
    query::{
        available_tags, matches_search, visible_notes, Listing, NoteFilter, SortOrder, TagFilter,
        QUICK_TAG_LIMIT,
    },
    storage::{KeyValueStore, MemoryStore, SqliteStore},
    store::{sanitize_notes, NoteStore, NOTES_KEY, THEME_KEY},
    theme::Theme,
};
