//! User intents and their outcomes.

use crate::{ExportFormat, SortOrder, TagFilter, Theme};
use serde::{Deserialize, Serialize};

/// A user-triggered request for a state change.
///
/// Intents are the only way the presentation layer asks a
/// [`Notebook`](super::notebook::Notebook) to change anything; see
/// [`Notebook::apply`](super::notebook::Notebook::apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Add a new note at the front of the list.
    Create {
        title: String,
        content: String,
        /// Raw comma-separated tag input.
        tags: String,
    },
    /// Overwrite an existing note's text and tags.
    Update {
        id: String,
        title: String,
        content: String,
        tags: String,
    },
    Delete { id: String },
    Clone { id: String },
    TogglePin { id: String },
    SetSearch { text: String },
    SetTagFilter { tag: TagFilter },
    SetSortOrder { sort: SortOrder },
    SetPinnedOnly { pinned_only: bool },
    SetTheme { theme: Theme },
    Export { format: ExportFormat },
    /// Remove every note. Ignored unless `confirmed` is true.
    ClearAll { confirmed: bool },
}

/// What applying an [`Intent`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { id: String },
    Updated { id: String },
    Deleted { id: String },
    Cloned { source_id: String, id: String },
    PinToggled { id: String, pinned: bool },
    /// One of the filter settings changed; only the listing is affected.
    FilterChanged,
    ThemeChanged(Theme),
    Exported {
        format: ExportFormat,
        content: String,
    },
    Cleared { removed: usize },
    /// The intent referred to a note that no longer exists, or a clear was
    /// not confirmed. Nothing changed.
    Ignored,
}
