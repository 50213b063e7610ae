//! The note record and tag normalisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of tags a single note may carry.
pub const MAX_TAGS: usize = 6;

/// A single user-authored note.
///
/// Serialises to the persisted/exported JSON shape:
/// `{ id, title, content, tags, pinned, createdAt, updatedAt }` with RFC 3339
/// timestamps. Older stores that wrote `createdISO`/`updatedISO` are accepted
/// on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(alias = "createdISO")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updatedISO")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Builds an unpinned note stamped with `now` for both timestamps.
    pub fn new(
        id: String,
        title: String,
        content: String,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            tags,
            pinned: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if `query` (already lowercased) occurs in the title,
    /// the content or any tag, ignoring case.
    pub(crate) fn contains_lowercase(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.content.to_lowercase().contains(query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(query))
    }

    /// Restores the tag and timestamp invariants on a note read from outside.
    ///
    /// Returns `true` if anything had to be changed.
    pub(crate) fn repair(&mut self) -> bool {
        let mut repaired = false;

        let tags = clean_tag_list(&self.tags);
        if tags != self.tags {
            self.tags = tags;
            repaired = true;
        }
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
            repaired = true;
        }
        repaired
    }
}

/// Normalises a raw comma-separated tag string.
///
/// Segments are trimmed, empty segments dropped, duplicates removed (the first
/// occurrence keeps its position) and the result capped at [`MAX_TAGS`].
/// Tags are case-sensitive: `"Rust"` and `"rust"` are different tags.
///
/// # Examples
///
/// ```rust
/// use quicknotes_core::clean_tags;
///
/// assert_eq!(clean_tags(" work, idea ,work,,"), vec!["work", "idea"]);
/// assert!(clean_tags("").is_empty());
/// ```
pub fn clean_tags(raw: &str) -> Vec<String> {
    clean_tag_list(raw.split(','))
}

/// Same rules as [`clean_tags`], applied to tags that are already split.
pub fn clean_tag_list<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        if cleaned.len() == MAX_TAGS {
            break;
        }
        let tag = tag.as_ref().trim();
        if tag.is_empty() || cleaned.iter().any(|t| t == tag) {
            continue;
        }
        cleaned.push(tag.to_string());
    }
    cleaned
}
