//! Filtering and display ordering of notes.
//!
//! Everything here is a pure function of the note slice and a [`NoteFilter`]:
//! the input is never reordered and the same input always gives the same
//! output.

use crate::Note;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Number of tags shown in the quick-tag strip.
pub const QUICK_TAG_LIMIT: usize = 8;

/// Restricts the listing to one tag, or shows every tag.
///
/// The wire form is the tag itself, with `"*"` meaning [`TagFilter::All`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    /// The wildcard accepted by [`TagFilter::from`].
    pub const WILDCARD: &'static str = "*";

    fn accepts(&self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => note.tags.iter().any(|t| t == tag),
        }
    }
}

impl From<String> for TagFilter {
    fn from(value: String) -> Self {
        if value == Self::WILDCARD {
            Self::All
        } else {
            Self::Tag(value)
        }
    }
}

impl From<&str> for TagFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<TagFilter> for String {
    fn from(value: TagFilter) -> Self {
        match value {
            TagFilter::All => TagFilter::WILDCARD.to_string(),
            TagFilter::Tag(tag) => tag,
        }
    }
}

/// Order of notes within the pinned and unpinned groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Most recently updated first.
    #[default]
    Recent,
    /// Least recently updated first.
    Oldest,
}

impl SortOrder {
    /// Maps the presentation layer's "sort by recent" toggle.
    pub fn from_recent(recent: bool) -> Self {
        if recent {
            Self::Recent
        } else {
            Self::Oldest
        }
    }
}

/// The filter and sort configuration for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    pub search_text: String,
    pub tag: TagFilter,
    pub pinned_only: bool,
    pub sort: SortOrder,
}

impl NoteFilter {
    /// Returns true if `note` passes the pinned, tag and search filters.
    pub fn accepts(&self, note: &Note) -> bool {
        (!self.pinned_only || note.pinned)
            && self.tag.accepts(note)
            && matches_search(note, &self.search_text)
    }
}

/// Case-insensitive substring search over title, content and tags.
///
/// An empty query matches every note.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use quicknotes_core::{matches_search, Note};
///
/// let note = Note::new("1".into(), "Hello".into(), String::new(), vec![], Utc::now());
/// assert!(matches_search(&note, "HELLO"));
/// assert!(matches_search(&note, ""));
/// assert!(!matches_search(&note, "bye"));
/// ```
pub fn matches_search(note: &Note, search_text: &str) -> bool {
    search_text.is_empty() || note.contains_lowercase(&search_text.to_lowercase())
}

/// Returns the notes accepted by `filter`, in display order.
///
/// Pinned notes come first. Within each group notes are ordered by
/// `updatedAt` per [`NoteFilter::sort`]; equal timestamps keep their storage
/// order.
pub fn visible_notes<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    let mut visible: Vec<&Note> = notes.iter().filter(|n| filter.accepts(n)).collect();
    visible.sort_by(|a, b| display_order(a, b, filter.sort));
    visible
}

fn display_order(a: &Note, b: &Note, sort: SortOrder) -> Ordering {
    b.pinned.cmp(&a.pinned).then_with(|| match sort {
        SortOrder::Recent => b.updated_at.cmp(&a.updated_at),
        SortOrder::Oldest => a.updated_at.cmp(&b.updated_at),
    })
}

/// The union of every note's tags, sorted and deduplicated.
pub fn available_tags(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .flat_map(|n| n.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Everything the presentation layer needs to draw the note list.
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    /// Notes passing the current filter, in display order.
    pub notes: Vec<&'a Note>,
    /// All tags in use, sorted.
    pub available_tags: Vec<String>,
    /// The first [`QUICK_TAG_LIMIT`] entries of `available_tags`.
    pub quick_tags: Vec<String>,
    /// Number of notes in the store, regardless of the filter.
    pub total: usize,
}

impl<'a> Listing<'a> {
    pub fn build(notes: &'a [Note], filter: &NoteFilter) -> Self {
        let available_tags = available_tags(notes);
        let quick_tags = available_tags.iter().take(QUICK_TAG_LIMIT).cloned().collect();
        Self {
            notes: visible_notes(notes, filter),
            available_tags,
            quick_tags,
            total: notes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn note(id: &str, minutes: i64, pinned: bool, tags: &[&str]) -> Note {
        let at = base() + Duration::minutes(minutes);
        let mut n = Note::new(
            id.to_string(),
            format!("Title {id}"),
            format!("Body of {id}"),
            tags.iter().map(|t| t.to_string()).collect(),
            at,
        );
        n.pinned = pinned;
        n
    }

    fn ids(list: &[&Note]) -> Vec<String> {
        list.iter().map(|n| n.id.clone()).collect()
    }

    fn sample() -> Vec<Note> {
        vec![
            note("a", 10, false, &["work"]),
            note("b", 30, true, &["home"]),
            note("c", 20, false, &["work", "urgent"]),
            note("d", 5, true, &["work"]),
        ]
    }

    #[test]
    fn test_default_filter_pinned_first_then_recent() {
        let notes = sample();
        let visible = visible_notes(&notes, &NoteFilter::default());
        assert_eq!(ids(&visible), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_oldest_sort_keeps_pinned_first() {
        let notes = sample();
        let filter = NoteFilter {
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        assert_eq!(ids(&visible_notes(&notes, &filter)), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_sort_invariant_holds_for_both_orders() {
        let notes = sample();
        for sort in [SortOrder::Recent, SortOrder::Oldest] {
            let filter = NoteFilter {
                sort,
                ..Default::default()
            };
            let visible = visible_notes(&notes, &filter);
            let first_unpinned = visible.iter().position(|n| !n.pinned).unwrap();
            assert!(visible[first_unpinned..].iter().all(|n| !n.pinned));
            for pair in visible.windows(2).filter(|w| w[0].pinned == w[1].pinned) {
                match sort {
                    SortOrder::Recent => assert!(pair[0].updated_at >= pair[1].updated_at),
                    SortOrder::Oldest => assert!(pair[0].updated_at <= pair[1].updated_at),
                }
            }
        }
    }

    #[test]
    fn test_equal_timestamps_keep_storage_order() {
        let notes = vec![
            note("x", 0, false, &[]),
            note("y", 0, false, &[]),
            note("z", 0, false, &[]),
        ];
        for sort in [SortOrder::Recent, SortOrder::Oldest] {
            let filter = NoteFilter {
                sort,
                ..Default::default()
            };
            assert_eq!(ids(&visible_notes(&notes, &filter)), vec!["x", "y", "z"]);
        }
    }

    #[test]
    fn test_tag_filter() {
        let notes = sample();
        let filter = NoteFilter {
            tag: TagFilter::from("work"),
            ..Default::default()
        };
        assert_eq!(ids(&visible_notes(&notes, &filter)), vec!["d", "c", "a"]);

        let filter = NoteFilter {
            tag: TagFilter::from("Work"),
            ..Default::default()
        };
        assert!(visible_notes(&notes, &filter).is_empty());
    }

    #[test]
    fn test_pinned_only_filter() {
        let notes = sample();
        let filter = NoteFilter {
            pinned_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&visible_notes(&notes, &filter)), vec!["b", "d"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let notes = vec![
            Note::new("1".into(), "Hello".into(), String::new(), vec![], base()),
            Note::new(
                "2".into(),
                String::new(),
                "say HELLO there".into(),
                vec![],
                base(),
            ),
            Note::new(
                "3".into(),
                String::new(),
                String::new(),
                vec!["hellos".into()],
                base(),
            ),
            Note::new("4".into(), "Goodbye".into(), String::new(), vec![], base()),
        ];
        for query in ["hello", "HELLO", "HeLLo"] {
            let filter = NoteFilter {
                search_text: query.to_string(),
                ..Default::default()
            };
            assert_eq!(ids(&visible_notes(&notes, &filter)), vec!["1", "2", "3"]);
        }
    }

    #[test]
    fn test_filters_combine() {
        let notes = sample();
        let filter = NoteFilter {
            search_text: "body of c".to_string(),
            tag: TagFilter::from("urgent"),
            pinned_only: false,
            sort: SortOrder::Recent,
        };
        assert_eq!(ids(&visible_notes(&notes, &filter)), vec!["c"]);

        let filter = NoteFilter {
            pinned_only: true,
            ..filter
        };
        assert!(visible_notes(&notes, &filter).is_empty());
    }

    #[test]
    fn test_input_is_not_reordered() {
        let notes = sample();
        let before = notes.clone();
        let _ = visible_notes(&notes, &NoteFilter::default());
        assert_eq!(notes, before);
    }

    #[test]
    fn test_available_tags_sorted_distinct() {
        assert_eq!(available_tags(&sample()), vec!["home", "urgent", "work"]);
        assert!(available_tags(&[]).is_empty());
    }

    #[test]
    fn test_listing_caps_quick_tags() {
        let tags: Vec<String> = (0..10).map(|i| format!("t{i}")).collect();
        let notes: Vec<Note> = tags
            .chunks(5)
            .enumerate()
            .map(|(i, chunk)| {
                Note::new(
                    i.to_string(),
                    String::new(),
                    "x".into(),
                    chunk.to_vec(),
                    base(),
                )
            })
            .collect();

        let listing = Listing::build(&notes, &NoteFilter::default());
        assert_eq!(listing.total, 2);
        assert_eq!(listing.available_tags.len(), 10);
        assert_eq!(listing.quick_tags.len(), QUICK_TAG_LIMIT);
        assert_eq!(listing.quick_tags[0], "t0");
    }

    #[test]
    fn test_tag_filter_wire_form() {
        assert_eq!(TagFilter::from("*"), TagFilter::All);
        let json = serde_json::to_string(&TagFilter::All).unwrap();
        assert_eq!(json, "\"*\"");
        let parsed: TagFilter = serde_json::from_str("\"work\"").unwrap();
        assert_eq!(parsed, TagFilter::Tag("work".to_string()));
    }
}
