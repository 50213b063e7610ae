//! Note lifecycle operations over a [`NoteStore`].

use crate::core::export;
use crate::{
    clean_tags, Clock, ExportFormat, Intent, KeyValueStore, Listing, Note, NoteFilter,
    NoteStore, Outcome, QuicknotesError, Result, SystemClock, TagFilter, Theme,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Message shown when a note would be saved with neither title nor content.
pub const EMPTY_NOTE_MESSAGE: &str = "Write something!";

/// An open notebook: the note store, the current filter and the clock.
///
/// `Notebook` is the only component that mutates notes. Every mutation goes
/// through the [`NoteStore`], which persists a full snapshot before the
/// change becomes visible. Readers get `&Note` views via [`Notebook::notes`],
/// [`Notebook::get_note`] and [`Notebook::listing`].
///
/// Operations on an id that no longer exists are silent no-ops: the note may
/// have been removed by another window sharing the same store.
pub struct Notebook<B: KeyValueStore> {
    store: NoteStore<B>,
    filter: NoteFilter,
    clock: Box<dyn Clock>,
    last_stamp: Option<DateTime<Utc>>,
}

impl<B: KeyValueStore> Notebook<B> {
    /// Opens a notebook over `backend` using the system clock.
    pub fn open(backend: B) -> Self {
        Self::with_clock(backend, Box::new(SystemClock))
    }

    /// Opens a notebook over `backend` with an explicit clock.
    pub fn with_clock(backend: B, clock: Box<dyn Clock>) -> Self {
        Self {
            store: NoteStore::load(backend),
            filter: NoteFilter::default(),
            clock,
            last_stamp: None,
        }
    }

    /// All notes in storage order.
    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn get_note(&self, id: &str) -> Option<&Note> {
        self.store.get(id)
    }

    pub fn filter(&self) -> &NoteFilter {
        &self.filter
    }

    /// The visible notes and tag lists for the current filter.
    pub fn listing(&self) -> Listing<'_> {
        Listing::build(self.store.notes(), &self.filter)
    }

    pub fn theme(&self) -> Theme {
        self.store.theme()
    }

    /// Applies one intent and reports what happened.
    ///
    /// # Errors
    ///
    /// Returns [`QuicknotesError::ValidationFailed`] for an empty create or
    /// update, or a backend error if persisting fails. In both cases no state
    /// changes.
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome> {
        let outcome = match intent {
            Intent::Create { title, content, tags } => {
                let id = self.create_note(&title, &content, &tags)?;
                Outcome::Created { id }
            }
            Intent::Update { id, title, content, tags } => {
                if self.update_note(&id, &title, &content, &tags)? {
                    Outcome::Updated { id }
                } else {
                    Outcome::Ignored
                }
            }
            Intent::Delete { id } => {
                if self.delete_note(&id)? {
                    Outcome::Deleted { id }
                } else {
                    Outcome::Ignored
                }
            }
            Intent::Clone { id } => match self.clone_note(&id)? {
                Some(new_id) => Outcome::Cloned {
                    source_id: id,
                    id: new_id,
                },
                None => Outcome::Ignored,
            },
            Intent::TogglePin { id } => match self.toggle_pin(&id)? {
                Some(pinned) => Outcome::PinToggled { id, pinned },
                None => Outcome::Ignored,
            },
            Intent::SetSearch { text } => {
                self.filter.search_text = text;
                Outcome::FilterChanged
            }
            Intent::SetTagFilter { tag } => {
                self.filter.tag = tag;
                Outcome::FilterChanged
            }
            Intent::SetSortOrder { sort } => {
                self.filter.sort = sort;
                Outcome::FilterChanged
            }
            Intent::SetPinnedOnly { pinned_only } => {
                self.filter.pinned_only = pinned_only;
                Outcome::FilterChanged
            }
            Intent::SetTheme { theme } => {
                self.set_theme(theme)?;
                Outcome::ThemeChanged(theme)
            }
            Intent::Export { format } => {
                let content = self.export(format)?;
                Outcome::Exported { format, content }
            }
            Intent::ClearAll { confirmed } => {
                if confirmed {
                    Outcome::Cleared {
                        removed: self.clear_all()?,
                    }
                } else {
                    Outcome::Ignored
                }
            }
        };
        Ok(outcome)
    }

    /// Creates a note at the front of the list and returns its id.
    ///
    /// Title and content are trimmed and `tags_raw` is normalised with
    /// [`clean_tags`].
    ///
    /// # Errors
    ///
    /// Returns [`QuicknotesError::ValidationFailed`] if title and content are
    /// both empty after trimming.
    pub fn create_note(&mut self, title: &str, content: &str, tags_raw: &str) -> Result<String> {
        let (title, content) = validated_text(title, content)?;
        let id = self.new_note_id();
        let now = self.stamp(None);
        let note = Note::new(id.clone(), title, content, clean_tags(tags_raw), now);

        self.store.mutate(|notes| notes.insert(0, note))?;
        log::debug!("created note {id}");
        Ok(id)
    }

    /// Overwrites title, content and tags of note `id` in place.
    ///
    /// Returns `Ok(false)` without touching anything if `id` does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`QuicknotesError::ValidationFailed`] if title and content are
    /// both empty after trimming.
    pub fn update_note(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
        tags_raw: &str,
    ) -> Result<bool> {
        let Some(previous) = self.store.get(id).map(|n| n.updated_at) else {
            log::debug!("update ignored, note {id} no longer exists");
            return Ok(false);
        };
        let (title, content) = validated_text(title, content)?;
        let tags = clean_tags(tags_raw);
        let now = self.stamp(Some(previous));

        self.store.mutate(|notes| {
            if let Some(note) = notes.iter_mut().find(|n| n.id == id) {
                note.title = title;
                note.content = content;
                note.tags = tags;
                note.updated_at = now;
            }
        })?;
        log::debug!("updated note {id}");
        Ok(true)
    }

    /// Removes note `id`. Returns `Ok(false)` if it was already gone.
    pub fn delete_note(&mut self, id: &str) -> Result<bool> {
        if !self.store.contains(id) {
            return Ok(false);
        }
        self.store.mutate(|notes| notes.retain(|n| n.id != id))?;
        log::debug!("deleted note {id}");
        Ok(true)
    }

    /// Copies note `id` to the front of the list with a new id and fresh
    /// timestamps. Title, content, tags and pin state are kept.
    ///
    /// Returns the new id, or `None` if the source no longer exists.
    pub fn clone_note(&mut self, id: &str) -> Result<Option<String>> {
        let Some(source) = self.store.get(id) else {
            log::debug!("clone ignored, note {id} no longer exists");
            return Ok(None);
        };
        let mut copy = source.clone();
        copy.id = self.new_note_id();
        let now = self.stamp(Some(copy.created_at));
        copy.created_at = now;
        copy.updated_at = now;

        let new_id = copy.id.clone();
        self.store.mutate(|notes| notes.insert(0, copy))?;
        log::debug!("cloned note {id} as {new_id}");
        Ok(Some(new_id))
    }

    /// Flips the pinned flag of note `id`.
    ///
    /// Returns the new pinned state, or `None` if the note does not exist.
    pub fn toggle_pin(&mut self, id: &str) -> Result<Option<bool>> {
        let Some(previous) = self.store.get(id).map(|n| n.updated_at) else {
            return Ok(None);
        };
        let now = self.stamp(Some(previous));
        let pinned = self.store.mutate(|notes| {
            notes.iter_mut().find(|n| n.id == id).map(|note| {
                note.pinned = !note.pinned;
                note.updated_at = now;
                note.pinned
            })
        })?;
        log::debug!("toggled pin on note {id}");
        Ok(pinned)
    }

    /// Renders the whole list, in storage order, in `format`.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => export::export_json(self.store.notes()),
            ExportFormat::Txt => Ok(export::export_text(self.store.notes())),
        }
    }

    /// Replaces every note with the contents of an exported JSON array.
    ///
    /// Imported notes are sanitised the same way as loaded ones. Returns the
    /// number of notes now in the notebook.
    ///
    /// # Errors
    ///
    /// Returns [`QuicknotesError::Json`] if `json` is not a valid note array;
    /// the notebook is left unchanged.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        self.store.replace(export::parse_json(json)?)?;
        let count = self.store.len();
        log::info!("imported {count} notes");
        Ok(count)
    }

    /// Removes every note and the persisted snapshot. Returns how many notes
    /// were removed. Confirmation is the caller's job.
    pub fn clear_all(&mut self) -> Result<usize> {
        let removed = self.store.clear()?;
        log::info!("cleared {removed} notes");
        Ok(removed)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set_theme(theme)
    }

    /// Convenience for clicking a tag chip.
    pub fn set_tag_filter(&mut self, tag: impl Into<TagFilter>) {
        self.filter.tag = tag.into();
    }

    /// Returns the clock's time, nudged forward so it is strictly later than
    /// the previous stamp of this session and than `after`.
    ///
    /// `after` is the stamp of the note being changed. It only affects the
    /// value returned, so a note dated in the future cannot hold back the
    /// stamps of other notes.
    fn stamp(&mut self, after: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let now = self.clock.now();
        let session = match self.last_stamp {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_stamp = Some(session);
        match after {
            Some(previous) if session <= previous => previous + Duration::milliseconds(1),
            _ => session,
        }
    }

    fn new_note_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.store.contains(&id) {
                return id;
            }
        }
    }
}

/// Trims title and content, rejecting the pair if both end up empty.
fn validated_text(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() && content.is_empty() {
        return Err(QuicknotesError::ValidationFailed(
            EMPTY_NOTE_MESSAGE.to_string(),
        ));
    }
    Ok((title.to_string(), content.to_string()))
}
