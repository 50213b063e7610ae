//! The authoritative note list and its persistence.
//!
//! [`NoteStore`] owns the in-memory list and is the only code that writes to
//! the [`KeyValueStore`]. Every mutation rewrites the full JSON snapshot under
//! [`NOTES_KEY`]; [`NoteStore::clear`] is the one exception and removes the key
//! instead. Reads are lenient: a missing or unreadable snapshot loads as an
//! empty list.

use crate::{KeyValueStore, Note, Result, Theme};
use std::collections::HashSet;

/// Key under which the JSON array of notes is stored.
pub const NOTES_KEY: &str = "notesAppV1";

/// Key under which the theme preference is stored.
pub const THEME_KEY: &str = "notesTheme";

/// Owns the note list and writes it through to a persistence backend.
pub struct NoteStore<B: KeyValueStore> {
    backend: B,
    notes: Vec<Note>,
}

impl<B: KeyValueStore> NoteStore<B> {
    /// Loads the note list from `backend`.
    ///
    /// Never fails: an absent key, a read error or a malformed blob all
    /// produce an empty list. Notes that break the tag, id or timestamp
    /// invariants are repaired (see [`sanitize_notes`]).
    pub fn load(backend: B) -> Self {
        let notes = match backend.get(NOTES_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Note>>(&blob) {
                Ok(notes) => sanitize_notes(notes),
                Err(e) => {
                    log::warn!("stored notes are unreadable, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("failed to read stored notes, starting empty: {e}");
                Vec::new()
            }
        };
        log::debug!("loaded {} notes", notes.len());
        Self { backend, notes }
    }

    /// All notes in storage order (newest created or cloned first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Replaces the whole list and persists it.
    ///
    /// The list goes through [`sanitize_notes`] first, so duplicate ids and
    /// oversized tag lists never reach storage.
    pub fn replace(&mut self, notes: Vec<Note>) -> Result<()> {
        let notes = sanitize_notes(notes);
        self.persist(&notes)?;
        self.notes = notes;
        Ok(())
    }

    /// Applies `f` to a working copy of the list and persists the result.
    ///
    /// The in-memory list only changes once the snapshot has been written, so
    /// a backend failure leaves the store as it was.
    pub(crate) fn mutate<R>(&mut self, f: impl FnOnce(&mut Vec<Note>) -> R) -> Result<R> {
        let mut working = self.notes.clone();
        let out = f(&mut working);
        self.persist(&working)?;
        self.notes = working;
        Ok(out)
    }

    /// Empties the list and removes the persisted snapshot entirely.
    pub fn clear(&mut self) -> Result<usize> {
        self.backend.remove(NOTES_KEY)?;
        let removed = self.notes.len();
        self.notes.clear();
        Ok(removed)
    }

    /// Reads the theme preference; missing or unknown values yield the default.
    pub fn theme(&self) -> Theme {
        match self.backend.get(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
                log::warn!("{e}; using default theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                log::warn!("failed to read theme preference: {e}");
                Theme::default()
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.backend.set(THEME_KEY, theme.as_str())
    }

    /// Returns the persistence backend, e.g. to hand it to another store.
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn persist(&mut self, notes: &[Note]) -> Result<()> {
        let blob = serde_json::to_string(notes)?;
        self.backend.set(NOTES_KEY, &blob)
    }
}

/// Restores the list invariants on notes read from storage or an import.
///
/// Duplicate ids are dropped (first occurrence wins), tags are re-normalised
/// and `updatedAt` is raised to `createdAt` where it lags behind.
pub fn sanitize_notes(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(notes.len());
    for mut note in notes {
        if !seen.insert(note.id.clone()) {
            log::warn!("dropping note with duplicate id {}", note.id);
            continue;
        }
        if note.repair() {
            log::warn!("repaired note {}", note.id);
        }
        out.push(note);
    }
    out
}
