use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::{Error, Note, NoteRecord, NoteStore};

/// Maps between stored records and domain notes.
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct NoteRepository {
    store: Arc<dyn NoteStore>,
}

impl NoteRepository {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Live list of every note, newest first.
    pub fn all_notes(&self) -> NoteFeed {
        NoteFeed {
            store: Arc::clone(&self.store),
            changes: self.store.subscribe(),
            primed: false,
        }
    }

    /// Fetch one note, failing with [`Error::NotFound`] if the id is unknown.
    pub async fn get_note(&self, id: &str) -> Result<Note, Error> {
        self.store
            .get(id)
            .await?
            .map(Note::from)
            .ok_or_else(|| Error::NotFound(format!("note {}", id)))
    }

    pub async fn insert_note(&self, note: Note) -> Result<(), Error> {
        self.store.upsert(NoteRecord::from(note)).await
    }

    /// Same upsert as [`NoteRepository::insert_note`].
    pub async fn update_note(&self, note: Note) -> Result<(), Error> {
        self.store.upsert(NoteRecord::from(note)).await
    }

    /// Delete by the note's id. A note that is already gone is not an error.
    pub async fn delete_note(&self, note: &Note) -> Result<(), Error> {
        let removed = self.store.delete(&note.id).await?;
        debug!(id = %note.id, removed, "delete note");
        Ok(())
    }

    /// One-shot search over title and description. Results are unordered.
    pub async fn search_notes(&self, text: &str) -> Result<Vec<Note>, Error> {
        let records = self.store.search(text).await?;
        Ok(records.into_iter().map(Note::from).collect())
    }
}

/// A continuously updating view of all notes.
///
/// The first call to [`NoteFeed::next`] yields the current list right away;
/// every later call waits for the store to change and yields the new list.
pub struct NoteFeed {
    store: Arc<dyn NoteStore>,
    changes: watch::Receiver<u64>,
    primed: bool,
}

impl NoteFeed {
    /// Next snapshot, or `None` once the store stops publishing changes.
    pub async fn next(&mut self) -> Option<Result<Vec<Note>, Error>> {
        if self.primed {
            if self.changes.changed().await.is_err() {
                return None;
            }
        } else {
            self.primed = true;
        }
        self.changes.borrow_and_update();

        let notes = self
            .store
            .list_all()
            .await
            .map(|records| records.into_iter().map(Note::from).collect::<Vec<_>>());
        if let Ok(ref notes) = notes {
            debug!(count = notes.len(), "note feed emitted");
        }
        Some(notes)
    }
}
