//! One callable per repository operation.
//!
//! These add no behavior of their own; they exist so callers depend on a
//! single named operation instead of the whole repository.

use crate::{Error, Note, NoteFeed, NoteRepository};

#[derive(Clone)]
pub struct GetAllNotes {
    repository: NoteRepository,
}

impl GetAllNotes {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    pub fn call(&self) -> NoteFeed {
        self.repository.all_notes()
    }
}

#[derive(Clone)]
pub struct GetNoteById {
    repository: NoteRepository,
}

impl GetNoteById {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    pub async fn call(&self, id: &str) -> Result<Note, Error> {
        self.repository.get_note(id).await
    }
}

#[derive(Clone)]
pub struct InsertNote {
    repository: NoteRepository,
}

impl InsertNote {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    pub async fn call(&self, note: Note) -> Result<(), Error> {
        self.repository.insert_note(note).await
    }
}

#[derive(Clone)]
pub struct UpdateNote {
    repository: NoteRepository,
}

impl UpdateNote {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    pub async fn call(&self, note: Note) -> Result<(), Error> {
        self.repository.update_note(note).await
    }
}

#[derive(Clone)]
pub struct DeleteNote {
    repository: NoteRepository,
}

impl DeleteNote {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    pub async fn call(&self, note: &Note) -> Result<(), Error> {
        self.repository.delete_note(note).await
    }
}

#[derive(Clone)]
pub struct SearchNotes {
    repository: NoteRepository,
}

impl SearchNotes {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    pub async fn call(&self, text: &str) -> Result<Vec<Note>, Error> {
        self.repository.search_notes(text).await
    }
}

/// Every use case, wired to the same repository.
#[derive(Clone)]
pub struct NoteUseCases {
    pub get_all_notes: GetAllNotes,
    pub get_note_by_id: GetNoteById,
    pub insert_note: InsertNote,
    pub update_note: UpdateNote,
    pub delete_note: DeleteNote,
    pub search_notes: SearchNotes,
}

impl NoteUseCases {
    pub fn new(repository: NoteRepository) -> Self {
        Self {
            get_all_notes: GetAllNotes::new(repository.clone()),
            get_note_by_id: GetNoteById::new(repository.clone()),
            insert_note: InsertNote::new(repository.clone()),
            update_note: UpdateNote::new(repository.clone()),
            delete_note: DeleteNote::new(repository.clone()),
            search_notes: SearchNotes::new(repository),
        }
    }
}
