//! QuickNote core library - note types, the store seam, repository and use cases.
//!
//! This crate does no filesystem or database I/O of its own.

mod error;
mod memory;
mod migrations;
mod note;
mod repository;
mod store;
mod usecase;

pub use error::Error;
pub use memory::MemoryNoteStore;
pub use migrations::{get_pending_migrations, Migration, MIGRATIONS, SCHEMA_VERSION, SCHEMA_VERSION_KEY};
pub use note::{has_content, now_millis, Note, NoteRecord};
pub use repository::{NoteFeed, NoteRepository};
pub use store::{record_matches, text_matcher, NoteStore, TextMatcher};
pub use usecase::{
    DeleteNote, GetAllNotes, GetNoteById, InsertNote, NoteUseCases, SearchNotes, UpdateNote,
};
