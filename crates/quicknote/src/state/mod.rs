//! View-state holders that a presentation layer binds to.
//!
//! Each holder publishes its state through a `tokio::sync::watch` channel and
//! turns every failure into a displayable `error` string.

mod add;
mod edit;
mod list;

pub use add::{AddNoteEvent, AddNoteModel, AddNoteState};
pub use edit::{EditNoteEvent, EditNoteModel, EditNoteState};
pub use list::{NoteListEvent, NoteListModel, NoteListState};

pub const EMPTY_NOTE_MESSAGE: &str = "Please write something in title or description";
pub const INVALID_NOTE_ID_MESSAGE: &str = "Invalid note id";
pub const DELETE_NOT_LOADED_MESSAGE: &str = "Note not found, cannot delete";
