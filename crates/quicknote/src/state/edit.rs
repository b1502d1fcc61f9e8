use quicknote_core::{has_content, DeleteNote, GetNoteById, Note, NoteUseCases, UpdateNote};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{DELETE_NOT_LOADED_MESSAGE, EMPTY_NOTE_MESSAGE, INVALID_NOTE_ID_MESSAGE};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditNoteState {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_path: Option<String>,
    pub date: i64,
    /// The note as last loaded or saved.
    pub original_note: Option<Note>,
    pub is_loading: bool,
    pub is_saving: bool,
    pub is_deleting: bool,
    pub is_note_updated: bool,
    pub is_note_deleted: bool,
    pub has_unsaved_changes: bool,
    pub error: Option<String>,
}

impl EditNoteState {
    pub fn can_save(&self) -> bool {
        has_content(&self.title, &self.description)
    }
}

#[derive(Debug, Clone)]
pub enum EditNoteEvent {
    TitleChanged(String),
    SubtitleChanged(String),
    DescriptionChanged(String),
    ImagePathChanged(Option<String>),
    UpdateNote,
    DeleteNote,
    ClearError,
}

/// State holder for editing an existing note.
pub struct EditNoteModel {
    state: watch::Sender<EditNoteState>,
    get_note_by_id: GetNoteById,
    update_note: UpdateNote,
    delete_note: DeleteNote,
}

impl EditNoteModel {
    /// Create the holder and load `note_id` into it.
    pub async fn open(use_cases: &NoteUseCases, note_id: &str) -> Self {
        let (state, _) = watch::channel(EditNoteState::default());
        let model = Self {
            state,
            get_note_by_id: use_cases.get_note_by_id.clone(),
            update_note: use_cases.update_note.clone(),
            delete_note: use_cases.delete_note.clone(),
        };

        if note_id.trim().is_empty() {
            model
                .state
                .send_modify(|s| s.error = Some(INVALID_NOTE_ID_MESSAGE.to_string()));
        } else {
            model.load(note_id).await;
        }
        model
    }

    pub fn subscribe(&self) -> watch::Receiver<EditNoteState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> EditNoteState {
        self.state.borrow().clone()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.state.borrow().has_unsaved_changes
    }

    pub async fn on_event(&self, event: EditNoteEvent) {
        match event {
            EditNoteEvent::TitleChanged(title) => self.set_title(title),
            EditNoteEvent::SubtitleChanged(subtitle) => self.set_subtitle(subtitle),
            EditNoteEvent::DescriptionChanged(description) => self.set_description(description),
            EditNoteEvent::ImagePathChanged(path) => self.set_image_path(path),
            EditNoteEvent::UpdateNote => {
                self.update().await;
            }
            EditNoteEvent::DeleteNote => {
                self.delete().await;
            }
            EditNoteEvent::ClearError => self.clear_error(),
        }
    }

    async fn load(&self, note_id: &str) {
        self.state.send_modify(|s| s.is_loading = true);

        match self.get_note_by_id.call(note_id).await {
            Ok(note) => self.state.send_modify(|s| {
                s.id = note.id.clone();
                s.title = note.title.clone();
                s.subtitle = note.subtitle.clone();
                s.description = note.description.clone();
                s.image_path = note.image_path.clone();
                s.date = note.date;
                s.original_note = Some(note);
                s.is_loading = false;
                s.has_unsaved_changes = false;
            }),
            Err(e) => {
                warn!(id = note_id, error = %e, "failed to load note");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(format!("Could not load note: {}", e));
                });
            }
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|s| {
            s.title = title;
            s.has_unsaved_changes = true;
        });
    }

    pub fn set_subtitle(&self, subtitle: impl Into<String>) {
        let subtitle = subtitle.into();
        self.state.send_modify(|s| {
            s.subtitle = subtitle;
            s.has_unsaved_changes = true;
        });
    }

    pub fn set_description(&self, description: impl Into<String>) {
        let description = description.into();
        self.state.send_modify(|s| {
            s.description = description;
            s.has_unsaved_changes = true;
        });
    }

    pub fn set_image_path(&self, path: Option<String>) {
        self.state.send_modify(|s| {
            s.image_path = path;
            s.has_unsaved_changes = true;
        });
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Save the edited fields under the loaded id, keeping the original date.
    pub async fn update(&self) -> Option<Note> {
        let current = self.state();
        if !current.can_save() {
            self.state
                .send_modify(|s| s.error = Some(EMPTY_NOTE_MESSAGE.to_string()));
            return None;
        }
        // Nothing was loaded; saving would create a note with an empty id.
        if current.id.trim().is_empty() {
            self.state
                .send_modify(|s| s.error = Some(INVALID_NOTE_ID_MESSAGE.to_string()));
            return None;
        }

        self.state.send_modify(|s| {
            s.is_saving = true;
            s.error = None;
        });

        let updated = Note {
            id: current.id,
            title: current.title.trim().to_string(),
            subtitle: current.subtitle.trim().to_string(),
            description: current.description.trim().to_string(),
            image_path: current.image_path.filter(|p| !p.trim().is_empty()),
            date: current.date,
        };

        match self.update_note.call(updated.clone()).await {
            Ok(()) => {
                info!(id = %updated.id, "note updated");
                let saved = updated.clone();
                self.state.send_modify(|s| {
                    s.is_saving = false;
                    s.is_note_updated = true;
                    s.has_unsaved_changes = false;
                    s.original_note = Some(saved);
                });
                Some(updated)
            }
            Err(e) => {
                warn!(id = %updated.id, error = %e, "failed to update note");
                self.state.send_modify(|s| {
                    s.is_saving = false;
                    s.error = Some(format!("Failed to update note: {}", e));
                });
                None
            }
        }
    }

    /// Delete the loaded note. Returns true once it is gone.
    pub async fn delete(&self) -> bool {
        let original = self.state.borrow().original_note.clone();
        self.state.send_modify(|s| s.is_deleting = true);

        let Some(note) = original else {
            self.state.send_modify(|s| {
                s.is_deleting = false;
                s.error = Some(DELETE_NOT_LOADED_MESSAGE.to_string());
            });
            return false;
        };

        match self.delete_note.call(&note).await {
            Ok(()) => {
                info!(id = %note.id, "note deleted");
                self.state.send_modify(|s| {
                    s.is_deleting = false;
                    s.is_note_deleted = true;
                });
                true
            }
            Err(e) => {
                warn!(id = %note.id, error = %e, "failed to delete note");
                self.state.send_modify(|s| {
                    s.is_deleting = false;
                    s.error = Some(format!("Failed to delete note: {}", e));
                });
                false
            }
        }
    }
}
