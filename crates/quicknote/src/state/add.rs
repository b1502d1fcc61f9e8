use quicknote_core::{has_content, InsertNote, Note};
use tokio::sync::watch;
use tracing::{info, warn};

use super::EMPTY_NOTE_MESSAGE;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddNoteState {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_path: Option<String>,
    pub is_saving: bool,
    pub is_note_saved: bool,
    pub error: Option<String>,
}

impl AddNoteState {
    pub fn can_save(&self) -> bool {
        has_content(&self.title, &self.description)
    }
}

#[derive(Debug, Clone)]
pub enum AddNoteEvent {
    TitleChanged(String),
    SubtitleChanged(String),
    DescriptionChanged(String),
    ImagePathChanged(Option<String>),
    SaveNote,
    ClearError,
}

/// State holder for the "new note" form.
pub struct AddNoteModel {
    state: watch::Sender<AddNoteState>,
    insert_note: InsertNote,
}

impl AddNoteModel {
    pub fn new(insert_note: InsertNote) -> Self {
        let (state, _) = watch::channel(AddNoteState::default());
        Self { state, insert_note }
    }

    pub fn subscribe(&self) -> watch::Receiver<AddNoteState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AddNoteState {
        self.state.borrow().clone()
    }

    pub async fn on_event(&self, event: AddNoteEvent) {
        match event {
            AddNoteEvent::TitleChanged(title) => self.set_title(title),
            AddNoteEvent::SubtitleChanged(subtitle) => self.set_subtitle(subtitle),
            AddNoteEvent::DescriptionChanged(description) => self.set_description(description),
            AddNoteEvent::ImagePathChanged(path) => self.set_image_path(path),
            AddNoteEvent::SaveNote => {
                self.save().await;
            }
            AddNoteEvent::ClearError => self.clear_error(),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|s| s.title = title);
    }

    pub fn set_subtitle(&self, subtitle: impl Into<String>) {
        let subtitle = subtitle.into();
        self.state.send_modify(|s| s.subtitle = subtitle);
    }

    pub fn set_description(&self, description: impl Into<String>) {
        let description = description.into();
        self.state.send_modify(|s| s.description = description);
    }

    pub fn set_image_path(&self, path: Option<String>) {
        self.state.send_modify(|s| s.image_path = path);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Validate, trim and insert the draft as a brand new note.
    ///
    /// Returns the stored note on success. Failures land in `error`.
    pub async fn save(&self) -> Option<Note> {
        let draft = self.state();
        if !draft.can_save() {
            self.state
                .send_modify(|s| s.error = Some(EMPTY_NOTE_MESSAGE.to_string()));
            return None;
        }

        self.state.send_modify(|s| {
            s.is_saving = true;
            s.error = None;
        });

        let note = Note::new(
            draft.title.trim(),
            draft.subtitle.trim(),
            draft.description.trim(),
            draft.image_path.filter(|p| !p.trim().is_empty()),
        );

        match self.insert_note.call(note.clone()).await {
            Ok(()) => {
                info!(id = %note.id, "note saved");
                self.state.send_modify(|s| {
                    s.is_saving = false;
                    s.is_note_saved = true;
                });
                Some(note)
            }
            Err(e) => {
                warn!(error = %e, "failed to save note");
                self.state.send_modify(|s| {
                    s.is_saving = false;
                    s.error = Some(format!("Failed to save note: {}", e));
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded;
    use quicknote_core::NoteStore;

    #[tokio::test]
    async fn test_blank_note_is_rejected_without_io() {
        let (store, cases) = seeded(&[]).await;
        let model = AddNoteModel::new(cases.insert_note.clone());
        model.set_title("   ");
        model.set_subtitle("a subtitle alone is not enough");
        model.set_description("\n");

        assert!(!model.state().can_save());
        assert!(model.save().await.is_none());

        let state = model.state();
        assert_eq!(state.error.as_deref(), Some(EMPTY_NOTE_MESSAGE));
        assert!(!state.is_saving);
        assert!(!state.is_note_saved);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_trims_and_persists_one_note() {
        let (store, cases) = seeded(&[]).await;
        let model = AddNoteModel::new(cases.insert_note.clone());
        model.set_title("  Groceries ");
        model.set_subtitle(" weekend ");
        model.set_description(" milk\n");
        model.set_image_path(Some("   ".to_string()));

        let saved = model.save().await.unwrap();
        assert_eq!(saved.title, "Groceries");
        assert_eq!(saved.subtitle, "weekend");
        assert_eq!(saved.description, "milk");
        assert_eq!(saved.image_path, None);

        let state = model.state();
        assert!(state.is_note_saved);
        assert!(!state.is_saving);
        assert_eq!(state.error, None);

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(Note::from(all[0].clone()), saved);
    }

    #[tokio::test]
    async fn test_each_save_gets_a_new_id() {
        let (store, cases) = seeded(&[]).await;

        let first = AddNoteModel::new(cases.insert_note.clone());
        first.set_description("only a description");
        let a = first.save().await.unwrap();

        let second = AddNoteModel::new(cases.insert_note.clone());
        second.set_description("only a description");
        let b = second.save().await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_error() {
        let (store, cases) = seeded(&[]).await;
        store.fail_writes(true);
        let model = AddNoteModel::new(cases.insert_note.clone());
        model.set_title("Will fail");

        assert!(model.save().await.is_none());
        let state = model.state();
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to save note: database error: disk is full")
        );
        assert!(!state.is_saving);
        assert!(!state.is_note_saved);

        model.on_event(AddNoteEvent::ClearError).await;
        assert_eq!(model.state().error, None);
    }

    #[tokio::test]
    async fn test_events_fill_the_form() {
        let (_store, cases) = seeded(&[]).await;
        let model = AddNoteModel::new(cases.insert_note.clone());

        model
            .on_event(AddNoteEvent::TitleChanged("Trip".to_string()))
            .await;
        model
            .on_event(AddNoteEvent::ImagePathChanged(Some("/img/a.jpg".to_string())))
            .await;
        model.on_event(AddNoteEvent::SaveNote).await;

        let state = model.state();
        assert!(state.is_note_saved);
        assert_eq!(state.image_path.as_deref(), Some("/img/a.jpg"));
    }
}
