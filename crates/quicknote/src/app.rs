use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quicknote_core::{NoteRepository, NoteStore, NoteUseCases};
use quicknote_files::ImageStore;
use quicknote_sqlite::SqliteNoteStore;
use tracing::info;

use crate::config::{Config, DEFAULT_SEARCH_DEBOUNCE_MS};
use crate::state::{AddNoteModel, EditNoteModel, NoteListModel};

/// Everything the screens need, wired once at startup.
pub struct App {
    use_cases: NoteUseCases,
    images: ImageStore,
    search_debounce: Duration,
}

impl App {
    /// Open the database and image directory named by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory {}", parent.display())
            })?;
        }

        let store = SqliteNoteStore::open(&config.database_path).with_context(|| {
            format!("Failed to open database {}", config.database_path.display())
        })?;
        let images = ImageStore::open(&config.images_dir).context("Failed to open image storage")?;

        info!(
            database = %config.database_path.display(),
            images = %images.root().display(),
            "quicknote ready"
        );
        Ok(Self::from_store(
            Arc::new(store),
            images,
            config.search_debounce(),
        ))
    }

    /// In-memory database with images under `images_dir`, for previews and tests.
    pub fn in_memory<P: AsRef<Path>>(images_dir: P) -> Result<Self> {
        let store = SqliteNoteStore::open_in_memory().context("Failed to open in-memory database")?;
        let images = ImageStore::open(images_dir).context("Failed to open image storage")?;
        Ok(Self::from_store(
            Arc::new(store),
            images,
            Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        ))
    }

    pub fn from_store(
        store: Arc<dyn NoteStore>,
        images: ImageStore,
        search_debounce: Duration,
    ) -> Self {
        Self {
            use_cases: NoteUseCases::new(NoteRepository::new(store)),
            images,
            search_debounce,
        }
    }

    pub fn use_cases(&self) -> &NoteUseCases {
        &self.use_cases
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Must be called from within a Tokio runtime.
    pub fn note_list(&self) -> NoteListModel {
        NoteListModel::new(self.use_cases.clone(), self.search_debounce)
    }

    pub fn add_note(&self) -> AddNoteModel {
        AddNoteModel::new(self.use_cases.insert_note.clone())
    }

    pub async fn edit_note(&self, note_id: &str) -> EditNoteModel {
        EditNoteModel::open(&self.use_cases, note_id).await
    }
}
