use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Absolute path of an attached image in private storage, if any.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Creation time in epoch milliseconds. Edits keep the original value.
    pub date: i64,
}

/// A note in its persisted shape, one field per column of `notes_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub note_id: String,
    pub note_title: String,
    pub note_subtitle: String,
    pub note_description: String,
    pub note_image: Option<String>,
    pub note_date: i64,
}

/// Whether a title/description pair is worth saving. The subtitle never counts.
pub fn has_content(title: &str, description: &str) -> bool {
    !title.trim().is_empty() || !description.trim().is_empty()
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl Note {
    /// Build a brand new note with a fresh id and the current timestamp.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
        image_path: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            subtitle: subtitle.into(),
            description: description.into(),
            image_path,
            date: now_millis(),
        }
    }

    /// A note with blank title and blank description cannot be saved.
    pub fn is_empty(&self) -> bool {
        !has_content(&self.title, &self.description)
    }

    /// The creation date as shown in lists, e.g. `Mar 05, 2024`.
    pub fn display_date(&self) -> String {
        Local
            .timestamp_millis_opt(self.date)
            .single()
            .map(|dt| dt.format("%b %d, %Y").to_string())
            .unwrap_or_default()
    }
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.note_id,
            title: record.note_title,
            subtitle: record.note_subtitle,
            description: record.note_description,
            image_path: record.note_image,
            date: record.note_date,
        }
    }
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        Self {
            note_id: note.id,
            note_title: note.title,
            note_subtitle: note.subtitle,
            note_description: note.description,
            note_image: note.image_path,
            note_date: note.date,
        }
    }
}
