//! In-memory note store, used for previews and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::watch;

use crate::store::{record_matches, text_matcher};
use crate::{Error, NoteRecord, NoteStore};

/// A [`NoteStore`] that keeps records in a map and forgets them on drop.
pub struct MemoryNoteStore {
    records: RwLock<HashMap<String, NoteRecord>>,
    changes: watch::Sender<u64>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            records: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn poisoned() -> Error {
        Error::Internal("memory store lock poisoned".into())
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list_all(&self) -> Result<Vec<NoteRecord>, Error> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<NoteRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| {
            b.note_date
                .cmp(&a.note_date)
                .then_with(|| b.note_id.cmp(&a.note_id))
        });
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Option<NoteRecord>, Error> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.get(id).cloned())
    }

    async fn search(&self, text: &str) -> Result<Vec<NoteRecord>, Error> {
        let matcher = text_matcher(text);
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records
            .values()
            .filter(|r| record_matches(r, &matcher))
            .cloned()
            .collect())
    }

    async fn upsert(&self, record: NoteRecord) -> Result<(), Error> {
        {
            let mut records = self.records.write().map_err(|_| Self::poisoned())?;
            records.insert(record.note_id.clone(), record);
        }
        self.notify();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        let removed = {
            let mut records = self.records.write().map_err(|_| Self::poisoned())?;
            records.remove(id).is_some()
        };
        if removed {
            self.notify();
        }
        Ok(removed)
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, date: i64) -> NoteRecord {
        NoteRecord {
            note_id: id.to_string(),
            note_title: title.to_string(),
            note_subtitle: String::new(),
            note_description: String::new(),
            note_image: None,
            note_date: date,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryNoteStore::new();
        store.upsert(record("a", "first", 1)).await.unwrap();
        store.upsert(record("a", "second", 1)).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].note_title, "second");
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = MemoryNoteStore::new();
        store.upsert(record("old", "old", 10)).await.unwrap();
        store.upsert(record("new", "new", 30)).await.unwrap();
        store.upsert(record("mid", "mid", 20)).await.unwrap();

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.note_id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_writes_bump_subscription() {
        let store = MemoryNoteStore::new();
        let mut rx = store.subscribe();

        store.upsert(record("a", "a", 1)).await.unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        // Deleting a missing id is not a change.
        assert!(!store.delete("missing").await.unwrap());
        assert!(!rx.has_changed().unwrap());

        assert!(store.delete("a").await.unwrap());
        assert!(rx.has_changed().unwrap());
    }
}
