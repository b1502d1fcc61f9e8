//! Shared fixtures for the state holder tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quicknote_core::{Error, Note, NoteRecord, NoteRepository, NoteStore, NoteUseCases};
use quicknote_sqlite::SqliteNoteStore;
use tokio::sync::watch;

/// SQLite store that records searches and can be told to fail or stall.
pub(crate) struct RecordingStore {
    inner: SqliteNoteStore,
    searches: Mutex<Vec<String>>,
    search_delay: Mutex<Duration>,
    search_block: Mutex<Duration>,
    write_delay: Mutex<Duration>,
    fail_searches: AtomicBool,
    fail_writes: AtomicBool,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: SqliteNoteStore::open_in_memory().expect("in-memory database"),
            searches: Mutex::new(Vec::new()),
            search_delay: Mutex::new(Duration::ZERO),
            search_block: Mutex::new(Duration::ZERO),
            write_delay: Mutex::new(Duration::ZERO),
            fail_searches: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Every search text the store has been asked for, in order.
    pub(crate) fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub(crate) fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.lock().unwrap() = delay;
    }

    /// Hold the worker thread inside `search` without yielding, the way a
    /// long SQLite query does.
    pub(crate) fn block_searches_for(&self, block: Duration) {
        *self.search_block.lock().unwrap() = block;
    }

    /// Stall deletes before they reach the database.
    pub(crate) fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = delay;
    }

    pub(crate) fn fail_searches(&self, fail: bool) {
        self.fail_searches.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writes(&self) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database("disk is full".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl NoteStore for RecordingStore {
    async fn list_all(&self) -> Result<Vec<NoteRecord>, Error> {
        self.inner.list_all().await
    }

    async fn get(&self, id: &str) -> Result<Option<NoteRecord>, Error> {
        self.inner.get(id).await
    }

    async fn search(&self, text: &str) -> Result<Vec<NoteRecord>, Error> {
        self.searches.lock().unwrap().push(text.to_string());
        let delay = *self.search_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let block = *self.search_block.lock().unwrap();
        if !block.is_zero() {
            std::thread::sleep(block);
        }
        if self.fail_searches.load(Ordering::SeqCst) {
            return Err(Error::Database("database is locked".into()));
        }
        self.inner.search(text).await
    }

    async fn upsert(&self, record: NoteRecord) -> Result<(), Error> {
        self.check_writes()?;
        self.inner.upsert(record).await
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        let delay = *self.write_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check_writes()?;
        self.inner.delete(id).await
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.subscribe()
    }
}

pub(crate) fn note(id: &str, title: &str, description: &str, date: i64) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: String::new(),
        description: description.to_string(),
        image_path: None,
        date,
    }
}

/// A recording store pre-filled with `notes`, plus use cases over it.
pub(crate) async fn seeded(notes: &[Note]) -> (Arc<RecordingStore>, NoteUseCases) {
    let store = Arc::new(RecordingStore::new());
    for n in notes {
        store.upsert(NoteRecord::from(n.clone())).await.unwrap();
    }
    let use_cases = NoteUseCases::new(NoteRepository::new(store.clone()));
    (store, use_cases)
}

/// Wait until the published state satisfies `pred`, and return it.
pub(crate) async fn wait_for<T, F>(rx: &mut watch::Receiver<T>, pred: F) -> T
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    let state = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(pred))
        .await
        .expect("timed out waiting for state")
        .expect("state channel closed");
    (*state).clone()
}
