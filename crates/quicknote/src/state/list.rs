use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use quicknote_core::{Note, NoteUseCases};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct NoteListState {
    /// Every note, newest first.
    pub notes: Vec<Note>,
    /// What the list shows: `notes`, or the latest search results.
    pub filtered_notes: Vec<Note>,
    pub search_text: String,
    pub is_loading: bool,
    pub is_searching: bool,
}

impl Default for NoteListState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            filtered_notes: Vec::new(),
            search_text: String::new(),
            is_loading: true,
            is_searching: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum NoteListEvent {
    LoadNotes,
    DeleteNote(Note),
    SearchNotes(String),
    ClearSearch,
}

/// State holder for the note list screen.
///
/// Follows the live note feed for as long as it is alive and runs searches
/// after the typed text has been stable for the debounce window. At most one
/// search task exists at a time; starting a new one aborts the previous.
/// Each search is tagged with a generation and only writes state while it is
/// still the latest, so a superseded search that is already running on
/// another worker cannot land its results either.
///
/// Must be created inside a Tokio runtime. Dropping it aborts its tasks,
/// including deletes that have not finished yet.
pub struct NoteListModel {
    state: Arc<watch::Sender<NoteListState>>,
    use_cases: NoteUseCases,
    debounce: Duration,
    search_generation: Arc<AtomicU64>,
    feed_task: Option<JoinHandle<()>>,
    search_task: Option<JoinHandle<()>>,
    delete_tasks: Vec<JoinHandle<()>>,
}

impl NoteListModel {
    pub fn new(use_cases: NoteUseCases, debounce: Duration) -> Self {
        let (state, _) = watch::channel(NoteListState::default());
        let mut model = Self {
            state: Arc::new(state),
            use_cases,
            debounce,
            search_generation: Arc::new(AtomicU64::new(0)),
            feed_task: None,
            search_task: None,
            delete_tasks: Vec::new(),
        };
        model.reload();
        model
    }

    pub fn subscribe(&self) -> watch::Receiver<NoteListState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> NoteListState {
        self.state.borrow().clone()
    }

    pub fn on_event(&mut self, event: NoteListEvent) {
        match event {
            NoteListEvent::LoadNotes => self.reload(),
            NoteListEvent::DeleteNote(note) => self.delete(note),
            NoteListEvent::SearchNotes(text) => self.search(text),
            NoteListEvent::ClearSearch => self.clear_search(),
        }
    }

    /// (Re)subscribe to the live note feed.
    ///
    /// Each emission replaces `notes`. `filtered_notes` follows only while the
    /// search text is blank; an active filter keeps showing its last results
    /// until the search is edited or cleared.
    pub fn reload(&mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }

        let state = Arc::clone(&self.state);
        let mut feed = self.use_cases.get_all_notes.call();
        self.feed_task = Some(tokio::spawn(async move {
            while let Some(result) = feed.next().await {
                match result {
                    Ok(notes) => state.send_modify(|s| {
                        if s.search_text.trim().is_empty() {
                            s.filtered_notes = notes.clone();
                        }
                        s.notes = notes;
                        s.is_loading = false;
                    }),
                    Err(e) => {
                        warn!(error = %e, "failed to load notes");
                        state.send_modify(|s| s.is_loading = false);
                    }
                }
            }
        }));
    }

    /// Record the search text now and run the search once typing settles.
    pub fn search(&mut self, text: impl Into<String>) {
        let text = text.into();
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.search_text = text.clone());

        if let Some(task) = self.search_task.take() {
            task.abort();
        }

        let search = self.use_cases.search_notes.clone();
        let debounce = self.debounce;
        let apply = CurrentSearch {
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.search_generation),
            mine: generation,
        };
        self.search_task = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            if text.trim().is_empty() {
                apply.update(|s| {
                    s.filtered_notes = s.notes.clone();
                    s.is_searching = false;
                });
                return;
            }

            if !apply.update(|s| s.is_searching = true) {
                return;
            }
            match search.call(&text).await {
                Ok(mut results) => {
                    results.sort_by(|a, b| b.date.cmp(&a.date));
                    debug!(text = %text, hits = results.len(), "search finished");
                    if !apply.update(|s| {
                        s.filtered_notes = results;
                        s.is_searching = false;
                    }) {
                        debug!(text = %text, "discarding superseded search");
                    }
                }
                Err(e) => {
                    warn!(text = %text, error = %e, "search failed");
                    apply.update(|s| {
                        s.filtered_notes = Vec::new();
                        s.is_searching = false;
                    });
                }
            }
        }));
    }

    /// Drop the search and show every note again, without waiting.
    pub fn clear_search(&mut self) {
        self.search_generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        self.state.send_modify(|s| {
            s.search_text.clear();
            s.filtered_notes = s.notes.clone();
            s.is_searching = false;
        });
    }

    /// Delete in the background. The list refreshes through the live feed.
    pub fn delete(&mut self, note: Note) {
        self.delete_tasks.retain(|task| !task.is_finished());

        let delete = self.use_cases.delete_note.clone();
        self.delete_tasks.push(tokio::spawn(async move {
            if let Err(e) = delete.call(&note).await {
                warn!(id = %note.id, error = %e, "failed to delete note");
            }
        }));
    }
}

/// Writes from one search task, applied only while its generation is the
/// newest. The check runs under the channel's write lock, and `search` and
/// `clear_search` bump the generation before they publish.
struct CurrentSearch {
    state: Arc<watch::Sender<NoteListState>>,
    generation: Arc<AtomicU64>,
    mine: u64,
}

impl CurrentSearch {
    fn update(&self, modify: impl FnOnce(&mut NoteListState)) -> bool {
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != self.mine {
                return false;
            }
            modify(s);
            true
        })
    }
}

impl Drop for NoteListModel {
    fn drop(&mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        for task in self.delete_tasks.drain(..) {
            task.abort();
        }
    }
}
