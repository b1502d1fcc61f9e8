//! SQLite implementation of the QuickNote store trait.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use quicknote_core::{
    get_pending_migrations, record_matches, text_matcher, Error, NoteRecord, NoteStore,
    SCHEMA_VERSION, SCHEMA_VERSION_KEY,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::watch;
use tracing::{debug, info};

const SELECT_NOTES: &str = "SELECT note_id, note_title, note_subtitle, note_description, note_image, note_date
     FROM notes_table";

/// SQLite-backed note store.
pub struct SqliteNoteStore {
    conn: Mutex<Connection>,
    changes: watch::Sender<u64>,
}

impl SqliteNoteStore {
    /// Open a database at the given path and run any pending migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening note database");
        let conn = Connection::open(path).map_err(db_err)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database and run migrations.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, Error> {
        let (changes, _) = watch::channel(0);
        let store = Self {
            conn: Mutex::new(conn),
            changes,
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.conn
            .lock()
            .map_err(|_| Error::Database("connection lock poisoned".into()))
    }

    /// Run any pending database migrations.
    fn run_migrations(&self) -> Result<(), Error> {
        let conn = self.conn()?;

        // Ensure _quicknote_meta exists so the version can be read
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _quicknote_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(db_err)?;

        let current_version: i64 = conn
            .query_row(
                "SELECT value FROM _quicknote_meta WHERE key = ?1",
                params![SCHEMA_VERSION_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(db_err)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        if current_version >= SCHEMA_VERSION {
            return Ok(());
        }

        for migration in get_pending_migrations(current_version) {
            for statement in migration.statements {
                if statement.contains("_quicknote_meta") {
                    continue;
                }
                conn.execute(statement, []).map_err(|e| {
                    Error::Database(format!("Migration {} failed: {}", migration.name, e))
                })?;
            }
            info!(version = migration.version, name = migration.name, "applied migration");
        }

        conn.execute(
            "INSERT OR REPLACE INTO _quicknote_meta (key, value) VALUES (?1, ?2)",
            params![SCHEMA_VERSION_KEY, SCHEMA_VERSION.to_string()],
        )
        .map_err(db_err)?;

        Ok(())
    }

    fn read_record(row: &Row<'_>) -> rusqlite::Result<NoteRecord> {
        Ok(NoteRecord {
            note_id: row.get(0)?,
            note_title: row.get(1)?,
            note_subtitle: row.get(2)?,
            note_description: row.get(3)?,
            note_image: row.get(4)?,
            note_date: row.get(5)?,
        })
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

#[async_trait::async_trait]
impl NoteStore for SqliteNoteStore {
    async fn list_all(&self) -> Result<Vec<NoteRecord>, Error> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "{} ORDER BY note_date DESC, note_id DESC",
                SELECT_NOTES
            ))
            .map_err(db_err)?;

        let records = stmt
            .query_map([], Self::read_record)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;

        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<NoteRecord>, Error> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("{} WHERE note_id = ?1", SELECT_NOTES),
            params![id],
            Self::read_record,
        )
        .optional()
        .map_err(db_err)
    }

    async fn search(&self, text: &str) -> Result<Vec<NoteRecord>, Error> {
        let matcher = text_matcher(text);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(SELECT_NOTES).map_err(db_err)?;

        // SQLite's LIKE only folds ASCII, so matching happens here.
        let all = stmt
            .query_map([], Self::read_record)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;

        let matching: Vec<NoteRecord> = all
            .into_iter()
            .filter(|r| record_matches(r, &matcher))
            .collect();
        debug!(text, hits = matching.len(), "searched notes");
        Ok(matching)
    }

    async fn upsert(&self, record: NoteRecord) -> Result<(), Error> {
        {
            let conn = self.conn()?;
            conn.execute(
                "INSERT OR REPLACE INTO notes_table
                 (note_id, note_title, note_subtitle, note_description, note_image, note_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.note_id,
                    record.note_title,
                    record.note_subtitle,
                    record.note_description,
                    record.note_image,
                    record.note_date,
                ],
            )
            .map_err(db_err)?;
        }
        debug!(id = %record.note_id, "upserted note");
        self.notify();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        let rows = {
            let conn = self.conn()?;
            conn.execute("DELETE FROM notes_table WHERE note_id = ?1", params![id])
                .map_err(db_err)?
        };
        if rows > 0 {
            self.notify();
        }
        Ok(rows > 0)
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
