//! Embedded database migrations for QuickNote.
//!
//! Migrations are versioned and run automatically when a database is opened.
//! The schema version is tracked in the `_quicknote_meta` table.

/// Current schema version. Increment when adding new migrations.
pub const SCHEMA_VERSION: i64 = 2;

/// Key under which the schema version is stored in `_quicknote_meta`.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// A database migration with version number and SQL statements.
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// All migrations in order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        statements: &[
            "CREATE TABLE IF NOT EXISTS _quicknote_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS notes_table (
                note_id TEXT PRIMARY KEY NOT NULL,
                note_title TEXT NOT NULL,
                note_subtitle TEXT NOT NULL,
                note_description TEXT NOT NULL,
                note_image TEXT,
                note_date INTEGER NOT NULL
            )",
        ],
    },
    Migration {
        version: 2,
        name: "index_note_date",
        statements: &["CREATE INDEX IF NOT EXISTS idx_notes_date ON notes_table(note_date)"],
    },
];

/// Get migrations that need to be applied given the current version.
pub fn get_pending_migrations(current_version: i64) -> Vec<&'static Migration> {
    MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_sequential() {
        for (i, m) in MIGRATIONS.iter().enumerate() {
            assert_eq!(m.version, i as i64 + 1, "migration {} out of order", m.name);
        }
        assert_eq!(MIGRATIONS.last().map(|m| m.version), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_pending_migrations() {
        assert_eq!(get_pending_migrations(0).len(), MIGRATIONS.len());
        let pending = get_pending_migrations(1);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "index_note_date");
        assert!(get_pending_migrations(SCHEMA_VERSION).is_empty());
    }
}
