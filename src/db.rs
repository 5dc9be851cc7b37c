// ==========================================
// spooltrack - SQLite connection init
// ==========================================
// Goals:
// - Unify PRAGMA behavior for every Connection::open (cascade deletes rely on
//   foreign_keys being enabled per connection)
// - Unify busy_timeout to reduce spurious busy errors under concurrent writes
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMA set to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings, so this must run
/// for every connection the process opens.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create all tables if they do not exist yet.
///
/// Idempotent; runs at startup and in test setup. Timestamps are stored as
/// RFC3339 TEXT so lexicographic ordering matches chronological ordering.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS printer (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            model TEXT NOT NULL,
            notes TEXT,
            current_nozzle_id TEXT REFERENCES nozzle(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS nozzle (
            id TEXT PRIMARY KEY,
            size REAL NOT NULL,
            material TEXT NOT NULL,
            condition TEXT NOT NULL,
            notes TEXT,
            printer_id TEXT REFERENCES printer(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS print_model (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            link TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tag (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS model_tag (
            model_id TEXT NOT NULL REFERENCES print_model(id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
            PRIMARY KEY (model_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS filament_spool (
            id TEXT PRIMARY KEY,
            brand TEXT NOT NULL,
            material TEXT NOT NULL,
            color_name TEXT NOT NULL,
            color_hex TEXT NOT NULL,
            diameter REAL NOT NULL,
            total_weight REAL NOT NULL,
            remaining_weight REAL NOT NULL,
            price REAL NOT NULL,
            purchase_date TEXT,
            store TEXT,
            url TEXT,
            opened INTEGER NOT NULL DEFAULT 0,
            opened_date TEXT,
            location TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS filament_usage (
            id TEXT PRIMARY KEY,
            filament_spool_id TEXT NOT NULL REFERENCES filament_spool(id) ON DELETE CASCADE,
            grams_used REAL NOT NULL,
            usage_date TEXT NOT NULL,
            printer_id TEXT REFERENCES printer(id) ON DELETE SET NULL,
            model_id TEXT REFERENCES print_model(id) ON DELETE SET NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_spool_material ON filament_spool(material);
        CREATE INDEX IF NOT EXISTS idx_spool_created ON filament_spool(created_at DESC, id DESC);
        CREATE INDEX IF NOT EXISTS idx_usage_spool ON filament_usage(filament_spool_id);
        "#,
    )?;
    Ok(())
}

/// Open a connection and make sure the schema exists.
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM filament_spool", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
