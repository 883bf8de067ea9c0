//! SQL DDL for initializing persistent storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema:
/// - `projects`: one row per AR project, `file_ref` names the backing asset
///   (a local filename or a public URL), `external_id` the remote asset key
///   when the object-store backend is active.
/// - `admin`: singleton credential row, PIN stored as a SHA-256 hex digest.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    file_ref TEXT NOT NULL,
    external_id TEXT NULL
);

CREATE TABLE IF NOT EXISTS admin (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    pin_hash TEXT NOT NULL,
    email TEXT NULL
);
"#;
