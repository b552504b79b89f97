use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".eazychoir";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "content.sqlite";

const SCHEMA: &[(&str, &str)] = &[
    (
        "schedules",
        "CREATE TABLE IF NOT EXISTS schedules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            service_date TEXT NOT NULL,
            minister TEXT NOT NULL
        )",
    ),
    (
        "schedule_songs",
        "CREATE TABLE IF NOT EXISTS schedule_songs (
            schedule_id INTEGER NOT NULL,
            slot TEXT NOT NULL,
            position INTEGER NOT NULL,
            title TEXT NOT NULL,
            PRIMARY KEY (schedule_id, slot, position),
            FOREIGN KEY(schedule_id) REFERENCES schedules(id) ON DELETE CASCADE
        )",
    ),
    (
        "schedule_colors",
        "CREATE TABLE IF NOT EXISTS schedule_colors (
            schedule_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            hex TEXT NOT NULL,
            PRIMARY KEY (schedule_id, position),
            FOREIGN KEY(schedule_id) REFERENCES schedules(id) ON DELETE CASCADE
        )",
    ),
    (
        "songs",
        "CREATE TABLE IF NOT EXISTS songs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            url TEXT,
            lyrics TEXT NOT NULL DEFAULT ''
        )",
    ),
    (
        "song_categories",
        "CREATE TABLE IF NOT EXISTS song_categories (
            song_id TEXT NOT NULL,
            category TEXT NOT NULL,
            PRIMARY KEY (song_id, category),
            FOREIGN KEY(song_id) REFERENCES songs(id) ON DELETE CASCADE
        )",
    ),
    (
        "song_authors",
        "CREATE TABLE IF NOT EXISTS song_authors (
            song_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            PRIMARY KEY (song_id, position),
            FOREIGN KEY(song_id) REFERENCES songs(id) ON DELETE CASCADE
        )",
    ),
    (
        "requests",
        "CREATE TABLE IF NOT EXISTS requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            song_title TEXT NOT NULL,
            requester TEXT NOT NULL,
            requested_on TEXT NOT NULL
        )",
    ),
    (
        "articles",
        "CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            published_on TEXT NOT NULL,
            excerpt TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT ''
        )",
    ),
    (
        "article_tags",
        "CREATE TABLE IF NOT EXISTS article_tags (
            article_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            tag TEXT NOT NULL,
            PRIMARY KEY (article_id, position),
            FOREIGN KEY(article_id) REFERENCES articles(id) ON DELETE CASCADE
        )",
    ),
];

/// Open (creating if needed) the content database and run lazy migrations.
/// `PRAGMA foreign_keys = ON` keeps the child tables consistent with their
/// parents in tests and production alike.
pub fn ensure_schema(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema, used by tests and `--db :memory:`.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    for (table, ddl) in SCHEMA {
        conn.execute(ddl, [])
            .with_context(|| format!("failed to create {table} table"))?;
    }
    Ok(())
}

/// `~/.eazychoir`, home of the content database, the config file and the log.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Resolve the absolute path to the content database inside the data dir.
pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILE_NAME))
}
