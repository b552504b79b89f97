use std::collections::BTreeSet;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::Song;

/// Fetch the playlist catalogue ordered case-insensitively by title so
/// mixed-case titles group together.
pub fn fetch_songs(conn: &Connection) -> Result<Vec<Song>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, url, lyrics
             FROM songs
             ORDER BY title COLLATE NOCASE, id",
        )
        .context("failed to prepare songs query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .context("failed to iterate songs")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect songs")?;

    let mut songs = Vec::with_capacity(rows.len());
    for (id, title, url, lyrics) in rows {
        let category = fetch_categories(conn, &id)?;
        let author = fetch_authors(conn, &id)?;
        songs.push(Song {
            url: url.filter(|link| !link.trim().is_empty()),
            id,
            title,
            category,
            author,
            lyrics,
        });
    }
    Ok(songs)
}

fn fetch_categories(conn: &Connection, song_id: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare("SELECT category FROM song_categories WHERE song_id = ?1")
        .context("failed to prepare song category query")?;
    let categories = stmt
        .query_map([song_id], |row| row.get(0))
        .context("failed to iterate song categories")?
        .collect::<Result<BTreeSet<String>, _>>()
        .context("failed to collect song categories")?;
    Ok(categories)
}

fn fetch_authors(conn: &Connection, song_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM song_authors WHERE song_id = ?1 ORDER BY position")
        .context("failed to prepare song author query")?;
    let authors = stmt
        .query_map([song_id], |row| row.get(0))
        .context("failed to iterate song authors")?
        .collect::<Result<Vec<String>, _>>()
        .context("failed to collect song authors")?;
    Ok(authors)
}

/// Insert a song with its categories and authors.
pub fn insert_song(conn: &mut Connection, song: &Song) -> Result<()> {
    let tx = conn.transaction().context("failed to start song insert")?;
    tx.execute(
        "INSERT INTO songs (id, title, url, lyrics) VALUES (?1, ?2, ?3, ?4)",
        params![song.id, song.title, song.url, song.lyrics],
    )
    .context("failed to insert song")?;

    for category in &song.category {
        tx.execute(
            "INSERT OR IGNORE INTO song_categories (song_id, category) VALUES (?1, ?2)",
            params![song.id, category],
        )
        .context("failed to insert song category")?;
    }

    for (position, name) in song.author.iter().enumerate() {
        tx.execute(
            "INSERT INTO song_authors (song_id, position, name) VALUES (?1, ?2, ?3)",
            params![song.id, position as i64, name],
        )
        .context("failed to insert song author")?;
    }

    tx.commit().context("failed to commit song insert")?;
    Ok(())
}
