use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::{format_date, parse_date};
use crate::models::SongRequest;

/// Most recent requests first; ties keep insertion order.
pub fn fetch_requests(conn: &Connection) -> Result<Vec<SongRequest>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, song_title, requester, requested_on
             FROM requests
             ORDER BY requested_on DESC, id",
        )
        .context("failed to prepare request query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .context("failed to iterate requests")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect requests")?;

    rows.into_iter()
        .map(|(id, song_title, requester, raw_date)| {
            Ok(SongRequest {
                id,
                song_title,
                requester,
                date: parse_date(&raw_date)?,
            })
        })
        .collect()
}

/// Insert a request row and echo the stored record.
pub fn insert_request(conn: &Connection, request: &SongRequest) -> Result<SongRequest> {
    conn.execute(
        "INSERT INTO requests (song_title, requester, requested_on) VALUES (?1, ?2, ?3)",
        params![request.song_title, request.requester, format_date(request.date)],
    )
    .context("failed to insert request")?;

    Ok(SongRequest {
        id: conn.last_insert_rowid(),
        ..request.clone()
    })
}
