use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::{format_date, parse_date};
use crate::models::{Schedule, ServiceSlot};

/// Load every schedule with its songs and colours. Rows come back in
/// insertion order; sorting by date is the section's concern.
pub fn fetch_schedules(conn: &Connection) -> Result<Vec<Schedule>> {
    let mut stmt = conn
        .prepare("SELECT id, service_date, minister FROM schedules ORDER BY id")
        .context("failed to prepare schedule query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .context("failed to iterate schedules")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect schedules")?;

    let mut schedules = Vec::with_capacity(rows.len());
    for (id, raw_date, minister) in rows {
        schedules.push(Schedule {
            date: parse_date(&raw_date)?,
            minister,
            song_list: fetch_song_list(conn, id)?,
            color: fetch_colors(conn, id)?,
        });
    }
    Ok(schedules)
}

fn fetch_song_list(conn: &Connection, schedule_id: i64) -> Result<BTreeMap<ServiceSlot, Vec<String>>> {
    let mut stmt = conn
        .prepare(
            "SELECT slot, title FROM schedule_songs
             WHERE schedule_id = ?1
             ORDER BY slot, position",
        )
        .context("failed to prepare schedule songs query")?;

    let rows = stmt
        .query_map([schedule_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to iterate schedule songs")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect schedule songs")?;

    let mut song_list: BTreeMap<ServiceSlot, Vec<String>> = BTreeMap::new();
    for (slot, title) in rows {
        let slot: ServiceSlot = slot.parse()?;
        song_list.entry(slot).or_default().push(title);
    }
    Ok(song_list)
}

fn fetch_colors(conn: &Connection, schedule_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT hex FROM schedule_colors WHERE schedule_id = ?1 ORDER BY position")
        .context("failed to prepare schedule colour query")?;

    let colors = stmt
        .query_map([schedule_id], |row| row.get(0))
        .context("failed to iterate schedule colours")?
        .collect::<Result<Vec<String>, _>>()
        .context("failed to collect schedule colours")?;
    Ok(colors)
}

/// Insert a schedule with its songs and colours in one transaction.
pub fn insert_schedule(conn: &mut Connection, schedule: &Schedule) -> Result<i64> {
    let tx = conn.transaction().context("failed to start schedule insert")?;
    tx.execute(
        "INSERT INTO schedules (service_date, minister) VALUES (?1, ?2)",
        params![format_date(schedule.date), schedule.minister],
    )
    .context("failed to insert schedule")?;
    let id = tx.last_insert_rowid();

    for (slot, titles) in &schedule.song_list {
        for (position, title) in titles.iter().enumerate() {
            tx.execute(
                "INSERT INTO schedule_songs (schedule_id, slot, position, title)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, slot.key(), position as i64, title],
            )
            .context("failed to insert schedule song")?;
        }
    }

    for (position, hex) in schedule.color.iter().enumerate() {
        tx.execute(
            "INSERT INTO schedule_colors (schedule_id, position, hex) VALUES (?1, ?2, ?3)",
            params![id, position as i64, hex],
        )
        .context("failed to insert schedule colour")?;
    }

    tx.commit().context("failed to commit schedule insert")?;
    Ok(id)
}
