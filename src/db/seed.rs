use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

use super::{insert_article, insert_request, insert_schedule, insert_song};
use crate::models::{Article, Schedule, ServiceSlot, Song, SongRequest};

/// Populate an empty database with a starter catalogue so a fresh install
/// has something to browse. Returns `true` when rows were written.
pub fn seed_if_empty(conn: &mut Connection) -> Result<bool> {
    let existing: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM schedules) + (SELECT COUNT(*) FROM songs)
                  + (SELECT COUNT(*) FROM requests) + (SELECT COUNT(*) FROM articles)",
            [],
            |row| row.get(0),
        )
        .context("failed to count existing content")?;
    if existing > 0 {
        return Ok(false);
    }

    for schedule in starter_schedules() {
        insert_schedule(conn, &schedule)?;
    }
    for song in starter_songs() {
        insert_song(conn, &song)?;
    }
    for request in starter_requests() {
        insert_request(conn, &request)?;
    }
    for article in starter_articles() {
        insert_article(conn, &article)?;
    }
    info!("seeded empty content database with starter catalogue");
    Ok(true)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Every slot gets the same song, which is how the rota is usually drafted.
fn uniform(title: &str) -> BTreeMap<ServiceSlot, Vec<String>> {
    ServiceSlot::ALL
        .into_iter()
        .map(|slot| (slot, vec![title.to_string()]))
        .collect()
}

fn starter_schedules() -> Vec<Schedule> {
    let rota: [(NaiveDate, &str, &str, &[&str]); 8] = [
        (day(2025, 3, 2), "Sis Josephine", "Count Your Blessings", &["#cccccc"]),
        (day(2025, 3, 9), "Sis Abeena", "How Great Thou Art", &["#cccccc"]),
        (day(2025, 3, 16), "Sis Josephine", "It Is Well With My Soul", &["#cccccc"]),
        (day(2025, 3, 23), "Sis Abeena", "Amazing Grace", &["#4a88f9"]),
        (day(2025, 3, 30), "Sis Abeena", "A Debtor To Mercy Alone", &["#ffffff"]),
        (day(2025, 4, 6), "Dcns Joke", "Great Is Thy Faithfulness", &["#e63946"]),
        (day(2025, 5, 18), "Sis Abeena", "Jesus Keep Me Near The Cross", &["#000000", "#ffffff"]),
        (day(2025, 5, 25), "Sis Josephine", "Sweet Hour Of Prayer", &["#ffffff"]),
    ];

    rota.into_iter()
        .map(|(date, minister, title, colors)| Schedule {
            date,
            minister: minister.to_string(),
            song_list: uniform(title),
            color: colors.iter().map(|c| c.to_string()).collect(),
        })
        .collect()
}

fn song(id: &str, title: &str, categories: &[&str], url: &str, authors: &[&str], lyrics: &str) -> Song {
    Song {
        id: id.to_string(),
        title: title.to_string(),
        category: categories.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
        url: Some(url.to_string()),
        author: authors.iter().map(|a| a.to_string()).collect(),
        lyrics: lyrics.trim().to_string(),
    }
}

fn starter_songs() -> Vec<Song> {
    vec![
        song(
            "count-your-blessings",
            "Count Your Blessings",
            &["Hymn", "Worship", "Thanksgiving"],
            "https://youtu.be/pLtMtaKae-4",
            &["Johnson Oatman Jr.", "Edwin O. Excell"],
            "When upon life's billows you are tempest-tossed,\n\
             When you are discouraged, thinking all is lost,\n\
             Count your many blessings, name them one by one,\n\
             And it will surprise you what the Lord has done.",
        ),
        song(
            "how-great-thou-art",
            "How Great Thou Art",
            &["Hymn", "Worship", "Praise"],
            "https://youtu.be/urI-ZJfUHdM",
            &["Stuart K. Hine"],
            "O Lord my God, when I in awesome wonder\n\
             Consider all the worlds Thy hands have made,\n\
             Then sings my soul, my Savior God, to Thee:\n\
             How great Thou art, how great Thou art!",
        ),
        song(
            "jesus-keep-me-near-the-cross",
            "Jesus Keep Me Near The Cross",
            &["Hymn", "Worship"],
            "https://youtu.be/BPaAopnX_sg",
            &["Fanny Crosby"],
            "Jesus, keep me near the cross,\n\
             There a precious fountain;\n\
             Free to all, a healing stream,\n\
             Flows from Calv'ry's mountain.",
        ),
        song(
            "great-are-you-lord",
            "Great Are You Lord",
            &["Praise", "Worship"],
            "https://youtu.be/0ORTihWykSA",
            &["Sinach"],
            "You are the way maker, miracle worker,\n\
             Great are You Lord.",
        ),
        song(
            "hosanna-in-the-highest",
            "Hosanna In The Highest",
            &["Praise"],
            "https://youtu.be/v_BSwEVcO70",
            &["Israel Houghton"],
            "Hosanna, hosanna,\nHosanna in the highest.",
        ),
    ]
}

fn starter_requests() -> Vec<SongRequest> {
    vec![
        SongRequest {
            id: 0,
            song_title: "The Prayer".to_string(),
            requester: "Maria S.".to_string(),
            date: day(2025, 5, 10),
        },
        SongRequest {
            id: 0,
            song_title: "You Raise Me Up".to_string(),
            requester: "John D.".to_string(),
            date: day(2025, 5, 8),
        },
    ]
}

fn starter_articles() -> Vec<Article> {
    vec![
        Article {
            id: 0,
            title: "Vocal Techniques for Choir Singers".to_string(),
            author: "Elena Martinez".to_string(),
            date: day(2025, 5, 12),
            excerpt: "Improve your singing with these essential techniques that every choir member should know.".to_string(),
            content: "Proper breathing is the foundation of good singing. Start by practicing \
                      diaphragmatic breathing and keep a relaxed, upright posture."
                .to_string(),
            tags: vec!["Technique".into(), "Vocal Training".into(), "Beginner".into()],
        },
        Article {
            id: 0,
            title: "The History of Choral Music".to_string(),
            author: "Dr. Robert Johnson".to_string(),
            date: day(2025, 5, 5),
            excerpt: "Explore the rich history of choral music through the centuries.".to_string(),
            content: "Choral music has a history spanning over a millennium, beginning with \
                      Gregorian chants in medieval monasteries."
                .to_string(),
            tags: vec!["History".into(), "Music Theory".into(), "Education".into()],
        },
        Article {
            id: 0,
            title: "Building Community Through Choir".to_string(),
            author: "Sarah Williams".to_string(),
            date: day(2025, 4, 28),
            excerpt: "How choir participation creates deep social bonds.".to_string(),
            content: "Singing in groups creates strong social bonds between participants."
                .to_string(),
            tags: vec!["Community".into(), "Benefits".into(), "Social".into()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fetch_articles, fetch_requests, fetch_schedules, fetch_songs, open_in_memory};

    #[test]
    fn seeds_once_and_reads_back() {
        let mut conn = open_in_memory().unwrap();
        assert!(seed_if_empty(&mut conn).unwrap());
        assert!(!seed_if_empty(&mut conn).unwrap());

        let schedules = fetch_schedules(&conn).unwrap();
        assert_eq!(schedules.len(), 8);
        assert_eq!(schedules[0].minister, "Sis Josephine");
        assert_eq!(
            schedules[0].songs_for(ServiceSlot::Hymn),
            ["Count Your Blessings".to_string()]
        );
        assert_eq!(schedules[6].color.len(), 2);

        let songs = fetch_songs(&conn).unwrap();
        assert_eq!(songs[0].title, "Count Your Blessings");
        assert_eq!(songs[0].author.len(), 2);

        let requests = fetch_requests(&conn).unwrap();
        assert_eq!(requests[0].song_title, "The Prayer");

        let articles = fetch_articles(&conn).unwrap();
        assert_eq!(articles[0].tags[0], "Technique");
    }
}
