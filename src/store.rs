//! Read-only content collections shared by every section.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{fetch_articles, fetch_requests, fetch_schedules, fetch_songs};
use crate::error::ShellError;
use crate::models::{Article, Schedule, Song, SongRequest};

/// The four collections behind the site. Validation happens once, on
/// construction, so lookups can assume the invariants hold.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    schedules: Vec<Schedule>,
    songs: Vec<Song>,
    requests: Vec<SongRequest>,
    articles: Vec<Article>,
}

impl ContentStore {
    /// Build a store from already loaded records.
    ///
    /// Rejects schedules without colours and songs whose titles collide
    /// case-insensitively, since title lookup has to be unambiguous.
    pub fn new(
        schedules: Vec<Schedule>,
        songs: Vec<Song>,
        requests: Vec<SongRequest>,
        articles: Vec<Article>,
    ) -> Result<Self, ShellError> {
        if let Some(schedule) = schedules.iter().find(|s| s.color.is_empty()) {
            return Err(ShellError::EmptyColorList {
                minister: schedule.minister.clone(),
                date: schedule.date.to_string(),
            });
        }

        let mut titles = HashSet::with_capacity(songs.len());
        for song in &songs {
            if !titles.insert(song.title.trim().to_lowercase()) {
                return Err(ShellError::DuplicateSongTitle(song.title.clone()));
            }
        }

        Ok(Self {
            schedules,
            songs,
            requests,
            articles,
        })
    }

    /// Load every collection from the content database.
    pub fn load(conn: &Connection) -> Result<Self> {
        let schedules = fetch_schedules(conn)?;
        let songs = fetch_songs(conn)?;
        let requests = fetch_requests(conn)?;
        let articles = fetch_articles(conn)?;
        Self::new(schedules, songs, requests, articles).context("content database failed validation")
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn requests(&self) -> &[SongRequest] {
        &self.requests
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Record a request made during the session. It takes the next free id
    /// and is listed before the loaded ones.
    pub fn add_request(&mut self, song_title: &str, requester: &str, date: NaiveDate) -> &SongRequest {
        let id = self.requests.iter().map(|request| request.id).max().unwrap_or(0) + 1;
        self.requests.insert(
            0,
            SongRequest {
                id,
                song_title: song_title.to_string(),
                requester: requester.to_string(),
                date,
            },
        );
        &self.requests[0]
    }

    /// Schedules in date order. The sort is stable, so entries sharing a day
    /// keep their stored order in both layouts.
    pub fn sorted_schedules(&self) -> Vec<&Schedule> {
        let mut sorted: Vec<&Schedule> = self.schedules.iter().collect();
        sorted.sort_by_key(|schedule| schedule.date);
        sorted
    }

    pub fn song_by_id(&self, id: &str) -> Result<&Song, ShellError> {
        self.songs
            .iter()
            .find(|song| song.id == id)
            .ok_or_else(|| ShellError::lookup_miss("Song", id))
    }

    /// Case-insensitive title lookup; unique by construction.
    pub fn song_by_title(&self, title: &str) -> Result<&Song, ShellError> {
        let needle = title.trim().to_lowercase();
        self.songs
            .iter()
            .find(|song| song.title.trim().to_lowercase() == needle)
            .ok_or_else(|| ShellError::lookup_miss("Song", title))
    }

    pub fn article_by_id(&self, id: i64) -> Result<&Article, ShellError> {
        self.articles
            .iter()
            .find(|article| article.id == id)
            .ok_or_else(|| ShellError::lookup_miss("Article", id.to_string()))
    }

    /// Every song category, sorted, for the playlist filter bar.
    pub fn song_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .songs
            .iter()
            .flat_map(|song| song.category.iter().cloned())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Every article tag in first-seen order, for the blog filter bar.
    pub fn article_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.articles
            .iter()
            .flat_map(|article| article.tags.iter())
            .filter(|tag| seen.insert(tag.as_str()))
            .cloned()
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::ServiceSlot;

    #[test]
    fn rejects_duplicate_titles_ignoring_case() {
        let songs = vec![
            song("a", "Amazing Grace", &[], ""),
            song("b", "amazing grace ", &[], ""),
        ];
        let err = ContentStore::new(Vec::new(), songs, Vec::new(), Vec::new()).unwrap_err();
        assert_eq!(err, ShellError::DuplicateSongTitle("amazing grace ".to_string()));
    }

    #[test]
    fn rejects_colourless_schedule() {
        let mut entry = schedule((2025, 3, 2), "Sis Josephine", &[]);
        entry.color.clear();
        assert!(matches!(
            ContentStore::new(vec![entry], Vec::new(), Vec::new(), Vec::new()),
            Err(ShellError::EmptyColorList { .. })
        ));
    }

    #[test]
    fn lookups_report_misses() {
        let store = ContentStore::new(
            vec![schedule((2025, 3, 9), "Sis Abeena", &[(ServiceSlot::Hymn, "Amazing Grace")])],
            vec![song("amazing-grace", "Amazing Grace", &["John Newton"], "")],
            Vec::new(),
            vec![article(1, "Breathing", "Elena", "")],
        )
        .unwrap();

        assert_eq!(store.song_by_title("AMAZING GRACE").unwrap().id, "amazing-grace");
        assert!(matches!(
            store.song_by_id("missing"),
            Err(ShellError::LookupMiss { kind: "Song", .. })
        ));
        assert!(store.article_by_id(2).is_err());
    }

    #[test]
    fn sorted_schedules_are_date_ordered() {
        let store = ContentStore::new(
            vec![
                schedule((2025, 4, 6), "Dcns Joke", &[]),
                schedule((2025, 3, 2), "Sis Josephine", &[]),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let sorted = store.sorted_schedules();
        assert_eq!(sorted[0].minister, "Sis Josephine");
        assert_eq!(sorted[1].minister, "Dcns Joke");
    }
}
