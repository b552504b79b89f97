//! Domain records served by the content store. These stay plain data holders
//! so the router, the search aggregator and the sections can share them by
//! reference without caring where they were loaded from.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::ShellError;

/// Service slot a schedule assigns songs to. The declaration order is the
/// order columns appear in the schedule table and rows appear on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceSlot {
    Opening,
    Praise,
    Closing,
    Offering,
    Hymn,
}

impl ServiceSlot {
    pub const ALL: [ServiceSlot; 5] = [
        ServiceSlot::Opening,
        ServiceSlot::Praise,
        ServiceSlot::Closing,
        ServiceSlot::Offering,
        ServiceSlot::Hymn,
    ];

    /// Lower-case key used in the database and in search result ids.
    pub fn key(self) -> &'static str {
        match self {
            ServiceSlot::Opening => "opening",
            ServiceSlot::Praise => "praise",
            ServiceSlot::Closing => "closing",
            ServiceSlot::Offering => "offering",
            ServiceSlot::Hymn => "hymn",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceSlot::Opening => "Opening",
            ServiceSlot::Praise => "Praise",
            ServiceSlot::Closing => "Closing",
            ServiceSlot::Offering => "Offering",
            ServiceSlot::Hymn => "Hymn",
        }
    }
}

impl fmt::Display for ServiceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceSlot {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceSlot::ALL
            .into_iter()
            .find(|slot| slot.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShellError::UnknownSlot(s.to_string()))
    }
}

/// One Sunday (or other service day) on the choir rota.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// Calendar day only. The share id is derived from this and the minister.
    pub date: NaiveDate,
    pub minister: String,
    /// Songs per slot in singing order. Slots without songs may be absent.
    pub song_list: BTreeMap<ServiceSlot, Vec<String>>,
    /// Hex colours of the day, never empty once the store accepted the record.
    pub color: Vec<String>,
}

impl Schedule {
    /// Songs for a slot, or an empty slice when the slot has none.
    pub fn songs_for(&self, slot: ServiceSlot) -> &[String] {
        self.song_list.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(slot, title)` pairs in slot order, then singing order.
    pub fn all_songs(&self) -> impl Iterator<Item = (ServiceSlot, &str)> + '_ {
        self.song_list
            .iter()
            .flat_map(|(slot, titles)| titles.iter().map(move |title| (*slot, title.as_str())))
    }

    /// Display form used by both schedule layouts, e.g. `Sun, Mar 2, 2025`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%a, %b %-d, %Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A song in the playlist catalogue.
pub struct Song {
    /// Stable slug such as `count-your-blessings`.
    pub id: String,
    /// Unique across the catalogue, compared case-insensitively.
    pub title: String,
    pub category: BTreeSet<String>,
    pub url: Option<String>,
    pub author: Vec<String>,
    pub lyrics: String,
}

impl Song {
    /// Authors joined for display. Empty when the song has no credited author.
    pub fn author_line(&self) -> String {
        self.author.join(", ")
    }
}

/// A song somebody asked the choir to learn.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRequest {
    pub id: i64,
    pub song_title: String,
    pub requester: String,
    pub date: NaiveDate,
}

/// Blog article.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub date: NaiveDate,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Long display date used on article and request cards, e.g. `May 12, 2025`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_parse_case_insensitively() {
        assert_eq!("Hymn".parse::<ServiceSlot>().unwrap(), ServiceSlot::Hymn);
        assert_eq!(" praise ".parse::<ServiceSlot>().unwrap(), ServiceSlot::Praise);
        assert!("anthem".parse::<ServiceSlot>().is_err());
    }

    #[test]
    fn schedule_date_formats_like_the_table_header() {
        let schedule = Schedule {
            date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            minister: "Sis Josephine".into(),
            song_list: BTreeMap::new(),
            color: vec!["#cccccc".into()],
        };
        assert_eq!(schedule.formatted_date(), "Sun, Mar 2, 2025");
        assert!(schedule.songs_for(ServiceSlot::Opening).is_empty());
    }
}
