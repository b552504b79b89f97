//! Deep-link codec for schedule entries.
//!
//! A schedule has no stored key: its id is recomputed from the calendar day
//! and the minister every time it is needed. Share links, incoming `?schedule=`
//! parameters and the highlight lookup all go through [`schedule_id`] so
//! generation and matching can never drift apart.

use std::collections::HashMap;
use std::fmt;

use url::Url;

use crate::error::ShellError;
use crate::models::Schedule;

/// Query parameter carrying a schedule id in share links.
pub const SCHEDULE_PARAM: &str = "schedule";
const ID_PREFIX: &str = "schedule-";

/// Derived identity of a schedule entry, e.g.
/// `schedule-2025-03-02-sis-josephine`. Two schedules on the same day with the
/// same minister share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(String);

impl ScheduleId {
    /// Accept an id coming from outside (a query parameter or a history
    /// entry). Blank values are treated as absent.
    pub fn from_param(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(ScheduleId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the id of a schedule from its date and minister.
pub fn schedule_id(schedule: &Schedule) -> ScheduleId {
    ScheduleId(format!(
        "{ID_PREFIX}{}-{}",
        schedule.date.format("%Y-%m-%d"),
        minister_slug(&schedule.minister)
    ))
}

/// Lower-case the name and collapse every run of characters outside
/// `[a-z0-9]` into a single `-`. Leading and trailing separators are dropped.
pub fn minister_slug(minister: &str) -> String {
    let mut slug = String::with_capacity(minister.len());
    let mut pending_separator = false;
    for ch in minister.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Find the entry whose computed id equals `id` in an already sorted list.
pub fn resolve_highlight(id: &ScheduleId, sorted_schedules: &[&Schedule]) -> Option<usize> {
    sorted_schedules
        .iter()
        .position(|schedule| &schedule_id(schedule) == id)
}

/// Handle of one rendered schedule entry. Schedules deriving the same
/// [`ScheduleId`] are told apart by their occurrence in sorted order: the
/// first keeps the bare id, later ones get `#2`, `#3`...
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn new(id: &ScheduleId, occurrence: usize) -> Self {
        if occurrence <= 1 {
            EntryKey(id.as_str().to_string())
        } else {
            EntryKey(format!("{id}#{occurrence}"))
        }
    }
}

impl From<&ScheduleId> for EntryKey {
    fn from(id: &ScheduleId) -> Self {
        EntryKey::new(id, 1)
    }
}

impl From<ScheduleId> for EntryKey {
    fn from(id: ScheduleId) -> Self {
        EntryKey(id.0)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id and entry key of every schedule, in the order given.
pub fn entry_keys(sorted_schedules: &[&Schedule]) -> Vec<(ScheduleId, EntryKey)> {
    let mut seen: HashMap<ScheduleId, usize> = HashMap::new();
    sorted_schedules
        .iter()
        .map(|schedule| {
            let id = schedule_id(schedule);
            let occurrence = seen.entry(id.clone()).or_insert(0);
            *occurrence += 1;
            let key = EntryKey::new(&id, *occurrence);
            (id, key)
        })
        .collect()
}

/// Where the shell is "served" from: the origin and path share links are
/// built on, plus whatever query the shell was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parse a full URL such as `https://eazychoir.app/?schedule=...`.
    pub fn parse(raw: &str) -> Result<Self, ShellError> {
        let url = Url::parse(raw.trim()).map_err(|err| ShellError::InvalidLocation {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ShellError::InvalidLocation {
                url: raw.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(Self { url })
    }

    /// Build the base location from configured origin and path.
    pub fn from_parts(origin: &str, path: &str) -> Result<Self, ShellError> {
        let mut location = Self::parse(origin)?;
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        location.url.set_path(&path);
        location.url.set_query(None);
        location.url.set_fragment(None);
        Ok(location)
    }

    /// The same origin and path with the query and fragment removed.
    pub fn base(&self) -> Location {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        Location { url }
    }

    /// Schedule id carried in the query string, if any.
    pub fn schedule_param(&self) -> Option<ScheduleId> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == SCHEDULE_PARAM)
            .and_then(|(_, value)| ScheduleId::from_param(&value))
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Origin + path + `?schedule=<id>`. Any query already on `base` is replaced.
pub fn encode_share_url(base: &Location, id: &ScheduleId) -> String {
    let mut url = base.url.clone();
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair(SCHEDULE_PARAM, id.as_str());
    url.to_string()
}

/// Inverse of [`encode_share_url`]: pull the schedule id back out of a link.
pub fn decode_share_url(raw: &str) -> Result<Option<ScheduleId>, ShellError> {
    Location::parse(raw).map(|location| location.schedule_param())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;

    fn schedule(y: i32, m: u32, d: u32, minister: &str) -> Schedule {
        Schedule {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            minister: minister.to_string(),
            song_list: BTreeMap::new(),
            color: vec!["#cccccc".to_string()],
        }
    }

    #[test]
    fn id_uses_calendar_day_and_slug() {
        let id = schedule_id(&schedule(2025, 3, 2, "Sis Josephine"));
        assert_eq!(id.as_str(), "schedule-2025-03-02-sis-josephine");
        assert_eq!(id, schedule_id(&schedule(2025, 3, 2, "Sis Josephine")));
    }

    #[test]
    fn colliding_ids_get_distinct_entry_keys() {
        let first = schedule(2025, 3, 2, "Sis Josephine");
        let second = schedule(2025, 3, 2, "Sis. Josephine");
        let other = schedule(2025, 3, 9, "Sis Abeena");
        let keys: Vec<String> = entry_keys(&[&first, &other, &second])
            .into_iter()
            .map(|(_, key)| key.to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "schedule-2025-03-02-sis-josephine",
                "schedule-2025-03-09-sis-abeena",
                "schedule-2025-03-02-sis-josephine#2",
            ]
        );
        assert_eq!(
            EntryKey::from(&schedule_id(&first)),
            EntryKey::new(&schedule_id(&second), 1)
        );
    }

    #[test]
    fn slug_collapses_punctuation_runs() {
        assert_eq!(minister_slug("Dcns. Joke"), "dcns-joke");
        assert_eq!(minister_slug("  Bro  O'Neil--Smith "), "bro-o-neil-smith");
        assert_eq!(minister_slug("Rev. Dr."), "rev-dr");
    }

    #[test]
    fn same_day_and_minister_collide() {
        let a = schedule(2025, 4, 6, "Dcns Joke");
        let mut b = a.clone();
        b.color = vec!["#e63946".to_string()];
        assert_eq!(schedule_id(&a), schedule_id(&b));
    }

    #[test]
    fn share_url_round_trips() {
        let base = Location::from_parts("https://eazychoir.app", "/choir/").unwrap();
        let id = schedule_id(&schedule(2025, 3, 23, "Sis Abeena"));
        let url = encode_share_url(&base, &id);
        assert_eq!(
            url,
            "https://eazychoir.app/choir/?schedule=schedule-2025-03-23-sis-abeena"
        );
        assert_eq!(decode_share_url(&url).unwrap(), Some(id));
    }

    #[test]
    fn share_url_replaces_existing_query() {
        let base = Location::parse("https://eazychoir.app/?schedule=old#top").unwrap();
        let id = ScheduleId::from_param("schedule-2025-03-09-sis-abeena").unwrap();
        assert_eq!(
            encode_share_url(&base, &id),
            "https://eazychoir.app/?schedule=schedule-2025-03-09-sis-abeena"
        );
    }

    #[test]
    fn blank_and_missing_params_decode_to_none() {
        assert_eq!(decode_share_url("https://eazychoir.app/").unwrap(), None);
        assert_eq!(
            decode_share_url("https://eazychoir.app/?schedule=%20").unwrap(),
            None
        );
        assert!(decode_share_url("not a url").is_err());
    }

    #[test]
    fn resolve_highlight_finds_matching_entry() {
        let entries = [
            schedule(2025, 3, 2, "Sis Josephine"),
            schedule(2025, 3, 9, "Sis Abeena"),
        ];
        let sorted: Vec<&Schedule> = entries.iter().collect();
        let id = ScheduleId::from_param("schedule-2025-03-09-sis-abeena").unwrap();
        assert_eq!(resolve_highlight(&id, &sorted), Some(1));
        let missing = ScheduleId::from_param("schedule-2030-01-01-nobody").unwrap();
        assert_eq!(resolve_highlight(&missing, &sorted), None);
    }
}
