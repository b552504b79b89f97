//! Cross-section search.
//!
//! A query runs against all four collections at once. The section with the
//! strictly largest number of hits wins; any tie at the top goes to the
//! playlist. The router turns the [`RoutingDecision`] into exactly one
//! navigation (or none, with a notification).

use std::time::{Duration, Instant};

use tracing::debug;

use crate::codec::{schedule_id, ScheduleId};
use crate::models::ServiceSlot;
use crate::sections::SectionName;
use crate::store::ContentStore;

/// Characters kept from lyrics/article bodies in a result snippet.
const SNIPPET_CHARS: usize = 50;
/// Section used when the top count is shared.
pub const TIE_BREAK_SECTION: SectionName = SectionName::Playlist;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Minister,
    Song,
    Lyrics,
    Author,
    Request,
    Requester,
    Article,
    Content,
    BlogAuthor,
}

/// Back-reference to the record a result came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Schedule {
        id: ScheduleId,
        slot: Option<ServiceSlot>,
    },
    Song(String),
    Request(i64),
    Article(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub kind: ResultKind,
    pub text: String,
    pub id: String,
    pub source: SourceRef,
}

/// Results of one query, grouped per searchable section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub term: String,
    pub schedule: Vec<SearchResult>,
    pub playlist: Vec<SearchResult>,
    pub request: Vec<SearchResult>,
    pub blog: Vec<SearchResult>,
}

impl SearchOutcome {
    pub fn counts(&self) -> [(SectionName, usize); 4] {
        [
            (SectionName::Schedule, self.schedule.len()),
            (SectionName::Playlist, self.playlist.len()),
            (SectionName::Request, self.request.len()),
            (SectionName::Blog, self.blog.len()),
        ]
    }

    pub fn total(&self) -> usize {
        self.counts().iter().map(|(_, count)| count).sum()
    }

    /// Move one section's results out of the outcome.
    pub fn take(&mut self, section: SectionName) -> Vec<SearchResult> {
        match section {
            SectionName::Schedule => std::mem::take(&mut self.schedule),
            SectionName::Playlist => std::mem::take(&mut self.playlist),
            SectionName::Request => std::mem::take(&mut self.request),
            SectionName::Blog => std::mem::take(&mut self.blog),
            SectionName::Home => Vec::new(),
        }
    }
}

/// What the router should do with a query.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    /// Blank input; nothing happens at all.
    Ignored,
    /// Nothing matched. `query` is the text as typed, for the message.
    NoResults { query: String },
    Route {
        section: SectionName,
        /// Lower-cased term handed to the section.
        term: String,
        results: Vec<SearchResult>,
        /// Hits across every section, for the summary message.
        total: usize,
        query: String,
    },
}

/// Lower-case a query; `None` for empty or whitespace-only input.
pub fn normalize(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Search every collection with an already normalized term.
pub fn search_all(store: &ContentStore, term: &str) -> SearchOutcome {
    SearchOutcome {
        term: term.to_string(),
        schedule: search_schedules(store, term),
        playlist: search_songs(store, term),
        request: search_requests(store, term),
        blog: search_articles(store, term),
    }
}

/// Strictly greatest count wins, shared maxima go to [`TIE_BREAK_SECTION`],
/// and all-zero yields `None`.
pub fn choose_section(counts: &[(SectionName, usize)]) -> Option<SectionName> {
    let max = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);
    if max == 0 {
        return None;
    }
    let mut leaders = counts.iter().filter(|(_, count)| *count == max);
    match (leaders.next(), leaders.next()) {
        (Some((section, _)), None) => Some(*section),
        _ => Some(TIE_BREAK_SECTION),
    }
}

/// Full pipeline: normalize, search, rank.
pub fn search(store: &ContentStore, query: &str) -> RoutingDecision {
    let Some(term) = normalize(query) else {
        return RoutingDecision::Ignored;
    };

    let mut outcome = search_all(store, &term);
    let counts = outcome.counts();
    debug!(term = %term, ?counts, "search counts");

    match choose_section(&counts) {
        None => RoutingDecision::NoResults {
            query: query.trim().to_string(),
        },
        Some(section) => RoutingDecision::Route {
            section,
            total: outcome.total(),
            results: outcome.take(section),
            term,
            query: query.trim().to_string(),
        },
    }
}

fn contains(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

fn snippet(text: &str) -> String {
    let head: String = text.trim().chars().take(SNIPPET_CHARS).collect();
    format!("{head}...")
}

fn search_schedules(store: &ContentStore, term: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();
    for schedule in store.schedules() {
        let id = schedule_id(schedule);
        let day = schedule.date.format("%Y-%m-%d");

        if contains(&schedule.minister, term) {
            results.push(SearchResult {
                kind: ResultKind::Minister,
                text: schedule.minister.clone(),
                id: format!("minister-{day}"),
                source: SourceRef::Schedule {
                    id: id.clone(),
                    slot: None,
                },
            });
        }

        for (slot, title) in schedule.all_songs() {
            if contains(title, term) {
                let dashed = title.split_whitespace().collect::<Vec<_>>().join("-");
                results.push(SearchResult {
                    kind: ResultKind::Song,
                    text: title.to_string(),
                    id: format!("{}-{dashed}-{day}", slot.key()),
                    source: SourceRef::Schedule {
                        id: id.clone(),
                        slot: Some(slot),
                    },
                });
            }
        }
    }
    results
}

fn search_songs(store: &ContentStore, term: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();
    for song in store.songs() {
        let source = SourceRef::Song(song.id.clone());
        if contains(&song.title, term) {
            results.push(SearchResult {
                kind: ResultKind::Song,
                text: song.title.clone(),
                id: format!("song-{}", song.id),
                source: source.clone(),
            });
        }
        if contains(&song.lyrics, term) {
            results.push(SearchResult {
                kind: ResultKind::Lyrics,
                text: snippet(&song.lyrics),
                id: format!("lyrics-{}", song.id),
                source: source.clone(),
            });
        }
        if song.author.iter().any(|author| contains(author, term)) {
            results.push(SearchResult {
                kind: ResultKind::Author,
                text: song.author_line(),
                id: format!("author-{}", song.id),
                source,
            });
        }
    }
    results
}

fn search_requests(store: &ContentStore, term: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();
    for request in store.requests() {
        if contains(&request.song_title, term) {
            results.push(SearchResult {
                kind: ResultKind::Request,
                text: request.song_title.clone(),
                id: format!("request-{}", request.id),
                source: SourceRef::Request(request.id),
            });
        }
        if contains(&request.requester, term) {
            results.push(SearchResult {
                kind: ResultKind::Requester,
                text: request.requester.clone(),
                id: format!("requester-{}", request.id),
                source: SourceRef::Request(request.id),
            });
        }
    }
    results
}

fn search_articles(store: &ContentStore, term: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();
    for article in store.articles() {
        if contains(&article.title, term) {
            results.push(SearchResult {
                kind: ResultKind::Article,
                text: article.title.clone(),
                id: format!("article-{}", article.id),
                source: SourceRef::Article(article.id),
            });
        }
        if contains(&article.content, term) {
            results.push(SearchResult {
                kind: ResultKind::Content,
                text: snippet(&article.content),
                id: format!("content-{}", article.id),
                source: SourceRef::Article(article.id),
            });
        }
        if contains(&article.author, term) {
            results.push(SearchResult {
                kind: ResultKind::BlogAuthor,
                text: article.author.clone(),
                id: format!("blog-author-{}", article.id),
                source: SourceRef::Article(article.id),
            });
        }
    }
    results
}

/// Cancel-and-restart debounce for live search input. Every keystroke pushes
/// the deadline out again; only the value present when it finally elapses is
/// released.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record the latest input, replacing anything still waiting.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.delay));
    }

    /// Release the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
