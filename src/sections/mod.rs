//! The five top-level sections and their shared render contract.

mod blog;
mod home;
mod playlist;
mod request;
mod schedule;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::codec::{Location, ScheduleId};
use crate::error::ShellError;
use crate::search::SearchResult;
use crate::store::ContentStore;
use crate::view::{SectionAction, ViewOutput, Viewport};

pub use blog::BlogSection;
pub use home::HomeSection;
pub use playlist::PlaylistSection;
pub use request::RequestSection;
pub use schedule::{color_names, matches_date_search, ScheduleSection};

/// Closed set of section identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionName {
    Home,
    Schedule,
    Playlist,
    Request,
    Blog,
}

impl SectionName {
    /// Navigation order.
    pub const ALL: [SectionName; 5] = [
        SectionName::Home,
        SectionName::Schedule,
        SectionName::Playlist,
        SectionName::Request,
        SectionName::Blog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionName::Home => "home",
            SectionName::Schedule => "schedule",
            SectionName::Playlist => "playlist",
            SectionName::Request => "request",
            SectionName::Blog => "blog",
        }
    }

    /// Label on the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            SectionName::Home => "Home",
            SectionName::Schedule => "Schedule",
            SectionName::Playlist => "Playlist",
            SectionName::Request => "Request",
            SectionName::Blog => "Blog",
        }
    }

    /// Host container id, `<name>-section`.
    pub fn container_id(self) -> String {
        format!("{}-section", self.as_str())
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s.trim())
            .ok_or_else(|| ShellError::InvalidSection(s.to_string()))
    }
}

/// Options for one navigation/render. Everything defaults to off/empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Render even when the section is already active.
    pub force: bool,
    /// Do not push a history entry (back/forward and resize re-renders).
    pub skip_history: bool,
    /// Cold start; no history push either.
    pub initial_load: bool,
    pub search_term: Option<String>,
    pub search_results: Vec<SearchResult>,
    /// Entry to expand, highlight and scroll to.
    pub highlight_schedule: Option<ScheduleId>,
}

impl RenderOptions {
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    pub fn with_highlight(mut self, id: ScheduleId) -> Self {
        self.highlight_schedule = Some(id);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>, results: Vec<SearchResult>) -> Self {
        self.search_term = Some(term.into());
        self.search_results = results;
        self
    }

    pub fn skipping_history(mut self) -> Self {
        self.skip_history = true;
        self
    }

    pub fn initial(mut self) -> Self {
        self.initial_load = true;
        self
    }

    /// Whether this navigation should leave a history entry behind.
    pub fn records_history(&self) -> bool {
        !(self.initial_load || self.skip_history)
    }
}

/// Everything a section reads while building its view.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub store: &'a ContentStore,
    pub viewport: Viewport,
    pub share_base: &'a Location,
    pub site_title: &'a str,
    /// "Upcoming" is relative to this day; also stamps new requests.
    pub today: NaiveDate,
    pub copy_feedback: Duration,
}

/// One section instance. Created once at startup and kept for the whole
/// session; local state survives navigation away and back, but every
/// `render` starts from a reset so identical options give identical output.
#[derive(Debug, Clone)]
pub enum Section {
    Home(HomeSection),
    Schedule(ScheduleSection),
    Playlist(PlaylistSection),
    Request(RequestSection),
    Blog(BlogSection),
}

impl Section {
    pub fn new(name: SectionName) -> Self {
        match name {
            SectionName::Home => Section::Home(HomeSection),
            SectionName::Schedule => Section::Schedule(ScheduleSection::default()),
            SectionName::Playlist => Section::Playlist(PlaylistSection::default()),
            SectionName::Request => Section::Request(RequestSection::default()),
            SectionName::Blog => Section::Blog(BlogSection::default()),
        }
    }

    pub fn name(&self) -> SectionName {
        match self {
            Section::Home(_) => SectionName::Home,
            Section::Schedule(_) => SectionName::Schedule,
            Section::Playlist(_) => SectionName::Playlist,
            Section::Request(_) => SectionName::Request,
            Section::Blog(_) => SectionName::Blog,
        }
    }

    pub fn render(&mut self, ctx: &RenderContext<'_>, options: &RenderOptions) -> ViewOutput {
        match self {
            Section::Home(section) => section.render(ctx),
            Section::Schedule(section) => section.render(ctx, options),
            Section::Playlist(section) => section.render(ctx, options),
            Section::Request(section) => section.render(ctx, options),
            Section::Blog(section) => section.render(ctx, options),
        }
    }

    /// Apply a section-local action. `None` when the action belongs to a
    /// different section, in which case nothing changed.
    pub fn apply(&mut self, ctx: &RenderContext<'_>, action: &SectionAction) -> Option<ViewOutput> {
        match self {
            Section::Home(_) => None,
            Section::Schedule(section) => section.apply(ctx, action),
            Section::Playlist(section) => section.apply(ctx, action),
            Section::Request(section) => section.apply(ctx, action),
            Section::Blog(section) => section.apply(ctx, action),
        }
    }

    /// Record a successful share of a schedule entry.
    pub fn mark_copied(&mut self, ctx: &RenderContext<'_>, id: &ScheduleId, now: Instant) -> Option<ViewOutput> {
        match self {
            Section::Schedule(section) => Some(section.mark_copied(ctx, id, now)),
            _ => None,
        }
    }

    /// Drop transient feedback whose time is up. `Some` when the view changed.
    pub fn expire(&mut self, ctx: &RenderContext<'_>, now: Instant) -> Option<ViewOutput> {
        match self {
            Section::Schedule(section) => section.expire(ctx, now),
            _ => None,
        }
    }

    /// Sections whose structure depends on the viewport class.
    pub fn is_responsive(&self) -> bool {
        matches!(self, Section::Schedule(_))
    }
}
