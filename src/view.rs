//! View descriptions produced by sections.
//!
//! A section never draws anything itself. It returns a [`ViewOutput`] that a
//! host (the terminal UI, or a recording host in tests) turns into pixels or
//! cells. Every interactive element is a [`Control`] carrying exactly one
//! [`Action`]; the host hands the action back to the router when the element
//! is activated, so re-rendering can never stack up handlers.

use crate::codec::{EntryKey, ScheduleId};
use crate::models::ServiceSlot;
use crate::sections::SectionName;

/// Layout class of the host. Mobile hosts get schedule cards instead of the
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    /// Anything narrower than `breakpoint` columns is mobile.
    pub fn from_width(width: u16, breakpoint: u16) -> Self {
        if width < breakpoint {
            Viewport::Mobile
        } else {
            Viewport::Desktop
        }
    }
}

/// Something activating a control asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(SectionName),
    /// Jump to the schedule with one entry highlighted.
    OpenSchedule(ScheduleId),
    OpenUrl(String),
    /// Run the share chain for a schedule entry's link.
    Share(ScheduleId),
    /// Host-side modal; the core only names it.
    OpenRequestForm,
    Section(SectionAction),
}

/// Actions that change state local to the active section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionAction {
    ToggleEntry(EntryKey),
    HighlightEntry(EntryKey),
    ToggleSharePanel(EntryKey),
    FilterSongs(Option<String>),
    ShowSong(String),
    CloseSong,
    ClearSearch,
    FilterArticles(Option<String>),
    ReadArticle(i64),
    BackToArticles,
    SubmitRequest(RequestDraft),
    NewRequest,
}

/// Values collected by the request form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestDraft {
    pub name: String,
    pub email: String,
    pub song_title: String,
    pub composer: String,
    pub reason: String,
}

/// One activatable element. `key` is unique within a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub key: String,
    pub label: String,
    pub action: Action,
}

impl Control {
    pub fn new(key: impl Into<String>, label: impl Into<String>, action: Action) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            action,
        }
    }
}

/// Complete description of one section's visible content.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutput {
    pub section: SectionName,
    pub heading: String,
    pub subtitle: String,
    pub body: SectionView,
    /// Element the host should bring into view once this output is mounted.
    pub scroll_to: Option<String>,
}

impl ViewOutput {
    /// Every control in reading order.
    pub fn controls(&self) -> Vec<&Control> {
        let mut controls = Vec::new();
        match &self.body {
            SectionView::Home(home) => {
                for item in home
                    .upcoming
                    .iter()
                    .chain(&home.featured)
                    .chain(&home.latest)
                {
                    controls.push(&item.control);
                }
                controls.extend(home.links.iter());
            }
            SectionView::Schedule(schedule) => {
                for entry in &schedule.entries {
                    controls.extend(entry.controls());
                }
            }
            SectionView::Playlist(playlist) => {
                controls.extend(playlist.filters.iter().map(|chip| &chip.control));
                if let Some(banner) = &playlist.banner {
                    controls.push(&banner.clear);
                }
                match &playlist.detail {
                    Some(SongDetailView::Found { play, close, .. }) => {
                        controls.extend(play.iter());
                        controls.push(close);
                    }
                    Some(SongDetailView::Unavailable { close, .. }) => controls.push(close),
                    None => {
                        for card in &playlist.songs {
                            controls.push(&card.details);
                            controls.extend(card.play.iter());
                        }
                    }
                }
            }
            SectionView::Request(request) => {
                if let Some(banner) = &request.banner {
                    controls.push(&banner.clear);
                }
                match &request.form {
                    RequestFormView::Ready { open } => controls.push(open),
                    RequestFormView::Submitted { again, .. } => controls.push(again),
                }
            }
            SectionView::Blog(blog) => match blog {
                BlogView::List {
                    filters,
                    banner,
                    articles,
                } => {
                    controls.extend(filters.iter().map(|chip| &chip.control));
                    if let Some(banner) = banner {
                        controls.push(&banner.clear);
                    }
                    controls.extend(articles.iter().map(|card| &card.read_more));
                }
                BlogView::Single { back, .. } | BlogView::NotFound { back, .. } => {
                    controls.push(back)
                }
            },
        }
        controls
    }

    pub fn control(&self, key: &str) -> Option<&Control> {
        self.controls().into_iter().find(|control| control.key == key)
    }

    /// Number of actions bound to `key`. A well-formed view answers 0 or 1.
    pub fn bindings_for(&self, key: &str) -> usize {
        self.controls()
            .into_iter()
            .filter(|control| control.key == key)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionView {
    Home(HomeView),
    Schedule(ScheduleView),
    Playlist(PlaylistView),
    Request(RequestView),
    Blog(BlogView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub about: Vec<String>,
    pub upcoming: Vec<PreviewItem>,
    pub featured: Vec<PreviewItem>,
    pub latest: Vec<PreviewItem>,
    pub links: Vec<Control>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    pub title: String,
    pub detail: String,
    pub control: Control,
}

/// Table on desktop, collapsible cards on mobile. Both are drawn from the
/// same entry list, so highlight and expansion can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleLayout {
    Table,
    Cards,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleView {
    pub layout: ScheduleLayout,
    pub entries: Vec<EntryView>,
    pub search_term: Option<String>,
    /// Placeholder shown when a deep link names an entry that does not exist.
    pub notice: Option<String>,
}

impl ScheduleView {
    /// First entry carrying `id`.
    pub fn entry(&self, id: &ScheduleId) -> Option<&EntryView> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn entry_by_key(&self, key: &EntryKey) -> Option<&EntryView> {
        self.entries.iter().find(|entry| &entry.key == key)
    }

    pub fn highlighted(&self) -> Vec<&EntryView> {
        self.entries.iter().filter(|entry| entry.highlighted).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub id: ScheduleId,
    /// Unique within the view even when ids collide.
    pub key: EntryKey,
    pub date_label: String,
    pub minister: String,
    pub slots: Vec<(ServiceSlot, Vec<String>)>,
    pub colors: Vec<String>,
    pub color_names: String,
    pub expanded: bool,
    pub highlighted: bool,
    pub search_match: bool,
    pub date_match: bool,
    pub share_url: String,
    pub share_open: bool,
    pub copied: bool,
    pub select: Control,
    /// Card layout only.
    pub toggle: Option<Control>,
    pub share: Control,
    /// Present while the share panel is open.
    pub copy: Option<Control>,
}

impl EntryView {
    pub fn controls(&self) -> Vec<&Control> {
        let mut controls = vec![&self.select];
        controls.extend(self.toggle.iter());
        controls.push(&self.share);
        controls.extend(self.copy.iter());
        controls
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip {
    pub control: Control,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchBanner {
    pub term: String,
    pub count: usize,
    pub clear: Control,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistView {
    pub filters: Vec<FilterChip>,
    pub banner: Option<SearchBanner>,
    pub songs: Vec<SongCard>,
    pub detail: Option<SongDetailView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongCard {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub categories: Vec<String>,
    pub details: Control,
    pub play: Option<Control>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SongDetailView {
    Found {
        title: String,
        authors: String,
        categories: Vec<String>,
        lyrics: String,
        play: Option<Control>,
        close: Control,
    },
    Unavailable {
        message: String,
        close: Control,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestView {
    pub banner: Option<SearchBanner>,
    pub form: RequestFormView,
    pub recent: Vec<RequestItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestFormView {
    Ready { open: Control },
    Submitted { song_title: String, again: Control },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestItem {
    pub song_title: String,
    pub requester: String,
    pub date: String,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlogView {
    List {
        filters: Vec<FilterChip>,
        banner: Option<SearchBanner>,
        articles: Vec<ArticleCard>,
    },
    Single {
        title: String,
        meta: String,
        tags: Vec<String>,
        content: String,
        back: Control,
    },
    NotFound {
        message: String,
        back: Control,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub id: i64,
    pub title: String,
    pub meta: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub read_more: Control,
}
