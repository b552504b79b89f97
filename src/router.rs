//! Navigation core.
//!
//! The [`Router`] owns which section is visible, the session history and the
//! search hand-off. It talks to the outside world only through a
//! [`ViewHost`], so the terminal UI and the recording host used by tests are
//! interchangeable. Every failure is recovered here; nothing propagates out
//! and there is always a visible section.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::codec::{encode_share_url, Location, ScheduleId};
use crate::error::ShellError;
use crate::search::{self, RoutingDecision};
use crate::sections::{RenderContext, RenderOptions, Section, SectionName};
use crate::share::ShareOutcome;
use crate::store::ContentStore;
use crate::view::{Action, SectionAction, ViewOutput, Viewport};

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);
pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_millis(2000);

/// What the core needs from whoever displays it.
pub trait ViewHost {
    /// Whether the host has a container for `section`.
    fn has_container(&self, section: SectionName) -> bool;
    /// Hide every container except `section`.
    fn show_only(&mut self, section: SectionName);
    fn mark_nav_active(&mut self, section: SectionName);
    /// Replace the content of the view's section.
    fn mount(&mut self, view: ViewOutput);
    fn scroll_to_top(&mut self);
    /// Runs once the mounted view is in place: viewport adjustment, then
    /// scrolling to `scroll_to` if the view asked for it.
    fn after_render(&mut self, section: SectionName);
    fn notify(&mut self, notification: Notification);
    fn share_link(&mut self, url: &str) -> ShareOutcome;
    fn open_external(&mut self, url: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Transient message; the host dismisses it after `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NoticeKind,
    pub message: String,
    /// Link to show for manual copying when sharing failed or could not be
    /// confirmed.
    pub link: Option<String>,
    pub ttl: Duration,
}

impl Notification {
    pub fn new(kind: NoticeKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            link: None,
            ttl,
        }
    }
}

/// One session history record. Entries coming from outside may lack a
/// section, which restores to home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    pub section: Option<SectionName>,
    pub schedule_id: Option<ScheduleId>,
}

impl HistoryEntry {
    pub fn section(section: SectionName) -> Self {
        Self {
            section: Some(section),
            schedule_id: None,
        }
    }

    pub fn schedule(id: ScheduleId) -> Self {
        Self {
            section: Some(SectionName::Schedule),
            schedule_id: Some(id),
        }
    }
}

/// Back/forward stack with a cursor. Pushing drops the forward entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl SessionHistory {
    pub fn new(initial: HistoryEntry) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    pub fn replace(&mut self, entry: HistoryEntry) {
        self.entries[self.cursor] = entry;
    }

    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.cursor = self.cursor.checked_sub(1)?;
        self.entries.get(self.cursor)
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(HistoryEntry::section(SectionName::Home))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub active: SectionName,
    pub entry: HistoryEntry,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            active: SectionName::Home,
            entry: HistoryEntry::section(SectionName::Home),
        }
    }
}

/// Fixed inputs of the router, resolved from config at startup.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub site_title: String,
    /// Origin and path share links are built on.
    pub share_base: Location,
    pub notification_ttl: Duration,
    pub copy_feedback: Duration,
    pub today: NaiveDate,
}

impl RouterSettings {
    pub fn new(site_title: impl Into<String>, share_base: Location) -> Self {
        Self {
            site_title: site_title.into(),
            share_base,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            copy_feedback: DEFAULT_COPY_FEEDBACK,
            today: Local::now().date_naive(),
        }
    }
}

/// Result of [`Router::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// The action did not apply to the current state.
    Ignored,
    /// Host-only concern, handed back untouched.
    Host(Action),
}

#[derive(Debug, Clone)]
struct Sections([Section; 5]);

impl Sections {
    fn new() -> Self {
        Sections(SectionName::ALL.map(Section::new))
    }

    fn get(&self, name: SectionName) -> &Section {
        &self.0[name as usize]
    }

    fn get_mut(&mut self, name: SectionName) -> &mut Section {
        &mut self.0[name as usize]
    }
}

fn context<'a>(store: &'a ContentStore, settings: &'a RouterSettings, viewport: Viewport) -> RenderContext<'a> {
    RenderContext {
        store,
        viewport,
        share_base: &settings.share_base,
        site_title: &settings.site_title,
        today: settings.today,
        copy_feedback: settings.copy_feedback,
    }
}

pub struct Router {
    store: ContentStore,
    settings: RouterSettings,
    sections: Sections,
    state: NavigationState,
    history: SessionHistory,
    viewport: Viewport,
    location: Option<Location>,
    last_options: RenderOptions,
}

impl Router {
    pub fn new(store: ContentStore, settings: RouterSettings, viewport: Viewport) -> Self {
        Self {
            store,
            settings,
            sections: Sections::new(),
            state: NavigationState::default(),
            history: SessionHistory::default(),
            viewport,
            location: None,
            last_options: RenderOptions::default(),
        }
    }

    pub fn active(&self) -> SectionName {
        self.state.active
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Location the session was opened with. The `schedule` parameter stays
    /// in it after cold start.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Start a fresh session on home, then follow a `?schedule=` deep link
    /// when the location carries one.
    pub fn cold_start<H: ViewHost>(&mut self, host: &mut H, location: Option<Location>) {
        self.state = NavigationState::default();
        self.history = SessionHistory::default();
        self.location = location;
        self.navigate(host, SectionName::Home, RenderOptions::forced().initial());

        let Some(id) = self.location.as_ref().and_then(Location::schedule_param) else {
            return;
        };
        info!(schedule = %id, "opening shared schedule link");
        let options = RenderOptions::default().initial().with_highlight(id.clone());
        if self.navigate(host, SectionName::Schedule, options) {
            let entry = HistoryEntry::schedule(id);
            self.history.replace(entry.clone());
            self.state.entry = entry;
        }
    }

    /// Navigate by name as it arrives from outside. Unknown names are logged
    /// and change nothing.
    pub fn load_section<H: ViewHost>(&mut self, host: &mut H, name: &str, options: RenderOptions) -> bool {
        match name.parse::<SectionName>() {
            Ok(section) => self.navigate(host, section, options),
            Err(err) => {
                warn!(error = %err, "navigation ignored");
                false
            }
        }
    }

    /// Show `section` and render it. Returns `false` when nothing happened:
    /// the section was already active (without `force`) or the host has no
    /// container for it, in which case the current section stays visible.
    pub fn navigate<H: ViewHost>(&mut self, host: &mut H, section: SectionName, options: RenderOptions) -> bool {
        if section == self.state.active && !options.force {
            debug!(section = %section, "already active");
            return false;
        }
        if !host.has_container(section) {
            warn!(error = %ShellError::MissingContainer(section), "render skipped");
            return false;
        }

        host.show_only(section);
        host.mark_nav_active(section);
        self.state.active = section;

        let entry = HistoryEntry {
            section: Some(section),
            schedule_id: options.highlight_schedule.clone(),
        };
        if options.records_history() {
            self.history.push(entry.clone());
        }
        self.state.entry = entry;
        info!(section = %section, "section loaded");

        let ctx = context(&self.store, &self.settings, self.viewport);
        let view = self.sections.get_mut(section).render(&ctx, &options);
        self.last_options = options;

        host.mount(view);
        host.scroll_to_top();
        host.after_render(section);
        true
    }

    /// Restore a history entry without recording a new one.
    pub fn pop_state<H: ViewHost>(&mut self, host: &mut H, entry: Option<HistoryEntry>) -> bool {
        let entry = entry.unwrap_or_default();
        let section = entry.section.unwrap_or(SectionName::Home);
        let mut options = RenderOptions::default().skipping_history();
        if let Some(id) = entry.schedule_id {
            options = options.with_highlight(id);
            options.force = true;
        }
        self.navigate(host, section, options)
    }

    pub fn back<H: ViewHost>(&mut self, host: &mut H) -> bool {
        match self.history.back().cloned() {
            Some(entry) => self.pop_state(host, Some(entry)),
            None => false,
        }
    }

    pub fn forward<H: ViewHost>(&mut self, host: &mut H) -> bool {
        match self.history.forward().cloned() {
            Some(entry) => self.pop_state(host, Some(entry)),
            None => false,
        }
    }

    /// React to a new viewport class. Only sections whose structure depends
    /// on it are re-rendered, with the options they were last shown with.
    pub fn handle_resize<H: ViewHost>(&mut self, host: &mut H, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        info!(?viewport, "viewport class changed");
        self.viewport = viewport;

        let active = self.state.active;
        if !self.sections.get(active).is_responsive() {
            return false;
        }
        let mut options = self.last_options.clone();
        options.force = true;
        options.skip_history = true;
        options.initial_load = false;
        self.navigate(host, active, options)
    }

    /// Run a search and route to the winning section. At most one
    /// navigation and one notification.
    pub fn search<H: ViewHost>(&mut self, host: &mut H, query: &str) -> bool {
        let ttl = self.settings.notification_ttl;
        match search::search(&self.store, query) {
            RoutingDecision::Ignored => false,
            RoutingDecision::NoResults { query } => {
                info!(query = %query, "search found nothing");
                host.notify(Notification::new(
                    NoticeKind::Info,
                    format!("No results found for \"{query}\""),
                    ttl,
                ));
                false
            }
            RoutingDecision::Route {
                section,
                term,
                results,
                total,
                query,
            } => {
                let options = RenderOptions::forced().with_search(term, results);
                let navigated = self.navigate(host, section, options);
                host.notify(Notification::new(
                    NoticeKind::Success,
                    format!("Found {total} results for \"{query}\""),
                    ttl,
                ));
                navigated
            }
        }
    }

    /// Carry out the action bound to an activated control.
    pub fn dispatch<H: ViewHost>(&mut self, host: &mut H, action: Action) -> Dispatch {
        match action {
            Action::Navigate(section) => {
                self.navigate(host, section, RenderOptions::default());
                Dispatch::Handled
            }
            Action::OpenSchedule(id) => {
                self.navigate(host, SectionName::Schedule, RenderOptions::forced().with_highlight(id));
                Dispatch::Handled
            }
            Action::OpenUrl(url) => {
                let ttl = self.settings.notification_ttl;
                match host.open_external(&url) {
                    Ok(()) => host.notify(Notification::new(NoticeKind::Info, format!("Opening {url}"), ttl)),
                    Err(err) => {
                        warn!(error = %err, url = %url, "could not open link");
                        host.notify(Notification::new(
                            NoticeKind::Error,
                            format!("Could not open {url}: {}", err.root_cause()),
                            ttl,
                        ));
                    }
                }
                Dispatch::Handled
            }
            Action::Share(id) => {
                self.share(host, &id, Instant::now());
                Dispatch::Handled
            }
            Action::OpenRequestForm => Dispatch::Host(action),
            Action::Section(section_action) => {
                let active = self.state.active;
                if let SectionAction::SubmitRequest(draft) = &section_action {
                    if active == SectionName::Request && draft.missing_fields().is_empty() {
                        self.store
                            .add_request(draft.song_title.trim(), draft.name.trim(), self.settings.today);
                    }
                }
                let ctx = context(&self.store, &self.settings, self.viewport);
                match self.sections.get_mut(active).apply(&ctx, &section_action) {
                    Some(view) => {
                        host.mount(view);
                        host.after_render(active);
                        Dispatch::Handled
                    }
                    None => {
                        debug!(?section_action, section = %active, "action not applicable");
                        Dispatch::Ignored
                    }
                }
            }
        }
    }

    fn share<H: ViewHost>(&mut self, host: &mut H, id: &ScheduleId, now: Instant) {
        let ttl = self.settings.notification_ttl;
        let url = encode_share_url(&self.settings.share_base, id);
        let (message, link) = match host.share_link(&url) {
            ShareOutcome::Shared => ("Link shared", None),
            ShareOutcome::Copied => ("Link copied!", None),
            ShareOutcome::Unconfirmed(link) => ("Link copied!", Some(link)),
            ShareOutcome::Manual(link) => {
                host.notify(Notification {
                    kind: NoticeKind::Info,
                    message: "Copy this link to share it".to_string(),
                    link: Some(link),
                    ttl,
                });
                return;
            }
        };

        let active = self.state.active;
        let ctx = context(&self.store, &self.settings, self.viewport);
        if let Some(view) = self.sections.get_mut(active).mark_copied(&ctx, id, now) {
            host.mount(view);
        }
        host.notify(Notification {
            kind: NoticeKind::Success,
            message: message.to_string(),
            link,
            ttl,
        });
    }

    /// Expire time-limited feedback in the active section.
    pub fn tick<H: ViewHost>(&mut self, host: &mut H, now: Instant) {
        let active = self.state.active;
        let ctx = context(&self.store, &self.settings, self.viewport);
        if let Some(view) = self.sections.get_mut(active).expire(&ctx, now) {
            host.mount(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_push_truncates_forward_entries() {
        let mut history = SessionHistory::default();
        history.push(HistoryEntry::section(SectionName::Blog));
        history.push(HistoryEntry::section(SectionName::Playlist));
        assert_eq!(history.back().and_then(|e| e.section), Some(SectionName::Blog));
        history.push(HistoryEntry::section(SectionName::Request));
        assert!(history.forward().is_none());
        assert_eq!(history.entries().len(), 3);
        assert_eq!(history.current().section, Some(SectionName::Request));
    }

    #[test]
    fn back_stops_at_first_entry() {
        let mut history = SessionHistory::default();
        assert!(history.back().is_none());
        assert_eq!(history.current().section, Some(SectionName::Home));
    }
}
