#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use eazychoir::db::{open_in_memory, seed_if_empty};
use eazychoir::router::Notification;
use eazychoir::share::ShareOutcome;
use eazychoir::view::{ScheduleView, SectionView, ViewOutput, Viewport};
use eazychoir::{ContentStore, Location, Router, RouterSettings, SectionName, ViewHost};

pub const JOSEPHINE_MARCH_2: &str = "schedule-2025-03-02-sis-josephine";

/// Host that records every call instead of drawing anything.
pub struct RecordingHost {
    pub containers: BTreeSet<SectionName>,
    pub visible: Option<SectionName>,
    pub nav_active: Option<SectionName>,
    pub views: BTreeMap<SectionName, ViewOutput>,
    pub mounts: usize,
    pub scroll_resets: usize,
    pub scrolled_to: Vec<String>,
    pub notifications: Vec<Notification>,
    pub shared: Vec<String>,
    pub share_outcome: ShareOutcome,
    pub opened: Vec<String>,
    pub fail_open: bool,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            containers: SectionName::ALL.into_iter().collect(),
            visible: None,
            nav_active: None,
            views: BTreeMap::new(),
            mounts: 0,
            scroll_resets: 0,
            scrolled_to: Vec::new(),
            notifications: Vec::new(),
            shared: Vec::new(),
            share_outcome: ShareOutcome::Copied,
            opened: Vec::new(),
            fail_open: false,
        }
    }
}

impl RecordingHost {
    pub fn view(&self, section: SectionName) -> &ViewOutput {
        self.views
            .get(&section)
            .unwrap_or_else(|| panic!("{section} was never mounted"))
    }

    pub fn schedule(&self) -> &ScheduleView {
        match &self.view(SectionName::Schedule).body {
            SectionView::Schedule(schedule) => schedule,
            other => panic!("unexpected schedule body {other:?}"),
        }
    }

    pub fn last_message(&self) -> Option<&str> {
        self.notifications.last().map(|n| n.message.as_str())
    }
}

impl ViewHost for RecordingHost {
    fn has_container(&self, section: SectionName) -> bool {
        self.containers.contains(&section)
    }

    fn show_only(&mut self, section: SectionName) {
        self.visible = Some(section);
    }

    fn mark_nav_active(&mut self, section: SectionName) {
        self.nav_active = Some(section);
    }

    fn mount(&mut self, view: ViewOutput) {
        self.mounts += 1;
        self.views.insert(view.section, view);
    }

    fn scroll_to_top(&mut self) {
        self.scroll_resets += 1;
    }

    fn after_render(&mut self, section: SectionName) {
        if let Some(target) = self.views.get(&section).and_then(|view| view.scroll_to.clone()) {
            self.scrolled_to.push(target);
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn share_link(&mut self, url: &str) -> ShareOutcome {
        self.shared.push(url.to_string());
        self.share_outcome.clone()
    }

    fn open_external(&mut self, url: &str) -> Result<()> {
        if self.fail_open {
            return Err(anyhow!("no browser available"));
        }
        self.opened.push(url.to_string());
        Ok(())
    }
}

pub fn seeded_store() -> ContentStore {
    let mut conn = open_in_memory().unwrap();
    seed_if_empty(&mut conn).unwrap();
    ContentStore::load(&conn).unwrap()
}

pub fn settings() -> RouterSettings {
    let base = Location::parse("https://eazychoir.app/").unwrap();
    let mut settings = RouterSettings::new("EazyChoir", base);
    settings.today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    settings
}

pub fn router(viewport: Viewport) -> Router {
    Router::new(seeded_store(), settings(), viewport)
}

/// Router and host after a plain cold start on home.
pub fn started(viewport: Viewport) -> (Router, RecordingHost) {
    let mut router = router(viewport);
    let mut host = RecordingHost::default();
    router.cold_start(&mut host, None);
    (router, host)
}
