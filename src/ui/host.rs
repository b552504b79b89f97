use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use anyhow::{Context, Result};
use open::that as open_link;
use tracing::debug;

use super::draw::render_lines;
use crate::router::{Notification, ViewHost};
use crate::sections::SectionName;
use crate::share::{ShareChain, ShareOutcome};
use crate::view::{Control, ViewOutput};

/// [`ViewHost`] backed by the terminal. Keeps the last mounted view of every
/// section, which one is visible, keyboard focus and the scroll offset.
pub struct TerminalHost {
    containers: BTreeSet<SectionName>,
    visible: Option<SectionName>,
    nav_active: Option<SectionName>,
    views: BTreeMap<SectionName, ViewOutput>,
    focus: usize,
    scroll: u16,
    width: u16,
    height: u16,
    notification: Option<(Notification, Instant)>,
    share: ShareChain,
}

impl TerminalHost {
    pub fn new(share: ShareChain) -> Self {
        Self {
            containers: SectionName::ALL.into_iter().collect(),
            visible: None,
            nav_active: None,
            views: BTreeMap::new(),
            focus: 0,
            scroll: 0,
            width: 80,
            height: 24,
            notification: None,
            share,
        }
    }

    pub fn visible(&self) -> Option<SectionName> {
        self.visible
    }

    pub fn nav_active(&self) -> Option<SectionName> {
        self.nav_active
    }

    pub fn visible_view(&self) -> Option<&ViewOutput> {
        self.visible.and_then(|section| self.views.get(&section))
    }

    pub fn focused_control(&self) -> Option<&Control> {
        self.visible_view()
            .and_then(|view| view.controls().get(self.focus).copied())
    }

    pub fn focused_key(&self) -> Option<String> {
        self.focused_control().map(|control| control.key.clone())
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref().map(|(notification, _)| notification)
    }

    pub(crate) fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Size of the content pane, updated before every frame.
    pub(crate) fn set_content_area(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp_scroll();
    }

    pub(crate) fn move_focus(&mut self, delta: isize) {
        let count = self
            .visible_view()
            .map(|view| view.controls().len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        self.focus = (self.focus as isize + delta).rem_euclid(count as isize) as usize;
        self.reveal_focus();
    }

    pub(crate) fn scroll_by(&mut self, delta: i32) {
        self.scroll = (i32::from(self.scroll) + delta).max(0) as u16;
        self.clamp_scroll();
    }

    pub(crate) fn expire(&mut self, now: Instant) {
        if let Some((notification, shown)) = &self.notification {
            if now.duration_since(*shown) >= notification.ttl {
                self.notification = None;
            }
        }
    }

    fn content_lines(&self) -> usize {
        let focused = self.focused_key();
        self.visible_view()
            .map(|view| render_lines(view, focused.as_deref(), self.width).lines.len())
            .unwrap_or(0)
    }

    /// Viewport-height adjustment: never scroll past the last line.
    fn clamp_scroll(&mut self) {
        let max = self.content_lines().saturating_sub(usize::from(self.height));
        self.scroll = self.scroll.min(max as u16);
    }

    fn scroll_to_line(&mut self, line: usize, center: bool) {
        let height = usize::from(self.height.max(1));
        let top = usize::from(self.scroll);
        let target = if center {
            line.saturating_sub(height / 2)
        } else if line < top {
            line
        } else if line >= top + height {
            line + 1 - height
        } else {
            top
        };
        self.scroll = target as u16;
        self.clamp_scroll();
    }

    fn reveal_focus(&mut self) {
        let Some(view) = self.visible_view() else {
            return;
        };
        let focused = self.focused_key();
        let rendered = render_lines(view, focused.as_deref(), self.width);
        if let Some(line) = focused.as_deref().and_then(|key| rendered.line_of(key)) {
            self.scroll_to_line(line, false);
        }
    }
}

impl ViewHost for TerminalHost {
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
        let section = view.section;
        let previous_key = self.focused_key();
        self.views.insert(section, view);
        if self.visible != Some(section) {
            return;
        }
        // Keep focus on the same control across re-renders when it survived.
        let controls = self
            .visible_view()
            .map(|view| view.controls().iter().map(|c| c.key.clone()).collect::<Vec<_>>())
            .unwrap_or_default();
        self.focus = previous_key
            .and_then(|key| controls.iter().position(|candidate| *candidate == key))
            .unwrap_or(0)
            .min(controls.len().saturating_sub(1));
    }

    fn scroll_to_top(&mut self) {
        self.scroll = 0;
        self.focus = 0;
    }

    fn after_render(&mut self, section: SectionName) {
        if self.visible != Some(section) {
            return;
        }
        self.clamp_scroll();
        let Some(target) = self.visible_view().and_then(|view| view.scroll_to.clone()) else {
            return;
        };
        let anchor = format!("{target}:");
        let position = self
            .visible_view()
            .and_then(|view| view.controls().iter().position(|c| c.key.starts_with(&anchor)));
        if let Some(index) = position {
            debug!(target = %target, "scrolling to highlighted element");
            self.focus = index;
            let focused = self.focused_key();
            if let Some(view) = self.visible_view() {
                let rendered = render_lines(view, focused.as_deref(), self.width);
                if let Some(line) = focused.as_deref().and_then(|key| rendered.line_of(key)) {
                    self.scroll_to_line(line, true);
                }
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    fn share_link(&mut self, url: &str) -> ShareOutcome {
        self.share.share(url)
    }

    fn open_external(&mut self, url: &str) -> Result<()> {
        open_link(url).with_context(|| format!("failed to open {url}"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::router::NoticeKind;
    use crate::view::{Action, HomeView, SectionView};

    fn home_view() -> ViewOutput {
        ViewOutput {
            section: SectionName::Home,
            heading: "Welcome".to_string(),
            subtitle: String::new(),
            body: SectionView::Home(HomeView {
                about: Vec::new(),
                upcoming: Vec::new(),
                featured: Vec::new(),
                latest: Vec::new(),
                links: vec![
                    Control::new("home:schedule", "Schedule", Action::Navigate(SectionName::Schedule)),
                    Control::new("home:blog", "Blog", Action::Navigate(SectionName::Blog)),
                ],
            }),
            scroll_to: None,
        }
    }

    #[test]
    fn focus_wraps_and_survives_remount() {
        let mut host = TerminalHost::new(ShareChain::default());
        host.show_only(SectionName::Home);
        host.mount(home_view());
        host.move_focus(-1);
        assert_eq!(host.focused_key().as_deref(), Some("home:blog"));
        host.mount(home_view());
        assert_eq!(host.focused_key().as_deref(), Some("home:blog"));
        host.scroll_to_top();
        assert_eq!(host.focused_key().as_deref(), Some("home:schedule"));
    }

    #[test]
    fn notifications_expire_after_ttl() {
        let mut host = TerminalHost::new(ShareChain::default());
        host.notify(Notification::new(NoticeKind::Info, "hello", Duration::from_millis(10)));
        assert!(host.notification().is_some());
        host.expire(Instant::now() + Duration::from_millis(20));
        assert!(host.notification().is_none());
    }

    #[test]
    fn empty_share_chain_falls_back_to_manual() {
        let mut host = TerminalHost::new(ShareChain::default());
        assert_eq!(
            host.share_link("https://eazychoir.app/"),
            ShareOutcome::Manual("https://eazychoir.app/".to_string())
        );
    }
}
