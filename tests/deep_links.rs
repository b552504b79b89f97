mod common;

use std::time::{Duration, Instant};

use common::{router, started, RecordingHost, JOSEPHINE_MARCH_2};
use eazychoir::codec::{decode_share_url, encode_share_url};
use eazychoir::router::{HistoryEntry, NoticeKind};
use eazychoir::share::ShareOutcome;
use eazychoir::view::{Action, SectionAction, Viewport};
use eazychoir::{Location, ScheduleId, SectionName};

fn open(link: &str, viewport: Viewport) -> (eazychoir::Router, RecordingHost) {
    let mut router = router(viewport);
    let mut host = RecordingHost::default();
    router.cold_start(&mut host, Some(Location::parse(link).unwrap()));
    (router, host)
}

#[test]
fn shared_link_highlights_exactly_one_entry() {
    let link = format!("https://eazychoir.app/?schedule={JOSEPHINE_MARCH_2}");
    let (router, host) = open(&link, Viewport::Desktop);
    let id = ScheduleId::from_param(JOSEPHINE_MARCH_2).unwrap();

    assert_eq!(router.active(), SectionName::Schedule);
    assert_eq!(host.visible, Some(SectionName::Schedule));
    let schedule = host.schedule();
    let highlighted = schedule.highlighted();
    assert_eq!(highlighted.len(), 1);
    assert_eq!(highlighted[0].id, id);
    assert!(highlighted[0].expanded);
    assert_eq!(host.scrolled_to, vec![JOSEPHINE_MARCH_2.to_string()]);

    assert_eq!(router.history().entries(), &[HistoryEntry::schedule(id.clone())]);
    assert_eq!(router.location().and_then(Location::schedule_param), Some(id));
}

#[test]
fn shared_link_works_on_narrow_terminals() {
    let link = format!("https://eazychoir.app/?schedule={JOSEPHINE_MARCH_2}");
    let (_, host) = open(&link, Viewport::Mobile);
    let schedule = host.schedule();
    let entry = schedule.highlighted()[0];
    assert!(entry.expanded);
    assert!(entry.toggle.is_some());
    assert_eq!(schedule.entries.iter().filter(|e| e.expanded).count(), 1);
}

#[test]
fn unknown_schedule_shows_notice() {
    let (router, host) = open("https://eazychoir.app/?schedule=schedule-2030-01-01-nobody", Viewport::Desktop);
    assert_eq!(router.active(), SectionName::Schedule);
    let schedule = host.schedule();
    assert!(schedule.highlighted().is_empty());
    assert_eq!(
        schedule.notice.as_deref(),
        Some("Schedule schedule-2030-01-01-nobody is not available")
    );
    assert!(host.scrolled_to.is_empty());
}

#[test]
fn link_without_schedule_stays_home() {
    let (router, _) = open("https://eazychoir.app/?schedule=", Viewport::Desktop);
    assert_eq!(router.active(), SectionName::Home);
}

#[test]
fn share_panel_copies_link_and_feedback_expires() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.navigate(&mut host, SectionName::Schedule, Default::default());
    let id = ScheduleId::from_param(JOSEPHINE_MARCH_2).unwrap();

    router.dispatch(&mut host, Action::Section(SectionAction::ToggleSharePanel(id.clone().into())));
    let entry = host.schedule().entry(&id).unwrap().clone();
    assert!(entry.share_open);
    let copy = entry.copy.expect("copy control while the panel is open");
    assert_eq!(copy.action, Action::Share(id.clone()));

    router.dispatch(&mut host, copy.action);
    let url = format!("https://eazychoir.app/?schedule={JOSEPHINE_MARCH_2}");
    assert_eq!(host.shared, vec![url.clone()]);
    assert_eq!(host.last_message(), Some("Link copied!"));
    assert!(host.schedule().entry(&id).unwrap().copied);
    assert_eq!(decode_share_url(&url).unwrap(), Some(id.clone()));

    router.tick(&mut host, Instant::now());
    assert!(host.schedule().entry(&id).unwrap().copied);
    router.tick(&mut host, Instant::now() + Duration::from_secs(3));
    assert!(!host.schedule().entry(&id).unwrap().copied);
}

#[test]
fn only_one_share_panel_is_open() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.navigate(&mut host, SectionName::Schedule, Default::default());
    let first = ScheduleId::from_param(JOSEPHINE_MARCH_2).unwrap();
    let second = ScheduleId::from_param("schedule-2025-03-09-sis-abeena").unwrap();

    router.dispatch(&mut host, Action::Section(SectionAction::ToggleSharePanel(first.clone().into())));
    router.dispatch(&mut host, Action::Section(SectionAction::ToggleSharePanel(second.clone().into())));
    let schedule = host.schedule();
    assert!(!schedule.entry(&first).unwrap().share_open);
    assert!(schedule.entry(&second).unwrap().share_open);
}

#[test]
fn failed_share_falls_back_to_manual_link() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.navigate(&mut host, SectionName::Schedule, Default::default());
    let id = ScheduleId::from_param(JOSEPHINE_MARCH_2).unwrap();
    let base = Location::parse("https://eazychoir.app/").unwrap();
    let url = encode_share_url(&base, &id);
    host.share_outcome = ShareOutcome::Manual(url.clone());

    router.dispatch(&mut host, Action::Share(id.clone()));
    let notice = host.notifications.last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.link.as_deref(), Some(url.as_str()));
    assert!(!host.schedule().entry(&id).unwrap().copied);
}

#[test]
fn unconfirmed_clipboard_copy_still_shows_the_link() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.navigate(&mut host, SectionName::Schedule, Default::default());
    let id = ScheduleId::from_param(JOSEPHINE_MARCH_2).unwrap();
    let base = Location::parse("https://eazychoir.app/").unwrap();
    let url = encode_share_url(&base, &id);
    host.share_outcome = ShareOutcome::Unconfirmed(url.clone());

    router.dispatch(&mut host, Action::Share(id.clone()));
    let notice = host.notifications.last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, "Link copied!");
    assert_eq!(notice.link.as_deref(), Some(url.as_str()));
    assert!(host.schedule().entry(&id).unwrap().copied);
}
