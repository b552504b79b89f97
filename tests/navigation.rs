mod common;

use common::{started, RecordingHost, JOSEPHINE_MARCH_2};
use eazychoir::router::{Dispatch, HistoryEntry};
use eazychoir::sections::RenderOptions;
use eazychoir::view::{Action, ScheduleLayout, Viewport};
use eazychoir::{ScheduleId, SectionName};

#[test]
fn cold_start_lands_on_home() {
    let (router, host) = started(Viewport::Desktop);
    assert_eq!(router.active(), SectionName::Home);
    assert_eq!(host.visible, Some(SectionName::Home));
    assert_eq!(host.nav_active, Some(SectionName::Home));
    assert_eq!(router.history().entries(), &[HistoryEntry::section(SectionName::Home)]);
    assert_eq!(host.view(SectionName::Home).heading, "Welcome to EazyChoir");
}

#[test]
fn unknown_section_name_changes_nothing() {
    let (mut router, mut host) = started(Viewport::Desktop);
    let mounts = host.mounts;
    let history = router.history().clone();

    assert!(!router.load_section(&mut host, "gallery", RenderOptions::default()));
    assert_eq!(router.active(), SectionName::Home);
    assert_eq!(host.visible, Some(SectionName::Home));
    assert_eq!(host.mounts, mounts);
    assert_eq!(router.history(), &history);

    assert!(router.load_section(&mut host, "blog", RenderOptions::default()));
    assert_eq!(router.active(), SectionName::Blog);
}

#[test]
fn missing_container_keeps_current_section() {
    let (mut router, mut host) = started(Viewport::Desktop);
    host.containers.remove(&SectionName::Playlist);
    let mounts = host.mounts;

    assert!(!router.navigate(&mut host, SectionName::Playlist, RenderOptions::default()));
    assert_eq!(router.active(), SectionName::Home);
    assert_eq!(host.visible, Some(SectionName::Home));
    assert_eq!(host.mounts, mounts);
    assert_eq!(router.history().entries().len(), 1);
}

#[test]
fn active_section_needs_force_to_rerender() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.navigate(&mut host, SectionName::Schedule, RenderOptions::default());
    let first = host.view(SectionName::Schedule).clone();
    let mounts = host.mounts;

    assert!(!router.navigate(&mut host, SectionName::Schedule, RenderOptions::default()));
    assert_eq!(host.mounts, mounts);

    assert!(router.navigate(&mut host, SectionName::Schedule, RenderOptions::forced()));
    assert_eq!(host.view(SectionName::Schedule), &first);
    for control in first.controls() {
        assert_eq!(first.bindings_for(&control.key), 1, "{} bound twice", control.key);
    }
}

#[test]
fn back_and_forward_walk_the_session() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.navigate(&mut host, SectionName::Schedule, RenderOptions::default());
    router.navigate(&mut host, SectionName::Playlist, RenderOptions::default());
    assert_eq!(router.history().entries().len(), 3);

    assert!(router.back(&mut host));
    assert_eq!(host.visible, Some(SectionName::Schedule));
    assert!(router.back(&mut host));
    assert_eq!(host.visible, Some(SectionName::Home));
    assert!(!router.back(&mut host));

    assert!(router.forward(&mut host));
    assert_eq!(router.active(), SectionName::Schedule);
    assert_eq!(router.history().entries().len(), 3);

    router.navigate(&mut host, SectionName::Blog, RenderOptions::default());
    assert!(!router.forward(&mut host));
    assert_eq!(router.history().entries().len(), 3);
}

#[test]
fn pop_state_without_entry_goes_home() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.navigate(&mut host, SectionName::Request, RenderOptions::default());
    let recorded = router.history().entries().len();

    assert!(router.pop_state(&mut host, None));
    assert_eq!(router.active(), SectionName::Home);
    assert_eq!(router.history().entries().len(), recorded);
}

#[test]
fn resize_only_rerenders_responsive_sections() {
    let (mut router, mut host) = started(Viewport::Desktop);
    let mounts = host.mounts;
    assert!(!router.handle_resize(&mut host, Viewport::Mobile));
    assert_eq!(host.mounts, mounts);
    assert_eq!(router.viewport(), Viewport::Mobile);

    router.navigate(&mut host, SectionName::Schedule, RenderOptions::default());
    assert_eq!(host.schedule().layout, ScheduleLayout::Cards);
    let history = router.history().entries().len();

    assert!(router.handle_resize(&mut host, Viewport::Desktop));
    assert_eq!(host.schedule().layout, ScheduleLayout::Table);
    assert_eq!(router.history().entries().len(), history);
    assert!(!router.handle_resize(&mut host, Viewport::Desktop));
}

#[test]
fn upcoming_schedule_on_home_opens_highlighted_entry() {
    let (mut router, mut host) = started(Viewport::Desktop);
    let key = format!("home:{JOSEPHINE_MARCH_2}");
    let action = host
        .view(SectionName::Home)
        .control(&key)
        .map(|control| control.action.clone())
        .unwrap();

    assert_eq!(router.dispatch(&mut host, action), Dispatch::Handled);
    let id = ScheduleId::from_param(JOSEPHINE_MARCH_2).unwrap();
    assert_eq!(router.active(), SectionName::Schedule);
    assert!(host.schedule().entry(&id).unwrap().highlighted);
    assert_eq!(router.history().current(), &HistoryEntry::schedule(id));
}

#[test]
fn opening_links_reports_failures() {
    let (mut router, mut host) = started(Viewport::Desktop);
    let url = "https://youtu.be/urI-ZJfUHdM".to_string();
    router.dispatch(&mut host, Action::OpenUrl(url.clone()));
    assert_eq!(host.opened, vec![url.clone()]);

    host.fail_open = true;
    router.dispatch(&mut host, Action::OpenUrl(url.clone()));
    assert_eq!(host.opened.len(), 1);
    assert!(host.last_message().unwrap().starts_with("Could not open"));
    assert_eq!(router.active(), SectionName::Home);
}

#[test]
fn request_form_is_left_to_the_host() {
    let mut host = RecordingHost::default();
    let mut router = common::router(Viewport::Desktop);
    router.cold_start(&mut host, None);
    router.navigate(&mut host, SectionName::Request, RenderOptions::default());
    let action = host
        .view(SectionName::Request)
        .control("request:open")
        .map(|control| control.action.clone())
        .unwrap();
    assert_eq!(router.dispatch(&mut host, action), Dispatch::Host(Action::OpenRequestForm));
}
