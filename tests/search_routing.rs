mod common;

use common::started;
use eazychoir::router::NoticeKind;
use eazychoir::sections::RenderOptions;
use eazychoir::view::{Action, RequestDraft, SectionAction, SectionView, Viewport};
use eazychoir::SectionName;

#[test]
fn song_catalogue_hits_route_to_playlist() {
    let (mut router, mut host) = started(Viewport::Desktop);
    assert!(router.search(&mut host, "Hosanna"));
    assert_eq!(router.active(), SectionName::Playlist);
    assert_eq!(host.notifications.len(), 1);
    assert_eq!(host.notifications[0].kind, NoticeKind::Success);
    assert_eq!(host.last_message(), Some("Found 2 results for \"Hosanna\""));

    let SectionView::Playlist(playlist) = &host.view(SectionName::Playlist).body else {
        panic!("expected the playlist");
    };
    let banner = playlist.banner.as_ref().unwrap();
    assert_eq!(banner.term, "hosanna");
    assert_eq!(playlist.songs.len(), 1);
    assert_eq!(playlist.songs[0].id, "hosanna-in-the-highest");
}

#[test]
fn rota_only_titles_route_to_schedule() {
    let (mut router, mut host) = started(Viewport::Desktop);
    assert!(router.search(&mut host, "amazing grace"));
    assert_eq!(router.active(), SectionName::Schedule);

    let matched: Vec<_> = host
        .schedule()
        .entries
        .iter()
        .filter(|entry| entry.search_match)
        .map(|entry| entry.id.to_string())
        .collect();
    assert_eq!(matched, vec!["schedule-2025-03-23-sis-abeena".to_string()]);
}

#[test]
fn narrow_terminal_expands_matching_cards() {
    let (mut router, mut host) = started(Viewport::Mobile);
    router.search(&mut host, "amazing grace");
    let schedule = host.schedule();
    let expanded: Vec<_> = schedule.entries.iter().filter(|e| e.expanded).collect();
    assert_eq!(expanded.len(), 1);
    assert_eq!(expanded[0].id.to_string(), "schedule-2025-03-23-sis-abeena");
    assert_eq!(host.scrolled_to, vec!["schedule-2025-03-23-sis-abeena".to_string()]);
}

#[test]
fn requester_and_blog_author_pick_their_sections() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.search(&mut host, "maria");
    assert_eq!(router.active(), SectionName::Request);
    router.search(&mut host, "elena");
    assert_eq!(router.active(), SectionName::Blog);
}

#[test]
fn no_results_notifies_without_navigating() {
    let (mut router, mut host) = started(Viewport::Desktop);
    let mounts = host.mounts;
    assert!(!router.search(&mut host, "Zebra"));
    assert_eq!(router.active(), SectionName::Home);
    assert_eq!(host.mounts, mounts);
    assert_eq!(host.last_message(), Some("No results found for \"Zebra\""));
}

#[test]
fn blank_query_does_nothing() {
    let (mut router, mut host) = started(Viewport::Desktop);
    assert!(!router.search(&mut host, "   "));
    assert!(host.notifications.is_empty());
    assert_eq!(router.active(), SectionName::Home);
}

#[test]
fn searching_twice_rerenders_the_active_section() {
    let (mut router, mut host) = started(Viewport::Desktop);
    router.search(&mut host, "hosanna");
    let mounts = host.mounts;
    assert!(router.search(&mut host, "great are you"));
    assert_eq!(router.active(), SectionName::Playlist);
    assert_eq!(host.mounts, mounts + 1);
    assert_eq!(router.history().entries().len(), 3);
}

#[test]
fn requests_made_in_session_are_searchable() {
    let (mut router, mut host) = started(Viewport::Desktop);
    assert!(!router.search(&mut host, "oceans"));

    router.navigate(&mut host, SectionName::Request, RenderOptions::default());
    let draft = RequestDraft {
        name: "Ama".to_string(),
        email: "ama@example.com".to_string(),
        song_title: "Oceans".to_string(),
        ..RequestDraft::default()
    };
    router.dispatch(&mut host, Action::Section(SectionAction::SubmitRequest(draft)));

    router.navigate(&mut host, SectionName::Home, RenderOptions::default());
    assert!(router.search(&mut host, "oceans"));
    assert_eq!(router.active(), SectionName::Request);
    let SectionView::Request(request) = &host.view(SectionName::Request).body else {
        panic!("expected the request view");
    };
    let matched: Vec<_> = request.recent.iter().filter(|item| item.matched).collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].song_title, "Oceans");
}
