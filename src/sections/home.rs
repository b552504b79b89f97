use super::{RenderContext, SectionName};
use crate::codec::schedule_id;
use crate::models::long_date;
use crate::view::{Action, Control, HomeView, PreviewItem, SectionView, ViewOutput};

const PREVIEW_LEN: usize = 3;

const ABOUT: [&str; 2] = [
    "We are a community choir dedicated to uplifting worship through song.",
    "Browse the service rota, learn the lyrics, ask for a song, or read what the choir has been up to.",
];

/// Landing page. Stateless: everything on it is a preview of another
/// section and navigates there.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeSection;

impl HomeSection {
    pub(super) fn render(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        let sorted = ctx.store.sorted_schedules();
        let upcoming_start = sorted
            .iter()
            .position(|schedule| schedule.date >= ctx.today)
            .unwrap_or_else(|| sorted.len().saturating_sub(PREVIEW_LEN));
        let upcoming = sorted
            .iter()
            .skip(upcoming_start)
            .take(PREVIEW_LEN)
            .map(|schedule| {
                let id = schedule_id(schedule);
                PreviewItem {
                    title: schedule.formatted_date(),
                    detail: format!("Minister: {}", schedule.minister),
                    control: Control::new(format!("home:{id}"), "View", Action::OpenSchedule(id)),
                }
            })
            .collect();

        let featured = ctx
            .store
            .songs()
            .iter()
            .take(PREVIEW_LEN)
            .map(|song| PreviewItem {
                title: song.title.clone(),
                detail: song.author_line(),
                control: Control::new(
                    format!("home:song:{}", song.id),
                    "Listen",
                    Action::Navigate(SectionName::Playlist),
                ),
            })
            .collect();

        let latest = ctx
            .store
            .articles()
            .iter()
            .take(PREVIEW_LEN)
            .map(|article| PreviewItem {
                title: article.title.clone(),
                detail: long_date(article.date),
                control: Control::new(
                    format!("home:article:{}", article.id),
                    "Read",
                    Action::Navigate(SectionName::Blog),
                ),
            })
            .collect();

        let links = vec![
            Control::new("home:schedule", "View all events", Action::Navigate(SectionName::Schedule)),
            Control::new("home:playlist", "View playlist", Action::Navigate(SectionName::Playlist)),
            Control::new("home:request", "Request a song", Action::Navigate(SectionName::Request)),
            Control::new("home:blog", "Read the blog", Action::Navigate(SectionName::Blog)),
        ];

        ViewOutput {
            section: SectionName::Home,
            heading: format!("Welcome to {}", ctx.site_title),
            subtitle: "Your home for uplifting choir music, lyrics, and resources".to_string(),
            body: SectionView::Home(HomeView {
                about: ABOUT.iter().map(|line| line.to_string()).collect(),
                upcoming,
                featured,
                latest,
                links,
            }),
            scroll_to: None,
        }
    }
}
