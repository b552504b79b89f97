use std::collections::BTreeSet;

use tracing::warn;

use super::{RenderContext, RenderOptions, SectionName};
use crate::models::Song;
use crate::search::SourceRef;
use crate::view::{
    Action, Control, FilterChip, PlaylistView, SearchBanner, SectionAction, SectionView, SongCard, SongDetailView,
    ViewOutput,
};

/// Song catalogue with a category filter and a detail pane.
#[derive(Debug, Clone, Default)]
pub struct PlaylistSection {
    category: Option<String>,
    search_term: Option<String>,
    result_ids: BTreeSet<String>,
    detail: Option<String>,
}

impl PlaylistSection {
    pub(super) fn render(&mut self, ctx: &RenderContext<'_>, options: &RenderOptions) -> ViewOutput {
        *self = Self::default();
        self.search_term = options.search_term.clone();
        self.result_ids = options
            .search_results
            .iter()
            .filter_map(|result| match &result.source {
                SourceRef::Song(id) => Some(id.clone()),
                _ => None,
            })
            .collect();
        self.view(ctx)
    }

    pub(super) fn apply(&mut self, ctx: &RenderContext<'_>, action: &SectionAction) -> Option<ViewOutput> {
        match action {
            SectionAction::FilterSongs(category) => self.category = category.clone(),
            SectionAction::ShowSong(id) => self.detail = Some(id.clone()),
            SectionAction::CloseSong => self.detail = None,
            SectionAction::ClearSearch => {
                self.search_term = None;
                self.result_ids.clear();
            }
            _ => return None,
        }
        Some(self.view(ctx))
    }

    /// Search narrows the list to songs the query hit (title, author or
    /// lyrics); the category filter applies on top of that.
    fn is_listed(&self, song: &Song) -> bool {
        let searched = match &self.search_term {
            None => true,
            Some(term) => {
                self.result_ids.contains(&song.id)
                    || song.title.to_lowercase().contains(term.as_str())
                    || song.author_line().to_lowercase().contains(term.as_str())
            }
        };
        let in_category = self
            .category
            .as_ref()
            .map_or(true, |category| song.category.contains(category));
        searched && in_category
    }

    fn view(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        let mut filters = vec![FilterChip {
            control: Control::new(
                "filter:all",
                "All",
                Action::Section(SectionAction::FilterSongs(None)),
            ),
            active: self.category.is_none(),
        }];
        filters.extend(ctx.store.song_categories().into_iter().map(|category| FilterChip {
            active: self.category.as_deref() == Some(category.as_str()),
            control: Control::new(
                format!("filter:{category}"),
                category.clone(),
                Action::Section(SectionAction::FilterSongs(Some(category))),
            ),
        }));

        let songs: Vec<SongCard> = ctx
            .store
            .songs()
            .iter()
            .filter(|song| self.is_listed(song))
            .map(song_card)
            .collect();

        let banner = self.search_term.as_ref().map(|term| SearchBanner {
            term: term.clone(),
            count: songs.len(),
            clear: Control::new(
                "search:clear",
                "Clear search",
                Action::Section(SectionAction::ClearSearch),
            ),
        });

        let detail = self.detail.as_ref().map(|id| {
            let close = Control::new("song:close", "Back to playlist", Action::Section(SectionAction::CloseSong));
            match ctx.store.song_by_id(id) {
                Ok(song) => SongDetailView::Found {
                    title: song.title.clone(),
                    authors: song.author_line(),
                    categories: song.category.iter().cloned().collect(),
                    lyrics: song.lyrics.clone(),
                    play: play_control(song),
                    close,
                },
                Err(err) => {
                    warn!(error = %err, "song detail unavailable");
                    SongDetailView::Unavailable {
                        message: "This song is not available".to_string(),
                        close,
                    }
                }
            }
        });

        ViewOutput {
            section: SectionName::Playlist,
            heading: "Choir Playlist".to_string(),
            subtitle: "Songs, lyrics and recordings from our repertoire".to_string(),
            body: SectionView::Playlist(PlaylistView {
                filters,
                banner,
                songs,
                detail,
            }),
            scroll_to: None,
        }
    }
}

fn play_control(song: &Song) -> Option<Control> {
    song.url
        .as_ref()
        .map(|url| Control::new(format!("song:{}:play", song.id), "Listen", Action::OpenUrl(url.clone())))
}

fn song_card(song: &Song) -> SongCard {
    SongCard {
        id: song.id.clone(),
        title: song.title.clone(),
        authors: song.author_line(),
        categories: song.category.iter().cloned().collect(),
        details: Control::new(
            format!("song:{}", song.id),
            "Lyrics",
            Action::Section(SectionAction::ShowSong(song.id.clone())),
        ),
        play: play_control(song),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::codec::Location;
    use crate::search::{search, RoutingDecision};
    use crate::store::fixtures::song;
    use crate::store::ContentStore;
    use crate::view::Viewport;

    fn store() -> ContentStore {
        let mut praise = song("great-are-you-lord", "Great Are You Lord", &["Sinach"], "miracle worker");
        praise.category = ["Praise".to_string()].into_iter().collect();
        ContentStore::new(
            Vec::new(),
            vec![
                song("amazing-grace", "Amazing Grace", &["John Newton"], "how sweet the sound"),
                praise,
            ],
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    fn with_ctx<T>(store: &ContentStore, f: impl FnOnce(&RenderContext<'_>) -> T) -> T {
        let base = Location::parse("https://eazychoir.app/").unwrap();
        let ctx = RenderContext {
            store,
            viewport: Viewport::Desktop,
            share_base: &base,
            site_title: "EazyChoir",
            today: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            copy_feedback: Duration::from_millis(2000),
        };
        f(&ctx)
    }

    fn body(view: ViewOutput) -> PlaylistView {
        match view.body {
            SectionView::Playlist(playlist) => playlist,
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn lyrics_hits_stay_listed_under_search() {
        let store = store();
        let RoutingDecision::Route { term, results, .. } = search(&store, "Sweet the") else {
            panic!("expected a route");
        };
        let playlist = with_ctx(&store, |ctx| {
            body(PlaylistSection::default().render(ctx, &RenderOptions::default().with_search(term, results)))
        });
        assert_eq!(playlist.songs.len(), 1);
        assert_eq!(playlist.songs[0].id, "amazing-grace");
        let banner = playlist.banner.unwrap();
        assert_eq!((banner.term.as_str(), banner.count), ("sweet the", 1));
    }

    #[test]
    fn category_filter_and_clear_search() {
        let store = store();
        with_ctx(&store, |ctx| {
            let mut section = PlaylistSection::default();
            section.render(ctx, &RenderOptions::default().with_search("zzz", Vec::new()));
            let cleared = body(section.apply(ctx, &SectionAction::ClearSearch).unwrap());
            assert!(cleared.banner.is_none());
            assert_eq!(cleared.songs.len(), 2);

            let filtered = body(
                section
                    .apply(ctx, &SectionAction::FilterSongs(Some("Praise".to_string())))
                    .unwrap(),
            );
            assert_eq!(filtered.songs.len(), 1);
            assert!(filtered.filters.iter().any(|chip| chip.active && chip.control.label == "Praise"));
        });
    }

    #[test]
    fn unknown_song_shows_placeholder() {
        let store = store();
        with_ctx(&store, |ctx| {
            let mut section = PlaylistSection::default();
            section.render(ctx, &RenderOptions::default());
            let view = section
                .apply(ctx, &SectionAction::ShowSong("missing".to_string()))
                .unwrap();
            assert!(matches!(
                body(view).detail,
                Some(SongDetailView::Unavailable { .. })
            ));

            let view = section
                .apply(ctx, &SectionAction::ShowSong("amazing-grace".to_string()))
                .unwrap();
            assert_eq!(view.bindings_for("song:amazing-grace:play"), 1);
            let Some(SongDetailView::Found { lyrics, .. }) = body(view).detail else {
                panic!("expected the song");
            };
            assert_eq!(lyrics, "how sweet the sound");
        });
    }

    #[test]
    fn render_resets_local_state() {
        let store = store();
        with_ctx(&store, |ctx| {
            let mut section = PlaylistSection::default();
            let first = section.render(ctx, &RenderOptions::default());
            section.apply(ctx, &SectionAction::FilterSongs(Some("Praise".to_string())));
            assert_eq!(section.render(ctx, &RenderOptions::default()), first);
        });
    }
}
