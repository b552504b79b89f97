use std::collections::BTreeSet;

use tracing::{info, warn};

use super::{RenderContext, RenderOptions, SectionName};
use crate::models::long_date;
use crate::search::SourceRef;
use crate::view::{
    Action, Control, RequestDraft, RequestFormView, RequestItem, RequestView, SearchBanner, SectionAction, SectionView,
    ViewOutput,
};

impl RequestDraft {
    /// Labels of required fields that are blank, plus `Email` when the
    /// address has no `@`.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Your Name");
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {}
            _ => missing.push("Email"),
        }
        if self.song_title.trim().is_empty() {
            missing.push("Song Title");
        }
        missing
    }
}

/// Request form plus the list of recent requests. Accepted submissions are
/// recorded in the shared store by the router before the section sees them,
/// so they are listed and searchable for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct RequestSection {
    thanked: Option<String>,
    search_term: Option<String>,
    result_ids: BTreeSet<i64>,
}

impl RequestSection {
    pub(super) fn render(&mut self, ctx: &RenderContext<'_>, options: &RenderOptions) -> ViewOutput {
        self.thanked = None;
        self.search_term = options.search_term.clone();
        self.result_ids = options
            .search_results
            .iter()
            .filter_map(|result| match result.source {
                SourceRef::Request(id) => Some(id),
                _ => None,
            })
            .collect();
        self.view(ctx)
    }

    pub(super) fn apply(&mut self, ctx: &RenderContext<'_>, action: &SectionAction) -> Option<ViewOutput> {
        match action {
            SectionAction::SubmitRequest(draft) => self.submit(draft),
            SectionAction::NewRequest => self.thanked = None,
            SectionAction::ClearSearch => {
                self.search_term = None;
                self.result_ids.clear();
            }
            _ => return None,
        }
        Some(self.view(ctx))
    }

    fn submit(&mut self, draft: &RequestDraft) {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "rejected incomplete song request");
            return;
        }
        let song_title = draft.song_title.trim();
        info!(song = %song_title, "song request received");
        self.thanked = Some(song_title.to_string());
    }

    fn view(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        let recent = ctx
            .store
            .requests()
            .iter()
            .map(|request| RequestItem {
                song_title: request.song_title.clone(),
                requester: request.requester.clone(),
                date: long_date(request.date),
                matched: self.result_ids.contains(&request.id),
            })
            .collect();

        let banner = self.search_term.as_ref().map(|term| SearchBanner {
            term: term.clone(),
            count: self.result_ids.len(),
            clear: Control::new(
                "search:clear",
                "Clear search",
                Action::Section(SectionAction::ClearSearch),
            ),
        });

        let form = match &self.thanked {
            Some(song_title) => RequestFormView::Submitted {
                song_title: song_title.clone(),
                again: Control::new(
                    "request:again",
                    "Make another request",
                    Action::Section(SectionAction::NewRequest),
                ),
            },
            None => RequestFormView::Ready {
                open: Control::new("request:open", "Request a song", Action::OpenRequestForm),
            },
        };

        ViewOutput {
            section: SectionName::Request,
            heading: "Song Request Form".to_string(),
            subtitle: "Would you like to hear a particular song? Let us know!".to_string(),
            body: SectionView::Request(RequestView { banner, form, recent }),
            scroll_to: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::codec::Location;
    use crate::store::fixtures::request;
    use crate::store::ContentStore;
    use crate::view::Viewport;

    fn draft(name: &str, email: &str, title: &str) -> RequestDraft {
        RequestDraft {
            name: name.to_string(),
            email: email.to_string(),
            song_title: title.to_string(),
            ..RequestDraft::default()
        }
    }

    #[test]
    fn missing_fields_are_reported() {
        assert_eq!(draft("", "nope", " ").missing_fields(), vec!["Your Name", "Email", "Song Title"]);
        assert!(draft("Ama", "ama@example.com", "The Prayer").missing_fields().is_empty());
    }

    fn context<'a>(store: &'a ContentStore, base: &'a Location) -> RenderContext<'a> {
        RenderContext {
            store,
            viewport: Viewport::Desktop,
            share_base: base,
            site_title: "EazyChoir",
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            copy_feedback: Duration::from_millis(2000),
        }
    }

    #[test]
    fn submission_thanks_and_lists_first() {
        let mut store = ContentStore::new(
            Vec::new(),
            Vec::new(),
            vec![request(1, "The Prayer", "Maria S.")],
            Vec::new(),
        )
        .unwrap();
        let base = Location::parse("https://eazychoir.app/").unwrap();

        let mut section = RequestSection::default();
        section.render(&context(&store, &base), &RenderOptions::default());
        let rejected = section
            .apply(
                &context(&store, &base),
                &SectionAction::SubmitRequest(draft("Ama", "", "Oceans")),
            )
            .unwrap();
        assert_eq!(rejected.bindings_for("request:open"), 1);

        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(store.add_request("Oceans", "Ama", today).id, 2);
        let ctx = context(&store, &base);
        let view = section
            .apply(
                &ctx,
                &SectionAction::SubmitRequest(draft("Ama", "ama@example.com", " Oceans ")),
            )
            .unwrap();
        let SectionView::Request(body) = view.body else {
            panic!("expected the request view");
        };
        assert_eq!(
            body.form,
            RequestFormView::Submitted {
                song_title: "Oceans".to_string(),
                again: Control::new(
                    "request:again",
                    "Make another request",
                    Action::Section(SectionAction::NewRequest)
                ),
            }
        );
        assert_eq!(body.recent[0].song_title, "Oceans");
        assert_eq!(body.recent[0].date, "June 1, 2025");
        assert_eq!(body.recent.len(), 2);

        let again = section.render(&ctx, &RenderOptions::default());
        assert_eq!(again.bindings_for("request:open"), 1);
    }
}
