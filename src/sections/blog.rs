use std::collections::BTreeSet;

use tracing::warn;

use super::{RenderContext, RenderOptions, SectionName};
use crate::models::{long_date, Article};
use crate::search::SourceRef;
use crate::view::{
    Action, ArticleCard, BlogView, Control, FilterChip, SearchBanner, SectionAction, SectionView, ViewOutput,
};

#[derive(Debug, Clone, Default)]
pub struct BlogSection {
    tag: Option<String>,
    reading: Option<i64>,
    search_term: Option<String>,
    result_ids: BTreeSet<i64>,
}

impl BlogSection {
    pub(super) fn render(&mut self, ctx: &RenderContext<'_>, options: &RenderOptions) -> ViewOutput {
        *self = Self::default();
        self.search_term = options.search_term.clone();
        self.result_ids = options
            .search_results
            .iter()
            .filter_map(|result| match result.source {
                SourceRef::Article(id) => Some(id),
                _ => None,
            })
            .collect();
        self.view(ctx)
    }

    pub(super) fn apply(&mut self, ctx: &RenderContext<'_>, action: &SectionAction) -> Option<ViewOutput> {
        match action {
            SectionAction::FilterArticles(tag) => self.tag = tag.clone(),
            SectionAction::ReadArticle(id) => self.reading = Some(*id),
            SectionAction::BackToArticles => self.reading = None,
            SectionAction::ClearSearch => {
                self.search_term = None;
                self.result_ids.clear();
            }
            _ => return None,
        }
        Some(self.view(ctx))
    }

    fn is_listed(&self, article: &Article) -> bool {
        let searched = self.search_term.is_none() || self.result_ids.contains(&article.id);
        let tagged = self
            .tag
            .as_ref()
            .map_or(true, |tag| article.tags.contains(tag));
        searched && tagged
    }

    fn view(&self, ctx: &RenderContext<'_>) -> ViewOutput {
        let back = || {
            Control::new(
                "article:back",
                "Back to articles",
                Action::Section(SectionAction::BackToArticles),
            )
        };

        let body = match self.reading {
            Some(id) => match ctx.store.article_by_id(id) {
                Ok(article) => BlogView::Single {
                    title: article.title.clone(),
                    meta: meta(article),
                    tags: article.tags.clone(),
                    content: article.content.clone(),
                    back: back(),
                },
                Err(err) => {
                    warn!(error = %err, "article unavailable");
                    BlogView::NotFound {
                        message: "Article not found".to_string(),
                        back: back(),
                    }
                }
            },
            None => self.list(ctx),
        };

        ViewOutput {
            section: SectionName::Blog,
            heading: "Choir Blog".to_string(),
            subtitle: "News, tips and stories from the choir".to_string(),
            body: SectionView::Blog(body),
            scroll_to: None,
        }
    }

    fn list(&self, ctx: &RenderContext<'_>) -> BlogView {
        let mut filters = vec![FilterChip {
            control: Control::new(
                "tag:all",
                "All",
                Action::Section(SectionAction::FilterArticles(None)),
            ),
            active: self.tag.is_none(),
        }];
        filters.extend(ctx.store.article_tags().into_iter().map(|tag| FilterChip {
            active: self.tag.as_deref() == Some(tag.as_str()),
            control: Control::new(
                format!("tag:{tag}"),
                tag.clone(),
                Action::Section(SectionAction::FilterArticles(Some(tag))),
            ),
        }));

        let articles: Vec<ArticleCard> = ctx
            .store
            .articles()
            .iter()
            .filter(|article| self.is_listed(article))
            .map(|article| ArticleCard {
                id: article.id,
                title: article.title.clone(),
                meta: meta(article),
                excerpt: article.excerpt.clone(),
                tags: article.tags.clone(),
                read_more: Control::new(
                    format!("article:{}", article.id),
                    "Read more",
                    Action::Section(SectionAction::ReadArticle(article.id)),
                ),
            })
            .collect();

        let banner = self.search_term.as_ref().map(|term| SearchBanner {
            term: term.clone(),
            count: articles.len(),
            clear: Control::new(
                "search:clear",
                "Clear search",
                Action::Section(SectionAction::ClearSearch),
            ),
        });

        BlogView::List {
            filters,
            banner,
            articles,
        }
    }
}

fn meta(article: &Article) -> String {
    format!("By {} | {}", article.author, long_date(article.date))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::codec::Location;
    use crate::store::fixtures::article;
    use crate::store::ContentStore;
    use crate::view::Viewport;

    fn store() -> ContentStore {
        let mut history = article(2, "The History of Choral Music", "Dr. Robert Johnson", "Gregorian chants");
        history.tags = vec!["History".to_string()];
        ContentStore::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![article(1, "Vocal Techniques", "Elena Martinez", "Breathing"), history],
        )
        .unwrap()
    }

    fn blog(view: ViewOutput) -> BlogView {
        match view.body {
            SectionView::Blog(blog) => blog,
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn tag_filter_read_more_and_missing_article() {
        let store = store();
        let base = Location::parse("https://eazychoir.app/").unwrap();
        let ctx = RenderContext {
            store: &store,
            viewport: Viewport::Desktop,
            share_base: &base,
            site_title: "EazyChoir",
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            copy_feedback: Duration::from_millis(2000),
        };
        let mut section = BlogSection::default();
        section.render(&ctx, &RenderOptions::default());

        let filtered = blog(
            section
                .apply(&ctx, &SectionAction::FilterArticles(Some("History".to_string())))
                .unwrap(),
        );
        let BlogView::List { articles, .. } = filtered else {
            panic!("expected the list");
        };
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].meta, "By Dr. Robert Johnson | May 12, 2025");

        let single = blog(section.apply(&ctx, &SectionAction::ReadArticle(2)).unwrap());
        assert!(matches!(single, BlogView::Single { ref content, .. } if content == "Gregorian chants"));

        let missing = blog(section.apply(&ctx, &SectionAction::ReadArticle(9)).unwrap());
        assert!(matches!(missing, BlogView::NotFound { ref message, .. } if message == "Article not found"));

        let back = blog(section.apply(&ctx, &SectionAction::BackToArticles).unwrap());
        assert!(matches!(back, BlogView::List { .. }));
    }

    #[test]
    fn search_keeps_only_hit_articles() {
        let store = store();
        let base = Location::parse("https://eazychoir.app/").unwrap();
        let ctx = RenderContext {
            store: &store,
            viewport: Viewport::Desktop,
            share_base: &base,
            site_title: "EazyChoir",
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            copy_feedback: Duration::from_millis(2000),
        };
        let crate::search::RoutingDecision::Route { section, term, results, .. } =
            crate::search::search(&store, "gregorian")
        else {
            panic!("expected a route");
        };
        assert_eq!(section, SectionName::Blog);
        let view = BlogSection::default().render(&ctx, &RenderOptions::default().with_search(term, results));
        let BlogView::List { articles, banner, .. } = blog(view) else {
            panic!("expected the list");
        };
        assert_eq!(articles.len(), 1);
        assert_eq!(banner.map(|b| b.count), Some(1));
    }
}
