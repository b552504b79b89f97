use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, warn};

use super::{RenderContext, RenderOptions, SectionName};
use crate::codec::{encode_share_url, entry_keys, resolve_highlight, EntryKey, ScheduleId};
use crate::error::ShellError;
use crate::models::{Schedule, ServiceSlot};
use crate::search::SourceRef;
use crate::view::{
    Action, Control, EntryView, ScheduleLayout, ScheduleView, SectionAction, SectionView, ViewOutput, Viewport,
};

const MONTHS: [&str; 24] = [
    "january", "jan", "february", "feb", "march", "mar", "april", "apr", "may", "june", "jun", "july", "jul",
    "august", "aug", "september", "sep", "sept", "october", "oct", "november", "nov", "december", "dec",
];

const WEEKDAYS: [&str; 17] = [
    "sunday", "sun", "monday", "mon", "tuesday", "tue", "tues", "wednesday", "wed", "thursday", "thu", "thur",
    "thurs", "friday", "fri", "saturday", "sat",
];

const COLOR_NAMES: [(&str, &str); 10] = [
    ("#4a88f9", "Blue"),
    ("#32a852", "Green"),
    ("#e63946", "Red"),
    ("#ffb703", "Yellow"),
    ("#8338ec", "Purple"),
    ("#ffffff", "White"),
    ("#000000", "Black"),
    ("#8b4513", "Brown"),
    ("#ffc0cb", "Pink"),
    ("#cccccc", "Gray"),
];

/// The choir rota. Per-entry state is keyed by [`EntryKey`], so entries whose
/// derived ids collide never share a highlight, a panel or a control.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSection {
    search_term: Option<String>,
    result_ids: BTreeSet<ScheduleId>,
    expanded: BTreeSet<EntryKey>,
    highlighted: Option<EntryKey>,
    share_open: Option<EntryKey>,
    copied: Option<(EntryKey, Instant)>,
    pending_scroll: Option<EntryKey>,
    missing: Option<ScheduleId>,
}

impl ScheduleSection {
    pub(super) fn render(&mut self, ctx: &RenderContext<'_>, options: &RenderOptions) -> ViewOutput {
        *self = Self::default();
        self.search_term = options.search_term.clone();
        self.result_ids = options
            .search_results
            .iter()
            .filter_map(|result| match &result.source {
                SourceRef::Schedule { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect();

        let sorted = ctx.store.sorted_schedules();
        let keys = entry_keys(&sorted);

        if self.search_term.is_some() && ctx.viewport == Viewport::Mobile {
            let matched: Vec<EntryKey> = sorted
                .iter()
                .zip(&keys)
                .filter(|(schedule, (id, _))| self.is_search_match(schedule) || self.result_ids.contains(id))
                .map(|(_, (_, key))| key.clone())
                .collect();
            self.pending_scroll = matched.first().cloned();
            self.expanded.extend(matched);
        }

        if let Some(target) = &options.highlight_schedule {
            match resolve_highlight(target, &sorted) {
                Some(index) => self.highlight(keys[index].1.clone()),
                None => {
                    let err = ShellError::lookup_miss("Schedule", target.as_str());
                    warn!(error = %err, "highlight target is not on the rota");
                    self.missing = Some(target.clone());
                }
            }
        }

        self.view(ctx)
    }

    pub(super) fn apply(&mut self, ctx: &RenderContext<'_>, action: &SectionAction) -> Option<ViewOutput> {
        match action {
            SectionAction::ToggleEntry(key) => {
                if !self.expanded.remove(key) {
                    self.expanded.insert(key.clone());
                }
            }
            SectionAction::HighlightEntry(key) => self.highlight(key.clone()),
            SectionAction::ToggleSharePanel(key) => {
                self.share_open = if self.share_open.as_ref() == Some(key) {
                    None
                } else {
                    Some(key.clone())
                };
            }
            _ => return None,
        }
        Some(self.view(ctx))
    }

    /// The feedback goes to the entry whose panel is open when it carries
    /// `id`, otherwise to the first entry with that id.
    pub(super) fn mark_copied(&mut self, ctx: &RenderContext<'_>, id: &ScheduleId, now: Instant) -> ViewOutput {
        let sorted = ctx.store.sorted_schedules();
        let open_matches = self.share_open.as_ref().is_some_and(|open| {
            entry_keys(&sorted)
                .iter()
                .any(|(candidate, key)| candidate == id && key == open)
        });
        let key = match &self.share_open {
            Some(open) if open_matches => open.clone(),
            _ => EntryKey::from(id),
        };
        self.copied = Some((key, now));
        self.view(ctx)
    }

    pub(super) fn expire(&mut self, ctx: &RenderContext<'_>, now: Instant) -> Option<ViewOutput> {
        let (_, at) = self.copied.as_ref()?;
        if now.duration_since(*at) < ctx.copy_feedback {
            return None;
        }
        self.copied = None;
        Some(self.view(ctx))
    }

    /// Highlight one entry, clearing any other, expand it and ask the host to
    /// bring it into view.
    fn highlight(&mut self, key: EntryKey) {
        debug!(entry = %key, "highlighting schedule entry");
        self.expanded.insert(key.clone());
        self.pending_scroll = Some(key.clone());
        self.highlighted = Some(key);
    }

    fn is_search_match(&self, schedule: &Schedule) -> bool {
        let Some(term) = &self.search_term else {
            return false;
        };
        let date_text = schedule.formatted_date().to_lowercase();
        row_text(schedule).contains(term.as_str()) || matches_date_search(&date_text, term)
    }

    fn view(&mut self, ctx: &RenderContext<'_>) -> ViewOutput {
        let layout = match ctx.viewport {
            Viewport::Desktop => ScheduleLayout::Table,
            Viewport::Mobile => ScheduleLayout::Cards,
        };

        let sorted = ctx.store.sorted_schedules();
        let entries = sorted
            .iter()
            .zip(entry_keys(&sorted))
            .map(|(schedule, (id, key))| self.entry_view(ctx, schedule, id, key, layout))
            .collect();

        ViewOutput {
            section: SectionName::Schedule,
            heading: "Choir Schedule".to_string(),
            subtitle: "Upcoming services, ministers and song lists".to_string(),
            body: SectionView::Schedule(ScheduleView {
                layout,
                entries,
                search_term: self.search_term.clone(),
                notice: self
                    .missing
                    .as_ref()
                    .map(|id| format!("Schedule {id} is not available")),
            }),
            scroll_to: self.pending_scroll.take().map(|key| key.to_string()),
        }
    }

    fn entry_view(
        &self,
        ctx: &RenderContext<'_>,
        schedule: &Schedule,
        id: ScheduleId,
        key: EntryKey,
        layout: ScheduleLayout,
    ) -> EntryView {
        let date_label = schedule.formatted_date();
        let date_match = self
            .search_term
            .as_deref()
            .is_some_and(|term| matches_date_search(&date_label.to_lowercase(), term));
        let share_open = self.share_open.as_ref() == Some(&key);

        EntryView {
            slots: ServiceSlot::ALL
                .into_iter()
                .map(|slot| (slot, schedule.songs_for(slot).to_vec()))
                .collect(),
            minister: schedule.minister.clone(),
            colors: schedule.color.clone(),
            color_names: color_names(&schedule.color),
            expanded: self.expanded.contains(&key),
            highlighted: self.highlighted.as_ref() == Some(&key),
            search_match: self.result_ids.contains(&id) || self.is_search_match(schedule),
            date_match,
            share_url: encode_share_url(ctx.share_base, &id),
            share_open,
            copied: self.copied.as_ref().is_some_and(|(copied, _)| copied == &key),
            select: Control::new(
                format!("{key}:date"),
                date_label.clone(),
                Action::Section(SectionAction::HighlightEntry(key.clone())),
            ),
            toggle: (layout == ScheduleLayout::Cards).then(|| {
                Control::new(
                    format!("{key}:toggle"),
                    "Details",
                    Action::Section(SectionAction::ToggleEntry(key.clone())),
                )
            }),
            share: Control::new(
                format!("{key}:share"),
                "Share",
                Action::Section(SectionAction::ToggleSharePanel(key.clone())),
            ),
            copy: share_open.then(|| Control::new(format!("{key}:copy"), "Copy link", Action::Share(id.clone()))),
            date_label,
            id,
            key,
        }
    }
}

/// Lower-cased text of a whole row: date, minister, songs and colours.
fn row_text(schedule: &Schedule) -> String {
    let mut text = format!("{} {}", schedule.formatted_date(), schedule.minister);
    for (_, title) in schedule.all_songs() {
        text.push(' ');
        text.push_str(title);
    }
    text.push(' ');
    text.push_str(&color_names(&schedule.color));
    text.to_lowercase()
}

/// Whether a lower-cased search term refers to a lower-cased display date:
/// plain containment, a month or weekday name, a 4-digit year, or a day of
/// the month (optionally written as `2nd`, `23rd`...).
pub fn matches_date_search(date_text: &str, term: &str) -> bool {
    if date_text.contains(term) {
        return true;
    }
    let named = |names: &[&str]| {
        names
            .iter()
            .any(|name| term.contains(name) && date_text.contains(name))
    };
    if named(&MONTHS[..]) || named(&WEEKDAYS[..]) {
        return true;
    }

    let term_words: Vec<&str> = words(term).collect();
    if let Some(year) = term_words
        .iter()
        .find(|word| word.len() == 4 && word.starts_with("20") && word.chars().all(|c| c.is_ascii_digit()))
    {
        if date_text.contains(year) {
            return true;
        }
    }

    let day = term_words.iter().find(|word| {
        !word.starts_with('0') && word.parse::<u32>().is_ok_and(|n| (1..=31).contains(&n))
    });
    if let Some(day) = day {
        return words(date_text).any(|word| {
            word == *day
                || word
                    .strip_prefix(day)
                    .is_some_and(|suffix| matches!(suffix, "st" | "nd" | "rd" | "th"))
        });
    }
    false
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
}

fn color_name(hex: &str) -> &'static str {
    let hex = hex.trim().to_lowercase();
    COLOR_NAMES
        .iter()
        .find(|(code, _)| *code == hex)
        .map(|(_, name)| *name)
        .unwrap_or("Custom")
}

/// `Blue`, `Black & White`, `Red, White & Blue`.
pub fn color_names(colors: &[String]) -> String {
    let names: Vec<&str> = colors.iter().map(|hex| color_name(hex)).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} & {last}", rest.join(", ")),
    }
}
