//! Turn a [`ViewOutput`] into terminal lines.
//!
//! Everything is laid out as plain lines so the host can scroll precisely
//! and knows on which line each control sits.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::helpers::fit_column;
use crate::models::ServiceSlot;
use crate::view::{
    BlogView, Control, EntryView, FilterChip, HomeView, PlaylistView, RequestFormView, RequestView, ScheduleLayout,
    ScheduleView, SearchBanner, SectionView, SongDetailView, ViewOutput,
};

const DATE_WIDTH: usize = 17;
const MINISTER_WIDTH: usize = 15;
const SLOT_WIDTH: usize = 12;

/// Lines of one view plus the line index of every control.
pub(crate) struct Rendered {
    pub(crate) lines: Vec<Line<'static>>,
    pub(crate) anchors: Vec<(String, usize)>,
}

impl Rendered {
    pub(crate) fn line_of(&self, key: &str) -> Option<usize> {
        self.anchors
            .iter()
            .find(|(anchor, _)| anchor == key)
            .map(|(_, line)| *line)
    }
}

struct Builder<'a> {
    lines: Vec<Line<'static>>,
    anchors: Vec<(String, usize)>,
    focused: Option<&'a str>,
    width: usize,
}

impl<'a> Builder<'a> {
    fn push(&mut self, spans: Vec<Span<'static>>) {
        self.lines.push(Line::from(spans));
    }

    fn text(&mut self, text: impl Into<String>, style: Style) {
        self.push(vec![Span::styled(text.into(), style)]);
    }

    fn blank(&mut self) {
        self.lines.push(Line::from(""));
    }

    /// Word-wrap free text to the content width.
    fn wrapped(&mut self, text: &str, style: Style) {
        for paragraph in text.lines() {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > self.width {
                    self.text(std::mem::take(&mut current), style);
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
            self.text(current, style);
        }
    }

    /// Span for a control on the line about to be pushed.
    fn control(&mut self, control: &Control) -> Span<'static> {
        self.anchors.push((control.key.clone(), self.lines.len()));
        let style = if self.focused == Some(control.key.as_str()) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Span::styled(format!("[{}]", control.label), style)
    }

    fn section_title(&mut self, title: &str) {
        self.blank();
        self.text(title.to_string(), Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
    }

    fn chips(&mut self, label: &str, chips: &[FilterChip]) {
        let mut spans = vec![Span::raw(format!("{label} "))];
        for chip in chips {
            let mut span = self.control(&chip.control);
            if chip.active {
                span = span.patch_style(Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD));
            }
            spans.push(span);
            spans.push(Span::raw(" "));
        }
        self.push(spans);
    }

    fn banner(&mut self, banner: &SearchBanner, noun: &str) {
        let clear = self.control(&banner.clear);
        self.push(vec![
            Span::styled(
                format!(
                    "Showing results for: \"{}\" ({} {noun} found) ",
                    banner.term, banner.count
                ),
                Style::default().fg(Color::Yellow),
            ),
            clear,
        ]);
    }
}

pub(crate) fn render_lines(view: &ViewOutput, focused: Option<&str>, width: u16) -> Rendered {
    let mut builder = Builder {
        lines: Vec::new(),
        anchors: Vec::new(),
        focused,
        width: usize::from(width.max(20)),
    };
    builder.text(view.heading.clone(), Style::default().add_modifier(Modifier::BOLD));
    builder.text(view.subtitle.clone(), Style::default().fg(Color::Gray));
    builder.blank();

    match &view.body {
        SectionView::Home(home) => home_lines(&mut builder, home),
        SectionView::Schedule(schedule) => schedule_lines(&mut builder, schedule),
        SectionView::Playlist(playlist) => playlist_lines(&mut builder, playlist),
        SectionView::Request(request) => request_lines(&mut builder, request),
        SectionView::Blog(blog) => blog_lines(&mut builder, blog),
    }

    Rendered {
        lines: builder.lines,
        anchors: builder.anchors,
    }
}

fn home_lines(b: &mut Builder<'_>, home: &HomeView) {
    for line in &home.about {
        b.wrapped(line, Style::default());
    }
    let groups = [
        ("Upcoming Events", &home.upcoming),
        ("Featured Songs", &home.featured),
        ("Latest Articles", &home.latest),
    ];
    for (title, items) in groups {
        b.section_title(title);
        if items.is_empty() {
            b.text("Nothing here yet.", Style::default().fg(Color::DarkGray));
        }
        for item in items {
            let control = b.control(&item.control);
            b.push(vec![
                Span::styled(format!("{}  ", item.title), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("{}  ", item.detail), Style::default().fg(Color::Gray)),
                control,
            ]);
        }
    }
    b.blank();
    let mut spans = Vec::new();
    for link in &home.links {
        spans.push(b.control(link));
        spans.push(Span::raw(" "));
    }
    b.push(spans);
}

fn entry_style(entry: &EntryView) -> Style {
    if entry.highlighted {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if entry.search_match {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn date_span(b: &mut Builder<'_>, entry: &EntryView, width: usize) -> Span<'static> {
    b.anchors.push((entry.select.key.clone(), b.lines.len()));
    let mut style = entry_style(entry);
    if entry.date_match {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if b.focused == Some(entry.select.key.as_str()) {
        style = style.fg(Color::Black).bg(Color::Cyan);
    }
    Span::styled(fit_column(&entry.select.label, width), style)
}

fn share_lines(b: &mut Builder<'_>, entry: &EntryView, indent: &str) {
    let share = b.control(&entry.share);
    b.push(vec![
        Span::raw(format!("{indent}Colours: {}  ", entry.color_names)),
        share,
    ]);
    if let Some(copy) = &entry.copy {
        let copy = b.control(copy);
        let feedback = if entry.copied {
            Span::styled(" Copied!", Style::default().fg(Color::Green))
        } else {
            Span::raw("")
        };
        b.push(vec![
            Span::raw(format!("{indent}Link: {}  ", entry.share_url)),
            copy,
            feedback,
        ]);
    }
}

fn schedule_lines(b: &mut Builder<'_>, schedule: &ScheduleView) {
    if let Some(notice) = &schedule.notice {
        b.text(notice.clone(), Style::default().fg(Color::Red));
        b.blank();
    }
    if let Some(term) = &schedule.search_term {
        b.text(
            format!("Search results for \"{term}\" are highlighted."),
            Style::default().fg(Color::Yellow),
        );
        b.blank();
    }
    if schedule.entries.is_empty() {
        b.text("No services scheduled.", Style::default().fg(Color::DarkGray));
        return;
    }

    match schedule.layout {
        ScheduleLayout::Table => {
            let mut header = format!(
                "{} {}",
                fit_column("Date", DATE_WIDTH),
                fit_column("Minister", MINISTER_WIDTH)
            );
            for slot in ServiceSlot::ALL {
                header.push(' ');
                header.push_str(&fit_column(slot.label(), SLOT_WIDTH));
            }
            b.text(header, Style::default().add_modifier(Modifier::BOLD));
            for entry in &schedule.entries {
                let style = entry_style(entry);
                let mut spans = vec![date_span(b, entry, DATE_WIDTH)];
                spans.push(Span::styled(
                    format!(" {}", fit_column(&entry.minister, MINISTER_WIDTH)),
                    style,
                ));
                for (_, songs) in &entry.slots {
                    let cell = if songs.is_empty() {
                        "None".to_string()
                    } else {
                        songs.join(" / ")
                    };
                    spans.push(Span::styled(format!(" {}", fit_column(&cell, SLOT_WIDTH)), style));
                }
                b.push(spans);
                if entry.expanded || entry.share_open {
                    share_lines(b, entry, "    ");
                } else {
                    let share = b.control(&entry.share);
                    b.push(vec![Span::raw("    "), share]);
                }
            }
        }
        ScheduleLayout::Cards => {
            for entry in &schedule.entries {
                let marker = if entry.expanded { "v " } else { "> " };
                let mut spans = vec![Span::raw(marker), date_span(b, entry, entry.select.label.chars().count())];
                spans.push(Span::styled(format!("  {}  ", entry.minister), entry_style(entry)));
                if let Some(toggle) = &entry.toggle {
                    spans.push(b.control(toggle));
                }
                // Collapsed cards keep the share control on the header line.
                if !entry.expanded && !entry.share_open {
                    spans.push(Span::raw(" "));
                    spans.push(b.control(&entry.share));
                }
                b.push(spans);
                if entry.expanded {
                    for (slot, songs) in &entry.slots {
                        let songs = if songs.is_empty() {
                            "None".to_string()
                        } else {
                            songs.join(", ")
                        };
                        b.text(format!("    {}: {songs}", slot.label()), Style::default());
                    }
                    share_lines(b, entry, "    ");
                } else if entry.share_open {
                    share_lines(b, entry, "    ");
                }
                b.blank();
            }
        }
    }
}

fn playlist_lines(b: &mut Builder<'_>, playlist: &PlaylistView) {
    b.chips("Filter by:", &playlist.filters);
    if let Some(banner) = &playlist.banner {
        b.banner(banner, "songs");
    }
    b.blank();

    match &playlist.detail {
        Some(SongDetailView::Found {
            title,
            authors,
            categories,
            lyrics,
            play,
            close,
        }) => {
            b.text(title.clone(), Style::default().add_modifier(Modifier::BOLD));
            if !authors.is_empty() {
                b.text(format!("By {authors}"), Style::default().fg(Color::Gray));
            }
            b.text(format!("Category: {}", categories.join(", ")), Style::default().fg(Color::Gray));
            b.blank();
            b.wrapped(lyrics, Style::default());
            b.blank();
            let mut spans = Vec::new();
            if let Some(play) = play {
                spans.push(b.control(play));
                spans.push(Span::raw(" "));
            }
            spans.push(b.control(close));
            b.push(spans);
        }
        Some(SongDetailView::Unavailable { message, close }) => {
            b.text(message.clone(), Style::default().fg(Color::Red));
            let close = b.control(close);
            b.push(vec![close]);
        }
        None => {
            if playlist.songs.is_empty() {
                b.text("No songs match.", Style::default().fg(Color::DarkGray));
            }
            for card in &playlist.songs {
                let mut spans = vec![Span::styled(
                    format!("{}  ", card.title),
                    Style::default().add_modifier(Modifier::BOLD),
                )];
                if !card.authors.is_empty() {
                    spans.push(Span::styled(format!("{}  ", card.authors), Style::default().fg(Color::Gray)));
                }
                spans.push(b.control(&card.details));
                if let Some(play) = &card.play {
                    spans.push(Span::raw(" "));
                    spans.push(b.control(play));
                }
                b.push(spans);
            }
        }
    }
}

fn request_lines(b: &mut Builder<'_>, request: &RequestView) {
    if let Some(banner) = &request.banner {
        b.banner(banner, "requests");
        b.blank();
    }
    match &request.form {
        RequestFormView::Ready { open } => {
            let open = b.control(open);
            b.push(vec![Span::raw("Fill in the form to ask the choir for a song: "), open]);
        }
        RequestFormView::Submitted { song_title, again } => {
            b.text("Thank You!", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
            b.text(
                format!("Your request for \"{song_title}\" has been received."),
                Style::default(),
            );
            let again = b.control(again);
            b.push(vec![again]);
        }
    }

    b.section_title("Recent Requests");
    for item in &request.recent {
        let style = if item.matched {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        b.push(vec![
            Span::styled(item.song_title.clone(), style.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  requested by {} on {}", item.requester, item.date),
                Style::default().fg(Color::Gray),
            ),
        ]);
    }
}

fn blog_lines(b: &mut Builder<'_>, blog: &BlogView) {
    match blog {
        BlogView::List {
            filters,
            banner,
            articles,
        } => {
            b.chips("Tags:", filters);
            if let Some(banner) = banner {
                b.banner(banner, "articles");
            }
            if articles.is_empty() {
                b.blank();
                b.text("No articles match.", Style::default().fg(Color::DarkGray));
            }
            for card in articles {
                b.blank();
                b.text(card.title.clone(), Style::default().add_modifier(Modifier::BOLD));
                b.text(card.meta.clone(), Style::default().fg(Color::Gray));
                b.wrapped(&card.excerpt, Style::default());
                let read_more = b.control(&card.read_more);
                b.push(vec![
                    Span::styled(format!("{}  ", card.tags.join(", ")), Style::default().fg(Color::Magenta)),
                    read_more,
                ]);
            }
        }
        BlogView::Single {
            title,
            meta,
            tags,
            content,
            back,
        } => {
            b.text(title.clone(), Style::default().add_modifier(Modifier::BOLD));
            b.text(meta.clone(), Style::default().fg(Color::Gray));
            b.text(tags.join(", "), Style::default().fg(Color::Magenta));
            b.blank();
            b.wrapped(content, Style::default());
            b.blank();
            let back = b.control(back);
            b.push(vec![back]);
        }
        BlogView::NotFound { message, back } => {
            b.text(message.clone(), Style::default().fg(Color::Red));
            let back = b.control(back);
            b.push(vec![back]);
        }
    }
}
