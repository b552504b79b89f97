use std::mem;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::codec::Location;
use crate::config::Config;
use crate::router::{Dispatch, NoticeKind, Router};
use crate::search::Debouncer;
use crate::sections::{RenderOptions, SectionName};
use crate::view::{Action, SectionAction, Viewport};

use super::draw::render_lines;
use super::forms::{RequestField, RequestForm};
use super::helpers::{centered_rect, surface_error};
use super::host::TerminalHost;

/// Footer space reserved for the notification and key hints.
const FOOTER_HEIGHT: u16 = 3;
const NAV_HEIGHT: u16 = 3;
const PAGE: i32 = 10;

/// Input modes layered over the visible section.
enum Mode {
    Normal,
    Searching(SearchState),
    RequestForm(RequestForm),
}

/// Query typed into the search bar.
#[derive(Default)]
struct SearchState {
    query: String,
}

/// Terminal application: keyboard input in, router calls out.
pub struct App {
    router: Router,
    host: TerminalHost,
    mode: Mode,
    debouncer: Debouncer,
    min_chars: usize,
    breakpoint: u16,
}

impl App {
    pub fn new(router: Router, host: TerminalHost, config: &Config) -> Self {
        Self {
            router,
            host,
            mode: Mode::Normal,
            debouncer: Debouncer::new(config.search_debounce()),
            min_chars: config.search_min_chars,
            breakpoint: config.mobile_breakpoint,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn host(&self) -> &TerminalHost {
        &self.host
    }

    /// Size the host to the terminal and open the first section.
    pub fn start(&mut self, width: u16, height: u16, location: Option<Location>) {
        self.host
            .set_content_area(width.saturating_sub(2), height.saturating_sub(FOOTER_HEIGHT + NAV_HEIGHT + 2));
        self.router.handle_resize(&mut self.host, Viewport::from_width(width, self.breakpoint));
        self.router.cold_start(&mut self.host, location);
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::RequestForm(form) => self.handle_request_form(code, form)?,
        };
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => self.host.dismiss_notification(),
            KeyCode::Char(ch @ '1'..='5') => {
                let index = ch as usize - '1' as usize;
                self.go_to(SectionName::ALL[index]);
            }
            KeyCode::Char('h') | KeyCode::Home => self.go_to(SectionName::Home),
            KeyCode::Tab => self.cycle_section(1),
            KeyCode::BackTab => self.cycle_section(-1),
            KeyCode::Char('/') => return Ok(Mode::Searching(SearchState::default())),
            KeyCode::Up | KeyCode::Char('k') => self.host.move_focus(-1),
            KeyCode::Down | KeyCode::Char('j') => self.host.move_focus(1),
            KeyCode::PageUp => self.host.scroll_by(-PAGE),
            KeyCode::PageDown => self.host.scroll_by(PAGE),
            KeyCode::Backspace | KeyCode::Char('[') => {
                self.router.back(&mut self.host);
            }
            KeyCode::Char(']') => {
                self.router.forward(&mut self.host);
            }
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(self.activate_focused()),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.debouncer.cancel();
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                self.debouncer.cancel();
                self.router.search(&mut self.host, &state.query);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => {
                state.query.pop();
                self.queue_live_search(&state.query);
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
                self.queue_live_search(&state.query);
            }
            _ => {}
        }
        Ok(Mode::Searching(state))
    }

    fn handle_request_form(&mut self, code: KeyCode, mut form: RequestForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => return Ok(Mode::Normal),
            KeyCode::Tab | KeyCode::Down => form.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(draft) => {
                    let action = Action::Section(SectionAction::SubmitRequest(draft));
                    self.router.dispatch(&mut self.host, action);
                    return Ok(Mode::Normal);
                }
                Err(err) => form.error = Some(surface_error(&err)),
            },
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Ok(Mode::RequestForm(form))
    }

    /// Live search fires only once the query is long enough.
    fn queue_live_search(&mut self, query: &str) {
        if query.trim().chars().count() >= self.min_chars {
            self.debouncer.input(query, Instant::now());
        } else {
            self.debouncer.cancel();
        }
    }

    fn go_to(&mut self, section: SectionName) {
        self.router.navigate(&mut self.host, section, RenderOptions::default());
    }

    fn cycle_section(&mut self, delta: isize) {
        let len = SectionName::ALL.len() as isize;
        let current = self.router.active() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.go_to(SectionName::ALL[next]);
    }

    fn activate_focused(&mut self) -> Mode {
        let Some(action) = self.host.focused_control().map(|control| control.action.clone()) else {
            return Mode::Normal;
        };
        match self.router.dispatch(&mut self.host, action) {
            Dispatch::Host(Action::OpenRequestForm) => Mode::RequestForm(RequestForm::default()),
            Dispatch::Host(other) => {
                debug!(?other, "action has no terminal handler");
                Mode::Normal
            }
            Dispatch::Handled | Dispatch::Ignored => Mode::Normal,
        }
    }

    /// Timers: debounced search, copy feedback and notification expiry.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            self.router.search(&mut self.host, &query);
        }
        self.router.tick(&mut self.host, now);
        self.host.expire(now);
    }

    pub fn handle_resize(&mut self, width: u16) {
        let viewport = Viewport::from_width(width, self.breakpoint);
        self.router.handle_resize(&mut self.host, viewport);
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(NAV_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_nav(frame, chunks[0]);
        self.draw_content(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::RequestForm(form) => self.draw_request_form(frame, area, form),
            Mode::Normal => self.draw_link_popup(frame, area),
        }
    }

    fn draw_nav(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = SectionName::ALL
            .iter()
            .enumerate()
            .map(|(index, section)| Line::from(format!("{} {}", index + 1, section.title())))
            .collect();
        let selected = self.host.nav_active().unwrap_or(SectionName::Home) as usize;
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(self.router.settings().site_title.clone()))
            .select(selected)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_content(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        self.host.set_content_area(inner.width, inner.height);

        let focused = self.host.focused_key();
        let lines = self
            .host
            .visible_view()
            .map(|view| render_lines(view, focused.as_deref(), inner.width).lines)
            .unwrap_or_default();

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.host.scroll(), 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match self.host.notification() {
            Some(notification) => {
                let style = match notification.kind {
                    NoticeKind::Info => Style::default().fg(Color::Cyan),
                    NoticeKind::Success => Style::default().fg(Color::Green),
                    NoticeKind::Error => Style::default().fg(Color::Red),
                };
                Line::from(Span::styled(notification.message.clone(), style))
            }
            None => Line::from(""),
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hint = |key: &'static str, label: &'static str| {
            vec![Span::styled(key, key_style), Span::raw(label)]
        };
        let spans = match &self.mode {
            Mode::Searching(_) => [hint("[Enter]", " Search   "), hint("[Esc]", " Cancel")].concat(),
            Mode::RequestForm(_) => [
                hint("[Tab]", " Next Field   "),
                hint("[Enter]", " Submit   "),
                hint("[Esc]", " Cancel"),
            ]
            .concat(),
            Mode::Normal => [
                hint("[1-5]", " Sections   "),
                hint("[↑↓]", " Move   "),
                hint("[Enter]", " Select   "),
                hint("[/]", " Search   "),
                hint("[[ ]]", " Back/Forward   "),
                hint("[q]", " Quit"),
            ]
            .concat(),
        };
        Line::from(spans)
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_request_form(&self, frame: &mut Frame, area: Rect, form: &RequestForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Request a Song").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = RequestField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to submit • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let row = RequestField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let prefix = form.active.label().len() as u16 + 2;
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y + row));
    }

    /// Shows the link for manual copying, after a failed share or a clipboard
    /// write the terminal cannot confirm.
    fn draw_link_popup(&self, frame: &mut Frame, area: Rect) {
        let Some(notification) = self.host.notification() else {
            return;
        };
        let Some(link) = notification.link.clone() else {
            return;
        };
        let intro = match notification.kind {
            NoticeKind::Success => "Sent to the clipboard. If it did not arrive, copy it from here:",
            _ => "Copy this link to share the schedule:",
        };
        let popup_area = centered_rect(80, 30, area);
        frame.render_widget(Clear, popup_area);
        let block = Block::default().title("Share Link").borders(Borders::ALL);
        let lines = vec![
            Line::from(intro),
            Line::from(""),
            Line::from(Span::styled(link, Style::default().fg(Color::Yellow))),
            Line::from(""),
            Line::from(Span::styled("Esc to close", Style::default().fg(Color::Gray))),
        ];
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}
