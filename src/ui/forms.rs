use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::view::RequestDraft;

/// Form state for the song request modal.
#[derive(Default, Clone)]
pub(crate) struct RequestForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) song_title: String,
    pub(crate) composer: String,
    pub(crate) reason: String,
    pub(crate) active: RequestField,
    pub(crate) error: Option<String>,
}

/// Fields of the request form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum RequestField {
    #[default]
    Name,
    Email,
    SongTitle,
    Composer,
    Reason,
}

impl RequestField {
    pub(crate) const ALL: [RequestField; 5] = [
        RequestField::Name,
        RequestField::Email,
        RequestField::SongTitle,
        RequestField::Composer,
        RequestField::Reason,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            RequestField::Name => "Your Name",
            RequestField::Email => "Email",
            RequestField::SongTitle => "Song Title",
            RequestField::Composer => "Composer/Artist",
            RequestField::Reason => "Why this song?",
        }
    }

    fn required(self) -> bool {
        matches!(
            self,
            RequestField::Name | RequestField::Email | RequestField::SongTitle
        )
    }

    fn index(self) -> usize {
        RequestField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

impl RequestForm {
    fn value(&self, field: RequestField) -> &String {
        match field {
            RequestField::Name => &self.name,
            RequestField::Email => &self.email,
            RequestField::SongTitle => &self.song_title,
            RequestField::Composer => &self.composer,
            RequestField::Reason => &self.reason,
        }
    }

    fn value_mut(&mut self, field: RequestField) -> &mut String {
        match field {
            RequestField::Name => &mut self.name,
            RequestField::Email => &mut self.email,
            RequestField::SongTitle => &mut self.song_title,
            RequestField::Composer => &mut self.composer,
            RequestField::Reason => &mut self.reason,
        }
    }

    /// Move focus to the next field, wrapping around.
    pub(crate) fn toggle_field(&mut self) {
        let next = (self.active.index() + 1) % RequestField::ALL.len();
        self.active = RequestField::ALL[next];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = RequestField::ALL.len();
        let previous = (self.active.index() + len - 1) % len;
        self.active = RequestField::ALL[previous];
    }

    /// Insert a character into the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        self.error = None;
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Validate and trim the inputs.
    pub(crate) fn parse_inputs(&self) -> Result<RequestDraft> {
        let draft = RequestDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            song_title: self.song_title.trim().to_string(),
            composer: self.composer.trim().to_string(),
            reason: self.reason.trim().to_string(),
        };
        let missing = draft.missing_fields();
        if let Some(first) = missing.first() {
            return Err(anyhow!("{first} is required."));
        }
        Ok(draft)
    }

    /// Render a styled line for the modal form.
    pub(crate) fn build_line(&self, field: RequestField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            if field.required() { "<required>" } else { "<optional>" }.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self, field: RequestField) -> usize {
        self.value(field).chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_both_ways() {
        let mut form = RequestForm::default();
        form.previous_field();
        assert_eq!(form.active, RequestField::Reason);
        form.toggle_field();
        form.toggle_field();
        assert_eq!(form.active, RequestField::Email);
    }

    #[test]
    fn typing_goes_to_active_field() {
        let mut form = RequestForm::default();
        for ch in "Ama".chars() {
            form.push_char(ch);
        }
        assert!(!form.push_char('\n'));
        form.toggle_field();
        form.push_char('x');
        form.backspace();
        assert_eq!(form.name, "Ama");
        assert_eq!(form.value_len(RequestField::Email), 0);
    }

    #[test]
    fn parse_reports_first_missing_field() {
        let mut form = RequestForm {
            name: "Ama".to_string(),
            email: "ama@example.com".to_string(),
            ..RequestForm::default()
        };
        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.to_string(), "Song Title is required.");

        form.song_title = "  Oceans ".to_string();
        let draft = form.parse_inputs().unwrap();
        assert_eq!(draft.song_title, "Oceans");
        assert!(draft.composer.is_empty());
    }
}
