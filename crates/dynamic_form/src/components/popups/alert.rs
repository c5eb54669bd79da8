use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::{Action, UiOutcome},
    components::{Component, PopupComponent},
    tui::{EventResponse, Frame},
};

use super::{centered_rect_fixed, draw_popup_frame};

/// Modal acknowledgment with a title and a message.
///
/// Enter / Esc emit `Action::UiOutcome(UiOutcome::RequestClose)`; the central
/// loop interprets the outcome and closes the popup.
pub struct AlertPopup {
    title: String,
    message: String,
    min_width: u16,
    min_height: u16,
}

impl AlertPopup {
    pub fn new<T: Into<String>, M: Into<String>>(title: T, message: M) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            min_width: 50,
            min_height: 7,
        }
    }

    /// Set a minimum width for the dialog (default: 50).
    pub fn min_width(mut self, w: u16) -> Self {
        self.min_width = w.max(20);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn ok_action(&self) -> Action {
        Action::UiOutcome(UiOutcome::RequestClose)
    }

    fn dialog_height(&self) -> u16 {
        // frame + message lines + spacer + hint
        let lines = self.message.lines().count().max(1) as u16;
        (lines + 4).max(self.min_height)
    }
}

impl Component for AlertPopup {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Enter => self.submit_action(),
            KeyCode::Esc => self.cancel_action(),
            _ => None,
        };
        // modal: swallow everything else
        Ok(Some(EventResponse::Stop(action.unwrap_or(Action::Update))))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Submit => Ok(Some(self.ok_action())),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        if area.width < 5 || area.height < 5 {
            return Ok(());
        }

        let dialog = centered_rect_fixed(area, self.min_width, self.dialog_height());
        let inner = draw_popup_frame(f, dialog, &self.title);

        let mut lines: Vec<Line> = self
            .message
            .lines()
            .map(|l| Line::from(Span::raw(l.to_string())))
            .collect();

        if inner.height >= 3 {
            lines.push(Line::raw(""));
        }

        let hint = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::White)),
            Span::raw(": OK   "),
            Span::styled("Esc", Style::default().fg(Color::White)),
            Span::raw(": Close"),
        ])
        .fg(Color::DarkGray);
        lines.push(hint);

        let para = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
        f.render_widget(para, inner);
        Ok(())
    }
}

impl PopupComponent for AlertPopup {
    fn submit_action(&mut self) -> Option<Action> {
        Some(self.ok_action())
    }

    fn cancel_action(&mut self) -> Option<Action> {
        Some(self.ok_action())
    }
}
