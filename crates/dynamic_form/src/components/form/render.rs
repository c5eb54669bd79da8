use color_eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::page::{visible_count, Focus, FormPage};
use crate::tui::Frame;

pub const HEADER: &str = "Dynamic Form Example";
pub const FOOTER: &str = "© Dynamic Form";

/// What the last frame showed; handy for tests and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRenderMetrics {
    pub total_fields: usize,
    pub visible_start: usize,
    pub visible_end: usize,
    pub thumb_y: Option<usize>,
    pub cursor: Option<(u16, u16)>,
}

/// Row of the scrollbar thumb inside a track of `track_height` cells.
///
/// `None` when everything fits (`total <= visible`) or the track is empty.
pub fn compute_scrollbar_thumb(
    total: usize,
    visible: usize,
    scroll: usize,
    track_height: u16,
) -> Option<usize> {
    if track_height == 0 || visible == 0 || total <= visible {
        return None;
    }
    let max_thumb = usize::from(track_height - 1);
    let max_scroll = total - visible;
    let scroll = scroll.min(max_scroll);
    Some((scroll * max_thumb + max_scroll / 2) / max_scroll)
}

pub fn render_form_page(
    page: &mut FormPage,
    f: &mut Frame<'_>,
    area: Rect,
) -> Result<FormRenderMetrics> {
    let has_fields = page.engine().has_fields();
    let [header, body, progress, hints, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(if has_fields { 3 } else { 0 }),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(HEADER.bold())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM)),
        header,
    );

    let metrics = render_body(page, f, body);

    if has_fields {
        render_progress(page, f, progress);
    }

    f.render_widget(Paragraph::new(hint_line(page)), hints);
    f.render_widget(
        Paragraph::new(FOOTER)
            .alignment(Alignment::Center)
            .fg(Color::DarkGray),
        footer,
    );

    Ok(metrics)
}

fn render_body(page: &mut FormPage, f: &mut Frame<'_>, area: Rect) -> FormRenderMetrics {
    let title = page.engine().form_label().unwrap_or("Form").to_string();
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // selector + blank above the fields, blank + submit below
    let capacity = inner.height.saturating_sub(4).max(1);
    page.ensure_visible(capacity);

    let engine = page.engine();
    let fields = engine.fields();
    let focus = page.focus();

    let mut lines: Vec<Line> = vec![page.selector().line(focus == Focus::Selector), Line::raw("")];

    if fields.is_empty() {
        lines.push(Line::from(Span::styled(
            "Choose a form type with Left/Right to begin.",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(Paragraph::new(Text::from(lines)), inner);
        return FormRenderMetrics {
            total_fields: 0,
            visible_start: 0,
            visible_end: 0,
            thumb_y: None,
            cursor: None,
        };
    }

    let heights: Vec<u16> = fields.iter().map(|field| page.field_height(field)).collect();
    let start = page.scroll();
    let end = start + visible_count(&heights, start, capacity);
    let mut cursor = None;

    for (index, field) in fields.iter().enumerate().take(end).skip(start) {
        let focused = focus == Focus::Field(index);
        let label_style = Style::default().fg(Color::White).add_modifier(if focused {
            Modifier::BOLD
        } else {
            Modifier::empty()
        });

        let mut spans = vec![Span::styled(field.label.clone(), label_style)];
        if field.required {
            spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }
        spans.push(Span::styled(": ", label_style));

        let label_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let value = page.display_value(index, field);
        let value_style = if focused {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::Cyan)
        };

        match field.input_hint() {
            Some(hint) if value.is_empty() && !(focused && page.is_editing()) => {
                spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
            }
            _ => spans.push(Span::styled(value, value_style)),
        }

        if focused && page.is_editing() {
            let x = inner.x as usize + label_width + page.input().visual_cursor();
            let y = inner.y as usize + lines.len();
            cursor = Some((x.min(u16::MAX as usize) as u16, y.min(u16::MAX as usize) as u16));
        }

        lines.push(Line::from(spans));

        if let Some(message) = engine.errors().message(&field.name) {
            lines.push(Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::raw(""));
    }

    let submit_style = if focus == Focus::Submit {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    if end == fields.len() {
        lines.push(Line::from(Span::styled("[ Submit ]", submit_style)));
    }

    let text_area = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    f.render_widget(Paragraph::new(Text::from(lines)), text_area);

    let thumb_y = compute_scrollbar_thumb(fields.len(), end - start, start, inner.height);
    if let Some(thumb) = thumb_y {
        let track = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        let track_lines: Vec<Line> = (0..track.height as usize)
            .map(|row| {
                if row == thumb {
                    Line::from(Span::styled("█", Style::default().fg(Color::Gray)))
                } else {
                    Line::from(Span::styled("│", Style::default().fg(Color::DarkGray)))
                }
            })
            .collect();
        f.render_widget(Paragraph::new(Text::from(track_lines)), track);
    }

    if let Some((x, y)) = cursor {
        if y < inner.y + inner.height {
            f.set_cursor_position((x, y));
        }
    }

    FormRenderMetrics {
        total_fields: fields.len(),
        visible_start: start,
        visible_end: end,
        thumb_y,
        cursor,
    }
}

fn render_progress(page: &FormPage, f: &mut Frame<'_>, area: Rect) {
    let progress = page.engine().progress().unwrap_or_default();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Progress ")
                .borders(Borders::ALL)
                .border_set(symbols::border::ROUNDED),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(progress.ratio())
        .label(progress.to_string());
    f.render_widget(gauge, area);
}

fn hint_line(page: &FormPage) -> Line<'static> {
    let pairs: &[(&'static str, &'static str)] = if page.is_editing() {
        &[("Enter/Tab", "Done"), ("Esc", "Revert")]
    } else if page.engine().has_fields() {
        &[
            ("Up/Down", "Navigate"),
            ("Left/Right", "Change"),
            ("Enter", "Edit"),
            ("Ctrl+S", "Submit"),
            ("q", "Quit"),
        ]
    } else {
        &[("Left/Right", "Form type"), ("q", "Quit")]
    };

    let mut spans = Vec::new();
    for (key, what) in pairs {
        spans.push(Span::styled(*key, Style::default().fg(Color::White)));
        spans.push(Span::raw(format!(": {what}   ")));
    }
    Line::from(spans).fg(Color::DarkGray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{action::Action, components::Component, engine::FormEngine};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(page: &mut FormPage, width: u16, height: u16) -> (String, FormRenderMetrics) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut metrics = None;
        terminal
            .draw(|f| {
                let area = f.area();
                metrics = Some(render_form_page(page, f, area).unwrap());
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        (text, metrics.unwrap())
    }

    fn page_with(form_type: &str) -> FormPage {
        let mut page = FormPage::new(FormEngine::default());
        page.update(Action::SelectFormType(form_type.into())).unwrap();
        page
    }

    #[test]
    fn empty_selection_renders_no_form() {
        let mut page = FormPage::new(FormEngine::default());
        let (text, metrics) = render(&mut page, 80, 24);
        assert!(text.contains(HEADER));
        assert!(text.contains("Select Form Type"));
        assert!(text.contains(FOOTER));
        assert!(!text.contains("[ Submit ]"));
        assert!(!text.contains('%'));
        assert_eq!(metrics.total_fields, 0);
    }

    #[test]
    fn renders_fields_errors_and_progress() {
        let mut page = page_with("userInfo");
        page.update(Action::SetFieldValue {
            name: "firstName".into(),
            value: "Ann".into(),
        })
        .unwrap();
        page.update(Action::Submit).unwrap();

        let (text, metrics) = render(&mut page, 80, 30);
        assert!(text.contains(" User Information "));
        assert!(text.contains("First Name *: Ann"));
        assert!(text.contains("Last Name is required."));
        assert!(text.contains("Age is required."));
        assert!(text.contains("33%"));
        assert!(text.contains("[ Submit ]"));
        assert_eq!(metrics.visible_start, 0);
        assert_eq!(metrics.visible_end, 3);
        assert_eq!(metrics.thumb_y, None);
    }

    #[test]
    fn progress_starts_at_zero() {
        let mut page = page_with("paymentInfo");
        let (text, _) = render(&mut page, 80, 30);
        assert!(text.contains("0%"));
        assert!(text.contains("Expiry Date *: YYYY-MM-DD"));
    }

    #[test]
    fn small_terminal_scrolls_with_thumb() {
        let mut page = page_with("paymentInfo");
        let (_, metrics) = render(&mut page, 80, 14);
        assert_eq!(metrics.total_fields, 4);
        assert!(metrics.visible_end - metrics.visible_start < 4);
        assert_eq!(metrics.thumb_y, Some(0));
    }

    #[test]
    fn cursor_follows_input() {
        let mut page = page_with("userInfo");
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
        page.handle_key_events(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
            .unwrap();
        page.handle_key_events(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        let (_, metrics) = render(&mut page, 80, 30);
        // "First Name *: " inside the body border, on the row after selector + blank
        assert_eq!(metrics.cursor, Some((1 + 14, 2 + 1 + 2)));
    }

    #[test]
    fn scrollbar_thumb_positions() {
        assert_eq!(compute_scrollbar_thumb(10, 5, 0, 10), Some(0));
        assert_eq!(compute_scrollbar_thumb(10, 5, 2, 10), Some(4));
        assert_eq!(compute_scrollbar_thumb(10, 5, 5, 10), Some(9));
        assert_eq!(compute_scrollbar_thumb(10, 5, 50, 10), Some(9));
        assert_eq!(compute_scrollbar_thumb(3, 5, 0, 10), None);
        assert_eq!(compute_scrollbar_thumb(10, 5, 0, 0), None);
    }
}
