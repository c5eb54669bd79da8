use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::schema::SchemaRegistry;

pub const PLACEHOLDER: &str = "Select Form Type";

/// Selector row offering the placeholder followed by one entry per form type.
///
/// Index 0 is the placeholder and maps to the empty identifier.
#[derive(Debug, Clone)]
pub struct FormTypeSelect {
    options: Vec<(String, String)>,
    selected: usize,
}

impl FormTypeSelect {
    pub fn new(registry: &SchemaRegistry) -> Self {
        let options = registry
            .form_types()
            .iter()
            .map(|form_type| (form_type.id.clone(), form_type.label.clone()))
            .collect();
        Self {
            options,
            selected: 0,
        }
    }

    /// Number of entries including the placeholder.
    pub fn len(&self) -> usize {
        self.options.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn selected_id(&self) -> &str {
        match self.selected {
            0 => "",
            n => self.options[n - 1].0.as_str(),
        }
    }

    pub fn selected_label(&self) -> &str {
        match self.selected {
            0 => PLACEHOLDER,
            n => self.options[n - 1].1.as_str(),
        }
    }

    /// Point the selector at `id`; unknown ids fall back to the placeholder.
    pub fn select_id(&mut self, id: &str) {
        self.selected = self
            .options
            .iter()
            .position(|(option, _)| option == id)
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// Move by `dir` entries (wrapping) and return the newly selected id.
    pub fn cycle(&mut self, dir: i32) -> &str {
        let len = self.len() as i32;
        self.selected = (self.selected as i32 + dir).rem_euclid(len) as usize;
        self.selected_id()
    }

    pub fn line(&self, focused: bool) -> Line<'static> {
        let label_style = Style::default().fg(Color::White).add_modifier(if focused {
            Modifier::BOLD
        } else {
            Modifier::empty()
        });
        let value_style = match (focused, self.selected) {
            (true, _) => Style::default().fg(Color::Black).bg(Color::White),
            (false, 0) => Style::default().fg(Color::DarkGray),
            (false, _) => Style::default().fg(Color::Cyan),
        };
        Line::from(vec![
            Span::styled("Form Type: ", label_style),
            Span::styled(format!("‹ {} ›", self.selected_label()), value_style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_placeholder() {
        let select = FormTypeSelect::new(&SchemaRegistry::builtin());
        assert_eq!(select.len(), 4);
        assert_eq!(select.selected_id(), "");
        assert_eq!(select.selected_label(), PLACEHOLDER);
    }

    #[test]
    fn cycles_through_form_types_and_wraps() {
        let mut select = FormTypeSelect::new(&SchemaRegistry::builtin());
        assert_eq!(select.cycle(1), "userInfo");
        assert_eq!(select.cycle(1), "addressInfo");
        assert_eq!(select.cycle(1), "paymentInfo");
        assert_eq!(select.cycle(1), "");
        assert_eq!(select.cycle(-1), "paymentInfo");
        assert_eq!(select.selected_label(), "Payment Information");
    }

    #[test]
    fn select_id_falls_back_to_placeholder() {
        let mut select = FormTypeSelect::new(&SchemaRegistry::builtin());
        select.select_id("addressInfo");
        assert_eq!(select.selected_label(), "Address Information");
        select.select_id("shippingInfo");
        assert_eq!(select.selected_id(), "");
    }
}
