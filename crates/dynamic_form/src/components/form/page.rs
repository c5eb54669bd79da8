use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{info, warn};
use tui_input::{Input, InputRequest};

use crate::{
    action::Action,
    components::{form_type_select::FormTypeSelect, Component},
    engine::{FormEngine, SubmitOutcome},
    schema::FieldDescriptor,
    tui::{Event, EventResponse, Frame},
};

pub const SUCCESS_TITLE: &str = "Success";
pub const SUCCESS_MESSAGE: &str = "Form Submitted Successfully!";

/// Which row of the page has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Selector,
    Field(usize),
    Submit,
}

/// The single page of the application: selector, fields, submit and progress.
///
/// Owns the `FormEngine`. Key handling only emits actions; the engine is
/// mutated in `update` once the central loop routes those actions back.
pub struct FormPage {
    engine: FormEngine,
    selector: FormTypeSelect,
    focus: Focus,
    scroll: usize,
    editing: bool,
    input: Input,
    // value before editing started, restored on Esc
    original: String,
}

impl FormPage {
    pub fn new(engine: FormEngine) -> Self {
        let mut selector = FormTypeSelect::new(engine.registry());
        selector.select_id(engine.form_type());
        Self {
            engine,
            selector,
            focus: Focus::Selector,
            scroll: 0,
            editing: false,
            input: Input::default(),
            original: String::new(),
        }
    }

    // --- Accessors used by the renderer --------------------------------------------------------

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub(super) fn selector(&self) -> &FormTypeSelect {
        &self.selector
    }

    pub(super) fn scroll(&self) -> usize {
        self.scroll
    }

    pub(super) fn input(&self) -> &Input {
        &self.input
    }

    pub(super) fn field_count(&self) -> usize {
        self.engine.fields().len()
    }

    /// Rendered rows of one field: label/value, optional error, spacer.
    pub(super) fn field_height(&self, field: &FieldDescriptor) -> u16 {
        if self.engine.error(&field.name).is_some() {
            3
        } else {
            2
        }
    }

    /// Scroll so the focused field fits into `capacity` rows.
    pub(super) fn ensure_visible(&mut self, capacity: u16) {
        let heights: Vec<u16> = self
            .engine
            .fields()
            .iter()
            .map(|f| self.field_height(f))
            .collect();
        let focused = match self.focus {
            Focus::Field(i) => i,
            Focus::Selector => 0,
            Focus::Submit => heights.len().saturating_sub(1),
        };
        self.scroll = scroll_to_fit(&heights, self.scroll, focused, capacity);
    }

    /// Display string for a field's current value.
    pub(super) fn display_value(&self, index: usize, field: &FieldDescriptor) -> String {
        let editing_this = self.editing && self.focus == Focus::Field(index);
        let value = if editing_this {
            self.input.value()
        } else {
            self.engine.value(&field.name).unwrap_or("")
        };
        format_value(field, value)
    }

    // --- Navigation ----------------------------------------------------------------------------

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Selector];
        order.extend((0..self.field_count()).map(Focus::Field));
        if self.engine.has_fields() {
            order.push(Focus::Submit);
        }
        order
    }

    fn move_focus(&mut self, dir: i32) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0) as i32;
        let next = (idx + dir).rem_euclid(order.len() as i32) as usize;
        self.focus = order[next];
    }

    fn focused_field(&self) -> Option<&FieldDescriptor> {
        match self.focus {
            Focus::Field(i) => self.engine.fields().get(i),
            _ => None,
        }
    }

    fn cycle_selector(&mut self, dir: i32) -> Action {
        Action::SelectFormType(self.selector.cycle(dir).to_string())
    }

    /// Cycle a dropdown through placeholder + options; the placeholder clears the value.
    fn cycle_dropdown(&self, field: &FieldDescriptor, dir: i32) -> Action {
        let options = field.kind.options();
        let current = self.engine.value(&field.name).unwrap_or("");
        let idx = options
            .iter()
            .position(|o| o == current)
            .map(|i| i + 1)
            .unwrap_or(0) as i32;
        let len = options.len() as i32 + 1;
        let next = (idx + dir).rem_euclid(len) as usize;
        let value = match next {
            0 => String::new(),
            n => options[n - 1].clone(),
        };
        Action::SetFieldValue {
            name: field.name.clone(),
            value,
        }
    }

    // --- Editing -------------------------------------------------------------------------------

    fn start_editing(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let current = self.engine.value(&field.name).unwrap_or("").to_string();
        self.original = current.clone();
        self.input = Input::default().with_value(current);
        self.editing = true;
    }

    fn stop_editing(&mut self) {
        self.editing = false;
        self.input = Input::default();
        self.original.clear();
    }

    fn live_value(&self) -> Option<Action> {
        self.focused_field().map(|field| Action::SetFieldValue {
            name: field.name.clone(),
            value: self.input.value().to_string(),
        })
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<EventResponse<Action>> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Enter => {
                self.stop_editing();
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Tab => {
                self.stop_editing();
                self.move_focus(1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Esc => {
                let restore = self.focused_field().map(|field| Action::SetFieldValue {
                    name: field.name.clone(),
                    value: self.original.clone(),
                });
                self.stop_editing();
                Some(EventResponse::Stop(restore.unwrap_or(Action::Update)))
            }
            _ => {
                let changed = input_request(key)
                    .and_then(|req| self.input.handle(req))
                    .map(|state| state.value)
                    .unwrap_or(false);
                let action = if changed { self.live_value() } else { None };
                Some(EventResponse::Stop(action.unwrap_or(Action::Update)))
            }
        }
    }

    fn submit_action(&self) -> Option<EventResponse<Action>> {
        self.engine
            .has_fields()
            .then_some(EventResponse::Stop(Action::Submit))
    }

    fn on_submit(&mut self) -> Option<Action> {
        match self.engine.submit() {
            SubmitOutcome::Accepted(submission) => {
                match serde_json::to_string(&submission) {
                    Ok(json) => info!(submission = %json, "form accepted"),
                    Err(err) => warn!("could not serialize submission: {err}"),
                }
                Some(Action::ShowAlert {
                    title: SUCCESS_TITLE.to_string(),
                    message: SUCCESS_MESSAGE.to_string(),
                })
            }
            SubmitOutcome::Rejected { .. } => {
                if let Some(first) = self
                    .engine
                    .fields()
                    .iter()
                    .position(|f| self.engine.error(&f.name).is_some())
                {
                    self.focus = Focus::Field(first);
                }
                Some(Action::Update)
            }
            SubmitOutcome::NoFields => None,
        }
    }
}

impl Component for FormPage {
    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key) => self.handle_key_events(key),
            Event::Mouse(mouse) => self.handle_mouse_events(mouse),
            Event::Paste(text) if self.editing => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.input.handle(InputRequest::InsertChar(c));
                }
                Ok(Some(EventResponse::Stop(
                    self.live_value().unwrap_or(Action::Update),
                )))
            }
            _ => Ok(None),
        }
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if self.editing {
            return Ok(self.handle_editing_key(key));
        }

        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(self.submit_action());
        }

        let response = match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.move_focus(-1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_focus(1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Home => {
                self.focus = Focus::Selector;
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::End => {
                if let Some(last) = self.focus_order().last() {
                    self.focus = *last;
                }
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Left | KeyCode::Right => {
                let dir = if key.code == KeyCode::Left { -1 } else { 1 };
                match self.focus {
                    Focus::Selector => Some(EventResponse::Stop(self.cycle_selector(dir))),
                    Focus::Field(_) => self
                        .focused_field()
                        .filter(|f| f.kind.is_dropdown())
                        .map(|f| EventResponse::Stop(self.cycle_dropdown(f, dir))),
                    Focus::Submit => None,
                }
            }
            KeyCode::Enter => match self.focus {
                Focus::Selector => {
                    if self.engine.has_fields() {
                        self.focus = Focus::Field(0);
                    }
                    Some(EventResponse::Stop(Action::Update))
                }
                Focus::Field(_) => {
                    if self.focused_field().map(|f| f.is_textual()).unwrap_or(false) {
                        self.start_editing();
                        Some(EventResponse::Stop(Action::Update))
                    } else {
                        self.submit_action()
                    }
                }
                Focus::Submit => self.submit_action(),
            },
            _ => None,
        };
        Ok(response)
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<EventResponse<Action>>> {
        let response = match mouse.kind {
            MouseEventKind::ScrollDown if !self.editing => {
                self.move_focus(1);
                Some(EventResponse::Stop(Action::Update))
            }
            MouseEventKind::ScrollUp if !self.editing => {
                self.move_focus(-1);
                Some(EventResponse::Stop(Action::Update))
            }
            _ => None,
        };
        Ok(response)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SelectFormType(id) => {
                self.stop_editing();
                self.engine.select_form_type(id);
                self.selector.select_id(self.engine.form_type());
                self.focus = Focus::Selector;
                self.scroll = 0;
                Ok(Some(Action::Update))
            }
            Action::SetFieldValue { name, value } => {
                match self.engine.set_field_value(&name, value) {
                    Ok(()) => Ok(None),
                    Err(err) => {
                        warn!("{err}");
                        Ok(Some(Action::Error(err.to_string())))
                    }
                }
            }
            Action::Submit => Ok(self.on_submit()),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        super::render::render_form_page(self, f, area)?;
        Ok(())
    }
}

/// Value text per field kind: passwords are masked, empty dropdowns show their placeholder.
pub fn format_value(field: &FieldDescriptor, value: &str) -> String {
    use crate::schema::FieldKind;

    match &field.kind {
        FieldKind::Password => "•".repeat(value.chars().count()),
        FieldKind::Dropdown { .. } if value.is_empty() => {
            format!("‹ {} ›", field.placeholder().unwrap_or_default())
        }
        FieldKind::Dropdown { .. } => format!("‹ {value} ›"),
        FieldKind::Text | FieldKind::Number | FieldKind::Date => value.to_string(),
    }
}

/// Smallest scroll offset change that keeps `focused` inside a window of `capacity` rows.
pub fn scroll_to_fit(heights: &[u16], scroll: usize, focused: usize, capacity: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let focused = focused.min(heights.len() - 1);
    let mut scroll = scroll.min(heights.len() - 1);
    if focused < scroll {
        return focused;
    }
    while scroll < focused {
        let used: u32 = heights[scroll..=focused].iter().map(|h| u32::from(*h)).sum();
        if used <= u32::from(capacity) {
            break;
        }
        scroll += 1;
    }
    scroll
}

/// Number of fields starting at `scroll` that fit into `capacity` rows (at least one).
pub fn visible_count(heights: &[u16], scroll: usize, capacity: u16) -> usize {
    let mut used = 0u32;
    let mut count = 0;
    for h in heights.iter().skip(scroll) {
        used += u32::from(*h);
        if used > u32::from(capacity) && count > 0 {
            break;
        }
        count += 1;
    }
    count
}

fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let req = match key.code {
        KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
        KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
        KeyCode::Char('k') if ctrl => InputRequest::DeleteTillEnd,
        KeyCode::Char('a') if ctrl => InputRequest::GoToStart,
        KeyCode::Char('e') if ctrl => InputRequest::GoToEnd,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => InputRequest::InsertChar(c),
        KeyCode::Backspace if ctrl => InputRequest::DeletePrevWord,
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete if ctrl => InputRequest::DeleteNextWord,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left if ctrl => InputRequest::GoToPrevWord,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right if ctrl => InputRequest::GoToNextWord,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return None,
    };
    Some(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Feed a key through the page and route the resulting actions back like the app loop does.
    fn press(page: &mut FormPage, event: KeyEvent) -> Vec<Action> {
        let mut emitted = Vec::new();
        let mut pending = page
            .handle_key_events(event)
            .unwrap()
            .map(EventResponse::into_inner);
        while let Some(action) = pending {
            emitted.push(action.clone());
            pending = page.update(action).unwrap();
        }
        emitted
    }

    fn type_text(page: &mut FormPage, text: &str) {
        for c in text.chars() {
            press(page, key(KeyCode::Char(c)));
        }
    }

    fn page_with(form_type: &str) -> FormPage {
        let mut page = FormPage::new(FormEngine::default());
        page.update(Action::SelectFormType(form_type.into())).unwrap();
        page
    }

    #[test]
    fn selector_cycles_form_types() {
        let mut page = FormPage::new(FormEngine::default());
        assert_eq!(
            press(&mut page, key(KeyCode::Right)),
            vec![Action::SelectFormType("userInfo".into()), Action::Update]
        );
        assert_eq!(page.engine().form_type(), "userInfo");
        assert_eq!(page.field_count(), 3);

        press(&mut page, key(KeyCode::Left));
        assert_eq!(page.engine().form_type(), "");
        assert!(!page.engine().has_fields());
    }

    #[test]
    fn typing_updates_engine_live() {
        let mut page = page_with("userInfo");
        press(&mut page, key(KeyCode::Down));
        assert_eq!(page.focus(), Focus::Field(0));

        press(&mut page, key(KeyCode::Enter));
        assert!(page.is_editing());
        type_text(&mut page, "Ann");
        assert_eq!(page.engine().value("firstName"), Some("Ann"));

        press(&mut page, key(KeyCode::Backspace));
        assert_eq!(page.engine().value("firstName"), Some("An"));

        press(&mut page, key(KeyCode::Enter));
        assert!(!page.is_editing());
        assert_eq!(page.engine().value("firstName"), Some("An"));
    }

    #[test]
    fn esc_restores_previous_value() {
        let mut page = page_with("userInfo");
        press(&mut page, key(KeyCode::Down));
        press(&mut page, key(KeyCode::Enter));
        type_text(&mut page, "Ann");
        press(&mut page, key(KeyCode::Enter));

        press(&mut page, key(KeyCode::Enter));
        type_text(&mut page, "ette");
        assert_eq!(page.engine().value("firstName"), Some("Annette"));
        press(&mut page, key(KeyCode::Esc));
        assert_eq!(page.engine().value("firstName"), Some("Ann"));
        assert!(!page.is_editing());
    }

    #[test]
    fn q_is_text_while_editing() {
        let mut page = page_with("userInfo");
        press(&mut page, key(KeyCode::Down));
        press(&mut page, key(KeyCode::Enter));
        let response = page.handle_key_events(key(KeyCode::Char('q'))).unwrap();
        assert!(matches!(response, Some(EventResponse::Stop(_))));
        assert!(page.handle_key_events(ctrl('c')).unwrap().is_none());
    }

    #[test]
    fn dropdown_cycles_with_placeholder() {
        let mut page = page_with("addressInfo");
        for _ in 0..3 {
            press(&mut page, key(KeyCode::Down));
        }
        assert_eq!(page.focus(), Focus::Field(2));

        press(&mut page, key(KeyCode::Right));
        assert_eq!(page.engine().value("state"), Some("California"));
        press(&mut page, key(KeyCode::Right));
        assert_eq!(page.engine().value("state"), Some("Texas"));
        press(&mut page, key(KeyCode::Left));
        press(&mut page, key(KeyCode::Left));
        assert_eq!(page.engine().value("state"), Some(""));
        press(&mut page, key(KeyCode::Left));
        assert_eq!(page.engine().value("state"), Some("New York"));
    }

    #[test]
    fn submit_reports_errors_then_success() {
        let mut page = page_with("userInfo");
        press(&mut page, key(KeyCode::Down));
        press(&mut page, key(KeyCode::Enter));
        type_text(&mut page, "Ann");
        press(&mut page, key(KeyCode::Enter));

        let emitted = press(&mut page, ctrl('s'));
        assert_eq!(emitted, vec![Action::Submit, Action::Update]);
        assert_eq!(page.engine().errors().len(), 2);
        assert_eq!(page.engine().progress().map(|p| p.percent()), Some(33));
        assert_eq!(page.focus(), Focus::Field(1));

        press(&mut page, key(KeyCode::Enter));
        type_text(&mut page, "Lee");
        press(&mut page, key(KeyCode::Tab));
        assert_eq!(page.focus(), Focus::Field(2));
        press(&mut page, key(KeyCode::Enter));
        type_text(&mut page, "9");
        press(&mut page, key(KeyCode::Tab));
        assert_eq!(page.focus(), Focus::Submit);

        let emitted = press(&mut page, key(KeyCode::Enter));
        assert_eq!(
            emitted,
            vec![
                Action::Submit,
                Action::ShowAlert {
                    title: SUCCESS_TITLE.into(),
                    message: SUCCESS_MESSAGE.into(),
                }
            ]
        );
        assert!(page.engine().errors().is_empty());
    }

    #[test]
    fn submit_is_inert_without_fields() {
        let mut page = FormPage::new(FormEngine::default());
        assert!(press(&mut page, ctrl('s')).is_empty());
        press(&mut page, key(KeyCode::Down));
        assert_eq!(page.focus(), Focus::Selector);
    }

    #[test]
    fn selecting_resets_focus_and_editing() {
        let mut page = page_with("userInfo");
        press(&mut page, key(KeyCode::Down));
        press(&mut page, key(KeyCode::Enter));
        type_text(&mut page, "Ann");
        page.update(Action::SelectFormType("paymentInfo".into()))
            .unwrap();
        assert!(!page.is_editing());
        assert_eq!(page.focus(), Focus::Selector);
        assert!(page.engine().values().is_empty());
        assert_eq!(page.selector().selected_label(), "Payment Information");
    }

    #[test]
    fn unknown_field_surfaces_as_error_action() {
        let mut page = page_with("userInfo");
        let next = page
            .update(Action::SetFieldValue {
                name: "street".into(),
                value: "Main".into(),
            })
            .unwrap();
        assert!(matches!(next, Some(Action::Error(_))));
    }

    #[test]
    fn password_is_masked() {
        let cvv = crate::schema::FieldDescriptor::new(
            "cvv",
            "CVV",
            crate::schema::FieldKind::Password,
        );
        assert_eq!(format_value(&cvv, "123"), "•••");
        assert_eq!(format_value(&cvv, ""), "");

        let state = crate::schema::FieldDescriptor::dropdown("state", "State", ["Texas"]);
        assert_eq!(format_value(&state, ""), "‹ Select State ›");
        assert_eq!(format_value(&state, "Texas"), "‹ Texas ›");
    }

    #[test]
    fn scrolling_keeps_focus_visible() {
        let heights = [2, 3, 2, 2];
        assert_eq!(scroll_to_fit(&heights, 0, 1, 6), 0);
        assert_eq!(scroll_to_fit(&heights, 0, 2, 6), 1);
        assert_eq!(scroll_to_fit(&heights, 0, 3, 4), 2);
        assert_eq!(scroll_to_fit(&heights, 3, 0, 4), 0);
        assert_eq!(scroll_to_fit(&[], 5, 0, 4), 0);

        assert_eq!(visible_count(&heights, 0, 6), 2);
        assert_eq!(visible_count(&heights, 2, 6), 2);
        assert_eq!(visible_count(&heights, 0, 1), 1);
    }
}
