use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    action::{Action, UiOutcome},
    components::{form::FormPage, popups::AlertPopup, Component, PopupComponent},
    config::Config,
    engine::FormEngine,
    tui::{Event, EventResponse, Frame, Tui},
};

pub struct App {
    config: Config,
    page: FormPage,
    popup: Option<Box<dyn PopupComponent>>,
    should_quit: bool,
    should_suspend: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: Config, engine: FormEngine) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            config,
            page: FormPage::new(engine),
            popup: None,
            should_quit: false,
            should_suspend: false,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .mouse(self.config.ui.mouse)
            .paste(true)
            .tick_rate(self.config.ui.tick_rate)
            .frame_rate(self.config.ui.frame_rate);
        tui.enter()?;
        self.page.init()?;
        info!(
            tick_rate = tui.tick_rate,
            frame_rate = tui.frame_rate,
            "terminal ui started"
        );

        let action_tx = self.action_tx.clone();
        loop {
            if let Some(event) = tui.next_event().await {
                self.handle_event(event)?;
            }
            self.handle_actions(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui.resume()?;
                tui.clear()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// Route one terminal event: popup first, then the page, then global keys.
    fn handle_event(&mut self, event: Event) -> Result<()> {
        let action_tx = self.action_tx.clone();
        let send = |response: Option<EventResponse<Action>>| match response {
            Some(EventResponse::Continue(action)) => {
                action_tx.send(action).ok();
                false
            }
            Some(EventResponse::Stop(action)) => {
                action_tx.send(action).ok();
                true
            }
            None => false,
        };

        let is_input = matches!(event, Event::Key(_) | Event::Mouse(_) | Event::Paste(_));
        let mut stop_event_propagation = false;
        if let Some(popup) = self.popup.as_mut() {
            stop_event_propagation = send(popup.handle_events(event.clone())?);
            stop_event_propagation |= is_input && popup.is_modal();
        }
        if !stop_event_propagation {
            stop_event_propagation = send(self.page.handle_events(event.clone())?);
        }

        if !stop_event_propagation {
            match event {
                Event::Quit | Event::Closed => self.action_tx.send(Action::Quit)?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
                Event::Resize(x, y) => self.action_tx.send(Action::Resize(x, y))?,
                Event::Key(key) => {
                    if let Some(action) = global_key_action(key) {
                        self.action_tx.send(action)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_actions(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            match action {
                Action::Render => self.render(tui)?,
                Action::Resize(w, h) => {
                    tui.resize(Rect::new(0, 0, w, h))?;
                    self.render(tui)?;
                }
                action => self.apply(action)?,
            }
        }
        Ok(())
    }

    /// Apply a non-drawing action and forward it to the popup or the page.
    fn apply(&mut self, action: Action) -> Result<()> {
        if action != Action::Tick {
            debug!("{action:?}");
        }
        match &action {
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::ShowAlert { title, message } => {
                self.popup = Some(Box::new(AlertPopup::new(title.clone(), message.clone())));
            }
            Action::Error(message) => {
                error!("{message}");
                self.popup = Some(Box::new(
                    AlertPopup::new("Error", message.clone()).min_width(60),
                ));
            }
            Action::ClosePopup
            | Action::UiOutcome(UiOutcome::RequestClose)
            | Action::UiOutcome(UiOutcome::Cancelled) => {
                self.popup = None;
            }
            _ => {}
        }

        let next = match self.popup.as_mut() {
            Some(popup) => popup.update(action)?,
            None => self.page.update(action)?,
        };
        if let Some(next) = next {
            self.action_tx.send(next)?;
        }
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let action_tx = self.action_tx.clone();
        tui.draw(|frame| {
            if let Err(err) = self.draw(frame) {
                let _ = action_tx.send(Action::Error(format!("Failed to draw: {err:?}")));
            }
        })?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let area = frame.area();
        self.page.draw(frame, area)?;
        if let Some(popup) = self.popup.as_mut() {
            popup.draw(frame, area)?;
        }
        Ok(())
    }
}

fn global_key_action(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if !ctrl => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('z') if ctrl => Some(Action::Suspend),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::form::{SUCCESS_MESSAGE, SUCCESS_TITLE};
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(Config::default(), FormEngine::default())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    /// Deliver an event and process every resulting action, skipping drawing.
    fn send(app: &mut App, event: Event) {
        app.handle_event(event).unwrap();
        while let Ok(action) = app.action_rx.try_recv() {
            if !matches!(action, Action::Render | Action::Resize(..)) {
                app.apply(action).unwrap();
            }
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            send(app, key(KeyCode::Char(c)));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| app.draw(f).unwrap()).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn q_quits_outside_editing() {
        let mut app = app();
        send(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn q_is_typed_while_editing_but_ctrl_c_quits() {
        let mut app = app();
        send(&mut app, key(KeyCode::Right));
        send(&mut app, key(KeyCode::Down));
        send(&mut app, key(KeyCode::Enter));
        send(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.page.engine().value("firstName"), Some("q"));

        send(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_z_suspends() {
        let mut app = app();
        send(&mut app, ctrl('z'));
        assert!(app.should_suspend);
        send(&mut app, Event::Tick);
        app.apply(Action::Resume).unwrap();
        assert!(!app.should_suspend);
    }

    #[test]
    fn successful_submit_shows_alert_until_acknowledged() {
        let mut app = app();
        send(&mut app, key(KeyCode::Right));
        for value in ["Ann", "Lee", "9"] {
            send(&mut app, key(KeyCode::Down));
            send(&mut app, key(KeyCode::Enter));
            type_text(&mut app, value);
            send(&mut app, key(KeyCode::Enter));
        }
        send(&mut app, ctrl('s'));

        assert!(app.popup.is_some());
        let text = screen(&mut app);
        assert!(text.contains(SUCCESS_TITLE));
        assert!(text.contains(SUCCESS_MESSAGE));
        assert!(text.contains("100%"));

        // the modal popup swallows keys meant for the page
        send(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert!(app.popup.is_some());

        send(&mut app, key(KeyCode::Enter));
        assert!(app.popup.is_none());
        assert!(!screen(&mut app).contains(SUCCESS_MESSAGE));
    }

    #[test]
    fn rejected_submit_keeps_page_active() {
        let mut app = app();
        send(&mut app, key(KeyCode::Right));
        send(&mut app, ctrl('s'));
        assert!(app.popup.is_none());
        assert_eq!(app.page.engine().errors().len(), 3);
        assert!(screen(&mut app).contains("First Name is required."));
    }

    #[test]
    fn errors_open_an_alert() {
        let mut app = app();
        app.apply(Action::Error("Failed to draw".into())).unwrap();
        assert!(app.popup.is_some());
        assert!(screen(&mut app).contains("Failed to draw"));
        send(&mut app, key(KeyCode::Esc));
        assert!(app.popup.is_none());
    }

    #[test]
    fn ticks_and_renders_become_actions() {
        let mut app = app();
        app.handle_event(Event::Render).unwrap();
        assert_eq!(app.action_rx.try_recv().ok(), Some(Action::Render));
        app.handle_event(Event::Resize(100, 40)).unwrap();
        assert_eq!(app.action_rx.try_recv().ok(), Some(Action::Resize(100, 40)));
    }
}
