//! Application struct and event loop.
//!
//! Owns the terminal, the dashboard and the fetcher. Input is translated to
//! [`Action`]s, fetch requests go to worker threads, and replies are drained
//! once per iteration before the next frame.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use crate::config::Config;
use crate::provider::{DataProvider, Fetcher};
use crate::ui::widgets::ChartAction;
use crate::ui::{self, Action, Dashboard, HitZones, TabState, Theme};

/// Translate a key press into a dashboard action.
pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,

        // Tabs / focus
        KeyCode::Tab => Action::NextTab,
        KeyCode::BackTab => Action::PrevTab,
        KeyCode::Char(c @ '1'..='4') => {
            Action::SelectTab(TabState::from_index(c as usize - '1' as usize))
        }

        // Paging
        KeyCode::Up | KeyCode::Char('k') | KeyCode::PageUp => Action::Chart(ChartAction::Later),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::PageDown => {
            Action::Chart(ChartAction::Earlier)
        }

        // Bar cursor
        KeyCode::Left | KeyCode::Char('h') => Action::Chart(ChartAction::CursorLeft),
        KeyCode::Right | KeyCode::Char('l') => Action::Chart(ChartAction::CursorRight),

        KeyCode::Char('r') => Action::Chart(ChartAction::Reload),
        KeyCode::Char('T') => Action::CycleTheme,
        _ => return None,
    };
    Some(action)
}

pub struct App {
    dashboard: Dashboard,
    fetcher: Fetcher,
    poll_interval: Duration,
}

impl App {
    pub fn new(config: &Config, provider: Arc<dyn DataProvider>) -> Self {
        let theme = Theme::resolve(&config.theme);
        Self {
            dashboard: Dashboard::new(config, theme),
            fetcher: Fetcher::new(provider),
            poll_interval: Duration::from_millis(config.event_poll_ms),
        }
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        // Terminal init
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        // Cleanup, even when the loop failed
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        info!("vitus stopped");
        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let requests = self.dashboard.initial_requests();
        self.fetcher.dispatch_all(requests);

        while self.dashboard.is_running() {
            let reloads = self.dashboard.roll_over();
            self.fetcher.dispatch_all(reloads);
            self.drain_replies();

            let mut zones = HitZones::default();
            terminal.draw(|frame| zones = ui::render(frame, &self.dashboard))?;
            self.dashboard.set_zones(zones);

            if event::poll(self.poll_interval)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            self.dashboard.tick();
        }
        Ok(())
    }

    // ── Channel draining ─────────────────────────────────────────

    fn drain_replies(&mut self) {
        for reply in self.fetcher.drain() {
            let target = reply.target;
            if !self.dashboard.apply_reply(reply) {
                debug!(widget = ?target, "stale reply ignored");
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = key_action(key) {
            debug!(?action, "key");
            self.apply(action);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dashboard.handle_pointer(mouse.column, mouse.row);
            }
            MouseEventKind::ScrollUp => self.apply(Action::Chart(ChartAction::Later)),
            MouseEventKind::ScrollDown => self.apply(Action::Chart(ChartAction::Earlier)),
            _ => {}
        }
    }

    fn apply(&mut self, action: Action) {
        let requests = self.dashboard.handle_action(action);
        self.fetcher.dispatch_all(requests);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // ── key_action ────────────────────────────────────────────────

    #[test]
    fn quit_keys() {
        assert_eq!(key_action(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(key_action(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            key_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn paging_keys() {
        let later = Some(Action::Chart(ChartAction::Later));
        let earlier = Some(Action::Chart(ChartAction::Earlier));
        assert_eq!(key_action(press(KeyCode::Up)), later);
        assert_eq!(key_action(press(KeyCode::Char('k'))), later);
        assert_eq!(key_action(press(KeyCode::PageUp)), later);
        assert_eq!(key_action(press(KeyCode::Down)), earlier);
        assert_eq!(key_action(press(KeyCode::Char('j'))), earlier);
        assert_eq!(key_action(press(KeyCode::PageDown)), earlier);
    }

    #[test]
    fn cursor_and_reload_keys() {
        assert_eq!(
            key_action(press(KeyCode::Left)),
            Some(Action::Chart(ChartAction::CursorLeft))
        );
        assert_eq!(
            key_action(press(KeyCode::Char('l'))),
            Some(Action::Chart(ChartAction::CursorRight))
        );
        assert_eq!(
            key_action(press(KeyCode::Char('r'))),
            Some(Action::Chart(ChartAction::Reload))
        );
    }

    #[test]
    fn digit_keys_select_tabs() {
        assert_eq!(
            key_action(press(KeyCode::Char('1'))),
            Some(Action::SelectTab(TabState::Steps))
        );
        assert_eq!(
            key_action(press(KeyCode::Char('4'))),
            Some(Action::SelectTab(TabState::Sleep))
        );
        assert_eq!(key_action(press(KeyCode::Char('5'))), None);
    }

    #[test]
    fn tab_keys_and_theme() {
        assert_eq!(key_action(press(KeyCode::Tab)), Some(Action::NextTab));
        assert_eq!(key_action(press(KeyCode::BackTab)), Some(Action::PrevTab));
        assert_eq!(key_action(press(KeyCode::Char('T'))), Some(Action::CycleTheme));
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(key_action(release), None);
    }
}
