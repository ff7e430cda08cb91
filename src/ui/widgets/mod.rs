//! Chart widgets: stateful panes that page through time and render
//! themselves into a frame buffer.
//!
//! - `bar`: hourly steps for one day
//! - `line`: continuous series (heart rate, weight)

mod bar;
mod line;

pub use bar::BarChartWidget;
pub use line::{LineChartWidget, MetricProfile};

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::focus::ZoneId;
use super::theme::Theme;
use crate::constants::SPINNER_CHARS;
use crate::provider::{FetchReply, FetchRequest};

/// Input a chart understands once the controller has routed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartAction {
    Earlier,
    Later,
    CursorLeft,
    CursorRight,
    Reload,
}

/// Data status of one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Monotonic request counter. Only the reply stamped with the latest
/// generation is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    /// Advance and return the new generation.
    pub fn bump(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    #[cfg(test)]
    pub fn current(&self) -> u64 {
        self.0
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}

/// Contract shared by every chart pane.
pub trait ChartWidget {
    fn zone_id(&self) -> ZoneId;

    fn title(&self) -> &str;

    fn load_state(&self) -> &LoadState;

    /// Apply an action. Navigation clears the buffer and returns the fetch
    /// that refills it; cursor moves return `None`.
    fn handle(&mut self, action: ChartAction, today: NaiveDate) -> Option<FetchRequest>;

    /// Apply a reply. Returns `false` if it was stale and dropped.
    fn accept(&mut self, reply: FetchReply) -> bool;

    /// Chart body only.
    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme);

    /// Full pane: border, captions, chart, side panel.
    fn view(&self, area: Rect, buf: &mut Buffer, theme: &Theme, tick: u64);

    fn focus(&mut self);

    fn blur(&mut self);

    fn focused(&self) -> bool;

    /// Request for the current window without moving it. Bumps the
    /// generation so any reply still in flight becomes stale.
    fn request(&mut self, today: NaiveDate) -> FetchRequest;
}

/// Centered one-line message for loading, empty and failed states.
pub(crate) fn render_notice(area: Rect, buf: &mut Buffer, line: Line<'_>) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height / 2;
    Paragraph::new(line)
        .alignment(ratatui::layout::Alignment::Center)
        .render(Rect::new(area.x, y, area.width, 1), buf);
}

/// Spinner glyph and trailing dots for animation frame `tick`.
fn loading_frame(tick: u64) -> (&'static str, &'static str) {
    let spinner = SPINNER_CHARS[(tick % SPINNER_CHARS.len() as u64) as usize];
    let dots = &"..."[..(tick % 4) as usize];
    (spinner, dots)
}

/// Notice line for a non-ready state, if any.
pub(crate) fn state_notice<'a>(state: &LoadState, theme: &Theme, tick: u64) -> Option<Line<'a>> {
    match state {
        LoadState::Loading => {
            let (spinner, dots) = loading_frame(tick);
            Some(Line::from(vec![
                Span::styled(format!("{} ", spinner), theme.header_style()),
                Span::styled(format!("loading{}", dots), theme.dim_style()),
            ]))
        }
        LoadState::Failed(msg) => Some(Line::from(vec![
            Span::styled("✖ ", theme.error_style()),
            Span::styled(format!("failed to load: {}", msg), theme.error_style()),
        ])),
        LoadState::Ready => None,
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Minimal widget for focus and routing tests.
    pub struct StubWidget {
        id: ZoneId,
        focused: bool,
        state: LoadState,
        generation: Generation,
        pub actions: Vec<ChartAction>,
    }

    impl StubWidget {
        pub fn new(id: ZoneId) -> Self {
            Self {
                id,
                focused: false,
                state: LoadState::Loading,
                generation: Generation::default(),
                actions: Vec::new(),
            }
        }
    }

    impl ChartWidget for StubWidget {
        fn zone_id(&self) -> ZoneId {
            self.id
        }

        fn title(&self) -> &str {
            "stub"
        }

        fn load_state(&self) -> &LoadState {
            &self.state
        }

        fn handle(&mut self, action: ChartAction, today: NaiveDate) -> Option<FetchRequest> {
            self.actions.push(action);
            match action {
                ChartAction::CursorLeft | ChartAction::CursorRight => None,
                _ => Some(self.request(today)),
            }
        }

        fn request(&mut self, today: NaiveDate) -> FetchRequest {
            self.state = LoadState::Loading;
            FetchRequest {
                target: self.id,
                generation: self.generation.bump(),
                query: crate::provider::Query::HourlySteps {
                    today,
                    day_start: 0,
                    day_end: 1,
                },
            }
        }

        fn accept(&mut self, reply: FetchReply) -> bool {
            if !self.generation.is_current(reply.generation) {
                return false;
            }
            self.state = match reply.result {
                Ok(_) => LoadState::Ready,
                Err(e) => LoadState::Failed(e.to_string()),
            };
            true
        }

        fn draw(&self, _area: Rect, _buf: &mut Buffer, _theme: &Theme) {}

        fn view(&self, _area: Rect, _buf: &mut Buffer, _theme: &Theme, _tick: u64) {}

        fn focus(&mut self) {
            self.focused = true;
        }

        fn blur(&mut self) {
            self.focused = false;
        }

        fn focused(&self) -> bool {
            self.focused
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_bumps_and_matches() {
        let mut g = Generation::default();
        assert_eq!(g.current(), 0);
        let first = g.bump();
        let second = g.bump();
        assert_eq!((first, second), (1, 2));
        assert!(!g.is_current(first));
        assert!(g.is_current(second));
    }

    #[test]
    fn loading_frames_cycle() {
        assert_eq!(loading_frame(0), ("◐", ""));
        assert_eq!(loading_frame(3), ("◒", "..."));
        assert_eq!(loading_frame(5), ("◓", "."));
    }

    #[test]
    fn failed_state_carries_message() {
        let state = LoadState::Failed("no such table".into());
        assert!(state.is_failed());
        assert!(!LoadState::Ready.is_failed());
    }

    #[test]
    fn ready_has_no_notice() {
        let theme = Theme::default();
        assert!(state_notice(&LoadState::Ready, &theme, 0).is_none());
        let line = state_notice(&LoadState::Failed("boom".into()), &theme, 0).unwrap();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("boom"));
    }
}
