use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};
use tracing::{debug, warn};

use super::{render_notice, state_notice, ChartAction, ChartWidget, Generation, LoadState};
use crate::constants::{BAR_GAP, BAR_SIDE_PANEL_WIDTH, BAR_WIDTH, HOURS_PER_DAY, MIN_CHART_HEIGHT};
use crate::models::{BarSeries, DayWindow};
use crate::provider::{FetchReply, FetchRequest, Payload, Query};
use crate::ui::focus::ZoneId;
use crate::ui::theme::Theme;

/// Hourly steps for the day under the window, one bar per hour.
pub struct BarChartWidget {
    window: DayWindow,
    series: BarSeries,
    active: usize,
    state: LoadState,
    generation: Generation,
    focused: bool,
    today: NaiveDate,
    // Set after the first successful load; later loads keep the cursor.
    cursor_placed: bool,
}

impl BarChartWidget {
    pub fn new(today: NaiveDate) -> Self {
        let window = DayWindow::default();
        Self {
            window,
            series: BarSeries::empty(window.first_day(today)),
            active: 0,
            state: LoadState::Loading,
            generation: Generation::default(),
            focused: false,
            today,
            cursor_placed: false,
        }
    }

    #[cfg(test)]
    pub fn window(&self) -> DayWindow {
        self.window
    }

    #[cfg(test)]
    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    #[cfg(test)]
    pub fn active_index(&self) -> usize {
        self.active
    }

    fn side_panel(&self, theme: &Theme) -> Vec<Line<'static>> {
        let hour = BarSeries::label(self.active);
        let value = self.series.value(self.active);
        vec![
            Line::from(Span::styled(format!("{}:00", hour), theme.header_style())),
            Line::from(Span::styled(
                format!("{:.0} steps", value),
                theme.bar_highlight_style(),
            )),
            Line::from(""),
            Line::from(Span::styled("day total", theme.dim_style())),
            Line::from(Span::styled(
                format!("{:.0}", self.series.total()),
                theme.total_style(),
            )),
        ]
    }
}

impl ChartWidget for BarChartWidget {
    fn zone_id(&self) -> ZoneId {
        ZoneId::Steps
    }

    fn title(&self) -> &str {
        "steps per hour"
    }

    fn load_state(&self) -> &LoadState {
        &self.state
    }

    fn handle(&mut self, action: ChartAction, today: NaiveDate) -> Option<FetchRequest> {
        match action {
            ChartAction::Earlier => {
                if !self.window.shift_earlier() {
                    return None;
                }
                Some(self.request(today))
            }
            ChartAction::Later => {
                if !self.window.shift_later() {
                    return None;
                }
                Some(self.request(today))
            }
            ChartAction::CursorLeft => {
                self.active = (self.active + HOURS_PER_DAY - 1) % HOURS_PER_DAY;
                None
            }
            ChartAction::CursorRight => {
                self.active = (self.active + 1) % HOURS_PER_DAY;
                None
            }
            ChartAction::Reload => Some(self.request(today)),
        }
    }

    fn request(&mut self, today: NaiveDate) -> FetchRequest {
        self.today = today;
        self.series = BarSeries::empty(self.window.first_day(today));
        self.state = LoadState::Loading;
        let generation = self.generation.bump();
        debug!(
            day_start = self.window.start(),
            day_end = self.window.end(),
            generation,
            "steps window changed"
        );
        FetchRequest {
            target: ZoneId::Steps,
            generation,
            query: Query::HourlySteps {
                today,
                day_start: self.window.start(),
                day_end: self.window.end(),
            },
        }
    }

    fn accept(&mut self, reply: FetchReply) -> bool {
        if reply.target != ZoneId::Steps || !self.generation.is_current(reply.generation) {
            debug!(generation = reply.generation, "dropping stale steps reply");
            return false;
        }
        match reply.result {
            Ok(Payload::Hourly(rows)) => {
                self.series = BarSeries::from_hourly(self.window.first_day(self.today), &rows);
                if !self.cursor_placed {
                    self.active = self.series.first_nonzero().unwrap_or(0);
                    self.cursor_placed = true;
                }
                debug!(rows = rows.len(), total = self.series.total(), "steps loaded");
                self.state = LoadState::Ready;
            }
            Ok(Payload::Series(_)) => {
                warn!("steps widget received a series payload");
                self.state = LoadState::Failed("unexpected payload".to_string());
            }
            Err(e) => {
                warn!(error = %e, "steps fetch failed");
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.height < MIN_CHART_HEIGHT || area.width < HOURS_PER_DAY as u16 {
            return;
        }
        let slots = HOURS_PER_DAY as u16;
        let gap = if area.width >= slots * BAR_WIDTH + (slots - 1) * BAR_GAP {
            BAR_GAP
        } else {
            0
        };
        let bar_width = (area.width.saturating_sub(gap * (slots - 1)) / slots).max(1);

        let bars: Vec<Bar> = self
            .series
            .entries()
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                let style = if i == self.active {
                    theme.bar_highlight_style()
                } else {
                    theme.bar_style()
                };
                Bar::default()
                    .value(sample.value.max(0.0).round() as u64)
                    .label(Line::from(BarSeries::label(i)))
                    .text_value(String::new())
                    .style(style)
            })
            .collect();

        BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(gap)
            .bar_style(theme.bar_style())
            .label_style(theme.dim_style())
            .render(area, buf);
    }

    fn view(&self, area: Rect, buf: &mut Buffer, theme: &Theme, tick: u64) {
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(format!(" {} ", self.title()), theme.header_style()),
                Span::styled(
                    format!("{} ", self.window.caption(self.today)),
                    theme.dim_style(),
                ),
            ]))
            .borders(Borders::ALL)
            .border_style(theme.pane_border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(notice) = state_notice(&self.state, theme, tick) {
            render_notice(inner, buf, notice);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(BAR_SIDE_PANEL_WIDTH),
            ])
            .split(inner);

        self.draw(chunks[0], buf, theme);
        if self.series.is_all_zero() {
            let line = Line::from(Span::styled("no steps recorded", theme.dim_style()));
            Paragraph::new(line)
                .alignment(ratatui::layout::Alignment::Center)
                .render(Rect::new(chunks[0].x, chunks[0].y, chunks[0].width, 1), buf);
        }

        Paragraph::new(self.side_panel(theme))
            .block(
                Block::default()
                    .borders(Borders::LEFT)
                    .border_style(theme.border_style()),
            )
            .render(chunks[1], buf);
    }

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
