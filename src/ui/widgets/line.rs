use chrono::{DateTime, Local, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};
use tracing::{debug, warn};

use super::{render_notice, state_notice, ChartAction, ChartWidget, Generation, LoadState};
use crate::constants::{
    DEFAULT_HEART_Y_MAX, DEFAULT_HEART_Y_MIN, DEFAULT_HEART_ZONES, LINE_SIDE_PANEL_WIDTH,
    MIN_CHART_HEIGHT,
};
use crate::models::{DateWindow, DayWindow, Metric, Sample};
use crate::provider::{FetchReply, FetchRequest, Payload, Query};
use crate::ui::focus::ZoneId;
use crate::ui::theme::Theme;

/// Fixed presentation settings for one continuous metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricProfile {
    pub metric: Metric,
    pub title: String,
    pub y_bounds: [f64; 2],
    /// Horizontal guides drawn across the whole view range.
    pub reference_lines: Vec<f64>,
    /// chrono format for x-axis labels.
    pub label_format: &'static str,
}

impl MetricProfile {
    pub fn heart(y_min: f64, y_max: f64, zones: Vec<f64>) -> Self {
        Self {
            metric: Metric::HeartRate,
            title: "heart rate".to_string(),
            y_bounds: [y_min, y_max],
            reference_lines: zones,
            label_format: "%H:%M",
        }
    }

    pub fn weight(y_min: f64, y_max: f64) -> Self {
        Self {
            metric: Metric::Weight,
            title: "weight".to_string(),
            y_bounds: [y_min, y_max],
            reference_lines: Vec::new(),
            label_format: "%Y-%m-%d",
        }
    }
}

impl Default for MetricProfile {
    fn default() -> Self {
        Self::heart(
            DEFAULT_HEART_Y_MIN,
            DEFAULT_HEART_Y_MAX,
            DEFAULT_HEART_ZONES.to_vec(),
        )
    }
}

/// Time range a line chart pages through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineWindow {
    /// Offsets from today, moved one day at a time.
    Relative(DayWindow),
    /// Calendar dates, moved by the widget's step.
    Absolute(DateWindow),
}

impl LineWindow {
    fn shift_earlier(&mut self, step: u32) -> bool {
        match self {
            LineWindow::Relative(w) => w.shift_earlier(),
            LineWindow::Absolute(w) => w.shift_earlier(step),
        }
    }

    fn shift_later(&mut self, step: u32) -> bool {
        match self {
            LineWindow::Relative(w) => w.shift_later(),
            LineWindow::Absolute(w) => w.shift_later(step),
        }
    }

    pub fn bounds(&self, today: NaiveDate) -> (DateTime<Local>, DateTime<Local>) {
        match self {
            LineWindow::Relative(w) => w.bounds(today),
            LineWindow::Absolute(w) => w.bounds(),
        }
    }

    pub fn caption(&self, today: NaiveDate) -> String {
        match self {
            LineWindow::Relative(w) => w.caption(today),
            LineWindow::Absolute(w) => w.caption(),
        }
    }
}

/// Continuous readings drawn as a braille line with fixed y bounds.
pub struct LineChartWidget {
    zone: ZoneId,
    profile: MetricProfile,
    window: LineWindow,
    step_days: u32,
    series: Vec<Sample>,
    data_range: (DateTime<Local>, DateTime<Local>),
    view_range: (DateTime<Local>, DateTime<Local>),
    state: LoadState,
    generation: Generation,
    focused: bool,
    today: NaiveDate,
}

impl LineChartWidget {
    pub fn new(
        zone: ZoneId,
        profile: MetricProfile,
        window: LineWindow,
        step_days: u32,
        today: NaiveDate,
    ) -> Self {
        let range = window.bounds(today);
        Self {
            zone,
            profile,
            window,
            step_days: step_days.max(1),
            series: Vec::new(),
            data_range: range,
            view_range: range,
            state: LoadState::Loading,
            generation: Generation::default(),
            focused: false,
            today,
        }
    }

    /// Heart rate for today, paged one day at a time.
    pub fn heart(profile: MetricProfile, today: NaiveDate) -> Self {
        Self::new(
            ZoneId::Heart,
            profile,
            LineWindow::Relative(DayWindow::default()),
            1,
            today,
        )
    }

    /// Weight from `start` through today, paged by `step_days`.
    pub fn weight(
        profile: MetricProfile,
        start: NaiveDate,
        step_days: u32,
        today: NaiveDate,
    ) -> Self {
        Self::new(
            ZoneId::Weight,
            profile,
            LineWindow::Absolute(DateWindow::through_today(start, today)),
            step_days,
            today,
        )
    }

    #[cfg(test)]
    pub fn window(&self) -> LineWindow {
        self.window
    }

    #[cfg(test)]
    pub fn series(&self) -> &[Sample] {
        &self.series
    }

    #[cfg(test)]
    pub fn data_range(&self) -> (DateTime<Local>, DateTime<Local>) {
        self.data_range
    }

    #[cfg(test)]
    pub fn view_range(&self) -> (DateTime<Local>, DateTime<Local>) {
        self.view_range
    }

    /// Lowest value, highest value and latest reading.
    fn summary(&self) -> Option<(f64, f64, &Sample)> {
        let latest = self.series.last()?;
        let (min, max) = self
            .series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.value), hi.max(s.value))
            });
        Some((min, max, latest))
    }

    fn x_of(&self, at: DateTime<Local>) -> f64 {
        (at - self.view_range.0).num_seconds() as f64
    }

    fn side_panel(&self, theme: &Theme) -> Vec<Line<'static>> {
        let unit = self.profile.metric.unit();
        let Some((min, max, latest)) = self.summary() else {
            return vec![Line::from(Span::styled("no readings", theme.dim_style()))];
        };
        vec![
            Line::from(Span::styled("latest", theme.dim_style())),
            Line::from(Span::styled(
                format!("{:.1} {}", latest.value, unit),
                theme.header_style(),
            )),
            Line::from(Span::styled(
                latest.timestamp.format(self.profile.label_format).to_string(),
                theme.dim_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("min ", theme.dim_style()),
                Span::styled(format!("{:.1}", min), Style::default().fg(theme.info)),
            ]),
            Line::from(vec![
                Span::styled("max ", theme.dim_style()),
                Span::styled(format!("{:.1}", max), Style::default().fg(theme.warning)),
            ]),
            Line::from(Span::styled(
                format!("{} readings", self.series.len()),
                theme.value_style(),
            )),
        ]
    }
}

impl ChartWidget for LineChartWidget {
    fn zone_id(&self) -> ZoneId {
        self.zone
    }

    fn title(&self) -> &str {
        &self.profile.title
    }

    fn load_state(&self) -> &LoadState {
        &self.state
    }

    fn handle(&mut self, action: ChartAction, today: NaiveDate) -> Option<FetchRequest> {
        match action {
            ChartAction::Earlier => {
                if !self.window.shift_earlier(self.step_days) {
                    return None;
                }
                Some(self.request(today))
            }
            ChartAction::Later => {
                if !self.window.shift_later(self.step_days) {
                    return None;
                }
                Some(self.request(today))
            }
            ChartAction::Reload => Some(self.request(today)),
            ChartAction::CursorLeft | ChartAction::CursorRight => None,
        }
    }

    fn request(&mut self, today: NaiveDate) -> FetchRequest {
        self.today = today;
        let (start, end) = self.window.bounds(today);
        self.data_range = (start, end);
        self.view_range = (start, end);
        self.series.clear();
        self.state = LoadState::Loading;
        let generation = self.generation.bump();
        debug!(
            metric = %self.profile.metric,
            start = %start,
            end = %end,
            generation,
            "series window changed"
        );
        FetchRequest {
            target: self.zone,
            generation,
            query: Query::Series {
                metric: self.profile.metric,
                start,
                end,
            },
        }
    }

    fn accept(&mut self, reply: FetchReply) -> bool {
        if reply.target != self.zone || !self.generation.is_current(reply.generation) {
            debug!(
                metric = %self.profile.metric,
                generation = reply.generation,
                "dropping stale series reply"
            );
            return false;
        }
        match reply.result {
            Ok(Payload::Series(mut samples)) => {
                let (start, end) = self.data_range;
                samples.retain(|s| s.timestamp >= start && s.timestamp < end);
                samples.sort_by_key(|s| s.timestamp);
                debug!(metric = %self.profile.metric, readings = samples.len(), "series loaded");
                self.series = samples;
                self.state = LoadState::Ready;
            }
            Ok(Payload::Hourly(_)) => {
                warn!(metric = %self.profile.metric, "line widget received an hourly payload");
                self.state = LoadState::Failed("unexpected payload".to_string());
            }
            Err(e) => {
                warn!(metric = %self.profile.metric, error = %e, "series fetch failed");
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.height < MIN_CHART_HEIGHT || area.width < 10 {
            return;
        }
        let span = self.x_of(self.view_range.1).max(1.0);
        let [y_min, y_max] = self.profile.y_bounds;

        let points: Vec<(f64, f64)> = self
            .series
            .iter()
            .map(|s| (self.x_of(s.timestamp), s.value))
            .collect();
        let guides: Vec<[(f64, f64); 2]> = self
            .profile
            .reference_lines
            .iter()
            .map(|&y| [(0.0, y), (span, y)])
            .collect();

        let line_color = match self.profile.metric {
            Metric::HeartRate => theme.heart_line,
            Metric::Weight => theme.weight_line,
        };

        let mut datasets: Vec<Dataset> = guides
            .iter()
            .map(|g| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(theme.zone_line))
                    .data(g)
            })
            .collect();
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(line_color))
                .data(&points),
        );

        let mid = self.view_range.0 + (self.view_range.1 - self.view_range.0) / 2;
        let fmt = self.profile.label_format;
        let x_labels = vec![
            Span::styled(self.view_range.0.format(fmt).to_string(), theme.dim_style()),
            Span::styled(mid.format(fmt).to_string(), theme.dim_style()),
            Span::styled(self.view_range.1.format(fmt).to_string(), theme.dim_style()),
        ];
        let y_labels = vec![
            Span::styled(format!("{:.0}", y_min), theme.dim_style()),
            Span::styled(format!("{:.0}", (y_min + y_max) / 2.0), theme.dim_style()),
            Span::styled(format!("{:.0}", y_max), theme.dim_style()),
        ];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(theme.border_style())
                    .bounds([0.0, span])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(theme.border_style())
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            )
            .render(area, buf);
    }

    fn view(&self, area: Rect, buf: &mut Buffer, theme: &Theme, tick: u64) {
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(format!(" {} ", self.profile.title), theme.header_style()),
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
                Constraint::Length(LINE_SIDE_PANEL_WIDTH),
            ])
            .split(inner);

        self.draw(chunks[0], buf, theme);
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
