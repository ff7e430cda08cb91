use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::config::{Config, LayoutMode};
use crate::provider::{FetchReply, FetchRequest};

use super::focus::{FocusRouter, HitZones, ZoneId};
use super::tabs::TabState;
use super::theme::Theme;
use super::widgets::{BarChartWidget, ChartAction, ChartWidget, LineChartWidget, MetricProfile};

/// Input after key/mouse translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    SelectTab(TabState),
    Chart(ChartAction),
    CycleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
}

/// Source of "today" for window resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    #[allow(dead_code)] // tests pin the date
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(day) => *day,
        }
    }
}

/// Owns every widget and decides where input goes.
pub struct Dashboard {
    steps: BarChartWidget,
    weight: LineChartWidget,
    heart: LineChartWidget,
    router: FocusRouter,
    tab: TabState,
    layout: LayoutMode,
    run_state: RunState,
    clock: Clock,
    // Day the widgets were last anchored to.
    day: NaiveDate,

    // ── Theme ────────────────────────────────────────────────
    pub theme: Theme,

    // ── Status message (shown in status bar) ───────────────────
    pub status_message: Option<(String, Instant)>,
    pub tick_count: u64,
}

impl Dashboard {
    pub fn new(config: &Config, theme: Theme) -> Self {
        Self::with_clock(config, theme, Clock::System)
    }

    pub fn with_clock(config: &Config, theme: Theme, clock: Clock) -> Self {
        let today = clock.today();
        let heart = MetricProfile::heart(
            config.heart.y_min,
            config.heart.y_max,
            config.heart.zones.clone(),
        );
        let weight = MetricProfile::weight(config.weight.y_min, config.weight.y_max);

        let mut dashboard = Self {
            steps: BarChartWidget::new(today),
            weight: LineChartWidget::weight(
                weight,
                config.weight.start(today),
                config.weight.step_days,
                today,
            ),
            heart: LineChartWidget::heart(heart, today),
            router: FocusRouter::new(),
            tab: TabState::default(),
            layout: config.layout,
            run_state: RunState::Running,
            clock,
            day: today,
            theme,
            status_message: None,
            tick_count: 0,
        };
        dashboard.focus(ZoneId::Steps);
        dashboard
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn tab(&self) -> TabState {
        self.tab
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    #[cfg(test)]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn focused(&self) -> Option<ZoneId> {
        self.router.focused()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn widget(&self, id: ZoneId) -> &dyn ChartWidget {
        match id {
            ZoneId::Steps => &self.steps,
            ZoneId::Weight => &self.weight,
            ZoneId::Heart => &self.heart,
        }
    }

    fn widget_mut(&mut self, id: ZoneId) -> &mut dyn ChartWidget {
        match id {
            ZoneId::Steps => &mut self.steps,
            ZoneId::Weight => &mut self.weight,
            ZoneId::Heart => &mut self.heart,
        }
    }

    #[cfg(test)]
    pub fn steps(&self) -> &BarChartWidget {
        &self.steps
    }

    #[cfg(test)]
    pub fn weight(&self) -> &LineChartWidget {
        &self.weight
    }

    #[cfg(test)]
    pub fn heart(&self) -> &LineChartWidget {
        &self.heart
    }

    /// Widgets shown in the content area, top to bottom.
    pub fn visible(&self) -> Vec<ZoneId> {
        match self.layout {
            LayoutMode::Tabbed => self.tab.zone().into_iter().collect(),
            LayoutMode::MultiPane => ZoneId::all().to_vec(),
        }
    }

    /// Widget that receives chart actions.
    pub fn target(&self) -> Option<ZoneId> {
        match self.layout {
            LayoutMode::Tabbed => self.tab.zone(),
            LayoutMode::MultiPane => self.router.focused(),
        }
    }

    /// Set a status bar message with automatic timestamp.
    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    // ── Focus ────────────────────────────────────────────────

    fn focus(&mut self, id: ZoneId) {
        let mut widgets: [&mut dyn ChartWidget; 3] =
            [&mut self.steps, &mut self.weight, &mut self.heart];
        self.router.focus(id, &mut widgets);
    }

    fn clear_focus(&mut self) {
        let mut widgets: [&mut dyn ChartWidget; 3] =
            [&mut self.steps, &mut self.weight, &mut self.heart];
        self.router.clear(&mut widgets);
    }

    fn cycle_focus(&mut self, forward: bool) {
        let mut widgets: [&mut dyn ChartWidget; 3] =
            [&mut self.steps, &mut self.weight, &mut self.heart];
        self.router.cycle(ZoneId::all(), forward, &mut widgets);
    }

    fn select_tab(&mut self, tab: TabState) {
        self.tab = tab;
        match tab.zone() {
            Some(id) => self.focus(id),
            None => self.clear_focus(),
        }
        debug!(tab = tab.label(), "tab selected");
    }

    /// Replace the hit zones recorded by the last frame.
    pub fn set_zones(&mut self, zones: HitZones) {
        self.router.set_zones(zones);
    }

    // ── Input ────────────────────────────────────────────────

    /// Requests that fill every widget for its starting window.
    pub fn initial_requests(&mut self) -> Vec<FetchRequest> {
        let today = self.today();
        ZoneId::all()
            .iter()
            .map(|&id| self.widget_mut(id).request(today))
            .collect()
    }

    /// Re-anchor every widget once the local date has changed, so pane
    /// captions agree with the header. Returns the reload requests.
    pub fn roll_over(&mut self) -> Vec<FetchRequest> {
        let today = self.today();
        if today == self.day {
            return Vec::new();
        }
        info!(from = %self.day, to = %today, "date changed, reloading charts");
        self.day = today;
        self.initial_requests()
    }

    /// Route an action. Returns the fetches it triggered.
    pub fn handle_action(&mut self, action: Action) -> Vec<FetchRequest> {
        if !self.is_running() {
            return Vec::new();
        }
        match action {
            Action::Quit => {
                info!("quit requested");
                self.run_state = RunState::Terminated;
            }
            Action::NextTab | Action::PrevTab => {
                let forward = action == Action::NextTab;
                match self.layout {
                    LayoutMode::Tabbed => {
                        let tab = if forward { self.tab.next() } else { self.tab.prev() };
                        self.select_tab(tab);
                    }
                    LayoutMode::MultiPane => self.cycle_focus(forward),
                }
            }
            Action::SelectTab(tab) => match self.layout {
                LayoutMode::Tabbed => self.select_tab(tab),
                LayoutMode::MultiPane => {
                    if let Some(id) = tab.zone() {
                        self.focus(id);
                    }
                }
            },
            Action::Chart(chart_action) => {
                let Some(id) = self.target() else {
                    return Vec::new();
                };
                let today = self.today();
                return self
                    .widget_mut(id)
                    .handle(chart_action, today)
                    .into_iter()
                    .collect();
            }
            Action::CycleTheme => {
                self.theme = self.theme.next_builtin();
                self.set_status(format!("Theme: {}", self.theme.name));
            }
        }
        Vec::new()
    }

    /// Resolve a pointer press. Tab labels win over widget zones; a press
    /// outside every zone changes nothing.
    pub fn handle_pointer(&mut self, column: u16, row: u16) {
        if !self.is_running() {
            return;
        }
        if self.layout == LayoutMode::Tabbed {
            if let Some(tab) = self.router.zones().tab_at(column, row) {
                self.select_tab(tab);
                return;
            }
        }
        let mut widgets: [&mut dyn ChartWidget; 3] =
            [&mut self.steps, &mut self.weight, &mut self.heart];
        if let Some(id) = self.router.press(column, row, &mut widgets) {
            debug!(widget = ?id, column, row, "pointer focus");
        }
    }

    /// Hand a fetch reply to its widget. Returns `false` if it was stale.
    pub fn apply_reply(&mut self, reply: FetchReply) -> bool {
        let id = reply.target;
        let applied = self.widget_mut(id).accept(reply);
        if applied && self.widget(id).load_state().is_failed() {
            let title = self.widget(id).title().to_string();
            self.set_status(format!("Failed to load {}", title));
        }
        applied
    }

    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }
}
