//! Pointer hit-testing and focus ownership.
//!
//! Zones are recorded from the last drawn frame and replaced wholesale on the
//! next one. The router is the only writer of widget focus flags.

use ratatui::layout::{Position, Rect};

use super::tabs::TabState;
use super::widgets::ChartWidget;

/// Identifies a chart widget and its hit zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneId {
    Steps,
    Weight,
    Heart,
}

impl ZoneId {
    pub fn all() -> &'static [ZoneId] {
        &[ZoneId::Steps, ZoneId::Weight, ZoneId::Heart]
    }
}

/// Screen rectangles from the last frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitZones {
    pub widgets: Vec<(ZoneId, Rect)>,
    pub tabs: Vec<(TabState, Rect)>,
}

impl HitZones {
    pub fn widget_at(&self, column: u16, row: u16) -> Option<ZoneId> {
        let point = Position::new(column, row);
        self.widgets
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }

    pub fn tab_at(&self, column: u16, row: u16) -> Option<TabState> {
        let point = Position::new(column, row);
        self.tabs
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(tab, _)| *tab)
    }
}

/// Tracks at most one focused widget.
#[derive(Debug, Default)]
pub struct FocusRouter {
    focused: Option<ZoneId>,
    zones: HitZones,
}

impl FocusRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<ZoneId> {
        self.focused
    }

    pub fn zones(&self) -> &HitZones {
        &self.zones
    }

    pub fn set_zones(&mut self, zones: HitZones) {
        self.zones = zones;
    }

    /// Focus `id` and blur every other widget.
    pub fn focus(&mut self, id: ZoneId, widgets: &mut [&mut dyn ChartWidget]) {
        self.focused = Some(id);
        for widget in widgets.iter_mut() {
            if widget.zone_id() == id {
                widget.focus();
            } else {
                widget.blur();
            }
        }
    }

    /// Blur every widget.
    pub fn clear(&mut self, widgets: &mut [&mut dyn ChartWidget]) {
        self.focused = None;
        for widget in widgets.iter_mut() {
            widget.blur();
        }
    }

    /// Resolve a pointer press against the current zones. A press outside
    /// every zone leaves focus unchanged. Returns the newly focused widget.
    pub fn press(
        &mut self,
        column: u16,
        row: u16,
        widgets: &mut [&mut dyn ChartWidget],
    ) -> Option<ZoneId> {
        let hit = self.zones.widget_at(column, row)?;
        self.focus(hit, widgets);
        Some(hit)
    }

    /// Move focus to the next (or previous) widget in `order`.
    pub fn cycle(
        &mut self,
        order: &[ZoneId],
        forward: bool,
        widgets: &mut [&mut dyn ChartWidget],
    ) -> Option<ZoneId> {
        if order.is_empty() {
            return None;
        }
        let n = order.len();
        let next = match self.focused.and_then(|id| order.iter().position(|z| *z == id)) {
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        let id = order[next];
        self.focus(id, widgets);
        Some(id)
    }
}
