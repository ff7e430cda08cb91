//! Renderer module: split into focused submodules.
//!
//! - `header`: Logo, tab strip, date
//! - `panes`: Chart panes for the active layout
//! - `status_bar`: Bottom status bar with keybinds and status message

mod header;
mod panes;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::constants::HEADER_HEIGHT;
use super::focus::HitZones;
use super::state::Dashboard;

/// Top-level render function. Returns the hit zones of this frame.
pub fn render(frame: &mut Frame, dashboard: &Dashboard) -> HitZones {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header bar
            Constraint::Min(6),                // Content area
            Constraint::Length(1),             // Status bar
        ])
        .split(size);

    let tabs = header::render_header(frame, main_chunks[0], dashboard);
    let widgets = panes::render_content(frame, main_chunks[1], dashboard);
    status_bar::render_status_bar(frame, main_chunks[2], dashboard);

    HitZones { widgets, tabs }
}
