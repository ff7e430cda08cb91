//! Header bar: logo, tab strip (or pane list), date.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::config::LayoutMode;
use crate::ui::focus::ZoneId;
use crate::ui::state::Dashboard;
use crate::ui::tabs::TabState;

const SEPARATOR: &str = " │ ";

fn tab_label(tab: TabState) -> String {
    format!(" {} {} ", tab.index() + 1, tab.label())
}

/// Screen rectangles of the tab labels inside a bordered strip at `area`.
pub fn tab_zones(area: Rect) -> Vec<(TabState, Rect)> {
    let inner = Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    );
    if inner.height == 0 {
        return Vec::new();
    }
    let right = inner.x + inner.width;
    // Leading pad of one column, as rendered below.
    let mut x = inner.x + 1;
    let mut zones = Vec::new();
    for tab in TabState::all() {
        let width = tab_label(*tab).chars().count() as u16;
        if x >= right {
            break;
        }
        let clipped = width.min(right - x);
        zones.push((*tab, Rect::new(x, inner.y, clipped, 1)));
        x = x.saturating_add(width + SEPARATOR.chars().count() as u16);
    }
    zones
}

/// Draw the header. Returns tab-label zones in tabbed layout.
pub fn render_header(frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Vec<(TabState, Rect)> {
    let t = &dashboard.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16), // Logo
            Constraint::Min(20),    // Tabs
            Constraint::Length(16), // Date
        ])
        .split(area);

    // Logo
    let pulse = if dashboard.tick_count % 2 == 0 {
        "●"
    } else {
        "○"
    };
    let logo = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(pulse, Style::default().fg(t.success)),
        Span::styled(" vitus", t.header_style()),
        Span::styled(
            concat!(" v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(t.text_muted),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(logo, chunks[0]);

    let mut spans = vec![Span::raw(" ")];
    let zones = match dashboard.layout() {
        LayoutMode::Tabbed => {
            for (i, tab) in TabState::all().iter().enumerate() {
                let style = if *tab == dashboard.tab() {
                    t.tab_active_style()
                } else {
                    t.tab_inactive_style()
                };
                spans.push(Span::styled(tab_label(*tab), style));
                if i < TabState::all().len() - 1 {
                    spans.push(Span::styled(SEPARATOR, Style::default().fg(t.text_muted)));
                }
            }
            tab_zones(chunks[1])
        }
        LayoutMode::MultiPane => {
            for (i, id) in ZoneId::all().iter().enumerate() {
                let style = if dashboard.focused() == Some(*id) {
                    t.tab_active_style()
                } else {
                    t.tab_inactive_style()
                };
                spans.push(Span::styled(
                    format!(" {} ", dashboard.widget(*id).title()),
                    style,
                ));
                if i < ZoneId::all().len() - 1 {
                    spans.push(Span::styled(SEPARATOR, Style::default().fg(t.text_muted)));
                }
            }
            Vec::new()
        }
    };

    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(strip, chunks[1]);

    let date = Paragraph::new(Line::from(Span::styled(
        dashboard.today().format("%a %Y-%m-%d").to_string(),
        Style::default().fg(t.text_dim),
    )))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(date, chunks[2]);

    zones
}
