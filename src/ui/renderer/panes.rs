//! Content area: the active tab's chart, or every chart stacked.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::config::LayoutMode;
use crate::ui::focus::ZoneId;
use crate::ui::state::Dashboard;

/// Draw the visible charts. Returns their hit zones.
pub fn render_content(frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Vec<(ZoneId, Rect)> {
    match dashboard.layout() {
        LayoutMode::Tabbed => match dashboard.tab().zone() {
            Some(id) => {
                draw_pane(frame, area, dashboard, id);
                vec![(id, area)]
            }
            None => {
                render_sleep_placeholder(frame, area, dashboard);
                Vec::new()
            }
        },
        LayoutMode::MultiPane => {
            let ids = ZoneId::all();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(ids.iter().map(|_| Constraint::Ratio(1, ids.len() as u32)))
                .split(area);
            ids.iter()
                .zip(chunks.iter())
                .map(|(id, rect)| {
                    draw_pane(frame, *rect, dashboard, *id);
                    (*id, *rect)
                })
                .collect()
        }
    }
}

fn draw_pane(frame: &mut Frame, area: Rect, dashboard: &Dashboard, id: ZoneId) {
    dashboard
        .widget(id)
        .view(area, frame.buffer_mut(), &dashboard.theme, dashboard.tick_count);
}

fn render_sleep_placeholder(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let t = &dashboard.theme;
    let block = Block::default()
        .title(Span::styled(" sleep ", t.header_style()))
        .borders(Borders::ALL)
        .border_style(t.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let msg = Paragraph::new(Line::from(Span::styled(
        "sleep tracking is not available yet",
        t.dim_style(),
    )))
    .alignment(ratatui::layout::Alignment::Center);
    let y = inner.y + inner.height / 2;
    frame.render_widget(msg, Rect::new(inner.x, y, inner.width, inner.height.min(1)));
}
