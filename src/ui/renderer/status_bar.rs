//! Status bar at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::config::LayoutMode;
use crate::constants::STATUS_MESSAGE_TIMEOUT_SECS;
use crate::ui::focus::ZoneId;
use crate::ui::state::Dashboard;

pub fn render_status_bar(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let t = &dashboard.theme;

    // Helper to create a keybind badge
    let badge = |key: &str, color: ratatui::style::Color| -> Span {
        Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(t.bg_dark)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    };
    let dim =
        |text: &str| -> Span { Span::styled(text.to_string(), Style::default().fg(t.text_dim)) };

    let switch = match dashboard.layout() {
        LayoutMode::Tabbed => " Tabs ",
        LayoutMode::MultiPane => " Focus ",
    };

    let mut spans = vec![
        Span::styled(" ", Style::default()),
        badge("q", t.accent),
        dim(" Quit "),
        badge("Tab", t.accent),
        dim(switch),
        badge("↑↓", t.accent),
        dim(" Page "),
        badge("r", t.accent),
        dim(" Reload "),
        badge("T", t.accent),
        dim(&format!(" Theme: {} ", t.name)),
    ];

    // Hour cursor only applies to the bar chart
    if dashboard.target() == Some(ZoneId::Steps) {
        spans.push(badge("←→", t.accent));
        spans.push(dim(" Hour "));
    }

    // Show status message (e.g., fetch failure) -- auto-expires
    if let Some((msg, when)) = &dashboard.status_message {
        if when.elapsed().as_secs() < STATUS_MESSAGE_TIMEOUT_SECS {
            spans.push(Span::styled(
                format!("  {} ", msg),
                Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
            ));
        }
    }

    let status = Paragraph::new(Line::from(spans));
    frame.render_widget(status, area);
}
