use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use day_grid::app::AppState;

pub fn render(f: &mut Frame, app: &AppState) {
    let area = f.size();
    let help_width = 52.min(area.width);
    let help_height = 18.min(area.height);
    let help_area = Rect {
        x: (area.width.saturating_sub(help_width)) / 2,
        y: (area.height.saturating_sub(help_height)) / 2,
        width: help_width,
        height: help_height,
    };

    f.render_widget(Clear, help_area);

    let section = Style::default().fg(app.theme.hour_label);
    let help_text = vec![
        Line::from(vec![Span::styled(
            "day-grid Help",
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled("Navigation:", section)]),
        Line::from("  l/n/Right - Next day"),
        Line::from("  h/p/Left  - Previous day"),
        Line::from("  t         - Jump to today"),
        Line::from("  r         - Reload events"),
        Line::from(""),
        Line::from(vec![Span::styled("Mouse:", section)]),
        Line::from("  Click empty slot - New event at that hour"),
        Line::from("  Click event      - Show event details"),
        Line::from(""),
        Line::from(vec![Span::styled("General:", section)]),
        Line::from("  ?         - Toggle this help"),
        Line::from("  q         - Quit"),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (q to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Left);

    f.render_widget(help_paragraph, help_area);
}
