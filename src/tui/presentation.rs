use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use day_grid::app::AppState;
use crate::tui::{calendar_views, calendar_views::day::GridGeometry, dialogs};

pub fn title_text(app: &AppState) -> String {
    let mut title = format!("day-grid - {}", app.view.date_title(app.selected_date));
    if app.selected_date == Utc::now().date_naive() {
        title.push_str(" (today)");
    }
    if app.loading {
        title.push_str(" - Loading...");
    }
    title
}

pub fn status_text(app: &AppState) -> String {
    match &app.status_message {
        Some(message) => message.clone(),
        None => format!(
            "Events: {} | h/l: day | t: today | r: reload | click slot: new | '?' help | 'q' quit",
            app.events.len()
        ),
    }
}

/// Draws the whole screen and returns the grid geometry for mouse hits.
pub fn ui(f: &mut Frame, app: &AppState) -> GridGeometry {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title = Paragraph::new(title_text(app))
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let grid_block = Block::default().borders(Borders::ALL);
    let grid_area: Rect = grid_block.inner(chunks[1]);
    f.render_widget(grid_block, chunks[1]);
    let geometry = calendar_views::day::render(f, app, grid_area);

    let status = Paragraph::new(status_text(app))
        .style(Style::default().fg(app.theme.status_bar))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);

    if app.show_help {
        dialogs::help::render(f, app);
    }

    if app.event_form.is_some() {
        dialogs::event_form::render(f, app);
    }

    geometry
}
