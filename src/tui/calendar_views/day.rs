use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction as Axis, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use day_grid::{
    app::AppState,
    storage::config::Direction,
    ui::{
        day_view::{self, DayLayout},
        theme::parse_hex_color,
    },
};

const GUTTER_WIDTH: u16 = 8;

/// Screen placement of the last rendered grid, used for mouse hit tests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridGeometry {
    pub columns: Vec<Rect>,
    pub top: u16,
    pub row_cells: f64,
    pub hours: Vec<DateTime<Utc>>,
    pub blocks: Vec<EventBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBlock {
    pub column: usize,
    pub area: Rect,
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    Event(String),
    Slot { column: usize, hour: DateTime<Utc> },
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

impl GridGeometry {
    pub fn hit(&self, x: u16, y: u16) -> Option<Hit> {
        if let Some(block) = self.blocks.iter().rev().find(|b| contains(b.area, x, y)) {
            return Some(Hit::Event(block.event_id.clone()));
        }

        let column = self.columns.iter().position(|c| contains(*c, x, y))?;
        if self.row_cells <= 0.0 {
            return None;
        }
        let row = (f64::from(y - self.top) / self.row_cells).floor() as usize;
        let hour = *self.hours.get(row)?;
        Some(Hit::Slot { column, hour })
    }
}

/// Maps a pixel-space slot onto terminal cells inside `column`. Widths
/// above 100% are clipped to the column.
pub fn slot_rect(
    column: Rect,
    top: f64,
    height: f64,
    width_pct: Option<f64>,
    inset_pct: Option<f64>,
    scale: f64,
    direction: Direction,
) -> Option<Rect> {
    if column.width == 0 || column.height == 0 {
        return None;
    }
    let bottom = column.y + column.height;
    let y = column.y.saturating_add((top * scale).round().max(0.0) as u16);
    if y >= bottom {
        return None;
    }
    let rows = ((height * scale).round().max(1.0) as u16).min(bottom - y);

    let full = f64::from(column.width);
    let inset = ((full * inset_pct.unwrap_or(0.0) / 100.0).round() as u16).min(column.width - 1);
    let width = ((full * width_pct.unwrap_or(100.0).min(100.0) / 100.0).round().max(1.0) as u16)
        .min(column.width - inset);

    let x = match direction {
        Direction::Ltr => column.x + inset,
        Direction::Rtl => column.x + column.width - inset - width,
    };

    Some(Rect::new(x, y, width, rows))
}

pub fn render(f: &mut Frame, app: &AppState, area: Rect) -> GridGeometry {
    let layout = day_view::calculate_layout(app);
    let theme = &app.theme;

    let has_headers = layout.columns.iter().any(|c| c.title.is_some());
    let band_rows = layout.columns.iter().map(|c| c.bands.len()).max().unwrap_or(0) as u16;

    let sections = Layout::default()
        .direction(Axis::Vertical)
        .constraints([
            Constraint::Length(u16::from(has_headers)),
            Constraint::Length(band_rows),
            Constraint::Min(0),
        ])
        .split(area);

    let (gutter, body) = split_gutter(sections[2], layout.direction);
    let columns = split_columns(body, layout.columns.len());
    let scale = if app.height > 0.0 { f64::from(body.height) / app.height } else { 0.0 };

    if has_headers {
        let header_columns = split_columns(split_gutter(sections[0], layout.direction).1, layout.columns.len());
        for (column, rect) in layout.columns.iter().zip(header_columns.iter()) {
            let text = match (&column.title, &column.subtitle) {
                (Some(title), Some(sub)) => format!("{} · {}", title, sub),
                (Some(title), None) => title.clone(),
                _ => String::new(),
            };
            f.render_widget(
                Paragraph::new(text).style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD)),
                *rect,
            );
        }
    }

    let band_columns = split_columns(split_gutter(sections[1], layout.direction).1, layout.columns.len());
    for (column, rect) in layout.columns.iter().zip(band_columns.iter()) {
        for (i, band) in column.bands.iter().enumerate() {
            let row = Rect::new(rect.x, rect.y + i as u16, rect.width, 1);
            let label = format!(
                "{}{}{}",
                if band.has_prev { "◀ " } else { "" },
                band.event.title,
                if band.has_next { " ▶" } else { "" }
            );
            let bg = band
                .event
                .color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(theme.band_bg);
            f.render_widget(Paragraph::new(label).style(Style::default().bg(bg).fg(theme.event_fg)), row);
        }
    }

    render_hour_rows(f, app, &layout, gutter, body, scale);

    let mut blocks = Vec::new();
    for (index, (column, rect)) in layout.columns.iter().zip(columns.iter()).enumerate() {
        for slot in &column.slots {
            let Some(cell) = slot_rect(*rect, slot.top, slot.height, slot.width, slot.inset, scale, layout.direction) else {
                continue;
            };
            let text = vec![
                Line::from(Span::styled(slot.event.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
                Line::from(format!(
                    "{}-{}",
                    slot.event.start.format("%H:%M"),
                    slot.event.end.format("%H:%M")
                )),
            ];
            let bg = theme.event_color(slot.event.color.as_deref());
            f.render_widget(Paragraph::new(text).style(Style::default().bg(bg).fg(theme.event_fg)), cell);
            blocks.push(EventBlock {
                column: index,
                area: cell,
                event_id: slot.event.id.clone(),
            });
        }
    }

    if let Some(offset) = layout.now_offset {
        let y = body.y + (offset * scale).round() as u16;
        if y < body.y + body.height {
            let marker = "─".repeat(body.width as usize);
            f.render_widget(
                Paragraph::new(marker).style(Style::default().fg(theme.now_marker)),
                Rect::new(body.x, y, body.width, 1),
            );
        }
    }

    GridGeometry {
        columns,
        top: body.y,
        row_cells: layout.axis.row_height * scale,
        hours: layout.axis.hours.clone(),
        blocks,
    }
}

fn render_hour_rows(f: &mut Frame, app: &AppState, layout: &DayLayout, gutter: Rect, body: Rect, scale: f64) {
    let bottom = body.y + body.height;
    for row in &layout.rows {
        let y = body.y + (row.top * scale).round() as u16;
        if y >= bottom {
            break;
        }
        let label_style = if layout.is_today {
            Style::default().fg(app.theme.today)
        } else {
            Style::default().fg(app.theme.hour_label)
        };
        f.render_widget(Paragraph::new(row.label.clone()).style(label_style), Rect::new(gutter.x, y, gutter.width, 1));
        f.render_widget(
            Paragraph::new("┈".repeat(body.width as usize)).style(Style::default().fg(app.theme.grid_line)),
            Rect::new(body.x, y, body.width, 1),
        );
    }
}

fn split_gutter(area: Rect, direction: Direction) -> (Rect, Rect) {
    let gutter = GUTTER_WIDTH.min(area.width);
    let rest = area.width - gutter;
    match direction {
        Direction::Ltr => (
            Rect::new(area.x, area.y, gutter, area.height),
            Rect::new(area.x + gutter, area.y, rest, area.height),
        ),
        Direction::Rtl => (
            Rect::new(area.x + rest, area.y, gutter, area.height),
            Rect::new(area.x, area.y, rest, area.height),
        ),
    }
}

fn split_columns(area: Rect, count: usize) -> Vec<Rect> {
    let count = count.max(1) as u32;
    Layout::default()
        .direction(Axis::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)).collect::<Vec<_>>())
        .split(area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn column() -> Rect {
        Rect::new(10, 5, 40, 20)
    }

    #[test]
    fn full_width_slot_fills_column() {
        let rect = slot_rect(column(), 4.0, 6.0, None, None, 1.0, Direction::Ltr).unwrap();

        assert_eq!(rect, Rect::new(10, 9, 40, 6));
    }

    #[test]
    fn oversized_width_is_clipped() {
        let rect = slot_rect(column(), 0.0, 2.0, Some(110.0), None, 1.0, Direction::Ltr).unwrap();

        assert_eq!(rect.width, 40);
    }

    #[test]
    fn inset_moves_block_from_leading_edge() {
        let ltr = slot_rect(column(), 0.0, 2.0, Some(50.0), Some(50.0), 1.0, Direction::Ltr).unwrap();
        let rtl = slot_rect(column(), 0.0, 2.0, Some(50.0), Some(50.0), 1.0, Direction::Rtl).unwrap();

        assert_eq!(ltr.x, 30);
        assert_eq!(rtl.x, 10);
        assert_eq!(ltr.width, 20);
        assert_eq!(rtl.width, 20);
    }

    #[test]
    fn slot_below_column_is_dropped() {
        assert_eq!(slot_rect(column(), 25.0, 2.0, None, None, 1.0, Direction::Ltr), None);
    }

    #[test]
    fn tall_slot_is_cut_at_column_bottom() {
        let rect = slot_rect(column(), 18.0, 10.0, None, None, 1.0, Direction::Ltr).unwrap();

        assert_eq!(rect.height, 2);
    }

    #[test]
    fn pixel_offsets_are_scaled_to_cells() {
        let rect = slot_rect(column(), 100.0, 50.0, None, None, 0.1, Direction::Ltr).unwrap();

        assert_eq!(rect.y, 15);
        assert_eq!(rect.height, 5);
    }

    fn geometry() -> GridGeometry {
        let nine = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        GridGeometry {
            columns: vec![Rect::new(8, 2, 20, 12), Rect::new(28, 2, 20, 12)],
            top: 2,
            row_cells: 4.0,
            hours: (0..3).map(|i| nine + chrono::Duration::hours(i)).collect(),
            blocks: vec![EventBlock {
                column: 0,
                area: Rect::new(8, 2, 20, 2),
                event_id: "e1".to_string(),
            }],
        }
    }

    #[test]
    fn click_on_block_hits_event() {
        assert_eq!(geometry().hit(10, 3), Some(Hit::Event("e1".to_string())));
    }

    #[test]
    fn click_on_empty_cell_hits_slot() {
        let ten = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();

        assert_eq!(geometry().hit(30, 7), Some(Hit::Slot { column: 1, hour: ten }));
    }

    #[test]
    fn click_outside_columns_hits_nothing() {
        assert_eq!(geometry().hit(2, 3), None);
        assert_eq!(geometry().hit(30, 20), None);
    }
}
