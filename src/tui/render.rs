use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::App;
use crate::engine::DisplayState;
use crate::model::{StatusColor, ViewItem};

const HINT: &str = "enter: next  s: set  J/K: move  drag: reorder  r: reload  q: quit";

pub(super) fn draw(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_body(frame, app, chunks[1]);
    draw_status_line(frame, app, chunks[2]);

    if app.menu.is_some() {
        draw_menu(frame, app);
    }
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let engine = app.session.engine();
    let order = if engine.manual_order_active() {
        Span::styled("manual order", Style::default().fg(Color::Magenta))
    } else {
        Span::styled("by status", Style::default().fg(Color::Cyan))
    };
    let mut spans = vec![
        Span::styled("Widget", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::raw(app.session.widget_id().to_string()),
        Span::raw("  "),
        order,
    ];
    let pending = app.session.in_flight();
    if pending > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("syncing {}", pending),
            Style::default().fg(Color::Yellow),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_body(frame: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Items");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.list_area = inner;

    let rows = match app.session.engine().display() {
        DisplayState::Loading => {
            app.list_offset = 0;
            frame.render_widget(
                Paragraph::new(Span::styled("Loading…", Style::default().fg(Color::Gray))),
                inner,
            );
            return;
        }
        DisplayState::NoData { message } => {
            app.list_offset = 0;
            let lines = vec![
                Line::from(Span::styled(
                    format!("No data: {}", message),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled("r: retry", Style::default().fg(Color::Gray))),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
            return;
        }
        DisplayState::Empty => {
            app.list_offset = 0;
            frame.render_widget(
                Paragraph::new(Span::styled("(no items)", Style::default().fg(Color::Gray))),
                inner,
            );
            return;
        }
        DisplayState::Items(items) => items,
    };

    // Keep the selected row inside the window.
    let height = (inner.height as usize).max(1);
    if app.selected < app.list_offset {
        app.list_offset = app.selected;
    } else if app.selected >= app.list_offset + height {
        app.list_offset = app.selected + 1 - height;
    }
    app.list_offset = app.list_offset.min(rows.len().saturating_sub(1));

    let dragging = app.session.engine().dragging().map(str::to_string);
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.list_offset)
        .take(height)
        .map(|(idx, item)| {
            row_line(
                item,
                idx == app.selected,
                dragging.as_deref() == Some(item.id.as_str()),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_line(item: &ViewItem, selected: bool, dragged: bool) -> Line<'_> {
    let check = if item.is_checked { "[x] " } else { "[ ] " };
    let status = item.status.as_deref().unwrap_or("?");

    let mut title_style = Style::default();
    if dragged {
        title_style = title_style.fg(Color::Black).bg(Color::Magenta);
    } else if selected {
        title_style = title_style.add_modifier(Modifier::REVERSED);
    }

    Line::from(vec![
        Span::styled("● ", Style::default().fg(status_color(item.status_color))),
        Span::styled(
            format!("{:<12} ", status),
            Style::default().fg(status_color(item.status_color)),
        ),
        Span::raw(check),
        Span::styled(item.title.as_str(), title_style),
    ])
}

fn draw_status_line(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let line = match app.notice.as_deref() {
        Some(msg) => Line::from(Span::styled(msg, Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(HINT, Style::default().fg(Color::Gray))),
    };
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn draw_menu(frame: &mut ratatui::Frame, app: &App) {
    let Some(menu) = app.menu.as_ref() else {
        return;
    };
    let options = app.session.engine().catalog().options();

    let area = frame.area();
    let w = area.width.saturating_sub(4).clamp(16, 40);
    let h = (options.len() as u16 + 2).min(area.height);
    let box_area = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h,
    };
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Status: {}", menu.item_id));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let mut style = Style::default().fg(status_color(opt.color));
            if i == menu.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::Gray)),
                Span::styled(opt.name.as_str(), style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

pub(super) fn status_color(color: StatusColor) -> Color {
    match color {
        StatusColor::Blue => Color::Blue,
        StatusColor::Green => Color::Green,
        StatusColor::Yellow => Color::Yellow,
        StatusColor::Red => Color::Red,
        StatusColor::Gray => Color::Gray,
        StatusColor::Orange => Color::LightRed,
        StatusColor::Purple => Color::Magenta,
        StatusColor::Pink => Color::LightMagenta,
        StatusColor::Brown => Color::DarkGray,
        StatusColor::Default => Color::White,
    }
}
