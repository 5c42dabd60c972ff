use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::Value;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Ratio(1, 2),
            Constraint::Min(3),
        ])
        .split(area);

    let bundle = app.analytics.as_deref();

    render_overview(frame, app, chunks[0]);
    render_section(
        frame,
        chunks[1],
        " Task analytics ",
        bundle.and_then(|b| b.tasks.as_ref()),
    );
    render_section(
        frame,
        chunks[2],
        " Habits ",
        bundle.and_then(|b| b.habits.as_ref()),
    );
}

fn render_overview(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    match app.analytics.as_deref().and_then(|b| b.overview.as_ref()) {
        Some(overview) => {
            lines.push(Line::from(vec![
                Span::styled("Total: ", styles::muted_style()),
                Span::raw(overview.total_tasks.to_string()),
                Span::styled("   Completed: ", styles::muted_style()),
                Span::styled(overview.completed_tasks.to_string(), styles::success_style()),
                Span::styled("   In progress: ", styles::muted_style()),
                Span::raw(overview.in_progress_tasks.to_string()),
                Span::styled("   Pending: ", styles::muted_style()),
                Span::raw(overview.pending_tasks.to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Completion: ", styles::muted_style()),
                Span::styled(
                    format!("{}%", overview.completion_percent()),
                    styles::title_style(),
                ),
            ]));
        }
        None => lines.push(unavailable_line()),
    }

    let block = Block::default()
        .title(" Overview ")
        .title_style(styles::title_style())
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_section(frame: &mut Frame, area: Rect, title: &str, payload: Option<&Value>) {
    let lines = match payload {
        Some(value) => summarize(value),
        None => vec![unavailable_line()],
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Flatten the top level of an analytics payload into label/value lines.
fn summarize(value: &Value) -> Vec<Line<'static>> {
    match value {
        Value::Object(map) => map
            .iter()
            .take(12)
            .map(|(key, val)| {
                let rendered = match val {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => "-".to_string(),
                    other => format!("{} entries", count_entries(other)),
                };
                Line::from(vec![
                    Span::styled(format!("{}: ", key), styles::muted_style()),
                    Span::raw(rendered),
                ])
            })
            .collect(),
        other => vec![Line::from(Span::raw(other.to_string()))],
    }
}

fn count_entries(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 1,
    }
}

fn unavailable_line() -> Line<'static> {
    Line::from(Span::styled(
        "Unavailable right now.",
        styles::muted_style(),
    ))
}
