use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::demo;
use crate::ui::styles;
use crate::utils::format::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(area);

    render_stat_tiles(frame, app, chunks[0]);
    render_recent_tasks(frame, app, chunks[1]);
}

fn render_stat_tiles(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app
        .tasks
        .as_ref()
        .map(|tasks| demo::stats(tasks))
        .unwrap_or_default();

    let tiles = [
        ("Total", stats.total, styles::title_style()),
        ("Completed", stats.completed, styles::success_style()),
        ("In progress", stats.in_progress, styles::highlight_style()),
        ("Pending", stats.pending, styles::muted_style()),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, count, style), column) in tiles.iter().zip(columns.iter()) {
        let tile = Paragraph::new(vec![
            Line::from(Span::styled(format!("{}", count), *style)),
            Line::from(Span::styled(*label, styles::muted_style())),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tile, *column);
    }
}

fn render_recent_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if let Some(tasks) = &app.tasks {
        // Most recently created first
        let mut recent: Vec<_> = tasks.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        for task in recent.iter().take(8) {
            let due = crate::utils::dates::to_local_date_string(&task.due_date)
                .map(|d| format!("due {}", d))
                .unwrap_or_else(|| "no due date".to_string());
            let due_style = if task.is_overdue() {
                styles::overdue_style()
            } else {
                styles::muted_style()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", task.status.label()), status_style(task)),
                Span::raw(format!("{:<36}", truncate_string(&task.title, 34))),
                Span::styled(due, due_style),
            ]));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tasks yet. Press r to refresh.",
            styles::muted_style(),
        )));
    }

    let title = if app.demo_fallback {
        " Recent tasks (sample data) "
    } else {
        " Recent tasks "
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_style(task: &crate::models::Task) -> ratatui::style::Style {
    use crate::models::TaskStatus;
    match task.status {
        TaskStatus::Completed => styles::success_style(),
        TaskStatus::InProgress => styles::highlight_style(),
        TaskStatus::Pending => styles::muted_style(),
    }
}
