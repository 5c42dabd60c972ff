use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Task;
use crate::ui::styles;
use crate::utils::dates;
use crate::utils::format::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let empty = Vec::new();
    let tasks = app.tasks.as_deref().unwrap_or(&empty);
    let open: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status != crate::models::TaskStatus::Completed)
        .collect();

    let overdue: Vec<&Task> = open.iter().copied().filter(|t| t.is_overdue()).collect();
    let today: Vec<&Task> = open.iter().copied().filter(|t| t.is_due_today()).collect();
    let upcoming: Vec<&Task> = open
        .iter()
        .copied()
        .filter(|t| !t.is_overdue() && !t.is_due_today() && t.due_date.is_some())
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let today_title = format!(" Due today ({}) ", dates::today_string());
    render_group(frame, chunks[0], " Overdue ", &overdue, styles::overdue_style());
    render_group(frame, chunks[1], &today_title, &today, styles::highlight_style());
    render_group(frame, chunks[2], " Upcoming ", &upcoming, styles::success_style());
}

fn render_group(
    frame: &mut Frame,
    area: Rect,
    name: &str,
    tasks: &[&Task],
    accent: ratatui::style::Style,
) {
    let mut lines = Vec::new();
    for task in tasks {
        let due = dates::to_local_date_string(&task.due_date).unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", due), accent),
            Span::raw(truncate_string(&task.title, 48)),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("Nothing here.", styles::muted_style())));
    }

    let block = Block::default()
        .title(format!("{}({} tasks) ", name, tasks.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
