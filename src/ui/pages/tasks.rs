use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::models::TaskStatus;
use crate::ui::styles;
use crate::utils::format::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let empty = Vec::new();
    let tasks = app.tasks.as_deref().unwrap_or(&empty);

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let status_style = match task.status {
                TaskStatus::Completed => styles::success_style(),
                TaskStatus::InProgress => styles::highlight_style(),
                TaskStatus::Pending => styles::muted_style(),
            };
            let due = crate::utils::dates::to_local_date_string(&task.due_date)
                .unwrap_or_else(|| "-".to_string());
            let due_style = if task.is_overdue() {
                styles::overdue_style()
            } else {
                styles::muted_style()
            };

            let line = Line::from(vec![
                Span::styled(format!("{:<12}", task.status.label()), status_style),
                Span::raw(format!("{:<32}", truncate_string(&task.title, 30))),
                Span::raw(format!("{:<8}", task.priority_label())),
                Span::raw(format!(
                    "{:<14}",
                    truncate_string(task.category.as_deref().unwrap_or("-"), 12)
                )),
                Span::styled(format!("{:<12}", due), due_style),
            ]);

            let style = if i == app.selected_task {
                styles::selected_style()
            } else {
                ratatui::style::Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let suffix = if app.demo_fallback { ", sample data" } else { "" };
    let block = Block::default()
        .title(format!(" Tasks ({}{}) ", tasks.len(), suffix))
        .title_style(styles::title_style())
        .borders(Borders::ALL);

    if items.is_empty() {
        let placeholder = ratatui::widgets::Paragraph::new(Line::from(Span::styled(
            "Nothing here. Press r to refresh.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.selected_task));
    frame.render_stateful_widget(list, area, &mut state);
}
