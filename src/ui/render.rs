use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::nav::{menu, Page};

use super::{pages, styles};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    render_notifications(frame, app);
    render_confirm(frame, app);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  taskdeck";
    let greeting = if app.is_logged_in() {
        format!("Hi, {} ", app.greeting_name())
    } else {
        "not signed in ".to_string()
    };

    let padding = (area.width as usize).saturating_sub(title.len() + greeting.len());
    let line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(greeting, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, item) in menu(app.is_logged_in()).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, item.label);
        spans.push(Span::styled(label, styles::tab_style(item.page == app.page)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.page {
        Page::Login | Page::Register => pages::login::render(frame, app, area),
        Page::Dashboard => pages::dashboard::render(frame, app, area),
        Page::Tasks => pages::tasks::render(frame, app, area),
        Page::Calendar => pages::calendar::render(frame, app, area),
        Page::Analytics => pages::analytics::render(frame, app, area),
        Page::Profile => pages::profile::render(frame, app, area),
        Page::Settings => pages::settings::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left = if app.loading {
        " loading... "
    } else {
        " ready "
    };
    let shortcuts = "[1-6] pages | [r]efresh | [h]ealth | [x] sign out | [q]uit ";

    let padding = (area.width as usize).saturating_sub(left.len() + shortcuts.len());
    let line = Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(padding)),
        Span::styled(shortcuts, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}

fn render_notifications(frame: &mut Frame, app: &App) {
    if app.notices.is_empty() {
        return;
    }
    let screen = frame.area();
    let width = screen.width.min(44);
    let x = screen.width.saturating_sub(width);
    let mut y = 2;

    for notification in app.notices.items() {
        if y + 3 > screen.height {
            break;
        }
        let area = Rect::new(x, y, width, 3);
        let block = Block::default()
            .title(format!(" {} ", notification.severity.label()))
            .title_style(styles::severity_style(notification.severity))
            .borders(Borders::ALL)
            .border_style(styles::severity_style(notification.severity));
        let body = Paragraph::new(notification.message.clone())
            .wrap(Wrap { trim: true })
            .block(block);

        frame.render_widget(Clear, area);
        frame.render_widget(body, area);
        y += 3;
    }
}

fn render_confirm(frame: &mut Frame, app: &App) {
    let Some(dialog) = &app.confirm else {
        return;
    };

    let area = centered_rect(frame.area(), 50, 8);
    let accent = styles::confirm_style(dialog.kind);

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw(dialog.message.clone())),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("[y] {} ", dialog.confirm_label), accent),
            Span::raw("   "),
            Span::styled(
                format!("[n] {}", dialog.cancel_label),
                styles::muted_style(),
            ),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", dialog.title))
        .title_style(accent)
        .borders(Borders::ALL)
        .border_style(accent);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn centered_rect(screen: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(screen.width);
    let h = height.min(screen.height);
    Rect::new(
        screen.x + (screen.width - w) / 2,
        screen.y + (screen.height - h) / 2,
        w,
        h,
    )
}
