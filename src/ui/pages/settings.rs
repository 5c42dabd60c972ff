use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(area);

    render_connection(frame, app, chunks[0]);
    render_actions(frame, chunks[1]);
}

fn render_connection(frame: &mut Frame, app: &App, area: Rect) {
    let health = match app.api_online {
        Some(true) => Span::styled("reachable", styles::success_style()),
        Some(false) => Span::styled("unreachable", styles::error_style()),
        None => Span::styled("not checked yet (press h)", styles::muted_style()),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("API health:   ", styles::muted_style()),
            health,
        ]),
        Line::from(vec![
            Span::styled("Signed in:    ", styles::muted_style()),
            Span::raw(if app.is_logged_in() { "yes" } else { "no" }),
        ]),
        Line::from(vec![
            Span::styled("Sample data:  ", styles::muted_style()),
            Span::raw(if app.demo_fallback {
                "currently shown"
            } else {
                "on standby"
            }),
        ]),
    ];

    let block = Block::default()
        .title(" Connection ")
        .title_style(styles::title_style())
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_actions(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("h  ", styles::highlight_style()),
            Span::raw("check API health"),
        ]),
        Line::from(vec![
            Span::styled("r  ", styles::highlight_style()),
            Span::raw("refresh all data (bypasses caches)"),
        ]),
        Line::from(vec![
            Span::styled("D  ", styles::highlight_style()),
            Span::raw("reset the seeded sample data"),
        ]),
        Line::from(vec![
            Span::styled("x  ", styles::highlight_style()),
            Span::raw("sign out"),
        ]),
    ];

    let block = Block::default()
        .title(" Actions ")
        .title_style(styles::title_style())
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
