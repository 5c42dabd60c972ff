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
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("  Welcome to taskdeck", styles::title_style())),
        Line::from(""),
        Line::from("  Paste your API token below and press Enter to sign in."),
        Line::from(Span::styled(
            "  The token is issued by the to-do list service.",
            styles::muted_style(),
        )),
    ]);
    frame.render_widget(intro, chunks[0]);

    let shown = if app.login_input.is_empty() {
        Span::styled("(empty)", styles::muted_style())
    } else {
        Span::raw(app.login_input.clone())
    };
    let input = Paragraph::new(Line::from(shown)).block(
        Block::default()
            .title(" API token ")
            .title_style(styles::title_style())
            .borders(Borders::ALL),
    );
    frame.render_widget(input, chunks[1]);

    let hint = Paragraph::new(Line::from(Span::styled(
        "  Enter: sign in | Esc: quit",
        styles::muted_style(),
    )));
    frame.render_widget(hint, chunks[2]);
}
