use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::{format_date, format_optional};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    match app.user.as_deref() {
        Some(user) => {
            let joined = user
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            for (label, value) in [
                ("Username", user.username.clone()),
                ("Display name", format_optional(&user.display_name, "-")),
                ("Email", format_optional(&user.email, "-")),
                ("Location", format_optional(&user.location, "-")),
                ("Bio", format_optional(&user.bio, "-")),
                ("Joined", joined),
            ] {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<14}", label), styles::muted_style()),
                    Span::raw(value),
                ]));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Profile not loaded yet. Press r to refresh.",
            styles::muted_style(),
        ))),
    }

    let block = Block::default()
        .title(" Profile ")
        .title_style(styles::title_style())
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
