use ratatui::style::{Color, Modifier, Style};

use super::notify::Severity;
use crate::ui::confirm::ConfirmKind;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn overdue_style() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Success => success_style(),
        Severity::Error | Severity::Danger => error_style(),
        Severity::Warning | Severity::Logout => highlight_style(),
        Severity::Info => Style::default().fg(PRIMARY),
    }
}

pub fn confirm_style(kind: ConfirmKind) -> Style {
    match kind {
        ConfirmKind::Danger => error_style(),
        ConfirmKind::Warning | ConfirmKind::Logout => highlight_style(),
        ConfirmKind::Info => Style::default().fg(PRIMARY),
    }
}
