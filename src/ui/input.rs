use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, PendingAction};
use crate::ui::confirm::ConfirmOutcome;
use crate::ui::nav::{menu, Page};

/// Handle a key event against the current app state.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    // An open confirmation captures all input
    if app.confirm.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => app.resolve_confirm(ConfirmOutcome::Confirmed),
            KeyCode::Esc | KeyCode::Char('n') => app.resolve_confirm(ConfirmOutcome::Cancelled),
            _ => {}
        }
        return;
    }

    // The login page owns the keyboard for token entry
    if matches!(app.page, Page::Login | Page::Register) {
        match key.code {
            KeyCode::Enter => app.submit_login(),
            KeyCode::Esc => app.request(PendingAction::Quit),
            KeyCode::Backspace => {
                app.login_input.pop();
            }
            KeyCode::Char(c) => app.login_input.push(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.request(PendingAction::Quit),
        KeyCode::Char('r') => app.refresh(true),
        KeyCode::Char('h') => app.spawn_health_check(),
        KeyCode::Char('x') => app.request(PendingAction::Logout),
        KeyCode::Char('D') => app.request(PendingAction::ResetDemo),
        KeyCode::Char('c') => app.notices.dismiss_all(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_task(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_task(),
        KeyCode::Char(c @ '1'..='9') => {
            let items = menu(app.is_logged_in());
            let index = (c as usize) - ('1' as usize);
            if let Some(item) = items.get(index) {
                app.navigate(item.page);
            }
        }
        _ => {}
    }
}
