use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Clear-all popup: y or Enter confirms, anything else declines
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let yes = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter);
    app.answer_clear(yes);
}
