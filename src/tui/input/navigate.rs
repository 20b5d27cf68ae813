use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::filter::ViewFilter;
use crate::tui::app::{App, Mode};
use crate::tui::sync::Interaction;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    app.status_message = None;

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Cursor
        (_, KeyCode::Down | KeyCode::Char('j')) => app.move_cursor(1),
        (_, KeyCode::Up | KeyCode::Char('k')) => app.move_cursor(-1),
        (_, KeyCode::Home | KeyCode::Char('g')) => app.cursor = 0,
        (_, KeyCode::End | KeyCode::Char('G')) => app.cursor_to_end(),

        // Row actions
        (_, KeyCode::Char(' ')) => {
            if let Some(id) = app.cursor_id() {
                app.interact(Interaction::Activate(id), now);
            }
        }
        (_, KeyCode::Enter | KeyCode::Char('e')) => {
            if let Some(id) = app.cursor_id() {
                app.interact(Interaction::BeginEdit(id), now);
            }
        }
        (_, KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('x')) => {
            if let Some(id) = app.cursor_id() {
                app.interact(Interaction::Delete(id), now);
            }
        }

        // Input line
        (_, KeyCode::Char('a') | KeyCode::Char('n')) => app.begin_add(),
        (_, KeyCode::Char('/')) => app.begin_search(),

        // Filters
        (_, KeyCode::Char('1')) => app.set_view_filter(ViewFilter::All),
        (_, KeyCode::Char('2')) => app.set_view_filter(ViewFilter::Active),
        (_, KeyCode::Char('3')) => app.set_view_filter(ViewFilter::Completed),
        (_, KeyCode::Char('v')) => {
            let next = app.store.filter().view.next();
            app.set_view_filter(next);
        }
        (_, KeyCode::Char('c')) => app.cycle_category_filter(),
        (_, KeyCode::Esc) => {
            if !app.store.filter().search.is_empty() {
                app.store.set_search("");
            }
        }

        (_, KeyCode::Char('C')) => {
            if app.store.is_empty() {
                app.status_message = Some("Nothing to clear".into());
            } else {
                app.mode = Mode::Confirm;
            }
        }
        (_, KeyCode::Char('t')) => app.toggle_theme(),
        _ => {}
    }
}
