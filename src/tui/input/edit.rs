use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::{self, word_boundary_left, word_boundary_right};

/// New-task input line
pub(super) fn handle_add(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_add(),
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.set_buffer("");
            app.add_category.clear();
        }
        KeyCode::Tab => app.cycle_add_category(),
        _ => {
            edit_line(app, key);
        }
    }
}

/// Inline edit of an existing row. Every way out saves.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => app.commit_edit(Instant::now()),
        _ => {
            edit_line(app, key);
        }
    }
}

/// Search field; filtering follows every keystroke
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
            app.set_buffer("");
        }
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.set_buffer("");
            app.apply_search();
        }
        _ => {
            if edit_line(app, key) {
                app.apply_search();
            }
        }
    }
}

/// Single-line editing on `app.edit_buffer`. Returns true when the text
/// changed.
fn edit_line(app: &mut App, key: KeyEvent) -> bool {
    let buf = &mut app.edit_buffer;
    let cursor = &mut app.edit_cursor;

    match (key.modifiers, key.code) {
        // Home / Ctrl+A: jump to start of line
        (_, KeyCode::Home) => *cursor = 0,
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => *cursor = 0,
        // End / Ctrl+E: jump to end of line
        (_, KeyCode::End) => *cursor = buf.len(),
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => *cursor = buf.len(),
        // Kill to start of line
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            if *cursor == 0 {
                return false;
            }
            buf.drain(..*cursor);
            *cursor = 0;
            return true;
        }
        // Word movement (Alt+arrow, or readline Alt+B / Alt+F)
        (m, KeyCode::Left | KeyCode::Char('b')) if m.contains(KeyModifiers::ALT) => {
            *cursor = word_boundary_left(buf, *cursor);
        }
        (m, KeyCode::Right | KeyCode::Char('f')) if m.contains(KeyModifiers::ALT) => {
            *cursor = word_boundary_right(buf, *cursor);
        }
        (_, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(buf, *cursor) {
                *cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(buf, *cursor) {
                *cursor = next;
            }
        }
        // Word backspace (Alt or Ctrl)
        (m, KeyCode::Backspace)
            if m.contains(KeyModifiers::ALT) || m.contains(KeyModifiers::CONTROL) =>
        {
            let start = word_boundary_left(buf, *cursor);
            if start == *cursor {
                return false;
            }
            buf.drain(start..*cursor);
            *cursor = start;
            return true;
        }
        (_, KeyCode::Backspace) => {
            let Some(prev) = unicode::prev_grapheme_boundary(buf, *cursor) else {
                return false;
            };
            buf.drain(prev..*cursor);
            *cursor = prev;
            return true;
        }
        (_, KeyCode::Delete) => {
            let Some(next) = unicode::next_grapheme_boundary(buf, *cursor) else {
                return false;
            };
            buf.drain(*cursor..next);
            return true;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            buf.insert(*cursor, c);
            *cursor += c.len_utf8();
            return true;
        }
        _ => {}
    }
    false
}
