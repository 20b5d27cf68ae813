use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::{App, Mode};
use crate::tui::render::task_list::{RowAction, action_at};
use crate::tui::sync::{DOUBLE_ACTIVATE_WINDOW, Interaction};

/// Handle a mouse event
pub fn handle_mouse(app: &mut App, event: MouseEvent) {
    handle_mouse_at(app, event, Instant::now());
}

pub(super) fn handle_mouse_at(app: &mut App, event: MouseEvent, now: Instant) {
    if app.mode == Mode::Confirm {
        return;
    }
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.show_help = false;
                return;
            }
            click(app, event.column, event.row, now);
        }
        MouseEventKind::ScrollDown if app.mode == Mode::Navigate => app.move_cursor(1),
        MouseEventKind::ScrollUp if app.mode == Mode::Navigate => app.move_cursor(-1),
        _ => {}
    }
}

fn click(app: &mut App, column: u16, row: u16, now: Instant) {
    let area = app.list_area;
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    let clicked = if inside {
        let idx = app.scroll_offset + (row - area.y) as usize;
        app.rows().get(idx).map(|r| r.id)
    } else {
        None
    };

    // Clicking anywhere but the row being edited is a focus loss
    if app.mode == Mode::Edit {
        if clicked.is_some() && clicked == app.editing {
            return;
        }
        app.commit_edit(now);
    }

    let Some(id) = clicked else {
        return;
    };
    app.select(id);

    match action_at(area, column) {
        Some(RowAction::Edit) => app.interact(Interaction::BeginEdit(id), now),
        Some(RowAction::Delete) => app.interact(Interaction::Delete(id), now),
        None => {
            // Both clicks of a double click toggle, then the row opens for editing
            app.interact(Interaction::Activate(id), now);
            let double = app
                .last_click
                .is_some_and(|(last, at)| last == id && now.duration_since(at) <= DOUBLE_ACTIVATE_WINDOW);
            if double {
                app.last_click = None;
                app.interact(Interaction::BeginEdit(id), now);
            } else {
                app.last_click = Some((id, now));
            }
        }
    }
}
