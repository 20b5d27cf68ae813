use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::tui::sync::Row;
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_to_width};

use super::{push_highlighted_spans, search_regex};

/// Edit and delete buttons at the right edge of every row: " ✎ × "
const ACTIONS: &str = " \u{270E} \u{00D7} ";
pub const ACTIONS_WIDTH: u16 = 5;

/// Clickable buttons on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

/// Which button, if any, sits under `column` for a list drawn in `area`
pub fn action_at(area: Rect, column: u16) -> Option<RowAction> {
    if area.width < ACTIONS_WIDTH + 1 {
        return None;
    }
    let start = area.x + area.width - ACTIONS_WIDTH;
    match column.checked_sub(start)? {
        0 | 1 => Some(RowAction::Edit),
        2..=4 => Some(RowAction::Delete),
        _ => None,
    }
}

/// Render the filtered task rows
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = area;
    let bg = app.theme.background;
    let rows = app.rows();

    if rows.is_empty() {
        let msg = if app.store.is_empty() {
            " No tasks yet. Press a to add one."
        } else {
            " No tasks match the current filters."
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor on screen
    let visible_height = area.height as usize;
    app.clamp_cursor(rows.len());
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }
    app.scroll_offset = app.scroll_offset.min(rows.len().saturating_sub(1));

    let label_width = app
        .store
        .categories()
        .iter()
        .map(|c| display_width(&c.label))
        .max()
        .unwrap_or(0);
    let search_re = search_regex(&app.store.filter().search);

    let end = rows.len().min(app.scroll_offset + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    let mut edit_cursor: Option<Position> = None;

    for (idx, row) in rows.iter().enumerate().take(end).skip(app.scroll_offset) {
        let is_cursor = idx == app.cursor;
        let editing = app.mode == Mode::Edit && app.editing == Some(row.id);
        let line_y = area.y + (idx - app.scroll_offset) as u16;

        let (line, cursor_col) = render_row(app, row, is_cursor, editing, label_width, area.width, search_re.as_ref());
        if let Some(col) = cursor_col {
            edit_cursor = Some(Position::new(area.x + col, line_y));
        }
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
    if let Some(pos) = edit_cursor {
        frame.set_cursor_position(pos);
    }
}

/// One row: checkbox, category label column, text, action buttons. Returns
/// the cursor column when the row is being edited.
fn render_row<'a>(
    app: &App,
    row: &Row,
    is_cursor: bool,
    editing: bool,
    label_width: usize,
    width: u16,
    search_re: Option<&regex::Regex>,
) -> (Line<'a>, Option<u16>) {
    let theme = &app.theme;
    let bg = if is_cursor { theme.selection_bg } else { theme.background };

    let mut text_style = Style::default().fg(theme.text).bg(bg);
    if row.completed {
        text_style = text_style.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT);
    }
    if row.removing {
        text_style = text_style
            .fg(theme.red)
            .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM | Modifier::ITALIC);
    }
    let box_style = if row.completed {
        Style::default().fg(theme.green).bg(bg)
    } else {
        Style::default().fg(theme.text).bg(bg)
    };
    let label_style = Style::default()
        .fg(theme.category_color(&row.category))
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let plain = Style::default().bg(bg);

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", plain),
        Span::styled(if row.completed { "[x]" } else { "[ ]" }, box_style),
        Span::styled(" ", plain),
    ];
    let mut used = 5;
    if label_width > 0 {
        let pad = label_width - display_width(&row.category_label).min(label_width);
        spans.push(Span::styled(row.category_label.clone(), label_style));
        spans.push(Span::styled(" ".repeat(pad + 1), plain));
        used += label_width + 1;
    }

    let text_budget = (width as usize).saturating_sub(used + ACTIONS_WIDTH as usize);
    let mut cursor_col = None;
    let text_used = if editing {
        let edit_style = Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::UNDERLINED);
        let shown = truncate_to_width(&app.edit_buffer, text_budget);
        let col = byte_offset_to_display_col(&app.edit_buffer, app.edit_cursor).min(text_budget.saturating_sub(1));
        cursor_col = Some((used + col) as u16);
        let w = display_width(&shown);
        spans.push(Span::styled(shown, edit_style));
        w
    } else {
        let shown = truncate_to_width(&row.text, text_budget);
        let highlight = Style::default()
            .fg(theme.search_match_fg)
            .bg(theme.search_match_bg);
        push_highlighted_spans(&mut spans, &shown, text_style, highlight, search_re);
        display_width(&shown)
    };

    if (width as usize) >= used + ACTIONS_WIDTH as usize {
        let fill = text_budget - text_used;
        spans.push(Span::styled(" ".repeat(fill), plain));
        let actions_style = if is_cursor {
            Style::default().fg(theme.highlight).bg(bg)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };
        spans.push(Span::styled(ACTIONS, actions_style));
    }

    (Line::from(spans), cursor_col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filter::ViewFilter;
    use crate::tui::render::test_helpers::*;
    use crate::tui::sync::Interaction;
    use std::time::Instant;

    fn list(app: &mut App, w: u16, h: u16) -> String {
        render_to_string(w, h, |frame, area| render_task_list(frame, app, area))
    }

    #[test]
    fn action_hit_test() {
        let area = Rect::new(2, 0, 40, 5);
        assert_eq!(action_at(area, 36), None);
        assert_eq!(action_at(area, 37), Some(RowAction::Edit));
        assert_eq!(action_at(area, 38), Some(RowAction::Edit));
        assert_eq!(action_at(area, 39), Some(RowAction::Delete));
        assert_eq!(action_at(area, 41), Some(RowAction::Delete));
        assert_eq!(action_at(area, 42), None);
        assert_eq!(action_at(Rect::new(0, 0, 4, 1), 2), None);
    }

    #[test]
    fn rows_with_labels_and_actions() {
        let mut app = app_with_tasks(&[("Buy milk", "", false), ("Call Sam", "work", true)]);
        let out = list(&mut app, 40, 3);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" [ ]          Buy milk"));
        assert!(lines[1].starts_with(" [x] Work     Call Sam"));
        assert!(lines[0].ends_with("\u{270E} \u{00D7}"));
    }

    #[test]
    fn unknown_category_renders_blank_label() {
        let mut app = app_with_tasks(&[("Old", "retired", false)]);
        let out = list(&mut app, 40, 1);
        assert!(out.starts_with(" [ ]          Old"));
        assert!(!out.contains("retired"));
    }

    #[test]
    fn empty_messages() {
        let mut app = app_with_tasks(&[]);
        assert_eq!(list(&mut app, 40, 2), " No tasks yet. Press a to add one.");

        let mut app = app_with_tasks(&[("a", "", false)]);
        app.set_view_filter(ViewFilter::Completed);
        assert_eq!(list(&mut app, 40, 2), " No tasks match the current filters.");
    }

    #[test]
    fn long_text_is_truncated_before_actions() {
        let mut app = app_with_tasks(&[("a very long task text that will not fit", "", false)]);
        let out = list(&mut app, 30, 1);
        assert!(out.contains("\u{2026}"));
        assert!(out.ends_with("\u{270E} \u{00D7}"));
    }

    #[test]
    fn removing_row_stays_until_flushed() {
        let mut app = app_with_tasks(&[("a", "", false), ("b", "", false)]);
        let id = app.store.tasks()[0].id;
        app.interact(Interaction::Delete(id), Instant::now());
        let out = list(&mut app, 30, 3);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn scroll_follows_cursor() {
        let tasks: Vec<(String, &str, bool)> = (1..=10).map(|i| (format!("task {}", i), "", false)).collect();
        let borrowed: Vec<(&str, &str, bool)> = tasks.iter().map(|(t, c, d)| (t.as_str(), *c, *d)).collect();
        let mut app = app_with_tasks(&borrowed);
        app.cursor = 7;
        let out = list(&mut app, 40, 3);
        assert_eq!(app.scroll_offset, 5);
        assert!(out.lines().next().unwrap_or("").contains("task 6"));
        assert!(out.lines().last().unwrap_or("").contains("task 8"));
    }

    #[test]
    fn list_area_recorded_for_mouse() {
        let mut app = app_with_tasks(&[("a", "", false)]);
        list(&mut app, 40, 4);
        assert_eq!(app.list_area, Rect::new(0, 0, 40, 4));
    }
}
