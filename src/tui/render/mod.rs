pub mod confirm_popup;
pub mod header;
pub mod help_overlay;
pub mod input_line;
pub mod status_row;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use crate::tui::app::{App, Mode};

/// Render the full screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background).fg(app.theme.text);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title | filter bar | input line | task list | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title + visible count
            Constraint::Length(1), // view and category filters
            Constraint::Length(1), // add / search input
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_title(frame, app, chunks[0]);
    header::render_filter_bar(frame, app, chunks[1]);
    input_line::render_input_line(frame, app, chunks[2]);
    task_list::render_task_list(frame, app, chunks[3]);
    status_row::render_status_row(frame, app, chunks[4]);

    if app.mode == Mode::Confirm {
        confirm_popup::render_confirm_popup(frame, app, area);
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}

/// Case-insensitive literal matcher for the active search, if any
pub(super) fn search_regex(search: &str) -> Option<Regex> {
    if search.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(search))).ok()
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(text[last_end..m.start()].to_string(), base_style));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

/// Center a fixed-size box inside `area`, shrinking it to fit
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Left and right text on one line, right part dropped if it does not fit
pub(super) fn pad_between(left_width: usize, right_width: usize, total: usize) -> Option<usize> {
    total.checked_sub(left_width + right_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn contents(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn highlight_splits_on_matches() {
        let re = search_regex("MILK");
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "Buy milk and Milk", Style::default(), Style::default(), re.as_ref());
        assert_eq!(contents(&spans), ["Buy ", "milk", " and ", "Milk"]);
    }

    #[test]
    fn highlight_without_search_is_one_span() {
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "Buy milk", Style::default(), Style::default(), None);
        assert_eq!(contents(&spans), ["Buy milk"]);
    }

    #[test]
    fn search_is_literal() {
        let re = search_regex("a.c").unwrap();
        assert!(re.is_match("A.C"));
        assert!(!re.is_match("abc"));
        assert!(search_regex("").is_none());
    }

    #[test]
    fn centered_box_fits() {
        let r = centered_rect_fixed(20, 4, Rect::new(0, 0, 80, 24));
        assert_eq!(r, Rect::new(30, 10, 20, 4));
        let r = centered_rect_fixed(100, 4, Rect::new(0, 0, 80, 24));
        assert_eq!(r.width, 80);
    }

    #[test]
    fn full_screen_layout() {
        let mut app = app_with_tasks(&[("Buy milk", "", false), ("Call Sam", "work", true)]);
        let out = render_app(&mut app);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), TERM_H as usize);
        assert!(lines[0].starts_with(" tick"));
        assert!(lines[0].ends_with("2 tasks"));
        assert!(lines[1].starts_with(" All Active Completed"));
        assert!(lines[2].starts_with(" + a add"));
        assert!(lines[3].contains("Buy milk"));
        assert!(lines[4].contains("Call Sam"));
        assert!(lines[11].starts_with(" 1 active, 1 done"));
    }

    #[test]
    fn confirm_mode_draws_popup() {
        let mut app = app_with_tasks(&[("a", "", false)]);
        app.mode = Mode::Confirm;
        let out = render_app(&mut app);
        assert!(out.contains("Delete all tasks?"));
        assert!(out.contains("1 task will be removed."));
    }
}
