use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

use super::pad_between;

fn mode_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => "space done  e edit  d delete  t theme ",
        Mode::Add => "Enter add  Tab category  Esc done ",
        Mode::Search => "Enter keep  Esc clear ",
        Mode::Edit => "Enter/Esc save ",
        Mode::Confirm => "y yes  n no ",
    }
}

/// Render the status row (bottom of screen): message or counts on the
/// left, key hints on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    let (left, left_style) = match &app.status_message {
        Some(msg) => {
            let color = if msg.starts_with("error") { app.theme.red } else { app.theme.text_bright };
            (format!(" {}", msg), Style::default().fg(color).bg(bg))
        }
        None => {
            let stats = app.store.stats();
            let mut text = format!(" {} active, {} done", stats.totals.active, stats.totals.completed);
            if !app.pending.is_empty() {
                text.push_str(&format!(", {} deleting", app.pending.len()));
            }
            (text, Style::default().fg(app.theme.dim).bg(bg))
        }
    };

    let hint = mode_hint(app.mode);
    let mut spans = vec![Span::styled(left.clone(), left_style)];
    if let Some(pad) = pad_between(display_width(&left), display_width(hint), area.width as usize) {
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn counts_when_idle() {
        let app = app_with_tasks(&[("a", "", false), ("b", "", true), ("c", "", false)]);
        let out = render_to_string(80, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with(" 2 active, 1 done"));
        assert!(out.ends_with("t theme"));
    }

    #[test]
    fn message_replaces_counts() {
        let mut app = app_with_tasks(&[]);
        app.status_message = Some("error: disk full".into());
        app.mode = Mode::Edit;
        let out = render_to_string(60, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with(" error: disk full"));
        assert!(out.ends_with("Enter/Esc save"));
    }

    #[test]
    fn narrow_terminal_drops_hint() {
        let app = app_with_tasks(&[]);
        let out = render_to_string(20, 1, |frame, area| render_status_row(frame, &app, area));
        assert_eq!(out, " 0 active, 0 done");
    }
}
