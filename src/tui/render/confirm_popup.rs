use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ops::task_store::CLEAR_ALL_PROMPT;
use crate::tui::app::App;

use super::centered_rect_fixed;

/// Clear-all confirmation box
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let count = app.store.len();
    let detail = format!("{} task{} will be removed.", count, if count == 1 { "" } else { "s" });

    let lines = vec![
        Line::from(Span::styled(
            CLEAR_ALL_PROMPT,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(detail, Style::default().fg(app.theme.text).bg(bg))),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(app.theme.red).bg(bg).add_modifier(Modifier::BOLD)),
            Span::styled(" delete   ", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled("n", Style::default().fg(app.theme.highlight).bg(bg).add_modifier(Modifier::BOLD)),
            Span::styled(" keep", Style::default().fg(app.theme.dim).bg(bg)),
        ]),
    ];

    let popup = centered_rect_fixed(36, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn popup_names_the_count() {
        let app = app_with_tasks(&[("a", "", false), ("b", "", false)]);
        let out = render_to_string(40, 8, |frame, area| render_confirm_popup(frame, &app, area));
        assert!(out.contains("Delete all tasks?"));
        assert!(out.contains("2 tasks will be removed."));
        assert!(out.contains("y delete   n keep"));
    }

    #[test]
    fn popup_snapshot() {
        let app = app_with_tasks(&[("a", "", false), ("b", "", false)]);
        let out = render_to_string(36, 6, |frame, area| render_confirm_popup(frame, &app, area));
        insta::assert_snapshot!(out, @r"
        ┌──────────────────────────────────┐
        │Delete all tasks?                 │
        │2 tasks will be removed.          │
        │                                  │
        │y delete   n keep                 │
        └──────────────────────────────────┘
        ");
    }
}
