use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect_fixed;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Tasks",
        &[
            ("\u{2191}\u{2193}/jk", "Move cursor"),
            ("space / click", "Toggle done"),
            ("e / Enter / dbl-click", "Edit (empty text deletes)"),
            ("d / Del / x", "Delete"),
            ("a", "Add (Tab picks category)"),
            ("C", "Clear all"),
        ],
    ),
    (
        "Filters",
        &[
            ("1 2 3 / v", "All, active, completed"),
            ("c", "Next category"),
            ("/", "Search (Esc clears)"),
        ],
    ),
    (
        "Other",
        &[("t", "Light / dark theme"), ("?", "This help"), ("q", "Quit")],
    ),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let key_width = SECTIONS
        .iter()
        .flat_map(|(_, bindings)| bindings.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = Vec::new();
    for (i, (title, bindings)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(format!(" {}", title), header_style)));
        for (key, desc) in bindings.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<width$}  ", key, width = key_width), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
    }

    let overlay = centered_rect_fixed(54, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .title(" Key Bindings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}
