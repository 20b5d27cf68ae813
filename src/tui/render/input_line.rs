use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{byte_offset_to_display_col, display_width};

use super::pad_between;

/// The new-task input (with its category selector) or the search field
pub fn render_input_line(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let prompt_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let (prompt, active) = match app.mode {
        Mode::Add => (" + ", true),
        Mode::Search => (" / ", true),
        _ => (" + ", false),
    };

    let mut spans = vec![Span::styled(prompt, prompt_style)];
    if !active {
        spans.push(Span::styled("a add  / search  ? help", dim_style));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }

    spans.push(Span::styled(app.edit_buffer.clone(), text_style));

    if app.mode == Mode::Add {
        let categories = app.store.categories();
        let label = categories.label(&app.add_category).unwrap_or("No category");
        let selector = format!("[{}] ", label);
        let used = prompt.len() + display_width(&app.edit_buffer);
        if let Some(pad) = pad_between(used, display_width(&selector), area.width as usize) {
            let color = if app.add_category.is_empty() {
                app.theme.dim
            } else {
                app.theme.category_color(&app.add_category)
            };
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
            spans.push(Span::styled(selector, Style::default().fg(color).bg(bg)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let col = prompt.len() + byte_offset_to_display_col(&app.edit_buffer, app.edit_cursor);
    let x = area.x + (col as u16).min(area.width.saturating_sub(1));
    frame.set_cursor_position(Position::new(x, area.y));
}
