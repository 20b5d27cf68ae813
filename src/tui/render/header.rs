use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::filter::ViewFilter;
use crate::tui::app::App;
use crate::util::unicode::display_width;

use super::pad_between;

/// Visible-count text, singular for one
pub fn count_label(visible: usize) -> String {
    if visible == 1 {
        "1 task".to_string()
    } else {
        format!("{} tasks", visible)
    }
}

/// Title on the left, number of tasks passing the filters on the right
pub fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let title = " tick";
    let count = format!("{} ", count_label(app.rows().len()));

    let mut spans = vec![Span::styled(
        title,
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(pad) = pad_between(title.len(), count.len(), area.width as usize) {
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        spans.push(Span::styled(count, Style::default().fg(app.theme.text_bright).bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// View filter tabs, then category tabs. The active one of each is
/// highlighted.
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let filter = app.store.filter();

    let active = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let inactive = Style::default().fg(app.theme.dim).bg(bg);
    let sep = Span::styled(" \u{2502} ", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, view) in ViewFilter::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        let style = if *view == filter.view { active } else { inactive };
        spans.push(Span::styled(view.label(), style));
    }

    spans.push(sep);
    let all_style = if filter.category.is_empty() { active } else { inactive };
    spans.push(Span::styled("All", all_style));
    for category in app.store.categories().iter() {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        let style = if category.id == filter.category {
            active.fg(app.theme.category_color(&category.id))
        } else {
            inactive
        };
        spans.push(Span::styled(category.label.clone(), style));
    }

    if !filter.search.is_empty() {
        let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let search = format!("/{} ", filter.search);
        if let Some(pad) = pad_between(used, display_width(&search), area.width as usize) {
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
            spans.push(Span::styled(search, Style::default().fg(app.theme.text_bright).bg(bg)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
