use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::kv::{MemoryStore, TASKS_KEY};
use crate::model::config::{Categories, UiConfig};
use crate::model::task::{Task, TaskId};
use crate::ops::task_store::TaskStore;
use crate::parse::serialize_tasks;
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 12;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// App over an in-memory store seeded with `(text, category, completed)`
/// records. Categories are stored as given, so ids outside the default
/// set survive.
pub fn app_with_tasks(tasks: &[(&str, &str, bool)]) -> App {
    let records: Vec<Task> = tasks
        .iter()
        .enumerate()
        .map(|(i, (text, category, completed))| {
            let mut task = Task::new(TaskId(i as u64 + 1), *text, *category);
            task.completed = *completed;
            task
        })
        .collect();
    let kv = MemoryStore::new().with_slot(TASKS_KEY, &serialize_tasks(&records).unwrap());
    let store = TaskStore::load(Box::new(kv), Categories::default()).unwrap();
    App::new(store, UiConfig::default())
}

/// Render the whole screen at the default test size
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| super::render(frame, app))
}
