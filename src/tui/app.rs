use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::config_io;
use crate::io::kv::FileStore;
use crate::model::config::UiConfig;
use crate::model::filter::ViewFilter;
use crate::model::task::TaskId;
use crate::ops::task_store::{ClearOutcome, StoreError, TaskStore};

use super::input;
use super::render;
use super::sync::{self, Effect, Interaction, PendingDeletes, Row};
use super::theme::Theme;

/// Event poll timeout; pending deletes are checked at this cadence
const TICK: Duration = Duration::from_millis(100);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task in the input line
    Add,
    /// Typing in the search field
    Search,
    /// Inline edit of an existing task
    Edit,
    /// Clear-all y/n popup
    Confirm,
}

pub struct App {
    pub store: TaskStore,
    pub ui: UiConfig,
    pub theme: Theme,
    pub mode: Mode,
    /// Index into the visible rows
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Shared line buffer for add, search and edit
    pub edit_buffer: String,
    /// Byte offset of the cursor within `edit_buffer`
    pub edit_cursor: usize,
    /// Task being edited in `Mode::Edit`
    pub editing: Option<TaskId>,
    /// Category selected for the next added task
    pub add_category: String,
    pub pending: PendingDeletes,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Where the task list was last drawn, for mouse hit testing
    pub list_area: Rect,
    /// Last mouse activation, for double-click detection
    pub last_click: Option<(TaskId, Instant)>,
}

impl App {
    pub fn new(store: TaskStore, ui: UiConfig) -> Self {
        let theme = Theme::for_mode(store.theme(), &ui);
        let pending = PendingDeletes::new(ui.delete_delay());
        App {
            store,
            ui,
            theme,
            mode: Mode::Navigate,
            cursor: 0,
            scroll_offset: 0,
            edit_buffer: String::new(),
            edit_cursor: 0,
            editing: None,
            add_category: String::new(),
            pending,
            show_help: false,
            status_message: None,
            should_quit: false,
            list_area: Rect::default(),
            last_click: None,
        }
    }

    /// Row descriptors for the current filter, rebuilt on every call
    pub fn rows(&self) -> Vec<Row> {
        sync::build_rows(&self.store, &self.pending)
    }

    /// Id of the row under the cursor
    pub fn cursor_id(&self) -> Option<TaskId> {
        self.rows().get(self.cursor).map(|r| r.id)
    }

    pub fn clamp_cursor(&mut self, row_count: usize) {
        self.cursor = self.cursor.min(row_count.saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.rows().len();
        self.cursor = self.cursor.saturating_add_signed(delta);
        self.clamp_cursor(count);
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.rows().len().saturating_sub(1);
    }

    /// Put the cursor on `id` if it is visible
    pub fn select(&mut self, id: TaskId) {
        if let Some(idx) = self.rows().iter().position(|r| r.id == id) {
            self.cursor = idx;
        }
    }

    /// Replace the line buffer, cursor at the end
    pub fn set_buffer(&mut self, text: &str) {
        self.edit_buffer = text.to_string();
        self.edit_cursor = self.edit_buffer.len();
    }

    // -----------------------------------------------------------------------
    // Task interactions
    // -----------------------------------------------------------------------

    /// Route an interaction through the store and act on the result
    pub fn interact(&mut self, interaction: Interaction, now: Instant) {
        match sync::route(&mut self.store, &mut self.pending, interaction, now) {
            Ok(Effect::StartEditing { id, text }) => {
                self.select(id);
                self.editing = Some(id);
                self.set_buffer(&text);
                self.mode = Mode::Edit;
            }
            Ok(Effect::None | Effect::Toggled | Effect::Edited | Effect::RemovalScheduled(_)) => {}
            Err(e) => self.report(e),
        }
        self.clamp_cursor(self.rows().len());
    }

    /// Leave edit mode, saving the buffer. Cancelling and confirming both
    /// end up here.
    pub fn commit_edit(&mut self, now: Instant) {
        self.mode = Mode::Navigate;
        let Some(id) = self.editing.take() else {
            return;
        };
        let text = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.interact(Interaction::CommitEdit { id, text }, now);
    }

    pub fn begin_add(&mut self) {
        self.mode = Mode::Add;
        self.set_buffer("");
    }

    /// Add the buffer as a new task. Blank input leaves the buffer alone.
    pub fn submit_add(&mut self) {
        let category = self.add_category.clone();
        match self.store.add(&self.edit_buffer, &category) {
            Ok(Some(id)) => {
                self.set_buffer("");
                self.add_category.clear();
                self.select(id);
            }
            Ok(None) => {}
            Err(e) => self.report(e),
        }
    }

    pub fn cycle_add_category(&mut self) {
        self.add_category = self.store.categories().cycle(&self.add_category);
    }

    // -----------------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------------

    pub fn begin_search(&mut self) {
        let current = self.store.filter().search.clone();
        self.set_buffer(&current);
        self.mode = Mode::Search;
    }

    /// Push the buffer into the search filter
    pub fn apply_search(&mut self) {
        let search = self.edit_buffer.clone();
        self.store.set_search(&search);
        self.clamp_cursor(self.rows().len());
    }

    pub fn set_view_filter(&mut self, view: ViewFilter) {
        self.store.set_view_filter(view);
        self.clamp_cursor(self.rows().len());
    }

    pub fn cycle_category_filter(&mut self) {
        let next = self.store.categories().cycle(&self.store.filter().category);
        self.store.set_category_filter(&next);
        self.clamp_cursor(self.rows().len());
    }

    // -----------------------------------------------------------------------
    // Clear all, theme, housekeeping
    // -----------------------------------------------------------------------

    /// Answer the clear-all popup
    pub fn answer_clear(&mut self, yes: bool) {
        self.mode = Mode::Navigate;
        match self.store.clear_all(&mut |_: &str| yes) {
            Ok(ClearOutcome::Cleared(n)) => {
                self.cursor = 0;
                self.scroll_offset = 0;
                self.status_message = Some(format!("Cleared {} tasks", n));
            }
            Ok(ClearOutcome::Empty | ClearOutcome::Declined) => {}
            Err(e) => self.report(e),
        }
    }

    pub fn toggle_theme(&mut self) {
        match self.store.toggle_theme() {
            Ok(mode) => self.theme = Theme::for_mode(mode, &self.ui),
            Err(e) => self.report(e),
        }
    }

    /// Run due deletes
    pub fn tick(&mut self, now: Instant) {
        if self.pending.is_empty() {
            return;
        }
        if let Err(e) = sync::flush_due(&mut self.store, &mut self.pending, now) {
            self.report(e);
        }
        self.clamp_cursor(self.rows().len());
    }

    /// Show a store failure in the status row
    pub fn report(&mut self, err: StoreError) {
        tracing::error!(error = %err, "store operation failed");
        self.status_message = Some(format!("error: {}", err));
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Launch the TUI
pub fn run(
    data_dir: Option<&Path>,
    config_path: Option<&Path>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = config_io::data_dir(data_dir);
    crate::logging::init_file(&data_dir, verbose);

    let config = config_io::read_config(&config_io::config_path(config_path))?;
    let kv = FileStore::open(&data_dir)?;
    let store = TaskStore::load(Box::new(kv), config.categories.clone())?;
    let mut app = App::new(store, config.ui);
    tracing::info!(data_dir = %data_dir.display(), "starting tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Deletes still waiting out their delay are carried out on exit
    if let Some(deadline) = app.pending.last_due() {
        app.tick(deadline);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
