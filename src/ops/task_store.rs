use tracing::{debug, warn};

use crate::io::kv::{KeyValueStore, KvError, TASKS_KEY, THEME_KEY};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::config::Categories;
use crate::model::filter::{FilterState, ViewFilter};
use crate::model::task::{Task, TaskId, normalize_text};
use crate::model::theme_mode::ThemeMode;
use crate::ops::stats::TaskStats;
use crate::parse::{parse_tasks, serialize_tasks};

/// Question asked before clear-all
pub const CLEAR_ALL_PROMPT: &str = "Delete all tasks?";

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] KvError),
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("task ids exhausted")]
    IdsExhausted,
}

/// Blocking yes/no prompt used by `clear_all`
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of `edit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Text replaced
    Edited,
    /// New text was blank, so the task was deleted
    Removed(Task),
    /// No task with that id
    Missing,
}

/// Result of `clear_all`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Nothing to clear; no prompt was shown
    Empty,
    /// The prompt was answered no
    Declined,
    /// This many tasks were removed
    Cleared(usize),
}

/// Owns the task list, the filter state and the id counter, and writes
/// through to a key-value store after every mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: FilterState,
    next_id: u64,
    categories: Categories,
    theme: ThemeMode,
    kv: Box<dyn KeyValueStore>,
}

impl TaskStore {
    /// Restore from `kv`. A missing `tasks` slot is an empty list; a corrupt
    /// one is copied to the recovery log (when the store has a directory)
    /// and also restores as empty.
    pub fn load(kv: Box<dyn KeyValueStore>, categories: Categories) -> Result<Self, StoreError> {
        let theme = ThemeMode::from_slot(kv.get(THEME_KEY)?.as_deref());

        let tasks = match kv.get(TASKS_KEY)? {
            None => Vec::new(),
            Some(raw) => match parse_tasks(&raw) {
                Ok((tasks, dropped)) => {
                    if !dropped.is_empty() {
                        warn!(count = dropped.len(), "dropped unreadable task records");
                        if let Some(dir) = kv.recovery_dir() {
                            recovery::log_recovery(
                                dir,
                                RecoveryEntry::now(
                                    RecoveryCategory::Parser,
                                    format!("dropped {} task records", dropped.len()),
                                    dropped.join("\n"),
                                )
                                .with_field("Slot", TASKS_KEY),
                            );
                        }
                    }
                    tasks
                }
                Err(e) => {
                    warn!(error = %e, "stored task list is corrupt, starting empty");
                    if let Some(dir) = kv.recovery_dir() {
                        recovery::log_recovery(
                            dir,
                            RecoveryEntry::now(RecoveryCategory::Parser, "unreadable task list", raw)
                                .with_field("Slot", TASKS_KEY)
                                .with_field("Error", e.to_string()),
                        );
                    }
                    Vec::new()
                }
            },
        };

        let next_id = tasks.iter().map(|t| t.id.0).max().unwrap_or(0).saturating_add(1);
        debug!(tasks = tasks.len(), %theme, "loaded task store");

        Ok(TaskStore {
            tasks,
            filter: FilterState::default(),
            next_id,
            categories,
            theme,
            kv,
        })
    }

    /// Give back the underlying key-value store
    pub fn into_kv(self) -> Box<dyn KeyValueStore> {
        self.kv
    }

    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Current position of a task in the unfiltered list
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::compute(&self.tasks, &self.categories)
    }

    // -----------------------------------------------------------------------
    // Filtered view
    // -----------------------------------------------------------------------

    /// Tasks passing `filter`, in list order, each paired with its position
    /// in the unfiltered list. The iterator borrows only the store, so a
    /// temporary filter is fine.
    pub fn query_visible<'s>(
        &'s self,
        filter: &FilterState,
    ) -> impl Iterator<Item = (usize, &'s Task)> + use<'s> {
        let matcher = filter.matcher();
        self.tasks
            .iter()
            .enumerate()
            .filter(move |(_, task)| matcher.matches(task))
    }

    /// `query_visible` with the store's own filter state
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.query_visible(&self.filter)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_view_filter(&mut self, view: ViewFilter) {
        self.filter.view = view;
    }

    /// Select a category filter. Ids outside the configured set fall back
    /// to all categories.
    pub fn set_category_filter(&mut self, category: &str) {
        self.filter.category = if self.categories.contains(category) {
            category.to_string()
        } else {
            String::new()
        };
    }

    pub fn set_search(&mut self, search: &str) {
        self.filter.search = search.to_string();
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a task. Blank text is ignored (`None`). A category outside the
    /// configured set is stored as uncategorized.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Option<TaskId>, StoreError> {
        let Some(text) = normalize_text(text) else {
            return Ok(None);
        };
        let category = if category.is_empty() || self.categories.contains(category) {
            category
        } else {
            warn!(category, "unknown category, storing task as uncategorized");
            ""
        };

        let next = self.next_id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        let id = TaskId(self.next_id);
        self.next_id = next;
        self.tasks.push(Task::new(id, text, category));
        debug!(%id, "added task");
        self.persist()?;
        Ok(Some(id))
    }

    /// Flip the completed flag. Returns false when the id is unknown.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        debug!(%id, completed = task.completed, "toggled task");
        self.persist()?;
        Ok(true)
    }

    /// Replace a task's text. Blank text deletes the task instead.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> Result<EditOutcome, StoreError> {
        let Some(pos) = self.position_of(id) else {
            return Ok(EditOutcome::Missing);
        };
        match normalize_text(new_text) {
            Some(text) => {
                self.tasks[pos].text = text.to_string();
                debug!(%id, "edited task");
                self.persist()?;
                Ok(EditOutcome::Edited)
            }
            None => {
                let task = self.tasks.remove(pos);
                debug!(%id, "blank edit removed task");
                self.persist()?;
                Ok(EditOutcome::Removed(task))
            }
        }
    }

    /// Delete a task; later tasks shift down one position.
    /// An id that is already gone is a no-op.
    pub fn remove(&mut self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let Some(pos) = self.position_of(id) else {
            return Ok(None);
        };
        let task = self.tasks.remove(pos);
        debug!(%id, position = pos, "removed task");
        self.persist()?;
        Ok(Some(task))
    }

    /// Empty the list after the user confirms. The removed list is copied to
    /// the recovery log first.
    pub fn clear_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> Result<ClearOutcome, StoreError> {
        if self.tasks.is_empty() {
            return Ok(ClearOutcome::Empty);
        }
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            return Ok(ClearOutcome::Declined);
        }

        let count = self.tasks.len();
        if let Some(dir) = self.kv.recovery_dir() {
            recovery::log_recovery(
                dir,
                RecoveryEntry::now(
                    RecoveryCategory::Delete,
                    format!("cleared {} tasks", count),
                    serialize_tasks(&self.tasks)?,
                ),
            );
        }
        self.tasks.clear();
        debug!(count, "cleared all tasks");
        self.persist()?;
        Ok(ClearOutcome::Cleared(count))
    }

    /// Write the full list to the `tasks` slot
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let payload = serialize_tasks(&self.tasks)?;
        self.kv.set(TASKS_KEY, &payload)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Theme preference
    // -----------------------------------------------------------------------

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn set_theme(&mut self, mode: ThemeMode) -> Result<(), StoreError> {
        self.theme = mode;
        self.kv.set(THEME_KEY, mode.as_slot())?;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode, StoreError> {
        let mode = self.theme.toggled();
        self.set_theme(mode)?;
        Ok(mode)
    }
}
