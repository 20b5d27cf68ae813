//! Bridge between the task store and the screen: row descriptors built
//! fresh every frame, and user interactions routed back into store calls.

use std::time::{Duration, Instant};

use crate::model::task::{TaskId, normalize_text};
use crate::ops::task_store::{EditOutcome, StoreError, TaskStore};

/// Two activations of the same row within this window count as a double
/// activation.
pub const DOUBLE_ACTIVATE_WINDOW: Duration = Duration::from_millis(400);

/// Everything the renderer needs for one visible task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: TaskId,
    /// Position in the unfiltered list
    pub position: usize,
    pub text: String,
    pub completed: bool,
    pub category: String,
    /// Resolved label; blank for uncategorized and unknown categories
    pub category_label: String,
    /// Scheduled for deferred removal
    pub removing: bool,
}

/// Rows for every task passing the store's current filter
pub fn build_rows(store: &TaskStore, pending: &PendingDeletes) -> Vec<Row> {
    let categories = store.categories();
    store
        .visible()
        .map(|(position, task)| Row {
            id: task.id,
            position,
            text: task.text.clone(),
            completed: task.completed,
            category: task.category.clone(),
            category_label: categories.label(&task.category).unwrap_or("").to_string(),
            removing: pending.contains(task.id),
        })
        .collect()
}

/// A user gesture on a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Single activation of the row text
    Activate(TaskId),
    /// Double activation or the edit action
    BeginEdit(TaskId),
    /// Enter, Esc, Tab or clicking away while editing
    CommitEdit { id: TaskId, text: String },
    /// The delete action
    Delete(TaskId),
}

/// What the caller should do after routing an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Toggled,
    /// Enter inline editing with this text pre-filled
    StartEditing { id: TaskId, text: String },
    Edited,
    RemovalScheduled(TaskId),
}

/// Apply an interaction to the store. Deletes, including edits committed
/// with blank text, are deferred through `pending`.
pub fn route(
    store: &mut TaskStore,
    pending: &mut PendingDeletes,
    interaction: Interaction,
    now: Instant,
) -> Result<Effect, StoreError> {
    match interaction {
        Interaction::Activate(id) => Ok(if store.toggle_completion(id)? {
            Effect::Toggled
        } else {
            Effect::None
        }),
        Interaction::BeginEdit(id) => Ok(match store.get(id) {
            Some(task) => Effect::StartEditing {
                id,
                text: task.text.clone(),
            },
            None => Effect::None,
        }),
        Interaction::CommitEdit { id, text } => {
            if normalize_text(&text).is_none() {
                return Ok(schedule_removal(store, pending, id, now));
            }
            Ok(match store.edit(id, &text)? {
                EditOutcome::Edited => Effect::Edited,
                EditOutcome::Removed(_) | EditOutcome::Missing => Effect::None,
            })
        }
        Interaction::Delete(id) => Ok(schedule_removal(store, pending, id, now)),
    }
}

fn schedule_removal(store: &TaskStore, pending: &mut PendingDeletes, id: TaskId, now: Instant) -> Effect {
    if store.get(id).is_none() {
        return Effect::None;
    }
    pending.schedule(id, now);
    Effect::RemovalScheduled(id)
}

// ---------------------------------------------------------------------------
// Deferred deletes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingDelete {
    id: TaskId,
    due: Instant,
}

/// Removals waiting out their grace period. Entries capture the task id,
/// not its position, so list changes during the delay cannot redirect them.
#[derive(Debug, Clone)]
pub struct PendingDeletes {
    delay: Duration,
    queue: Vec<PendingDelete>,
}

impl PendingDeletes {
    pub fn new(delay: Duration) -> Self {
        PendingDeletes {
            delay,
            queue: Vec::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `id` for removal at `now + delay`. Returns false if it was
    /// already queued; the original deadline stands. A deadline past what
    /// `Instant` can hold falls back to `now`.
    pub fn schedule(&mut self, id: TaskId, now: Instant) -> bool {
        self.schedule_at(id, now.checked_add(self.delay).unwrap_or(now))
    }

    /// Queue `id` for removal at an explicit deadline
    pub fn schedule_at(&mut self, id: TaskId, due: Instant) -> bool {
        if self.contains(id) {
            return false;
        }
        self.queue.push(PendingDelete { id, due });
        true
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.queue.iter().any(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Earliest deadline still waiting
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.iter().map(|p| p.due).min()
    }

    /// Latest deadline still waiting
    pub fn last_due(&self) -> Option<Instant> {
        self.queue.iter().map(|p| p.due).max()
    }

    /// Remove and return the ids whose deadline has passed, in the order
    /// they were scheduled.
    pub fn take_due(&mut self, now: Instant) -> Vec<TaskId> {
        let (due, waiting): (Vec<_>, Vec<_>) = self.queue.drain(..).partition(|p| p.due <= now);
        self.queue = waiting;
        due.into_iter().map(|p| p.id).collect()
    }
}

/// Carry out every removal whose deadline has passed. Ids that no longer
/// exist are skipped. Returns how many tasks were removed.
pub fn flush_due(store: &mut TaskStore, pending: &mut PendingDeletes, now: Instant) -> Result<usize, StoreError> {
    let due = pending.take_due(now);
    let mut removed = 0;
    for (i, id) in due.iter().enumerate() {
        match store.remove(*id) {
            Ok(Some(_)) => removed += 1,
            Ok(None) => {}
            Err(e) => {
                // Retry the rest on the next tick
                for rest in &due[i + 1..] {
                    pending.schedule_at(*rest, now);
                }
                return Err(e);
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use crate::model::config::Categories;
    use crate::model::filter::ViewFilter;
    use pretty_assertions::assert_eq;

    const DELAY: Duration = Duration::from_millis(400);

    fn store_with(tasks: &[(&str, &str)]) -> TaskStore {
        let mut store = TaskStore::load(Box::new(MemoryStore::new()), Categories::default()).unwrap();
        for (text, category) in tasks {
            store.add(text, category).unwrap();
        }
        store
    }

    fn texts(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn rows_follow_filter_and_resolve_labels() {
        let mut store = store_with(&[("Buy milk", ""), ("Call Sam", "work"), ("Old", "retired")]);
        let pending = PendingDeletes::new(DELAY);

        let rows = build_rows(&store, &pending);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].category_label, "Work");
        assert_eq!(rows[2].category_label, "");
        assert_eq!(rows[0].category_label, "");

        store.toggle_completion(rows[0].id).unwrap();
        store.set_view_filter(ViewFilter::Active);
        let rows = build_rows(&store, &pending);
        let positions: Vec<usize> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, [1, 2]);
        assert_eq!(rows.len(), store.visible_count());
    }

    #[test]
    fn activate_toggles() {
        let mut store = store_with(&[("a", "")]);
        let mut pending = PendingDeletes::new(DELAY);
        let id = store.tasks()[0].id;
        let now = Instant::now();

        assert_eq!(route(&mut store, &mut pending, Interaction::Activate(id), now).unwrap(), Effect::Toggled);
        assert!(store.tasks()[0].completed);
        assert_eq!(
            route(&mut store, &mut pending, Interaction::Activate(TaskId(99)), now).unwrap(),
            Effect::None
        );
    }

    #[test]
    fn begin_and_commit_edit() {
        let mut store = store_with(&[("Buy milk", "")]);
        let mut pending = PendingDeletes::new(DELAY);
        let id = store.tasks()[0].id;
        let now = Instant::now();

        let effect = route(&mut store, &mut pending, Interaction::BeginEdit(id), now).unwrap();
        assert_eq!(
            effect,
            Effect::StartEditing {
                id,
                text: "Buy milk".into()
            }
        );

        let commit = Interaction::CommitEdit {
            id,
            text: "  Buy oat milk ".into(),
        };
        assert_eq!(route(&mut store, &mut pending, commit, now).unwrap(), Effect::Edited);
        assert_eq!(texts(&store), ["Buy oat milk"]);
    }

    #[test]
    fn blank_commit_goes_through_deferred_delete() {
        let mut store = store_with(&[("only", "")]);
        let mut pending = PendingDeletes::new(DELAY);
        let id = store.tasks()[0].id;
        let now = Instant::now();

        let commit = Interaction::CommitEdit { id, text: "   ".into() };
        assert_eq!(
            route(&mut store, &mut pending, commit, now).unwrap(),
            Effect::RemovalScheduled(id)
        );
        assert_eq!(store.len(), 1);
        assert!(build_rows(&store, &pending)[0].removing);

        assert_eq!(flush_due(&mut store, &mut pending, now + DELAY).unwrap(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn delete_waits_for_deadline() {
        let mut store = store_with(&[("a", ""), ("b", "")]);
        let mut pending = PendingDeletes::new(DELAY);
        let id = store.tasks()[0].id;
        let now = Instant::now();

        route(&mut store, &mut pending, Interaction::Delete(id), now).unwrap();
        assert_eq!(flush_due(&mut store, &mut pending, now + DELAY / 2).unwrap(), 0);
        assert_eq!(texts(&store), ["a", "b"]);
        assert_eq!(pending.next_due(), Some(now + DELAY));

        assert_eq!(flush_due(&mut store, &mut pending, now + DELAY).unwrap(), 1);
        assert_eq!(texts(&store), ["b"]);
        assert!(pending.is_empty());
    }

    #[test]
    fn overlapping_deletes_remove_the_right_tasks() {
        let mut store = store_with(&[("a", ""), ("b", ""), ("c", ""), ("d", "")]);
        let mut pending = PendingDeletes::new(DELAY);
        let ids: Vec<TaskId> = store.tasks().iter().map(|t| t.id).collect();
        let now = Instant::now();

        route(&mut store, &mut pending, Interaction::Delete(ids[1]), now).unwrap();
        route(&mut store, &mut pending, Interaction::Delete(ids[3]), now + Duration::from_millis(10)).unwrap();

        // Shift positions before either deadline fires
        store.remove(ids[0]).unwrap();

        let removed = flush_due(&mut store, &mut pending, now + Duration::from_secs(1)).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(texts(&store), ["c"]);
    }

    #[test]
    fn delete_of_vanished_task_is_skipped() {
        let mut store = store_with(&[("a", ""), ("b", "")]);
        let mut pending = PendingDeletes::new(DELAY);
        let id = store.tasks()[0].id;
        let now = Instant::now();

        route(&mut store, &mut pending, Interaction::Delete(id), now).unwrap();
        store.remove(id).unwrap();

        assert_eq!(flush_due(&mut store, &mut pending, now + DELAY).unwrap(), 0);
        assert_eq!(texts(&store), ["b"]);
    }

    #[test]
    fn scheduling_twice_keeps_first_deadline() {
        let mut pending = PendingDeletes::new(DELAY);
        let now = Instant::now();
        assert!(pending.schedule(TaskId(1), now));
        assert!(!pending.schedule(TaskId(1), now + DELAY));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.take_due(now + DELAY), [TaskId(1)]);
    }

    #[test]
    fn oversized_delay_does_not_overflow() {
        let mut pending = PendingDeletes::new(Duration::MAX);
        let now = Instant::now();
        assert!(pending.schedule(TaskId(1), now));
        assert_eq!(pending.next_due(), Some(now));
        assert_eq!(pending.take_due(now), [TaskId(1)]);
    }

    #[test]
    fn last_due_covers_every_entry() {
        let mut pending = PendingDeletes::new(DELAY);
        let now = Instant::now();
        assert_eq!(pending.last_due(), None);
        pending.schedule(TaskId(1), now);
        pending.schedule(TaskId(2), now + DELAY);
        assert_eq!(pending.last_due(), Some(now + DELAY + DELAY));
        assert_eq!(pending.take_due(now + DELAY + DELAY).len(), 2);
    }
}
