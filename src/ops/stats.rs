use crate::model::config::Categories;
use crate::model::task::Task;

/// Open/done counts for one bucket of tasks
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.active + self.completed
    }

    fn record(&mut self, task: &Task) {
        if task.completed {
            self.completed += 1;
        } else {
            self.active += 1;
        }
    }
}

/// Per-category row of `TaskStats`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Category id; empty for uncategorized
    pub id: String,
    pub label: String,
    pub counts: Counts,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskStats {
    pub totals: Counts,
    /// Configured categories in config order, then uncategorized, then any
    /// ids found on tasks that are no longer configured
    pub categories: Vec<CategoryCounts>,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], categories: &Categories) -> Self {
        let mut stats = TaskStats::default();
        for category in categories.iter() {
            stats.categories.push(CategoryCounts {
                id: category.id.clone(),
                label: category.label.clone(),
                counts: Counts::default(),
            });
        }
        stats.categories.push(CategoryCounts {
            id: String::new(),
            label: "Uncategorized".to_string(),
            counts: Counts::default(),
        });

        for task in tasks {
            stats.totals.record(task);
            let idx = match stats.categories.iter().position(|c| c.id == task.category) {
                Some(i) => i,
                None => {
                    stats.categories.push(CategoryCounts {
                        id: task.category.clone(),
                        label: String::new(),
                        counts: Counts::default(),
                    });
                    stats.categories.len() - 1
                }
            };
            stats.categories[idx].counts.record(task);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskId;

    fn task(id: u64, category: &str, completed: bool) -> Task {
        let mut t = Task::new(TaskId(id), format!("task {}", id), category);
        t.completed = completed;
        t
    }

    #[test]
    fn counts_by_state_and_category() {
        let tasks = vec![
            task(1, "work", false),
            task(2, "work", true),
            task(3, "", false),
            task(4, "retired", true),
        ];
        let stats = TaskStats::compute(&tasks, &Categories::default());

        assert_eq!(stats.totals, Counts { active: 2, completed: 2 });
        assert_eq!(stats.totals.total(), 4);

        let ids: Vec<&str> = stats.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["work", "personal", "study", "", "retired"]);
        assert_eq!(stats.categories[0].counts, Counts { active: 1, completed: 1 });
        assert_eq!(stats.categories[1].counts.total(), 0);
        assert_eq!(stats.categories[3].counts.active, 1);
        assert_eq!(stats.categories[4].label, "");
    }

    #[test]
    fn empty_list() {
        let stats = TaskStats::compute(&[], &Categories::empty());
        assert_eq!(stats.totals.total(), 0);
        assert_eq!(stats.categories.len(), 1);
    }
}
