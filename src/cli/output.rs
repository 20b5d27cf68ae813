use serde::Serialize;

use crate::model::config::Categories;
use crate::model::task::{Task, TaskId};
use crate::ops::stats::{Counts, TaskStats};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: TaskId,
    /// Position in the unfiltered list
    pub position: usize,
    pub text: String,
    pub completed: bool,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
}

#[derive(Serialize)]
pub struct CountsJson {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Serialize)]
pub struct CategoryStatsJson {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub counts: CountsJson,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub totals: CountsJson,
    pub categories: Vec<CategoryStatsJson>,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub id: String,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(position: usize, task: &Task, categories: &Categories) -> TaskJson {
    TaskJson {
        id: task.id,
        position,
        text: task.text.clone(),
        completed: task.completed,
        category: task.category.clone(),
        category_label: categories.label(&task.category).map(str::to_string),
    }
}

pub fn counts_to_json(counts: &Counts) -> CountsJson {
    CountsJson {
        total: counts.total(),
        active: counts.active,
        completed: counts.completed,
    }
}

pub fn stats_to_json(stats: &TaskStats) -> StatsJson {
    StatsJson {
        totals: counts_to_json(&stats.totals),
        categories: stats
            .categories
            .iter()
            .map(|c| CategoryStatsJson {
                id: c.id.clone(),
                label: c.label.clone(),
                counts: counts_to_json(&c.counts),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One-line summary: `#3 [x] Work  Call Sam`. Unknown or empty categories
/// leave the label column blank.
pub fn format_task_line(task: &Task, categories: &Categories, label_width: usize) -> String {
    let label = categories.label(&task.category).unwrap_or("");
    let id = format!("#{}", task.id);
    if label_width == 0 {
        format!("{:>4} {} {}", id, task.checkbox(), task.text)
    } else {
        format!(
            "{:>4} {} {:<width$}  {}",
            id,
            task.checkbox(),
            label,
            task.text,
            width = label_width
        )
    }
}

/// Widest label among the given tasks' categories
pub fn label_width<'a>(tasks: impl IntoIterator<Item = &'a Task>, categories: &Categories) -> usize {
    tasks
        .into_iter()
        .filter_map(|t| categories.label(&t.category))
        .map(crate::util::unicode::display_width)
        .max()
        .unwrap_or(0)
}

fn format_counts(counts: &Counts) -> String {
    format!(
        "{} total, {} active, {} completed",
        counts.total(),
        counts.active,
        counts.completed
    )
}

/// Stats as aligned text lines. Empty category buckets are skipped.
pub fn format_stats(stats: &TaskStats) -> Vec<String> {
    let mut lines = vec![format_counts(&stats.totals)];
    let rows: Vec<(&str, &Counts)> = stats
        .categories
        .iter()
        .filter(|c| c.counts.total() > 0)
        .map(|c| {
            let name = if c.label.is_empty() { c.id.as_str() } else { c.label.as_str() };
            (name, &c.counts)
        })
        .collect();
    let width = rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (name, counts) in rows {
        lines.push(format!("  {:<width$}  {}", name, format_counts(counts), width = width));
    }
    lines
}
