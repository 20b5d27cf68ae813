use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable task identifier, assigned once at creation and never reused
/// within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    /// Accepts `7` or `#7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);
        digits.parse().map(TaskId)
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display text, always trimmed and non-empty
    pub text: String,
    pub completed: bool,
    /// Category identifier; empty means uncategorized
    pub category: String,
}

impl Task {
    /// Create an open task. `text` is expected to be trimmed already.
    pub fn new(id: TaskId, text: impl Into<String>, category: impl Into<String>) -> Self {
        Task {
            id,
            text: text.into(),
            completed: false,
            category: category.into(),
        }
    }

    /// Checkbox rendering shared by the CLI and TUI
    pub fn checkbox(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty()
    }
}

/// Trim user input; `None` when nothing but whitespace remains.
pub fn normalize_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_parses_with_or_without_hash() {
        assert_eq!("12".parse::<TaskId>().unwrap(), TaskId(12));
        assert_eq!("#12".parse::<TaskId>().unwrap(), TaskId(12));
        assert_eq!(" 3 ".parse::<TaskId>().unwrap(), TaskId(3));
        assert!("abc".parse::<TaskId>().is_err());
        assert!("".parse::<TaskId>().is_err());
    }

    #[test]
    fn new_task_is_open() {
        let task = Task::new(TaskId(1), "Buy milk", "");
        assert!(!task.completed);
        assert!(task.is_uncategorized());
        assert_eq!(task.checkbox(), "[ ]");
    }

    #[test]
    fn normalize_text_trims_and_rejects_blank() {
        assert_eq!(normalize_text("  hi  "), Some("hi"));
        assert_eq!(normalize_text("   "), None);
        assert_eq!(normalize_text("\t\n"), None);
        assert_eq!(normalize_text(""), None);
    }

    #[test]
    fn serializes_every_field() {
        let task = Task::new(TaskId(4), "Call Sam", "work");
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":4,"text":"Call Sam","completed":false,"category":"work"}"#
        );
    }
}
