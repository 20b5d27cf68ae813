use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::task::Task;

/// Completion-status subset of tasks to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl ViewFilter {
    pub const ALL: [ViewFilter; 3] = [ViewFilter::All, ViewFilter::Active, ViewFilter::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewFilter::All => "all",
            ViewFilter::Active => "active",
            ViewFilter::Completed => "completed",
        }
    }

    /// Human label for the filter bar
    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All",
            ViewFilter::Active => "Active",
            ViewFilter::Completed => "Completed",
        }
    }

    /// Cycle all → active → completed → all
    pub fn next(self) -> Self {
        match self {
            ViewFilter::All => ViewFilter::Active,
            ViewFilter::Active => ViewFilter::Completed,
            ViewFilter::Completed => ViewFilter::All,
        }
    }

    /// Whether a task with this completion flag passes the filter
    pub fn admits(self, completed: bool) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Active => !completed,
            ViewFilter::Completed => completed,
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view filter: {0} (expected all, active or completed)")]
pub struct ParseViewFilterError(String);

impl FromStr for ViewFilter {
    type Err = ParseViewFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ViewFilter::All),
            "active" => Ok(ViewFilter::Active),
            "completed" | "done" => Ok(ViewFilter::Completed),
            _ => Err(ParseViewFilterError(s.to_string())),
        }
    }
}

/// The three conjunctive filters applied to the task list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub view: ViewFilter,
    /// Category identifier; empty means every category
    pub category: String,
    /// Case-insensitive substring; empty matches everything
    pub search: String,
}

impl FilterState {
    pub fn new(view: ViewFilter, category: impl Into<String>, search: impl Into<String>) -> Self {
        FilterState {
            view,
            category: category.into(),
            search: search.into(),
        }
    }

    /// All three filters at their neutral values
    pub fn is_neutral(&self) -> bool {
        self.view == ViewFilter::All && self.category.is_empty() && self.search.is_empty()
    }

    /// Prepare a matcher with the search needle lowercased once
    pub fn matcher(&self) -> TaskMatcher {
        TaskMatcher {
            view: self.view,
            category: self.category.clone(),
            needle: self.search.to_lowercase(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matcher().matches(task)
    }
}

/// A `FilterState` ready to test many tasks
#[derive(Debug, Clone)]
pub struct TaskMatcher {
    view: ViewFilter,
    category: String,
    needle: String,
}

impl TaskMatcher {
    pub fn matches(&self, task: &Task) -> bool {
        if !self.view.admits(task.completed) {
            return false;
        }
        if !self.category.is_empty() && task.category != self.category {
            return false;
        }
        self.needle.is_empty() || task.text.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskId;

    fn task(text: &str, completed: bool, category: &str) -> Task {
        let mut t = Task::new(TaskId(1), text, category);
        t.completed = completed;
        t
    }

    #[test]
    fn view_filter_admits() {
        assert!(ViewFilter::All.admits(true));
        assert!(ViewFilter::All.admits(false));
        assert!(ViewFilter::Active.admits(false));
        assert!(!ViewFilter::Active.admits(true));
        assert!(ViewFilter::Completed.admits(true));
        assert!(!ViewFilter::Completed.admits(false));
    }

    #[test]
    fn view_filter_cycles() {
        assert_eq!(ViewFilter::All.next(), ViewFilter::Active);
        assert_eq!(ViewFilter::Active.next(), ViewFilter::Completed);
        assert_eq!(ViewFilter::Completed.next(), ViewFilter::All);
    }

    #[test]
    fn view_filter_from_str() {
        assert_eq!("all".parse::<ViewFilter>().unwrap(), ViewFilter::All);
        assert_eq!("Active".parse::<ViewFilter>().unwrap(), ViewFilter::Active);
        assert_eq!("done".parse::<ViewFilter>().unwrap(), ViewFilter::Completed);
        assert!("someday".parse::<ViewFilter>().is_err());
    }

    #[test]
    fn neutral_filter_matches_everything() {
        let filter = FilterState::default();
        assert!(filter.is_neutral());
        assert!(filter.matches(&task("a", true, "work")));
        assert!(filter.matches(&task("b", false, "")));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let filter = FilterState::new(ViewFilter::All, "", "MILK");
        assert!(filter.matches(&task("Buy milk", false, "")));
        assert!(filter.matches(&task("buttermilk run", false, "")));
        assert!(!filter.matches(&task("Call Sam", false, "")));
    }

    #[test]
    fn category_filter_requires_exact_match() {
        let filter = FilterState::new(ViewFilter::All, "work", "");
        assert!(filter.matches(&task("a", false, "work")));
        assert!(!filter.matches(&task("a", false, "")));
        assert!(!filter.matches(&task("a", false, "workshop")));
    }

    #[test]
    fn matcher_outlives_filter() {
        let matcher = FilterState::new(ViewFilter::All, "work", "").matcher();
        assert!(matcher.matches(&task("a", false, "work")));
        assert!(!matcher.matches(&task("a", false, "")));
    }

    #[test]
    fn filters_are_conjunctive() {
        let filter = FilterState::new(ViewFilter::Active, "work", "sam");
        assert!(filter.matches(&task("Call Sam", false, "work")));
        assert!(!filter.matches(&task("Call Sam", true, "work")));
        assert!(!filter.matches(&task("Call Sam", false, "personal")));
        assert!(!filter.matches(&task("Call Bob", false, "work")));
    }
}
