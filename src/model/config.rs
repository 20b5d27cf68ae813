use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub ui: UiConfig,
}

/// One selectable category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

impl Category {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Category {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The fixed, ordered set of category identifiers and their labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories(Vec<Category>);

impl Default for Categories {
    /// Default: see src/templates/config.toml
    fn default() -> Self {
        Categories(vec![
            Category::new("work", "Work"),
            Category::new("personal", "Personal"),
            Category::new("study", "Study"),
        ])
    }
}

impl Categories {
    pub fn new(categories: Vec<Category>) -> Self {
        Categories(categories)
    }

    pub fn empty() -> Self {
        Categories(Vec::new())
    }

    /// Human-readable label for a category id
    pub fn label(&self, id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.label.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The category after `current` in selector order, where `""` (none)
    /// comes first and wraps around after the last category.
    pub fn cycle(&self, current: &str) -> String {
        let pos = self.0.iter().position(|c| c.id == current);
        match pos {
            None => self.0.first().map(|c| c.id.clone()).unwrap_or_default(),
            Some(i) => self.0.get(i + 1).map(|c| c.id.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Grace period between a delete action and the removal, in milliseconds.
    /// Default: see src/templates/config.toml
    #[serde(default = "default_delete_delay_ms")]
    pub delete_delay_ms: u64,
    /// Color overrides applied to the dark theme
    #[serde(default)]
    pub dark_colors: HashMap<String, String>,
    /// Color overrides applied to the light theme
    #[serde(default)]
    pub light_colors: HashMap<String, String>,
    /// Per-category label colors
    #[serde(default)]
    pub category_colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            delete_delay_ms: default_delete_delay_ms(),
            dark_colors: HashMap::new(),
            light_colors: HashMap::new(),
            category_colors: HashMap::new(),
        }
    }
}

impl UiConfig {
    /// Longest grace period honored; larger configured values are clamped
    pub const MAX_DELETE_DELAY_MS: u64 = 60_000;

    pub fn delete_delay(&self) -> Duration {
        Duration::from_millis(self.delete_delay_ms.min(Self::MAX_DELETE_DELAY_MS))
    }
}

/// Default: see src/templates/config.toml
fn default_delete_delay_ms() -> u64 {
    400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.categories.len(), 3);
        assert_eq!(config.categories.label("work"), Some("Work"));
        assert_eq!(config.ui.delete_delay_ms, 400);
    }

    #[test]
    fn categories_from_toml() {
        let config: Config = toml::from_str(
            r#"
[[categories]]
id = "home"
label = "Home"

[[categories]]
id = "errands"
label = "Errands"

[ui]
delete_delay_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(config.categories.ids().collect::<Vec<_>>(), ["home", "errands"]);
        assert!(config.categories.contains("errands"));
        assert!(!config.categories.contains("work"));
        assert_eq!(config.ui.delete_delay_ms, 0);
    }

    #[test]
    fn huge_delete_delay_is_clamped() {
        let config: Config = toml::from_str("[ui]\ndelete_delay_ms = 9223372036854775807\n").unwrap();
        assert_eq!(config.ui.delete_delay(), Duration::from_secs(60));
        assert_eq!(UiConfig::default().delete_delay(), Duration::from_millis(400));
    }

    #[test]
    fn unknown_label_is_none() {
        let cats = Categories::default();
        assert_eq!(cats.label("nope"), None);
        assert_eq!(cats.label(""), None);
    }

    #[test]
    fn cycle_wraps_through_none() {
        let cats = Categories::default();
        assert_eq!(cats.cycle(""), "work");
        assert_eq!(cats.cycle("work"), "personal");
        assert_eq!(cats.cycle("study"), "");
        // An id no longer configured restarts from the first category
        assert_eq!(cats.cycle("gone"), "work");
        assert_eq!(Categories::empty().cycle(""), "");
    }
}
