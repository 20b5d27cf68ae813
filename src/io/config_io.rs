use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{Category, Config};

/// Template written when a config file is first created.
pub const CONFIG_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Error type for config I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("category already exists: {0}")]
    DuplicateCategory(String),
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Resolve the data directory: explicit override, then `TICK_DIR`,
/// then `$XDG_DATA_HOME/tick`, then `~/.local/share/tick`.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var("TICK_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    base.join("tick")
}

/// Resolve the config file: explicit override, then `TICK_CONFIG`,
/// then `$XDG_CONFIG_HOME/tick/config.toml`, then `~/.config/tick/config.toml`.
pub fn config_path(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("TICK_CONFIG")
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    base.join("tick").join("config.toml")
}

/// Read the config. A missing file yields the built-in defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read the config together with the raw toml_edit document for
/// round-trip-safe editing. A missing file starts from the template.
pub fn read_config_document(path: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let text = if path.exists() {
        fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        CONFIG_TEMPLATE.to_string()
    };
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let doc: toml_edit::DocumentMut = text.parse().map_err(|e| ConfigError::EditError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    crate::io::recovery::atomic_write(path, doc.to_string().as_bytes()).map_err(|e| {
        ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Append a category to the config document
pub fn add_category_to_config(doc: &mut toml_edit::DocumentMut, category: &Category) {
    if !doc.contains_key("categories") {
        doc["categories"] = toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new());
    }

    if let Some(categories) = doc["categories"].as_array_of_tables_mut() {
        let mut table = toml_edit::Table::new();
        table["id"] = toml_edit::value(&category.id);
        table["label"] = toml_edit::value(&category.label);
        categories.push(table);
    } else if let Some(categories) = doc["categories"].as_array_mut() {
        let mut table = toml_edit::InlineTable::new();
        table.insert("id", category.id.as_str().into());
        table.insert("label", category.label.as_str().into());
        categories.push(table);
    }
}

/// Load, extend and save the config file in one step.
pub fn add_category(path: &Path, category: Category) -> Result<Config, ConfigError> {
    let (config, mut doc) = read_config_document(path)?;
    if config.categories.contains(&category.id) {
        return Err(ConfigError::DuplicateCategory(category.id));
    }
    add_category_to_config(&mut doc, &category);
    write_config(path, &doc)?;
    read_config(path)
}
