use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tempfile::NamedTempFile;

/// Entries older than this many days go on `tick recovery prune`.
pub const PRUNE_AGE_DAYS: i64 = 30;

const LOG_FILE: &str = ".recovery.log";

const FILE_HEADER: &str = "\
# tick recovery log
#
# Task data tick could not keep: unreadable storage, failed writes and
# cleared lists. Newest entries are at the bottom.
# `tick recovery` lists them, `tick recovery prune` trims old ones.

---
";

const SEPARATOR: &str = "---";
const FENCE_OPEN: &str = "```text";
const FENCE_CLOSE: &str = "```";

/// Why an entry was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryCategory {
    /// Stored data that could not be parsed and was dropped at load
    Parser,
    /// A write to the store failed; the body is what should have been written
    Write,
    /// Tasks removed in bulk by clear-all
    Delete,
}

impl RecoveryCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RecoveryCategory::Parser => "parser",
            RecoveryCategory::Write => "write",
            RecoveryCategory::Delete => "delete",
        }
    }
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoveryCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        [RecoveryCategory::Parser, RecoveryCategory::Write, RecoveryCategory::Delete]
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// One preserved payload. Rendered as a markdown section in the log and
/// serialized as-is for `tick recovery --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: IndexMap<String, String>,
    pub body: String,
}

impl RecoveryEntry {
    /// Entry stamped with the current time, to the second
    pub fn now(category: RecoveryCategory, description: impl Into<String>, body: String) -> Self {
        RecoveryEntry {
            timestamp: Utc::now().trunc_subsecs(0),
            category,
            description: description.into(),
            fields: IndexMap::new(),
            body,
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Display for RecoveryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} {}: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.category,
            self.description
        )?;
        if !self.fields.is_empty() {
            writeln!(f)?;
            for (key, value) in &self.fields {
                writeln!(f, "{}: {}", key, value)?;
            }
        }
        if !self.body.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", FENCE_OPEN)?;
            writeln!(f, "{}", self.body.trim_end_matches('\n'))?;
            writeln!(f, "{}", FENCE_CLOSE)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", SEPARATOR)
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

/// Replace `path` with `content` through a temp file in the same directory.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Append an entry. Failures are only logged; the caller's operation goes on.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    match append(data_dir, &entry) {
        Ok(()) => tracing::info!(category = %entry.category, description = %entry.description, "recorded recovery entry"),
        Err(e) => tracing::warn!(error = %e, "could not write to recovery log"),
    }
}

fn append(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);
    let fresh = fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if fresh {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_string().as_bytes())
}

/// Entries in the log, newest first, at most `limit` of them.
/// A missing or unreadable log has no entries.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let Ok(content) = fs::read_to_string(recovery_log_path(data_dir)) else {
        return Vec::new();
    };
    let mut entries = parse_log(&content);
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

/// Drop entries older than `PRUNE_AGE_DAYS`, or every entry with `all`.
/// Returns how many were dropped.
pub fn prune_recovery(data_dir: &Path, all: bool) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let entries = parse_log(&fs::read_to_string(&path)?);
    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    let (kept, dropped): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| !all && e.timestamp >= cutoff);

    let mut content = String::from(FILE_HEADER);
    for entry in &kept {
        content.push_str(&entry.to_string());
    }
    atomic_write(&path, content.as_bytes())?;
    Ok(dropped.len())
}

/// `<timestamp> <category>: <description>`
fn parse_header(header: &str) -> Option<RecoveryEntry> {
    let (stamp, rest) = header.split_once(' ')?;
    let (category, description) = rest.split_once(": ")?;
    Some(RecoveryEntry {
        timestamp: DateTime::parse_from_rfc3339(stamp).ok()?.with_timezone(&Utc),
        category: category.parse().ok()?,
        description: description.to_string(),
        fields: IndexMap::new(),
        body: String::new(),
    })
}

/// Entries in file order. Sections with an unreadable header are skipped.
fn parse_log(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut current: Option<RecoveryEntry> = None;
    // Lines of a fenced body while inside one
    let mut body: Option<Vec<&str>> = None;

    for line in content.lines() {
        if body.is_some() {
            if line == FENCE_CLOSE {
                let lines = body.take().unwrap_or_default();
                if let Some(entry) = current.as_mut() {
                    entry.body = lines.join("\n");
                }
            } else if let Some(lines) = body.as_mut() {
                lines.push(line);
            }
            continue;
        }

        if let Some(header) = line.strip_prefix("## ") {
            entries.extend(current.take());
            current = parse_header(header);
            continue;
        }
        let Some(entry) = current.as_mut() else {
            continue;
        };
        if line == FENCE_OPEN {
            body = Some(Vec::new());
        } else if line == SEPARATOR {
            entries.extend(current.take());
        } else if let Some((key, value)) = line.split_once(": ") {
            entry.fields.insert(key.to_string(), value.to_string());
        }
    }
    entries.extend(current);
    entries
}
