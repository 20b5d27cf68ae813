use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::model::task::{Task, TaskId, normalize_text};

/// One record as found in storage. Every field is optional so that records
/// written before ids existed (`{"text","completed","category"}`) still load.
#[derive(Debug, Deserialize)]
struct StoredTask {
    #[serde(default)]
    id: Option<TaskId>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    category: Option<String>,
}

/// Parse the serialized task list.
///
/// Fails only when the payload is not a JSON array at all. Individual records
/// that cannot be read, or whose text is blank, are skipped and returned as
/// raw JSON in the second element so the caller can preserve them.
/// Missing or duplicate ids are assigned after the highest id present,
/// in list order. Ids too close to `u64::MAX` to leave room for new tasks
/// cause the list to be renumbered from 1.
pub fn parse_tasks(source: &str) -> Result<(Vec<Task>, Vec<String>), serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(source)?;

    let mut dropped = Vec::new();
    let mut records = Vec::with_capacity(values.len());
    for value in values {
        let raw = value.to_string();
        match serde_json::from_value::<StoredTask>(value) {
            Ok(stored) => match stored.text.as_deref().and_then(normalize_text) {
                Some(text) => {
                    let text = text.to_string();
                    records.push((stored, text));
                }
                None => dropped.push(raw),
            },
            Err(_) => dropped.push(raw),
        }
    }

    // First occurrence of an id keeps it; later duplicates get a fresh one
    let mut seen = HashSet::new();
    let mut ids: Vec<Option<TaskId>> = records
        .iter()
        .map(|(stored, _)| stored.id.filter(|id| seen.insert(*id)))
        .collect();

    // The highest id must leave room for the missing ones plus the store's
    // next id. When it does not, the stored ids are discarded and the whole
    // list is numbered from 1.
    let max = ids.iter().flatten().map(|id| id.0).max().unwrap_or(0);
    let missing = ids.iter().filter(|id| id.is_none()).count() as u64;
    if max.checked_add(missing).and_then(|n| n.checked_add(1)).is_none() {
        for (i, id) in ids.iter_mut().enumerate() {
            *id = Some(TaskId(i as u64 + 1));
        }
    } else {
        let mut next = max;
        for id in ids.iter_mut().filter(|id| id.is_none()) {
            next += 1;
            *id = Some(TaskId(next));
        }
    }

    let tasks = records
        .into_iter()
        .zip(ids)
        .map(|((stored, text), id)| Task {
            id: id.unwrap_or(TaskId(0)),
            text,
            completed: stored.completed.unwrap_or(false),
            category: stored.category.unwrap_or_default(),
        })
        .collect();

    Ok((tasks, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_current_format() {
        let (tasks, dropped) = parse_tasks(
            r#"[{"id":3,"text":"Buy milk","completed":true,"category":""},
                {"id":7,"text":"Call Sam","completed":false,"category":"work"}]"#,
        )
        .unwrap();
        assert!(dropped.is_empty());
        assert_eq!(
            tasks,
            vec![
                Task {
                    id: TaskId(3),
                    text: "Buy milk".into(),
                    completed: true,
                    category: String::new(),
                },
                Task::new(TaskId(7), "Call Sam", "work"),
            ]
        );
    }

    #[test]
    fn assigns_ids_to_legacy_records() {
        let (tasks, _) = parse_tasks(
            r#"[{"text":"a","completed":false,"category":""},
                {"text":"b","completed":true,"category":"work"}]"#,
        )
        .unwrap();
        assert_eq!(tasks[0].id, TaskId(1));
        assert_eq!(tasks[1].id, TaskId(2));
        assert!(tasks[1].completed);
    }

    #[test]
    fn fills_missing_fields() {
        let (tasks, _) = parse_tasks(r#"[{"id":2,"text":"x"},{"text":"y","category":null}]"#).unwrap();
        assert_eq!(tasks[0].category, "");
        assert!(!tasks[0].completed);
        assert_eq!(tasks[1].id, TaskId(3));
        assert_eq!(tasks[1].category, "");
    }

    #[test]
    fn duplicate_ids_are_reassigned() {
        let (tasks, _) = parse_tasks(r#"[{"id":5,"text":"a"},{"id":5,"text":"b"},{"text":"c"}]"#).unwrap();
        let ids: Vec<u64> = tasks.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![5, 6, 7]);
    }

    #[test]
    fn max_id_is_renumbered() {
        let (tasks, _) = parse_tasks(r#"[{"id":18446744073709551615,"text":"a"}]"#).unwrap();
        assert_eq!(tasks[0].id, TaskId(1));
        assert_eq!(tasks[0].text, "a");
    }

    #[test]
    fn max_id_with_legacy_record_is_renumbered() {
        let (tasks, _) = parse_tasks(
            r#"[{"id":18446744073709551615,"text":"a"},{"text":"b"},{"id":4,"text":"c"}]"#,
        )
        .unwrap();
        let ids: Vec<u64> = tasks.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn high_ids_that_fit_are_kept() {
        let (tasks, _) = parse_tasks(r#"[{"id":18446744073709551613,"text":"a"},{"text":"b"}]"#).unwrap();
        assert_eq!(tasks[0].id, TaskId(u64::MAX - 2));
        assert_eq!(tasks[1].id, TaskId(u64::MAX - 1));
    }

    #[test]
    fn trims_text_and_drops_blank_records() {
        let (tasks, dropped) =
            parse_tasks(r#"[{"text":"  padded  "},{"text":"   "},{"text":42},"oops"]"#).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "padded");
        assert_eq!(dropped.len(), 3);
        assert_eq!(dropped[2], r#""oops""#);
    }

    #[test]
    fn rejects_non_array_payloads() {
        assert!(parse_tasks("not json {{{").is_err());
        assert!(parse_tasks(r#"{"text":"a"}"#).is_err());
        assert!(parse_tasks("null").is_err());
    }

    #[test]
    fn empty_array_is_empty_list() {
        let (tasks, dropped) = parse_tasks("[]").unwrap();
        assert!(tasks.is_empty());
        assert!(dropped.is_empty());
    }
}
