use crate::model::task::Task;

/// Serialize the task list for the `tasks` slot.
///
/// Compact JSON array, one object per task with every field present.
pub fn serialize_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskId;
    use crate::parse::parse_tasks;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_list() {
        assert_eq!(serialize_tasks(&[]).unwrap(), "[]");
    }

    #[test]
    fn writes_category_even_when_empty() {
        let out = serialize_tasks(&[Task::new(TaskId(1), "Buy milk", "")]).unwrap();
        assert_eq!(
            out,
            r#"[{"id":1,"text":"Buy milk","completed":false,"category":""}]"#
        );
    }

    #[test]
    fn parse_reads_back_what_was_written() {
        let mut done = Task::new(TaskId(9), "Ship it", "work");
        done.completed = true;
        let tasks = vec![Task::new(TaskId(2), "quote \" and \\ slash", ""), done];

        let (parsed, dropped) = parse_tasks(&serialize_tasks(&tasks).unwrap()).unwrap();
        assert!(dropped.is_empty());
        assert_eq!(parsed, tasks);
    }
}
