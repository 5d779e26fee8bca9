// Task record held by the store

use serde::{Deserialize, Serialize};

/// Generate a fresh task id
///
/// UUIDv7: millisecond timestamp followed by random bits, so ids sort by
/// creation time and are never reissued.
pub fn generate_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// A single entry in the list
///
/// Serializes to exactly `id`, `text` and `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: String,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Create an incomplete task with a freshly generated id
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            completed: false,
        }
    }

    /// Rebuild a task from stored parts
    pub fn from_parts(id: impl Into<String>, text: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Trailing 8 characters of the id, from its random bits
    pub fn short_id(&self) -> &str {
        let start = self.id.len().saturating_sub(8);
        self.id.get(start..).unwrap_or(&self.id)
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Replace the text; no validation happens here
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.completed { "x" } else { " " };
        write!(f, "[{}] {}", mark, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("buy milk");
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
        assert!(!task.id().is_empty());
    }

    #[test]
    fn test_generate_id_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_toggle_completed() {
        let mut task = Task::new("walk dog");
        task.toggle_completed();
        assert!(task.completed);
        task.toggle_completed();
        assert!(!task.completed);
    }

    #[test]
    fn test_set_text_keeps_id() {
        let mut task = Task::new("old");
        let id = task.id().to_string();
        task.set_text("");
        assert_eq!(task.text, "");
        assert_eq!(task.id(), id);
    }

    #[test]
    fn test_serialization_shape() {
        let task = Task::from_parts("t-1", "Test", true);
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"id":"t-1","text":"Test","completed":true}"#);
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let task: Task = serde_json::from_str(r#"{"id":"a","text":"b","completed":false,"extra":1}"#).unwrap();
        assert_eq!(task, Task::from_parts("a", "b", false));
    }

    #[test]
    fn test_short_id() {
        let task = Task::from_parts("01a1537f-c648-762b-a035-5eb47435552e", "x", false);
        assert_eq!(task.short_id(), "7435552e");
        assert_eq!(Task::from_parts("abc", "x", false).short_id(), "abc");
    }

    #[test]
    fn test_display() {
        assert_eq!(Task::from_parts("a", "milk", false).to_string(), "[ ] milk");
        assert_eq!(Task::from_parts("a", "milk", true).to_string(), "[x] milk");
    }
}
