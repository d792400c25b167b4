use serde::{Deserialize, Serialize};

use crate::{Deadline, TaskId, TaskPriority, TaskStatus};

/// A single to-do item as reported by the task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the task service.
    ///
    /// `None` only for records that were never persisted.
    #[serde(rename = "task_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Due date; `null` on the wire when unset.
    #[serde(default)]
    pub deadline: Option<Deadline>,
    /// Creation date stamped by the task service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

impl Task {
    /// Returns `true` if this task carries the given identifier.
    pub fn has_id(&self, id: &TaskId) -> bool {
        self.id.as_ref() == Some(id)
    }

    /// Deadline as a display string, empty when unset.
    pub fn deadline_str(&self) -> &str {
        self.deadline.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_representation() {
        let json = r#"{
            "task_id": "6f1c0e6a-0000-4000-8000-000000000001",
            "user_id": "a4a1f5f2-0000-4000-8000-000000000002",
            "title": "Write report",
            "description": "Quarterly numbers",
            "creation_date": "2024-03-01T00:00:00Z",
            "deadline": null,
            "status": "IN_PROGRESS",
            "priority": "HIGH",
            "user": {"UserID": "a4a1f5f2-0000-4000-8000-000000000002", "Email": "a@b.c"}
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(
            task.id,
            Some(TaskId::from("6f1c0e6a-0000-4000-8000-000000000001"))
        );
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.deadline.is_none());
        assert_eq!(task.deadline_str(), "");
        assert_eq!(task.creation_date.as_deref(), Some("2024-03-01T00:00:00Z"));
    }

    #[test]
    fn unpersisted_task_omits_id() {
        let task = Task {
            id: None,
            title: "draft".into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Low,
            deadline: Some("2024-05-01".into()),
            creation_date: None,
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("task_id"));
        assert!(!json.contains("creation_date"));
        assert!(json.contains(r#""deadline":"2024-05-01""#));
    }

    #[test]
    fn has_id_matches_only_assigned_identifier() {
        let mut task: Task = serde_json::from_str(
            r#"{"task_id":"abc","title":"t","status":"TODO","priority":"LOW"}"#,
        )
        .unwrap();
        assert!(task.has_id(&TaskId::from("abc")));
        assert!(!task.has_id(&TaskId::from("abd")));

        task.id = None;
        assert!(!task.has_id(&TaskId::from("abc")));
    }
}
