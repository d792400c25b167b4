use std::str::FromStr;

use serde::Serialize;

use crate::{Deadline, ModelError, Task, TaskId, TaskPriority, TaskStatus};

/// Mutable task value bound to the create/edit form.
///
/// In create mode `id` is `None`; in edit mode it holds the identifier of the
/// task being edited. The identifier never goes into the request body, it is
/// carried in the update path instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskDraft {
    #[serde(skip)]
    pub id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Empty string means "no deadline".
    pub deadline: Deadline,
}

/// Editable fields of a [`TaskDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Status,
    Priority,
    Deadline,
}

impl TaskDraft {
    /// Empty skeleton for create mode.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy of an existing task for edit mode.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            deadline: task.deadline.clone().unwrap_or_default(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Assign a field from user input.
    ///
    /// Text fields take the value verbatim; enumerated fields must parse.
    pub fn set(&mut self, field: DraftField, value: &str) -> Result<(), ModelError> {
        match field {
            DraftField::Title => self.title = value.to_string(),
            DraftField::Description => self.description = value.to_string(),
            DraftField::Status => self.status = value.parse()?,
            DraftField::Priority => self.priority = value.parse()?,
            DraftField::Deadline => self.deadline = value.trim().to_string(),
        }
        Ok(())
    }
}

impl FromStr for DraftField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(DraftField::Title),
            "description" | "desc" => Ok(DraftField::Description),
            "status" => Ok(DraftField::Status),
            "priority" => Ok(DraftField::Priority),
            "deadline" | "due" => Ok(DraftField::Deadline),
            _ => Err(ModelError::UnknownField(s.to_string())),
        }
    }
}
