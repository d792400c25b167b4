use todo_core::{ControllerError, SubmitOutcome};
use todo_model::{DraftField, ModelError, Task, TaskDraft};

/// What happens to the form once a submit settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFate {
    Close,
    StayOpen,
}

/// Create/edit form bound to a [`TaskDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    draft: TaskDraft,
    /// Number of the submit this form is waiting on.
    pending: Option<u64>,
}

impl Form {
    pub fn create() -> Self {
        Self {
            draft: TaskDraft::empty(),
            pending: None,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            draft: TaskDraft::from_task(task),
            pending: None,
        }
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set(&mut self, field: DraftField, value: &str) -> Result<(), ModelError> {
        self.draft.set(field, value)
    }

    /// Mark the form busy with submit number `submit` and hand out the draft.
    ///
    /// `None` while a previous submit is still pending.
    pub fn begin_submit(&mut self, submit: u64) -> Option<TaskDraft> {
        if self.pending.is_some() {
            return None;
        }
        self.pending = Some(submit);
        Some(self.draft.clone())
    }

    /// Settle submit number `submit`; `None` if this form did not issue it.
    ///
    /// The form closes once the save went through, even when the list
    /// reload after it failed; any other failure keeps the user's input.
    pub fn settle(
        &mut self,
        submit: u64,
        result: &Result<SubmitOutcome, ControllerError>,
    ) -> Option<FormFate> {
        if self.pending != Some(submit) {
            return None;
        }
        self.pending = None;
        Some(match result {
            Ok(_) => FormFate::Close,
            Err(err) if err.mutation_applied() => FormFate::Close,
            Err(_) => FormFate::StayOpen,
        })
    }

    pub fn render(&self) -> String {
        let d = &self.draft;
        let title = if d.is_edit() { "Edit Task" } else { "Create Task" };
        let deadline = if d.deadline.is_empty() {
            "(none)"
        } else {
            d.deadline.as_str()
        };
        let mut out = format!("== {title} ==\n");
        out.push_str(&format!("title:       {}\n", d.title));
        out.push_str(&format!("description: {}\n", d.description));
        out.push_str(&format!("status:      {}\n", d.status.label()));
        out.push_str(&format!("priority:    {}\n", d.priority.label()));
        out.push_str(&format!("deadline:    {deadline}\n"));
        if self.is_submitting() {
            out.push_str("Saving...\n");
        } else {
            out.push_str("Use `set FIELD VALUE`, then `save` or `cancel`.\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use todo_core::LoadOutcome;
    use todo_gateway::GatewayError;
    use todo_model::{TaskId, TaskPriority, TaskStatus};

    use super::*;

    fn saved() -> Result<SubmitOutcome, ControllerError> {
        Ok(SubmitOutcome {
            saved: None,
            created: true,
            reload: LoadOutcome::Replaced { count: 1, total: 1 },
        })
    }

    #[test]
    fn create_form_starts_empty() {
        let form = Form::create();
        assert!(!form.draft().is_edit());
        assert_eq!(form.draft().status, TaskStatus::Todo);
        assert_eq!(form.draft().priority, TaskPriority::Low);
        assert!(form.render().starts_with("== Create Task =="));
    }

    #[test]
    fn edit_form_copies_task() {
        let task = Task {
            id: Some(TaskId::from("t-1")),
            title: "Pay rent".into(),
            description: String::new(),
            status: TaskStatus::Done,
            priority: TaskPriority::Medium,
            deadline: None,
            creation_date: None,
        };
        let mut form = Form::edit(&task);
        form.set(DraftField::Title, "Pay rent early").unwrap();

        assert_eq!(form.draft().id, task.id);
        assert_eq!(form.draft().title, "Pay rent early");
        assert!(form.render().contains("== Edit Task =="));
        assert!(form.render().contains("deadline:    (none)"));
    }

    #[test]
    fn single_pending_submit() {
        let mut form = Form::create();
        assert!(form.begin_submit(1).is_some());
        assert!(form.begin_submit(2).is_none());
        assert!(form.render().contains("Saving..."));

        assert_eq!(form.settle(1, &saved()), Some(FormFate::Close));
        assert!(!form.is_submitting());
    }

    #[test]
    fn ignores_submits_it_did_not_issue() {
        let mut form = Form::create();
        assert_eq!(form.settle(1, &saved()), None);

        form.begin_submit(2);
        assert_eq!(form.settle(1, &saved()), None);
        assert!(form.is_submitting());
    }

    #[test]
    fn closes_only_when_the_save_happened() {
        let mut form = Form::create();
        form.begin_submit(1);
        assert_eq!(form.settle(1, &saved()), Some(FormFate::Close));

        let refresh: Result<SubmitOutcome, ControllerError> = Err(ControllerError::Refresh(
            GatewayError::Timeout(Duration::from_secs(10)),
        ));
        form.begin_submit(2);
        assert_eq!(form.settle(2, &refresh), Some(FormFate::Close));

        let rejected: Result<SubmitOutcome, ControllerError> =
            Err(GatewayError::server(400, "title required").into());
        form.begin_submit(3);
        assert_eq!(form.settle(3, &rejected), Some(FormFate::StayOpen));
    }
}
