mod error;
pub use error::ModelError;

mod task_id;
pub use task_id::TaskId;

mod task_status;
pub use task_status::TaskStatus;

mod task_priority;
pub use task_priority::TaskPriority;

mod task;
pub use task::Task;

mod task_draft;
pub use task_draft::{DraftField, TaskDraft};

mod task_query;
pub use task_query::{DEFAULT_LIMIT, SortKey, SortOrder, TaskPage, TaskQuery};

mod session;
pub use session::Session;

/// Deadline value as exchanged with the task API.
///
/// Either `YYYY-MM-DD` or an RFC 3339 timestamp; the client never parses it.
pub type Deadline = String;
