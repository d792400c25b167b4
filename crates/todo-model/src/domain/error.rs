use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid status: '{0}' (valid: todo, in_progress, done)")]
    InvalidStatus(String),

    #[error("invalid priority: '{0}' (valid: low, medium, high)")]
    InvalidPriority(String),

    #[error("invalid sort key: '{0}' (valid: creation_date, deadline, status, priority)")]
    InvalidSortKey(String),

    #[error("invalid sort order: '{0}' (valid: asc, desc)")]
    InvalidSortOrder(String),

    #[error("unknown field: '{0}' (valid: title, description, status, priority, deadline)")]
    UnknownField(String),
}
