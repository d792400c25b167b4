//! User-facing reporting of controller failures.

use std::fmt;

use tracing::{error, warn};

use todo_gateway::{ErrorKind, GatewayError};

use crate::error::ControllerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// Turn a failed `action` into a notice and log it.
pub fn report(action: &str, err: &ControllerError) -> Notice {
    let notice = notice_for(action, err);
    match notice.severity {
        Severity::Error => error!(action, error = %err, "operation failed"),
        _ => warn!(action, error = %err, "operation incomplete"),
    }
    notice
}

pub fn notice_for(action: &str, err: &ControllerError) -> Notice {
    match err {
        ControllerError::NotAuthenticated => {
            Notice::warning(format!("Cannot {action}: log in first."))
        }
        ControllerError::MissingId => {
            Notice::error(format!("Cannot {action}: the task has not been saved yet."))
        }
        ControllerError::Refresh(source) => Notice::warning(format!(
            "Task saved, but the list could not be reloaded ({}). Use `refresh` to retry.",
            describe(source)
        )),
        ControllerError::Gateway(source) => {
            Notice::error(format!("Failed to {action}: {}.", describe(source)))
        }
    }
}

fn describe(err: &GatewayError) -> String {
    match err {
        GatewayError::Server {
            status: 401 | 403, ..
        } => "your session has expired, log in again".to_string(),
        GatewayError::Server { status: 404, .. } => "the task no longer exists".to_string(),
        GatewayError::Server {
            status: 400,
            message,
        } if !message.is_empty() => format!("the input was rejected: {message}"),
        GatewayError::Server { status: 400, .. } => "the input was rejected".to_string(),
        GatewayError::Server { status, .. } => format!("the task service answered {status}"),
        _ => match err.kind() {
            ErrorKind::Timeout => "the task service did not answer in time".to_string(),
            ErrorKind::Transport => "the task service is unreachable".to_string(),
            ErrorKind::InvalidResponse => "the task service sent an unreadable reply".to_string(),
            ErrorKind::InvalidConfig | ErrorKind::Server => err.to_string(),
        },
    }
}
