use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("task service unreachable: {0}")]
    Transport(String),

    #[error("task service returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),
}

/// Failure class of a [`GatewayError`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Server,
    Timeout,
    InvalidResponse,
    InvalidConfig,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport(_) => ErrorKind::Transport,
            GatewayError::Server { .. } => ErrorKind::Server,
            GatewayError::Timeout(_) => ErrorKind::Timeout,
            GatewayError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            GatewayError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Server {
            status,
            message: message.into(),
        }
    }
}
