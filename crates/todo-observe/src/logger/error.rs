use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format '{0}' (expected text, json or journald)")]
    InvalidFormat(String),

    #[error("journald output needs Linux and the `journald` feature")]
    JournaldNotSupported,

    #[error("journald socket unavailable: {0}")]
    Journald(String),

    #[error("invalid log filter '{0}'")]
    InvalidLogLevel(String),

    #[error("a global logger is already installed: {0}")]
    AlreadyInstalled(String),
}
