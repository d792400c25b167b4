mod config;
mod error;
mod install;

pub use config::{LoggerConfig, LoggerFormat};
pub use error::LoggerError;

/// Install the global `tracing` subscriber described by `cfg`.
///
/// Text and JSON go to stderr so records never interleave with the views
/// printed on stdout.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    install::install(cfg)
}
