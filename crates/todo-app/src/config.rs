use clap::Parser;

use todo_core::ControllerConfig;
use todo_gateway::GatewayConfig;
use todo_model::DEFAULT_LIMIT;
use todo_observe::{LoggerConfig, LoggerFormat};

/// Terminal client for the to-do task service.
#[derive(Debug, Parser)]
#[command(name = "todo")]
#[command(about = "Browse and edit your tasks from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Origin of the task and user APIs.
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Hosted login page of the identity service.
    #[arg(long, env = "TODO_AUTH_UI_URL", default_value = "")]
    pub login_url: String,

    /// Hosted signup page; defaults to the login page.
    #[arg(long, env = "TODO_AUTH_SIGNUP_URL")]
    pub signup_url: Option<String>,

    #[arg(long, env = "TODO_AUTH_LOGOUT_URL", default_value = "")]
    pub logout_url: String,

    /// ID token obtained from a browser login, sent as the `id_token` cookie.
    #[arg(long, env = "TODO_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// Upper bound for a single request, in milliseconds.
    #[arg(long, env = "TODO_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[arg(long, env = "TODO_PAGE_SIZE", default_value_t = DEFAULT_LIMIT)]
    pub page_size: u32,

    /// Cards shown at once in the task list.
    #[arg(long, default_value_t = 5)]
    pub rows: usize,

    /// `EnvFilter` directive, e.g. `warn` or `todo_core=debug`.
    #[arg(long, env = "TODO_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// text | json | journald
    #[arg(long, env = "TODO_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,
}

impl Cli {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.api_url.clone(),
            login_url: self.login_url.clone(),
            signup_url: self
                .signup_url
                .clone()
                .unwrap_or_else(|| self.login_url.clone()),
            logout_url: self.logout_url.clone(),
            session_token: self.session_token.clone().filter(|t| !t.is_empty()),
            request_timeout_ms: self.timeout_ms,
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            limit: self.page_size,
            call_timeout_ms: self.timeout_ms,
        }
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            ..Default::default()
        }
    }
}
