use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use reqwest::{Response, Url, cookie::Jar};
use tracing::warn;

use todo_model::{Task, TaskQuery};

use crate::{
    config::{GatewayConfig, ID_TOKEN_COOKIE},
    errors::GatewayError,
};

mod session;
mod tasks;
mod wire;

/// reqwest-backed implementation of both gateways.
///
/// One client and one cookie jar are shared by the task and user APIs, the
/// way a browser tab shares its cookies between them. Forgetting the
/// credentials swaps in a client with an empty jar.
pub struct HttpGateway {
    client: RwLock<reqwest::Client>,
    base: Url,
    timeout: Duration,
    login_url: String,
    signup_url: String,
    logout_url: String,
}

impl HttpGateway {
    pub fn new(cfg: &GatewayConfig) -> Result<Self, GatewayError> {
        let base = parse_base(&cfg.base_url)?;
        let timeout = Duration::from_millis(cfg.request_timeout_ms);

        let jar = Arc::new(Jar::default());
        if let Some(token) = &cfg.session_token {
            jar.add_cookie_str(&format!("{ID_TOKEN_COOKIE}={token}; Path=/"), &base);
        }

        let client = build_client(jar, timeout)?;

        Ok(Self {
            client: RwLock::new(client),
            base,
            timeout,
            login_url: cfg.login_url.clone(),
            signup_url: cfg.signup_url.clone(),
            logout_url: cfg.logout_url.clone(),
        })
    }

    fn client(&self) -> reqwest::Client {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop every cookie, including the identity and refresh tokens.
    pub(crate) fn clear_cookies(&self) -> Result<(), GatewayError> {
        let client = build_client(Arc::new(Jar::default()), self.timeout)?;
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = client;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path)
            .map_err(|e| GatewayError::InvalidConfig(format!("endpoint '{path}': {e}")))
    }

    /// Endpoint with the task identifier appended as an escaped path segment.
    fn task_endpoint(&self, path: &str, id: &str) -> Result<Url, GatewayError> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::InvalidConfig(format!("base url cannot carry paths: {}", self.base))
            })?
            .push(id);
        Ok(url)
    }

    fn list_url(&self, query: &TaskQuery) -> Result<Url, GatewayError> {
        let mut url = self.endpoint("api/tasks/read")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in wire::query_pairs(query) {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }

    /// Turn a non-2xx response into [`GatewayError::Server`].
    async fn check(&self, response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::server(status.as_u16(), message.trim()))
    }

    async fn body(&self, response: Response) -> Result<String, GatewayError> {
        response.text().await.map_err(|e| self.classify(e))
    }

    /// Decode a mutation response that may legitimately be empty.
    async fn optional_task(&self, response: Response) -> Result<Option<Task>, GatewayError> {
        let body = self.body(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Task>(&body) {
            Ok(task) => Ok(Some(task)),
            Err(e) => {
                warn!(error = %e, "mutation accepted but response body is not a task");
                Ok(None)
            }
        }
    }
}

fn build_client(jar: Arc<Jar>, timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .cookie_provider(jar)
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::InvalidConfig(format!("http client: {e}")))
}

fn parse_base(raw: &str) -> Result<Url, GatewayError> {
    let mut base =
        Url::parse(raw).map_err(|e| GatewayError::InvalidConfig(format!("base url '{raw}': {e}")))?;
    if base.cannot_be_a_base() {
        return Err(GatewayError::InvalidConfig(format!(
            "base url '{raw}' cannot carry paths"
        )));
    }
    // Relative joins keep any path prefix only when the base ends with '/'.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}
