/// Name of the cookie the identity service stores the ID token in.
pub const ID_TOKEN_COOKIE: &str = "id_token";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Origin serving both `/api/tasks/*` and `/api/users/*`.
    pub base_url: String,
    /// Hosted login page of the identity service.
    pub login_url: String,
    /// Hosted signup page; usually the same as `login_url`.
    pub signup_url: String,
    /// Logout endpoint of the identity service.
    pub logout_url: String,
    /// Pre-issued ID token sent as the `id_token` cookie.
    ///
    /// Stands in for the cookie a browser would hold after the login redirect.
    pub session_token: Option<String>,
    /// Per-request timeout enforced by the HTTP client.
    pub request_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            login_url: String::new(),
            signup_url: String::new(),
            logout_url: String::new(),
            session_token: None,
            request_timeout_ms: 10_000,
        }
    }
}
