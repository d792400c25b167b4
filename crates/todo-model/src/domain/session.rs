/// Authenticated-identity status of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub email: Option<String>,
}

impl Session {
    /// Logged-out session; also what any failed session check resolves to.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(email: Option<String>) -> Self {
        Self {
            is_authenticated: true,
            email,
        }
    }
}
