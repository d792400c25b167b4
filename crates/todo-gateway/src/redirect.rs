/// Identity-service page a redirect leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Signup,
    Logout,
}

/// Full navigation away from the application.
///
/// The URL is configuration supplied and passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: RedirectTarget,
    pub url: String,
}

impl Redirect {
    pub fn new(target: RedirectTarget, url: impl Into<String>) -> Self {
        Self {
            target,
            url: url.into(),
        }
    }
}
