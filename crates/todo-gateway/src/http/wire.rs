use serde::Deserialize;

use todo_model::{Session, Task, TaskPage, TaskQuery};

/// Body of `GET /api/tasks/read`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    /// The service encodes an empty result as `null`.
    #[serde(default)]
    tasks: Option<Vec<Task>>,
    total: usize,
}

impl From<ListResponse> for TaskPage<Task> {
    fn from(resp: ListResponse) -> Self {
        TaskPage {
            items: resp.tasks.unwrap_or_default(),
            total: resp.total,
        }
    }
}

/// Body of `GET /api/users/auth/check`.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthCheckResponse {
    #[serde(rename = "isAuthenticated", default)]
    is_authenticated: bool,
    #[serde(default)]
    user: Option<AuthUser>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    #[serde(default)]
    email: Option<String>,
}

impl From<AuthCheckResponse> for Session {
    fn from(resp: AuthCheckResponse) -> Self {
        if !resp.is_authenticated {
            return Session::anonymous();
        }
        Session::authenticated(resp.user.and_then(|u| u.email))
    }
}

/// Query string of a list request; unset filters are omitted.
pub(crate) fn query_pairs(query: &TaskQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("limit", query.limit.to_string()),
        ("page", query.page.to_string()),
    ];
    if let Some(priority) = query.priority {
        pairs.push(("priority", priority.as_str().to_string()));
    }
    if let Some(status) = query.status {
        pairs.push(("status", status.as_str().to_string()));
    }
    if let Some(sort) = query.sort {
        pairs.push(("sort", sort.as_str().to_string()));
    }
    pairs.push(("order", query.order.as_str().to_string()));
    pairs
}
