use async_trait::async_trait;
use todo_model::{Session, Task, TaskDraft, TaskId, TaskPage, TaskQuery};

use crate::{errors::GatewayError, redirect::Redirect};

/// Remote task API.
///
/// Every call is single-shot: no retries, no partial success. Credentials
/// travel implicitly with the implementation (cookies), never as arguments.
#[async_trait]
pub trait TaskGateway: Send + Sync + 'static {
    /// Read one page of tasks matching the query's filters, in server order.
    async fn list(&self, query: &TaskQuery) -> Result<TaskPage<Task>, GatewayError>;

    /// Persist a new task.
    ///
    /// Returns `None` when the service answers without a usable body.
    async fn create(&self, draft: &TaskDraft) -> Result<Option<Task>, GatewayError>;

    /// Replace the fields of an existing task.
    ///
    /// Returns `None` when the service answers without a usable body.
    async fn update(&self, id: &TaskId, draft: &TaskDraft) -> Result<Option<Task>, GatewayError>;

    async fn delete(&self, id: &TaskId) -> Result<(), GatewayError>;

    /// Liveness probe of the task service.
    async fn health(&self) -> Result<(), GatewayError>;
}

/// Identity service as seen by the client.
#[async_trait]
pub trait SessionGateway: Send + Sync + 'static {
    async fn check_session(&self) -> Result<Session, GatewayError>;

    /// Exchange the refresh cookie for a new ID token.
    async fn refresh(&self) -> Result<(), GatewayError>;

    /// Discard locally held identity and refresh tokens so neither a later
    /// check nor a renewal picks the old session back up.
    fn forget_credentials(&self);

    fn redirect_to_login(&self) -> Redirect;
    fn redirect_to_signup(&self) -> Redirect;
    fn redirect_to_logout(&self) -> Redirect;
}
