use thiserror::Error;
use todo_gateway::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The mutation was accepted; only the follow-up list reload failed.
    #[error("task saved, but the list could not be reloaded: {0}")]
    Refresh(#[source] GatewayError),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("task has no identifier")]
    MissingId,
}

impl ControllerError {
    /// Returns `true` if the remote state changed despite the error.
    pub fn mutation_applied(&self) -> bool {
        matches!(self, ControllerError::Refresh(_))
    }

    pub fn gateway(&self) -> Option<&GatewayError> {
        match self {
            ControllerError::Gateway(e) | ControllerError::Refresh(e) => Some(e),
            _ => None,
        }
    }
}
