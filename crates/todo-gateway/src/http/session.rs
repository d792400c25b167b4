use async_trait::async_trait;
use tracing::{debug, warn};

use todo_model::Session;

use super::{HttpGateway, wire::AuthCheckResponse};
use crate::{
    errors::GatewayError,
    handler::SessionGateway,
    redirect::{Redirect, RedirectTarget},
};

#[async_trait]
impl SessionGateway for HttpGateway {
    async fn check_session(&self) -> Result<Session, GatewayError> {
        let url = self.endpoint("api/users/auth/check")?;
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let response = self.check(response).await?;

        let body = self.body(response).await?;
        let check: AuthCheckResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("failed to parse auth check: {e}, body: {body}"))
        })?;

        let session = Session::from(check);
        debug!(authenticated = session.is_authenticated, "session checked");
        Ok(session)
    }

    async fn refresh(&self) -> Result<(), GatewayError> {
        let url = self.endpoint("api/users/refresh")?;
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.check(response).await?;
        debug!("identity token refreshed");
        Ok(())
    }

    fn forget_credentials(&self) {
        match self.clear_cookies() {
            Ok(()) => debug!("session cookies dropped"),
            Err(err) => warn!(error = %err, "failed to drop session cookies"),
        }
    }

    fn redirect_to_login(&self) -> Redirect {
        Redirect::new(RedirectTarget::Login, &self.login_url)
    }

    fn redirect_to_signup(&self) -> Redirect {
        Redirect::new(RedirectTarget::Signup, &self.signup_url)
    }

    fn redirect_to_logout(&self) -> Redirect {
        Redirect::new(RedirectTarget::Logout, &self.logout_url)
    }
}
