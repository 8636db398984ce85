//! Authenticate Use Case
//!
//! Resolves the token presented with a request to the user it belongs to.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::session::SessionIssuer;
use crate::domain::entity::user::User;
use crate::domain::repository::AuthStore;
use crate::error::{AuthError, AuthResult};

/// Authenticate use case
pub struct AuthenticateUseCase<R>
where
    R: AuthStore,
{
    repo: Arc<R>,
    sessions: SessionIssuer,
}

impl<R> AuthenticateUseCase<R>
where
    R: AuthStore,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            sessions: SessionIssuer::new(config),
        }
    }

    pub async fn execute(&self, token: Option<&str>) -> AuthResult<User> {
        self.execute_at(token, Utc::now()).await
    }

    pub async fn execute_at(&self, token: Option<&str>, now: DateTime<Utc>) -> AuthResult<User> {
        let user_id = self.sessions.verify_at(token, now)?;

        // Lookup failures keep their own class: an outage is 503, a bad row is 500
        let user = self.repo.find_by_id(&user_id).await?;

        user.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Valid token for missing user");
            AuthError::UserGone
        })
    }
}
