//! Session Issuance
//!
//! Signs session tokens for a user and turns a presented token back into
//! the user id it was issued for.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::application::config::{AuthConfig, LOGOUT_SENTINEL};
use crate::domain::value_object::session_token::{SessionToken, TokenClaims, TokenError};
use crate::error::{AuthError, AuthResult};

/// A freshly issued session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionIssuer {
    config: Arc<AuthConfig>,
}

impl SessionIssuer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub fn issue(&self, user_id: UserId) -> IssuedSession {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token whose lifetime starts at `now`
    ///
    /// Token times have whole-second resolution.
    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> IssuedSession {
        let iat = now.timestamp();
        let ttl = i64::try_from(self.config.token_ttl.as_secs()).unwrap_or(i64::MAX);
        let exp = iat.saturating_add(ttl);

        let claims = TokenClaims {
            sub: user_id,
            iat,
            exp,
        };
        let token = SessionToken::sign(&claims, self.config.token_secret.as_bytes());

        IssuedSession {
            token,
            expires_at: DateTime::<Utc>::from_timestamp(exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Resolve a candidate token to the user id it was issued for
    ///
    /// No token and the logout sentinel both mean "not logged in"; anything
    /// else that fails verification is an invalid token.
    pub fn verify_at(&self, candidate: Option<&str>, now: DateTime<Utc>) -> AuthResult<UserId> {
        let token = match candidate.map(str::trim) {
            None | Some("") | Some(LOGOUT_SENTINEL) => return Err(AuthError::NotAuthenticated),
            Some(token) => token,
        };

        let claims = SessionToken::verify(token, self.config.token_secret.as_bytes(), now.timestamp())
            .map_err(|e| {
                match e {
                    TokenError::Expired => tracing::debug!("Session token expired"),
                    other => tracing::debug!(reason = %other, "Session token rejected"),
                }
                AuthError::InvalidToken
            })?;

        Ok(claims.sub)
    }
}
