//! Auth Middleware
//!
//! Resolves the caller on protected routes and exposes them to handlers as
//! [`CurrentUser`].

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::{extract_bearer_token, extract_cookie};

use crate::application::AuthenticateUseCase;
use crate::domain::entity::user::User;
use crate::domain::repository::AuthStore;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// The authenticated caller, inserted into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)
    }
}

/// Token presented with a request: `Authorization: Bearer` wins over the cookie
pub fn presented_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    extract_bearer_token(headers).or_else(|| extract_cookie(headers, cookie_name))
}

/// Middleware that requires a valid session token
///
/// ```rust,ignore
/// Router::new()
///     .route("/stories", post(upload))
///     .route_layer(from_fn_with_state(state.clone(), require_auth::<R>))
/// ```
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AuthStore,
{
    let token = presented_token(req.headers(), &state.config.cookie_name);

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.execute(token.as_deref()).await?;

    tracing::debug!(user_id = %user.user_id, "Request authenticated");

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
