//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::{AuthConfig, LOGOUT_SENTINEL};
use crate::application::{IssuedSession, LoginInput, LoginUseCase, RegisterUseCase};
use crate::domain::entity::user::User;
use crate::domain::repository::AuthStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthSuccessResponse, LoginRequest, LogoutResponse, MeResponse, RegisterRequest,
    STATUS_SUCCESS, UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// 200 with the session cookie and `{status, token, user}`
fn session_response(config: &AuthConfig, session: IssuedSession, user: &User) -> Response {
    let cookie = config.session_cookie().build_set_cookie(session.token.as_str());

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthSuccessResponse {
            status: STATUS_SUCCESS,
            token: session.token.into_string(),
            user: UserResponse::from(user),
        }),
    )
        .into_response()
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    R: AuthStore,
{
    let Json(req) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(req.into()).await?;

    Ok(session_response(&state.config, output.session, &output.user))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    R: AuthStore,
{
    // A body that is not a JSON object carries no credentials
    let Json(req) = payload.map_err(|_| AuthError::MissingCredentials)?;

    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(session_response(&state.config, output.session, &output.user))
}

// ============================================================================
// Logout
// ============================================================================

/// GET /auth/logout
///
/// Always succeeds. The presented token is not inspected; the cookie is
/// overwritten with a short-lived sentinel.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: AuthStore,
{
    let cookie = state.config.logout_cookie().build_set_cookie(LOGOUT_SENTINEL);

    tracing::info!("User logged out");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse {
            status: STATUS_SUCCESS,
            message: "Logged out successfully",
        }),
    )
}

// ============================================================================
// Current User
// ============================================================================

/// GET /auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        status: STATUS_SUCCESS,
        user: UserResponse::from(&user),
    })
}
