//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the Auth router for any repository implementation
///
/// Mount under `/auth`.
pub fn auth_router<R>(repo: R, config: AuthConfig) -> Router
where
    R: AuthStore,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(from_fn_with_state(state.clone(), require_auth::<R>))
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", get(handlers::logout::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryAuthRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(repo: InMemoryAuthRepository) -> Router {
        Router::new().nest("/auth", auth_router(repo, AuthConfig::development()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with(uri: &str, header_pair: Option<(header::HeaderName, String)>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some((name, value)) = header_pair {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(response: &Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Set-Cookie header")
            .to_str()
            .unwrap()
            .to_string()
    }

    fn registration() -> Value {
        json!({
            "email": "a@x.com",
            "password": "secret1",
            "name": "A",
            "username": "a1"
        })
    }

    #[tokio::test]
    async fn test_register_sets_cookie_and_returns_token() {
        let app = app(InMemoryAuthRepository::new());

        let response = app
            .oneshot(post_json("/auth/register", registration()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("jwt="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=7776000"));

        let body = json_body(response).await;
        assert_eq!(body["status"], "Success");
        assert_eq!(body["user"]["email"], "a@x.com");
        assert!(body["user"].get("password").is_none());
        let token = body["token"].as_str().unwrap();
        assert!(cookie.starts_with(&format!("jwt={token}")));
    }

    #[tokio::test]
    async fn test_register_with_far_future_cookie() {
        let config = AuthConfig {
            cookie_ttl: std::time::Duration::from_secs(100_000_000 * 86_400),
            ..AuthConfig::development()
        };
        let app = Router::new().nest("/auth", auth_router(InMemoryAuthRepository::new(), config));

        let response = app
            .oneshot(post_json("/auth/register", registration()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).contains("Max-Age=8640000000000"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_400() {
        let repo = InMemoryAuthRepository::new();
        let app = app(repo.clone());

        let first = app
            .clone()
            .oneshot(post_json("/auth/register", registration()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(post_json("/auth/register", registration()))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body = json_body(second).await;
        assert_eq!(body["code"], "DUPLICATE_USER");
        assert_eq!(repo.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let app = app(InMemoryAuthRepository::new());
        let mut body = registration();
        body["email"] = json!("not-an-email");

        let response = app.oneshot(post_json("/auth/register", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_EMAIL");
    }

    #[tokio::test]
    async fn test_login_and_me_with_bearer() {
        let app = app(InMemoryAuthRepository::new());
        app.clone()
            .oneshot(post_json("/auth/register", registration()))
            .await
            .unwrap();

        let login = app
            .clone()
            .oneshot(post_json(
                "/auth/login",
                json!({"email": "A@X.com", "password": "secret1"}),
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let token = json_body(login).await["token"].as_str().unwrap().to_string();

        let me = app
            .oneshot(get_with(
                "/auth/me",
                Some((header::AUTHORIZATION, format!("Bearer {token}"))),
            ))
            .await
            .unwrap();
        assert_eq!(me.status(), StatusCode::OK);
        let body = json_body(me).await;
        assert_eq!(body["status"], "Success");
        assert_eq!(body["user"]["username"], "a1");
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let app = app(InMemoryAuthRepository::new());
        app.clone()
            .oneshot(post_json("/auth/register", registration()))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(post_json(
                "/auth/login",
                json!({"email": "a@x.com", "password": "secret2"}),
            ))
            .await
            .unwrap();
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());
        let wrong_password = json_body(wrong_password).await;

        let unknown = app
            .oneshot(post_json(
                "/auth/login",
                json!({"email": "nobody@x.com", "password": "secret1"}),
            ))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        let unknown = json_body(unknown).await;

        assert_eq!(wrong_password["code"], "INVALID_CREDENTIALS");
        assert_eq!(wrong_password["code"], unknown["code"]);
        assert_eq!(wrong_password["detail"], unknown["detail"]);
        assert!(wrong_password.get("token").is_none());
    }

    #[tokio::test]
    async fn test_login_missing_credentials() {
        let app = app(InMemoryAuthRepository::new());

        let response = app
            .clone()
            .oneshot(post_json("/auth/login", json!({"email": "a@x.com"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "MISSING_CREDENTIALS");

        let not_json = Request::post("/auth/login").body(Body::from("email=a")).unwrap();
        let response = app.oneshot(not_json).await.unwrap();
        assert_eq!(json_body(response).await["code"], "MISSING_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_me_without_token() {
        let app = app(InMemoryAuthRepository::new());
        let response = app.oneshot(get_with("/auth/me", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "NOT_AUTHENTICATED");
    }

    #[tokio::test]
    async fn test_me_with_garbage_token() {
        let app = app(InMemoryAuthRepository::new());
        let response = app
            .oneshot(get_with(
                "/auth/me",
                Some((header::COOKIE, "jwt=abc.def.ghi".to_string())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_logout_always_succeeds_and_is_idempotent() {
        let app = app(InMemoryAuthRepository::new());

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(get_with("/auth/logout", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let cookie = set_cookie(&response);
            assert!(cookie.starts_with("jwt=loggedOut"));
            assert!(cookie.contains("Max-Age=10"));

            let body = json_body(response).await;
            assert_eq!(body["status"], "Success");
            assert_eq!(body["message"], "Logged out successfully");
        }
    }

    #[tokio::test]
    async fn test_sentinel_cookie_is_not_authenticated() {
        let app = app(InMemoryAuthRepository::new());
        let response = app
            .oneshot(get_with(
                "/auth/me",
                Some((header::COOKIE, "jwt=loggedOut".to_string())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "NOT_AUTHENTICATED");
    }

    #[tokio::test]
    async fn test_me_when_store_is_down() {
        let repo = InMemoryAuthRepository::new();
        let app = app(repo.clone());

        let register = app
            .clone()
            .oneshot(post_json("/auth/register", registration()))
            .await
            .unwrap();
        let token = json_body(register).await["token"].as_str().unwrap().to_string();

        repo.set_available(false);
        let response = app
            .oneshot(get_with(
                "/auth/me",
                Some((header::COOKIE, format!("jwt={token}"))),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["code"], "SERVICE_UNAVAILABLE");
    }
}
