//! Router assembly shared by every store backend

use auth::{AuthConfig, AuthStore, auth_router};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

/// Browser origins allowed to call the API with credentials
pub fn cors_layer(origins: &str) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

pub fn build_app<R>(repo: R, auth_config: AuthConfig, origins: &str) -> Router
where
    R: AuthStore,
{
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/auth", auth_router(repo, auth_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(origins))
}
