//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! auth crate through `kernel::error::AppError`.

mod app;

use auth::{AuthConfig, InMemoryAuthRepository, PgAuthRepository};
use platform::config::Env;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lokswar_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env = Env::system();

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) && env.get("JWT_SECRET").is_none() {
        tracing::warn!("JWT_SECRET not set, using a random development secret");
        AuthConfig::development()
    } else {
        AuthConfig::from_env(&env)?
    };

    let origins = env
        .get("FRONTEND_ORIGINS")
        .unwrap_or_else(|| DEFAULT_ORIGINS.to_string());
    let port: u16 = env.parse_or("PORT", 3000)?;

    // Build router
    let app = match env.get("AUTH_STORE").as_deref() {
        Some("memory") => {
            tracing::warn!("Using in-memory auth store, accounts are lost on restart");
            app::build_app(InMemoryAuthRepository::new(), auth_config, &origins)
        }
        _ => {
            let database_url = env.require("DATABASE_URL")?;

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            app::build_app(PgAuthRepository::new(pool), auth_config, &origins)
        }
    };

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
