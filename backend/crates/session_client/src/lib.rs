//! LokSwar Session Client
//!
//! Client side of the token session protocol:
//! - `store` - where the issued token lives between runs
//! - `client` - HTTP calls with bearer attachment and 401 handling
//! - `state` - the cached current user, observable through `tokio::sync::watch`
//! - `guard` - gating of protected views on that state
//!
//! ```rust,ignore
//! let client = SessionClient::new("http://localhost:3000/auth", FileTokenStore::new(path))?;
//! let nav = client.login("a@x.com", "secret1").await?;
//! let mut guard = client.guard();
//! match guard.settled().await {
//!     GuardDecision::Render(user) => println!("hello {}", user.name),
//!     _ => {}
//! }
//! ```

pub mod client;
pub mod error;
pub mod guard;
pub mod model;
pub mod state;
pub mod store;

pub use client::SessionClient;
pub use error::{ClientError, ClientResult};
pub use guard::{GuardDecision, Navigation, Route, RouteGuard};
pub use model::{LoginRequest, RegisterRequest, User};
pub use state::SessionState;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
