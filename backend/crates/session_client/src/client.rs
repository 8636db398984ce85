//! HTTP client for the auth endpoints
//!
//! Every request carries the stored token as a bearer header. Any 401 drops
//! the stored token and resolves the cached state to "signed out".

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::guard::{Navigation, Route, RouteGuard};
use crate::model::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, User};
use crate::state::SessionState;
use crate::store::TokenStore;

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Session-aware client for one auth base URL (e.g. `http://host/auth`)
///
/// Clones share the token store and the cached state.
pub struct SessionClient<S: TokenStore> {
    http: Client,
    base_url: String,
    store: Arc<S>,
    state: Arc<watch::Sender<SessionState>>,
}

impl<S: TokenStore> Clone for SessionClient<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            store: self.store.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S: TokenStore> SessionClient<S> {
    pub fn new(base_url: &str, store: S) -> ClientResult<Self> {
        let parsed =
            Url::parse(base_url).map_err(|e| ClientError::Config(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let (state, _) = watch::channel(SessionState::Loading);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store: Arc::new(store),
            state: Arc::new(state),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Snapshot of the cached state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Guard for a protected view, following this client's state
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.subscribe())
    }

    /// The stored token, if any
    pub fn token(&self) -> ClientResult<Option<String>> {
        self.store.load()
    }

    fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    /// Drop the stored token and mark the session as signed out
    fn forget_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.set_state(SessionState::Resolved(None));
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = match self.store.load()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            debug!("Server answered 401, dropping stored session");
            self.forget_session();
        }
        Err(ClientError::from_status(status, &body))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Store the issued token and cache the user
    fn establish(&self, auth: AuthResponse) -> ClientResult<User> {
        self.store.save(&auth.token)?;
        self.set_state(SessionState::Resolved(Some(auth.user.clone())));
        Ok(auth.user)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Create an account and sign in; navigate home on success
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Navigation> {
        let response = self
            .send(self.http.post(self.url("/register")).json(request))
            .await?;
        let user = self.establish(Self::parse(response).await?)?;

        info!(username = %user.username, "Registered and signed in");
        Ok(Navigation::replace(Route::Home))
    }

    /// Sign in; navigate home on success
    ///
    /// A rejected password surfaces as [`ClientError::Api`] whose message can be
    /// shown on the form.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Navigation> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .send(self.http.post(self.url("/login")).json(&request))
            .await?;
        let user = self.establish(Self::parse(response).await?)?;

        info!(username = %user.username, "Signed in");
        Ok(Navigation::replace(Route::Home))
    }

    /// Sign out; navigate to the login view
    ///
    /// Local state is cleared even when the server cannot be reached.
    pub async fn logout(&self) -> ClientResult<Navigation> {
        if let Err(e) = self.send(self.http.get(self.url("/logout"))).await {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }

        self.set_state(SessionState::Resolved(None));
        self.store.clear()?;

        info!("Signed out");
        Ok(Navigation::replace(Route::Login))
    }

    /// The signed-in user, served from cache once resolved
    pub async fn current_user(&self) -> ClientResult<Option<User>> {
        let cached = match &*self.state.borrow() {
            SessionState::Resolved(user) => Some(user.clone()),
            _ => None,
        };
        if let Some(user) = cached {
            return Ok(user);
        }
        self.fetch_current_user().await
    }

    /// Re-query the server regardless of the cache
    pub async fn refresh(&self) -> ClientResult<Option<User>> {
        self.fetch_current_user().await
    }

    async fn fetch_current_user(&self) -> ClientResult<Option<User>> {
        if self.store.load()?.is_none() {
            self.set_state(SessionState::Resolved(None));
            return Ok(None);
        }

        self.set_state(SessionState::Loading);
        let result = match self.send(self.http.get(self.url("/me"))).await {
            Ok(response) => Self::parse::<MeResponse>(response).await.map(|me| Some(me.user)),
            Err(ClientError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                self.set_state(SessionState::Resolved(user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Failed to resolve current user");
                self.set_state(SessionState::Failed);
                Err(e)
            }
        }
    }
}
