//! Navigation targets and the protected-route guard

use tokio::sync::watch;

use crate::model::User;
use crate::state::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Other(String),
}

impl Route {
    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Other(path) => path,
        }
    }
}

/// Where the UI should go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    /// Replace the current history entry instead of pushing
    pub replace: bool,
}

impl Navigation {
    pub fn replace(route: Route) -> Self {
        Self {
            route,
            replace: true,
        }
    }
}

/// What a protected view should do for the current session state
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Show a placeholder; neither content nor redirect yet
    Pending,
    Render(User),
    Redirect(Navigation),
}

impl GuardDecision {
    pub fn for_state(state: &SessionState) -> Self {
        match state {
            SessionState::Loading => GuardDecision::Pending,
            SessionState::Resolved(Some(user)) => GuardDecision::Render(user.clone()),
            SessionState::Resolved(None) | SessionState::Failed => {
                GuardDecision::Redirect(Navigation::replace(Route::Login))
            }
        }
    }
}

/// Watches the session state on behalf of a protected view
pub struct RouteGuard {
    state: watch::Receiver<SessionState>,
}

impl RouteGuard {
    pub fn new(state: watch::Receiver<SessionState>) -> Self {
        Self { state }
    }

    pub fn decision(&self) -> GuardDecision {
        GuardDecision::for_state(&self.state.borrow())
    }

    /// Wait for the state to change and re-evaluate
    ///
    /// Returns `None` once the owning client is gone.
    pub async fn changed(&mut self) -> Option<GuardDecision> {
        self.state.changed().await.ok()?;
        Some(GuardDecision::for_state(&self.state.borrow_and_update()))
    }

    /// Wait until the decision is no longer `Pending`
    pub async fn settled(&mut self) -> GuardDecision {
        match self.state.wait_for(|state| !state.is_loading()).await {
            Ok(state) => GuardDecision::for_state(&state),
            // Client dropped mid-load; nothing will resolve it
            Err(_) => GuardDecision::Redirect(Navigation::replace(Route::Login)),
        }
    }
}
