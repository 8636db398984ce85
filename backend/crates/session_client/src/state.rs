//! Cached session state

use crate::model::User;

/// What the client currently knows about the signed-in user
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Not resolved yet, or a lookup is in flight
    #[default]
    Loading,
    /// Resolved: `Some` when signed in, `None` when not
    Resolved(Option<User>),
    /// The lookup failed for a reason other than authorization
    Failed,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Resolved(Some(user)) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}
