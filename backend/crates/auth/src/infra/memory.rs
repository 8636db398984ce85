//! In-Memory Repository
//!
//! Implements the same traits as the Postgres repository. Used by tests and
//! by `AUTH_STORE=memory` for running without a database; data is lost on
//! restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    credentials: HashMap<UserId, Credential>,
}

/// Process-local auth repository
#[derive(Clone)]
pub struct InMemoryAuthRepository {
    tables: Arc<RwLock<Tables>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryAuthRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulate the datastore going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    fn ensure_available(&self) -> AuthResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AuthError::ServiceUnavailable(
                "in-memory store is offline".to_string(),
            ))
        }
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User, credential: &Credential) -> AuthResult<()> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;

        // Same guarantee as the unique indexes in Postgres
        let taken = tables
            .users
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if taken || tables.users.contains_key(&user.user_id) {
            return Err(AuthError::DuplicateUser);
        }

        tables.users.insert(user.user_id, user.clone());
        tables.credentials.insert(credential.user_id, credential.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        self.ensure_available()?;
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| &u.email == email))
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| &u.username == username))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&user.user_id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(AuthError::Internal(format!(
                "Update for unknown user {}",
                user.user_id
            ))),
        }
    }
}

impl CredentialRepository for InMemoryAuthRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        self.ensure_available()?;
        Ok(self.tables.read().await.credentials.get(user_id).cloned())
    }
}
