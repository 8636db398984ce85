//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user together with its credential, atomically
    ///
    /// A unique-constraint violation on email or username yields
    /// `AuthError::DuplicateUser`.
    async fn create(&self, user: &User, credential: &Credential) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by (canonical) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Check if username exists
    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Find credential by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;
}

/// Everything the auth use cases and router need from a store
pub trait AuthStore: UserRepository + CredentialRepository + Clone + Send + Sync + 'static {}

impl<T> AuthStore for T where T: UserRepository + CredentialRepository + Clone + Send + Sync + 'static {}
