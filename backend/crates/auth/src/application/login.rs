//! Login Use Case
//!
//! Verifies email and password and issues a session.

use std::sync::{Arc, LazyLock};

use crate::application::config::AuthConfig;
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::entity::user::User;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Hash checked when no account matches, so unknown emails cost as much as
/// wrong passwords
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<UserPassword>> = LazyLock::new(|| {
    UserPassword::from_raw(&RawPassword::attempt("unknown-account".to_string()), None).ok()
});

/// Login input; either field may be absent in the request
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub session: IssuedSession,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AuthStore,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    sessions: SessionIssuer,
}

impl<R> LoginUseCase<R>
where
    R: AuthStore,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        let sessions = SessionIssuer::new(config.clone());
        Self {
            repo,
            config,
            sessions,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = input.email.filter(|e| !e.trim().is_empty());
        let password = input.password.filter(|p| !p.trim().is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthError::MissingCredentials);
        };

        let found = match Email::new(&email) {
            Ok(email) => self.repo.find_by_email(&email).await?,
            // An address that cannot be registered cannot match an account
            Err(_) => None,
        };
        let Some(mut user) = found else {
            self.verify_unknown_account(password).await?;
            return Err(AuthError::UserNotFound);
        };

        let credential = self
            .repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal(format!("No credential for user {}", user.user_id)))?;

        let pepper = self.config.password_pepper.clone();
        let password_hash = credential.password_hash;
        let valid = tokio::task::spawn_blocking(move || {
            password_hash.verify(&RawPassword::attempt(password), pepper.as_deref())
        })
        .await?;

        if !valid {
            return Err(AuthError::InvalidPassword);
        }

        user.record_login();
        self.repo.update(&user).await?;

        let session = self.sessions.issue(user.user_id);

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput { user, session })
    }

    async fn verify_unknown_account(&self, password: String) -> AuthResult<()> {
        let pepper = self.config.password_pepper.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_ref() {
                hash.verify(&RawPassword::attempt(password), pepper.as_deref());
            }
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{AuthenticateUseCase, RegisterInput, RegisterUseCase};
    use crate::domain::repository::UserRepository;
    use crate::infra::memory::InMemoryAuthRepository;

    async fn registered() -> (Arc<InMemoryAuthRepository>, Arc<AuthConfig>, User) {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());
        let output = RegisterUseCase::new(repo.clone(), config.clone())
            .execute(RegisterInput {
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
                name: "A".to_string(),
                username: "a1".to_string(),
                bio: None,
                profile_picture: None,
                location: None,
            })
            .await
            .unwrap();
        (repo, config, output.user)
    }

    fn credentials(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let (repo, config, registered) = registered().await;

        let output = LoginUseCase::new(repo.clone(), config.clone())
            .execute(credentials(" A@x.COM ", "secret1"))
            .await
            .unwrap();
        assert_eq!(output.user.user_id, registered.user_id);

        let user = AuthenticateUseCase::new(repo, config)
            .execute(Some(output.session.token.as_str()))
            .await
            .unwrap();
        assert_eq!(user.user_id, registered.user_id);
    }

    #[tokio::test]
    async fn test_login_refreshes_last_active() {
        let (repo, config, registered) = registered().await;

        LoginUseCase::new(repo.clone(), config)
            .execute(credentials("a@x.com", "secret1"))
            .await
            .unwrap();

        let stored = repo.find_by_id(&registered.user_id).await.unwrap().unwrap();
        assert!(stored.last_active >= registered.last_active);
        assert_eq!(stored.join_date, registered.join_date);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (repo, config, _) = registered().await;

        let result = LoginUseCase::new(repo, config)
            .execute(credentials("a@x.com", "secret2"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidPassword)));
    }

    #[tokio::test]
    async fn test_unknown_email_creates_nothing() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());

        let result = LoginUseCase::new(repo.clone(), config)
            .execute(credentials("nobody@x.com", "secret1"))
            .await;

        assert!(matches!(result, Err(AuthError::UserNotFound)));
        assert_eq!(repo.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_email_does_hashing_work() {
        let (repo, config, _) = registered().await;
        let use_case = LoginUseCase::new(repo, config);
        assert!(
            UNKNOWN_ACCOUNT_HASH
                .as_ref()
                .unwrap()
                .as_phc_string()
                .starts_with("$argon2id$")
        );

        let started = std::time::Instant::now();
        let _ = use_case.execute(credentials("a@x.com", "secret2")).await;
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        let unknown = use_case.execute(credentials("nobody@x.com", "secret2")).await;
        let unknown_email = started.elapsed();

        assert!(matches!(unknown, Err(AuthError::UserNotFound)));
        assert!(unknown_email * 4 >= wrong_password);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let (repo, config, _) = registered().await;
        let use_case = LoginUseCase::new(repo, config);

        for input in [
            LoginInput {
                email: None,
                password: Some("secret1".to_string()),
            },
            LoginInput {
                email: Some("a@x.com".to_string()),
                password: None,
            },
            credentials("   ", "secret1"),
            credentials("a@x.com", ""),
        ] {
            assert!(matches!(
                use_case.execute(input).await,
                Err(AuthError::MissingCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_malformed_email_is_unknown_user() {
        let (repo, config, _) = registered().await;

        let result = LoginUseCase::new(repo, config)
            .execute(credentials("not-an-email", "secret1"))
            .await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_store_down() {
        let (repo, config, _) = registered().await;
        repo.set_available(false);

        let result = LoginUseCase::new(repo, config)
            .execute(credentials("a@x.com", "secret1"))
            .await;
        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
    }
}
