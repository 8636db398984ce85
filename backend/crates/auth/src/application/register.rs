//! Register Use Case
//!
//! Creates a new contributor account and issues its first session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::entity::{
    credential::Credential,
    user::{ProfileDetails, User},
};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{
    email::Email,
    location::{GeoPoint, Location},
    profile_text::{Bio, DisplayName},
    user_password::{RawPassword, UserPassword},
    username::Username,
};
use crate::error::{AuthError, AuthResult};

/// Location as submitted by the client
#[derive(Debug, Clone, Default)]
pub struct LocationInput {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    /// `[lon, lat]`
    pub coordinates: Option<[f64; 2]>,
}

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub location: Option<LocationInput>,
}

/// Register output
pub struct RegisterOutput {
    pub user: User,
    pub session: IssuedSession,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AuthStore,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    sessions: SessionIssuer,
}

impl<R> RegisterUseCase<R>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email =
            Email::new(&input.email).map_err(|e| AuthError::InvalidEmail(e.message().to_string()))?;
        let username =
            Username::new(&input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        let name = DisplayName::new(&input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let profile = Self::profile_details(input.bio, input.profile_picture, input.location)?;
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        if self.repo.exists_by_email(&email).await? {
            tracing::warn!(email = %email, "Registration with existing email");
            return Err(AuthError::DuplicateUser);
        }
        if self.repo.exists_by_username(&username).await? {
            tracing::warn!(username = %username, "Registration with existing username");
            return Err(AuthError::DuplicateUser);
        }

        let pepper = self.config.password_pepper.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&raw_password, pepper.as_deref())
        })
        .await?
        .map_err(|e| AuthError::Internal(e.message().to_string()))?;

        let user = User::new(email, username, name, profile);
        let credential = Credential::new(user.user_id, password_hash);

        // Unique indexes catch a concurrent registration that passed the checks above
        self.repo.create(&user, &credential).await?;

        let session = self.sessions.issue(user.user_id);

        tracing::info!(
            user_id = %user.user_id,
            username = %user.username,
            "User registered"
        );

        Ok(RegisterOutput { user, session })
    }

    fn profile_details(
        bio: Option<String>,
        profile_picture: Option<String>,
        location: Option<LocationInput>,
    ) -> AuthResult<ProfileDetails> {
        let bio = match bio {
            Some(bio) => Bio::new(bio).map_err(|e| AuthError::Validation(e.to_string()))?,
            None => Bio::default(),
        };

        let profile_picture = profile_picture
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let location = match location {
            None => Location::default(),
            Some(loc) => {
                let coordinates = loc
                    .coordinates
                    .map(|[lon, lat]| GeoPoint::new(lon, lat))
                    .transpose()
                    .map_err(|e| AuthError::Validation(e.to_string()))?;
                Location::new(loc.city, loc.state, loc.country, coordinates)
                    .map_err(|e| AuthError::Validation(e.to_string()))?
            }
        };

        Ok(ProfileDetails {
            bio,
            profile_picture,
            location,
        })
    }
}
