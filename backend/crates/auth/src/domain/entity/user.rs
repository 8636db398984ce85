//! User Entity
//!
//! Contributor identity and profile. The password hash lives in
//! [`Credential`](super::credential::Credential), never here.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email,
    location::Location,
    profile_text::{Bio, DisplayName},
    user_role::UserRole,
    user_stats::UserStats,
    username::Username,
};

/// Optional profile fields supplied at registration
#[derive(Debug, Clone, Default)]
pub struct ProfileDetails {
    pub bio: Bio,
    pub profile_picture: Option<String>,
    pub location: Location,
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Token subject
    pub user_id: UserId,
    /// Unique, lower-cased
    pub email: Email,
    /// Unique, lower-cased
    pub username: Username,
    pub name: DisplayName,
    pub bio: Bio,
    pub profile_picture: Option<String>,
    pub location: Location,
    pub stats: UserStats,
    pub role: UserRole,
    pub is_verified: bool,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
    /// Refreshed on every successful login
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with default role, flags and zeroed stats
    pub fn new(
        email: Email,
        username: Username,
        name: DisplayName,
        profile: ProfileDetails,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            username,
            name,
            bio: profile.bio,
            profile_picture: profile.profile_picture,
            location: profile.location,
            stats: UserStats::default(),
            role: UserRole::default(),
            is_verified: false,
            is_active: true,
            join_date: now,
            last_active: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        self.record_login_at(Utc::now());
    }

    pub fn record_login_at(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
        self.updated_at = now;
    }
}
