//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::register::{LocationInput, RegisterInput};
use crate::domain::entity::user::User;

/// `status` value of every successful response
pub const STATUS_SUCCESS: &str = "Success";

// ============================================================================
// Register
// ============================================================================

/// Register request
///
/// Missing fields deserialize as empty and are rejected by validation, so a
/// partial body yields a field-specific message instead of a parse error.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub location: Option<LocationDto>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        RegisterInput {
            email: req.email,
            password: req.password,
            name: req.name,
            username: req.username,
            bio: req.bio,
            profile_picture: req.profile_picture,
            location: req.location.map(LocationInput::from),
        }
    }
}

/// Location in requests and responses; `coordinates` is `[lon, lat]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub coordinates: Option<[f64; 2]>,
}

impl From<LocationDto> for LocationInput {
    fn from(dto: LocationDto) -> Self {
        LocationInput {
            city: dto.city,
            state: dto.state,
            country: dto.country,
            coordinates: dto.coordinates,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// Register and login response; the token is also set as a cookie
#[derive(Debug, Clone, Serialize)]
pub struct AuthSuccessResponse {
    pub status: &'static str,
    pub token: String,
    pub user: UserResponse,
}

/// Logout response
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Current user response
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub status: &'static str,
    pub user: UserResponse,
}

/// Public view of a user; there is deliberately no password field
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub profile_picture: Option<String>,
    pub location: LocationDto,
    pub stats: StatsResponse,
    pub role: &'static str,
    pub is_verified: bool,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stories_uploaded: i64,
    pub stories_read: i64,
    pub total_listens: i64,
    pub dialects_contributed: i64,
    pub total_points: i64,
    pub leaderboard_rank: Option<i64>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.to_string(),
            username: user.username.to_string(),
            name: user.name.to_string(),
            bio: user.bio.as_str().to_string(),
            profile_picture: user.profile_picture.clone(),
            location: LocationDto {
                city: user.location.city.clone(),
                state: user.location.state.clone(),
                country: Some(user.location.country.clone()),
                coordinates: user.location.coordinates.map(|c| [c.lon, c.lat]),
            },
            stats: StatsResponse {
                stories_uploaded: user.stats.stories_uploaded,
                stories_read: user.stats.stories_read,
                total_listens: user.stats.total_listens,
                dialects_contributed: user.stats.dialects_contributed,
                total_points: user.stats.total_points,
                leaderboard_rank: user.stats.leaderboard_rank,
            },
            role: user.role.code(),
            is_verified: user.is_verified,
            is_active: user.is_active,
            join_date: user.join_date,
            last_active: user.last_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
