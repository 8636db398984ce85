//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    location::{GeoPoint, Location},
    profile_text::{Bio, DisplayName},
    user_password::UserPassword,
    user_role::UserRole,
    user_stats::UserStats,
    username::Username,
};
use crate::error::{AuthError, AuthResult};

const SELECT_USER: &str = r#"
    SELECT
        user_id,
        email,
        username,
        name,
        bio,
        profile_picture,
        location_city,
        location_state,
        location_country,
        location_lon,
        location_lat,
        stories_uploaded,
        stories_read,
        total_listens,
        dialects_contributed,
        total_points,
        leaderboard_rank,
        user_role,
        is_verified,
        is_active,
        join_date,
        last_active,
        created_at,
        updated_at
    FROM users
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_user(&self, filter: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE {filter} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User, credential: &Credential) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        let coordinates = user.location.coordinates;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                username,
                name,
                bio,
                profile_picture,
                location_city,
                location_state,
                location_country,
                location_lon,
                location_lat,
                stories_uploaded,
                stories_read,
                total_listens,
                dialects_contributed,
                total_points,
                leaderboard_rank,
                user_role,
                is_verified,
                is_active,
                join_date,
                last_active,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(user.name.as_str())
        .bind(user.bio.as_str())
        .bind(user.profile_picture.as_deref())
        .bind(user.location.city.as_deref())
        .bind(user.location.state.as_deref())
        .bind(&user.location.country)
        .bind(coordinates.map(|c| c.lon))
        .bind(coordinates.map(|c| c.lat))
        .bind(user.stats.stories_uploaded)
        .bind(user.stats.stories_read)
        .bind(user.stats.total_listens)
        .bind(user.stats.dialects_contributed)
        .bind(user.stats.total_points)
        .bind(user.stats.leaderboard_rank)
        .bind(user.role.id())
        .bind(user.is_verified)
        .bind(user.is_active)
        .bind(user.join_date)
        .bind(user.last_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO auth_credentials (
                user_id,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.fetch_user("email", email.as_str()).await
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let coordinates = user.location.coordinates;

        sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                bio = $3,
                profile_picture = $4,
                location_city = $5,
                location_state = $6,
                location_country = $7,
                location_lon = $8,
                location_lat = $9,
                user_role = $10,
                is_verified = $11,
                is_active = $12,
                last_active = $13,
                updated_at = $14
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.bio.as_str())
        .bind(user.profile_picture.as_deref())
        .bind(user.location.city.as_deref())
        .bind(user.location.state.as_deref())
        .bind(&user.location.country)
        .bind(coordinates.map(|c| c.lon))
        .bind(coordinates.map(|c| c.lat))
        .bind(user.role.id())
        .bind(user.is_verified)
        .bind(user.is_active)
        .bind(user.last_active)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                created_at,
                updated_at
            FROM auth_credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_credential).transpose()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    username: String,
    name: String,
    bio: String,
    profile_picture: Option<String>,
    location_city: Option<String>,
    location_state: Option<String>,
    location_country: String,
    location_lon: Option<f64>,
    location_lat: Option<f64>,
    stories_uploaded: i64,
    stories_read: i64,
    total_listens: i64,
    dialects_contributed: i64,
    total_points: i64,
    leaderboard_rank: Option<i64>,
    user_role: i16,
    is_verified: bool,
    is_active: bool,
    join_date: DateTime<Utc>,
    last_active: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let coordinates = match (self.location_lon, self.location_lat) {
            (Some(lon), Some(lat)) => Some(
                GeoPoint::new(lon, lat)
                    .map_err(|e| AuthError::Internal(format!("Invalid stored location: {}", e)))?,
            ),
            _ => None,
        };

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            username: Username::from_db(self.username),
            name: DisplayName::from_db(self.name),
            bio: Bio::from_db(self.bio),
            profile_picture: self.profile_picture,
            location: Location {
                city: self.location_city,
                state: self.location_state,
                country: self.location_country,
                coordinates,
            },
            stats: UserStats {
                stories_uploaded: self.stories_uploaded,
                stories_read: self.stories_read,
                total_listens: self.total_listens,
                dialects_contributed: self.dialects_contributed,
                total_points: self.total_points,
                leaderboard_rank: self.leaderboard_rank,
            },
            role: UserRole::from_id(self.user_role),
            is_verified: self.is_verified,
            is_active: self.is_active,
            join_date: self.join_date,
            last_active: self.last_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<Credential> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(e.message().to_string()))?;

        Ok(Credential {
            user_id: UserId::from_uuid(self.user_id),
            password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
