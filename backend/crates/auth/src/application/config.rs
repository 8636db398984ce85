//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared as `Arc<AuthConfig>`; nothing here is global.

use std::fmt;
use std::time::Duration;

use platform::config::{ConfigError, Env};
use platform::cookie::CookieConfig;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Cookie value written on logout; never a valid token
pub const LOGOUT_SENTINEL: &str = "loggedOut";

const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Upper bound for token and cookie lifetimes (ten years)
pub const MAX_LIFETIME_DAYS: u64 = 3650;

/// HMAC signing secret for session tokens
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct TokenSecret(Vec<u8>);

impl TokenSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET".to_string(),
                reason: format!("must be at least {MIN_SECRET_LENGTH} bytes"),
            });
        }
        Ok(Self(bytes))
    }

    pub fn random() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; MIN_SECRET_LENGTH];
        rand::rng().fill_bytes(&mut secret);
        Self(secret)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret([REDACTED])")
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub cookie_name: String,
    /// Token signing secret
    pub token_secret: TokenSecret,
    /// Lifetime embedded in issued tokens
    pub token_ttl: Duration,
    /// Lifetime of the session cookie
    pub cookie_ttl: Duration,
    /// How long the logout sentinel cookie lives
    pub logout_cookie_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "jwt".to_string(),
            token_secret: TokenSecret::random(),
            token_ttl: Duration::from_secs(90 * SECONDS_PER_DAY),
            cookie_ttl: Duration::from_secs(90 * SECONDS_PER_DAY),
            logout_cookie_ttl: Duration::from_secs(10),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config for development (random secret, insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::default()
        }
    }

    /// Load from environment
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `JWT_SECRET` | required (≥ 32 bytes) |
    /// | `JWT_EXPIRES_IN` | `90d` |
    /// | `JWT_COOKIE_EXPIRES_IN` | `90` (days) |
    /// | `COOKIE_SECURE` | `true` |
    /// | `COOKIE_SAME_SITE` | `lax` |
    /// | `PASSWORD_PEPPER` | unset |
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let token_secret = TokenSecret::new(env.require("JWT_SECRET")?.into_bytes())?;
        let token_ttl = env.duration_or("JWT_EXPIRES_IN", defaults.token_ttl)?;
        let cookie_days: u64 = env.parse_or("JWT_COOKIE_EXPIRES_IN", 90)?;
        let cookie_secure = env.bool_or("COOKIE_SECURE", true)?;

        let cookie_same_site = match env.get("COOKIE_SAME_SITE") {
            None => defaults.cookie_same_site,
            Some(raw) => SameSite::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "COOKIE_SAME_SITE".to_string(),
                reason: format!("expected strict, lax or none, got {raw:?}"),
            })?,
        };

        if token_ttl.is_zero() {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRES_IN".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if token_ttl > Duration::from_secs(MAX_LIFETIME_DAYS * SECONDS_PER_DAY) {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRES_IN".to_string(),
                reason: format!("must be at most {MAX_LIFETIME_DAYS} days"),
            });
        }
        if cookie_days > MAX_LIFETIME_DAYS {
            return Err(ConfigError::Invalid {
                var: "JWT_COOKIE_EXPIRES_IN".to_string(),
                reason: format!("must be at most {MAX_LIFETIME_DAYS} days"),
            });
        }

        Ok(Self {
            token_secret,
            token_ttl,
            cookie_ttl: Duration::from_secs(cookie_days * SECONDS_PER_DAY),
            cookie_secure,
            cookie_same_site,
            password_pepper: env.get("PASSWORD_PEPPER").map(String::into_bytes),
            ..defaults
        })
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie carrying an issued token
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(secs_i64(self.cookie_ttl)),
        }
    }

    /// Short-lived cookie that overwrites the token on logout
    pub fn logout_cookie(&self) -> CookieConfig {
        self.session_cookie()
            .with_max_age(secs_i64(self.logout_cookie_ttl))
    }
}

/// Whole seconds as a cookie `Max-Age`, saturating instead of wrapping
fn secs_i64(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}
