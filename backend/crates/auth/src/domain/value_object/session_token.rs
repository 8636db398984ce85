//! Session Token
//!
//! Compact HS256 JWT: `base64url(header).base64url(claims).base64url(mac)`.
//! Nothing is stored server-side; a token is valid iff its MAC verifies
//! under the server secret and `now < exp`.
//!
//! Only the claims this service issues are understood: there is a single
//! signing secret, so headers carry no `kid`, and tokens are usable from
//! `iat`, so `nbf` is neither written nor checked. Any other algorithm in
//! the header is rejected.

use kernel::id::UserId;
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token algorithm is not supported")]
    UnsupportedAlgorithm,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token has expired")]
    Expired,
}

#[derive(Serialize, Deserialize)]
struct Header<'a> {
    alg: &'a str,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<&'a str>,
}

/// Claims carried by a session token (times in seconds since the epoch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: UserId,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// A signed session token
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn sign(claims: &TokenClaims, secret: &[u8]) -> Self {
        let header = Header {
            alg: ALGORITHM,
            typ: Some("JWT"),
        };
        let header = serde_json::to_vec(&header).expect("token header serializes to JSON");
        let payload = serde_json::to_vec(claims).expect("token claims serialize to JSON");

        let signing_input = format!("{}.{}", to_base64url(&header), to_base64url(&payload));
        let mac = hmac_sha256(secret, signing_input.as_bytes());

        Self(format!("{}.{}", signing_input, to_base64url(&mac)))
    }

    /// Check the MAC, then the expiry, and return the claims
    pub fn verify(token: &str, secret: &[u8], now: i64) -> Result<TokenClaims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(mac_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header_json = from_base64url(header_b64).map_err(|_| TokenError::Malformed)?;
        let header: Header<'_> =
            serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        let mac = from_base64url(mac_b64).map_err(|_| TokenError::Malformed)?;
        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
        if !verify_hmac_sha256(secret, signing_input.as_bytes(), &mac) {
            return Err(TokenError::BadSignature);
        }

        let payload = from_base64url(payload_b64).map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}
