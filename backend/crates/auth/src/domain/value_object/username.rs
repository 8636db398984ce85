//! Username Value Object
//!
//! Public handle shown next to a contributor's stories.
//!
//! Processing order: NFKC normalization → trim → lowercase → validate.
//! The stored form is the canonical (lower-case) one, so uniqueness is
//! case-insensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const USERNAME_MIN_LENGTH: usize = 2;
pub const USERNAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Error returned when username validation fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,

    #[error("Username must be between {min} and {max} characters (got {actual})")]
    Length {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Username may only contain letters, digits, '_', '.' and '-' (found {0:?})")]
    InvalidCharacter(char),

    #[error("Username must start and end with a letter or digit")]
    InvalidEdge,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UsernameError> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let canonical = normalized.trim().to_lowercase();

        if canonical.is_empty() {
            return Err(UsernameError::Empty);
        }

        let actual = canonical.chars().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&actual) {
            return Err(UsernameError::Length {
                min: USERNAME_MIN_LENGTH,
                max: USERNAME_MAX_LENGTH,
                actual,
            });
        }

        if let Some(bad) = canonical
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(c)))
        {
            return Err(UsernameError::InvalidCharacter(bad));
        }

        let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
        if !edge_ok(canonical.chars().next()) || !edge_ok(canonical.chars().last()) {
            return Err(UsernameError::InvalidEdge);
        }

        Ok(Self(canonical))
    }

    /// Create from database value (assumed already canonical)
    pub fn from_db(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
