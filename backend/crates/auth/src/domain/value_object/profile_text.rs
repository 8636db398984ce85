//! Free-text profile fields

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;
pub const BIO_MAX_LENGTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileTextError {
    #[error("Name is required")]
    EmptyName,

    #[error("Name must be at most 100 characters")]
    NameTooLong,

    #[error("Bio must be at most 500 characters")]
    BioTooLong,
}

/// Human-readable name, e.g. "Asha Devi"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProfileTextError> {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            return Err(ProfileTextError::EmptyName);
        }
        if name.chars().count() > DISPLAY_NAME_MAX_LENGTH {
            return Err(ProfileTextError::NameTooLong);
        }
        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProfileTextError> {
        let bio = raw.as_ref().trim();
        if bio.chars().count() > BIO_MAX_LENGTH {
            return Err(ProfileTextError::BioTooLong);
        }
        Ok(Self(bio.to_string()))
    }

    pub fn from_db(bio: impl Into<String>) -> Self {
        Self(bio.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
