//! Location Value Object
//!
//! Where a contributor is from. Stories are placed on the map by this.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COUNTRY: &str = "India";

const PLACE_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Longitude must be between -180 and 180")]
    Longitude,

    #[error("Latitude must be between -90 and 90")]
    Latitude,
}

/// A longitude/latitude pair (GeoJSON order)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Result<Self, LocationError> {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(LocationError::Longitude);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::Latitude);
        }
        Ok(Self { lon, lat })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub coordinates: Option<GeoPoint>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            city: None,
            state: None,
            country: DEFAULT_COUNTRY.to_string(),
            coordinates: None,
        }
    }
}

impl Location {
    /// Build from user input; blank parts are dropped, blank country defaults
    pub fn new(
        city: Option<String>,
        state: Option<String>,
        country: Option<String>,
        coordinates: Option<GeoPoint>,
    ) -> Result<Self, LocationError> {
        let city = Self::place("city", city)?;
        let state = Self::place("state", state)?;
        let country = Self::place("country", country)?.unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        Ok(Self {
            city,
            state,
            country,
            coordinates,
        })
    }

    fn place(field: &'static str, value: Option<String>) -> Result<Option<String>, LocationError> {
        let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        if value.chars().count() > PLACE_MAX_LENGTH {
            return Err(LocationError::TooLong {
                field,
                max: PLACE_MAX_LENGTH,
            });
        }
        Ok(Some(value))
    }
}
