//! Value Object Module

pub mod email;
pub mod location;
pub mod profile_text;
pub mod session_token;
pub mod user_password;
pub mod user_role;
pub mod user_stats;
pub mod username;
