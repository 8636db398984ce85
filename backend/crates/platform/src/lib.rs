//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, Base64url, secure random)
//! - Password hashing (Argon2id)
//! - Cookie and `Authorization` header handling
//! - Environment-backed configuration helpers

pub mod config;
pub mod cookie;
pub mod crypto;
pub mod password;
