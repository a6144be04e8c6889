//! `storecms-auth` — authentication boundary.
//!
//! Admin identity, password hashing and JWT issuing/validation. This crate is
//! intentionally decoupled from HTTP and storage.

pub mod admin;
pub mod claims;
pub mod password;
pub mod token;

pub use admin::Admin;
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use password::{hash_password, validate_policy, verify_password, PasswordError};
pub use token::{Hs256Jwt, JwtValidator, TokenError};
