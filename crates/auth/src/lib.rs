//! `taskdeck-auth` — token authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP: it models claims, the
//! HS256 token codec, and the user directory backing the credential
//! exchange. Request plumbing lives in the API crate.

pub mod claims;
pub mod directory;
pub mod token;

pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use directory::UserDirectory;
pub use token::{AuthError, TokenCodec};
