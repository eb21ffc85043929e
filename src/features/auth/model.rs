use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user extracted from a verified bearer token.
///
/// Inserted into request extensions by the auth middleware and pulled
/// out by handlers via the `FromRequestParts` impl in `core::extractor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// JWT claims carried in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}
