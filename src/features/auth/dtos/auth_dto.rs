use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::User;

/// Request body for email/password registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Request body for email/password login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Query parameters for the Google OAuth callback
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct GoogleLoginQuery {
    /// Authorization code returned by Google
    pub code: String,
}

/// Request body for setting a password on an OAuth-created account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetPasswordRequestDto {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

impl From<User> for AuthUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            picture: u.picture,
        }
    }
}

/// Response for register/login containing a bearer token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponseDto {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: AuthUserDto,
}

/// Response for Google login
///
/// `needs_password` is true when the account was created via OAuth and
/// has no local password yet; the frontend should redirect to its
/// set-password screen in that case.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoogleLoginResponseDto {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AuthUserDto,
    pub needs_password: bool,
}

/// Response for the profile endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub is_email_verified: bool,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponseDto {
    fn from(u: User) -> Self {
        let has_password = u.has_password();
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            picture: u.picture,
            is_email_verified: u.is_email_verified,
            has_password,
            created_at: u.created_at,
        }
    }
}
