use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::{GoogleOAuthClient, GoogleUserInfo};
use crate::features::auth::dtos::{
    AuthResponseDto, GoogleLoginResponseDto, LoginRequestDto, ProfileResponseDto,
    RegisterRequestDto, SetPasswordRequestDto,
};
use crate::features::auth::models::User;
use crate::features::auth::services::TokenService;

const TOKEN_TYPE: &str = "Bearer";

/// Service for account registration, login and Google OAuth sign-in.
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
    google: Arc<GoogleOAuthClient>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>, google: Arc<GoogleOAuthClient>) -> Self {
        Self {
            pool,
            tokens,
            google,
        }
    }

    /// Register a new email/password account.
    ///
    /// Returns Conflict if the email is already taken.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let email = dto.email.trim().to_lowercase();

        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(dto.name.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(user_id = %user.id, "Registered new user");

        self.auth_response(user)
    }

    /// Authenticate with email and password.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let email = dto.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        // OAuth-only accounts have no local password to check
        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&dto.password, hash) {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.auth_response(user)
    }

    /// Sign in with a Google OAuth authorization code.
    ///
    /// Creates the account on first sign-in, and links the Google ID to an
    /// existing account when the email already has one. Accounts created
    /// here have no local password until they call set-password.
    pub async fn google_login(&self, code: &str) -> Result<GoogleLoginResponseDto> {
        let info = self.google.fetch_user_info(code).await?;
        let user = self.upsert_google_user(&info).await?;

        let needs_password = !user.has_password();
        let token = self.tokens.issue(&user)?;

        Ok(GoogleLoginResponseDto {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.tokens.expiry_secs(),
            user: user.into(),
            needs_password,
        })
    }

    /// Set a local password on an account that has none yet.
    pub async fn set_password(&self, user_id: Uuid, dto: SetPasswordRequestDto) -> Result<()> {
        let user = self.get_user(user_id).await?;

        if user.has_password() {
            return Err(AppError::BadRequest(
                "Password is already set. Use the password reset flow instead.".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.password)?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = %user_id, "Password set for OAuth account");

        Ok(())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileResponseDto> {
        let user = self.get_user(user_id).await?;
        Ok(user.into())
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn upsert_google_user(&self, info: &GoogleUserInfo) -> Result<User> {
        let email = info.email.trim().to_lowercase();

        if let Some(user) = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
        {
            // Link the Google ID if this account was created with a password
            let user = sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET google_id = $1,
                    picture = COALESCE(picture, $2),
                    is_email_verified = is_email_verified OR $3,
                    updated_at = NOW()
                WHERE id = $4
                RETURNING *
                "#,
            )
            .bind(&info.sub)
            .bind(&info.picture)
            .bind(info.email_verified)
            .bind(user.id)
            .fetch_one(&self.pool)
            .await?;

            return Ok(user);
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, picture, google_id, is_email_verified)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(&info.name)
        .bind(&info.picture)
        .bind(&info.sub)
        .bind(info.email_verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create Google user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(user_id = %user.id, "Created user from Google sign-in");

        Ok(user)
    }

    fn auth_response(&self, user: User) -> Result<AuthResponseDto> {
        let token = self.tokens.issue(&user)?;

        Ok(AuthResponseDto {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.tokens.expiry_secs(),
            user: user.into(),
        })
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AppError::Internal("Failed to hash password".to_string())
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("Stored password hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("hunter42").unwrap();
        assert!(verify_password("hunter42", &hash));
        assert!(!verify_password("hunter43", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
