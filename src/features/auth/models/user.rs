use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User account row.
///
/// `password_hash` is NULL for accounts created via Google OAuth that
/// have not set a local password yet.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub name: String,
    pub picture: Option<String>,
    pub google_id: Option<String>,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}
