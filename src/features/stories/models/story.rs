use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Generated story row.
#[derive(Debug, Clone, FromRow)]
pub struct Story {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub prompt: String,
    /// Public URL of the source file at generation time
    pub upload_file: Option<String>,
    /// Public URL of the generated clip, when video generation ran and succeeded
    pub video_path: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryStatus {
    Completed,
    /// Story text was produced but the requested video could not be
    VideoFailed,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::VideoFailed => "video_failed",
        }
    }
}
