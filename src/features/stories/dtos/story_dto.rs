use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::stories::models::Story;

/// Request body for story generation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateStoryRequestDto {
    /// Source file the story is based on
    pub file_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "Prompt must be 1-2000 characters"))]
    pub prompt: String,
}

/// Response DTO for a generated story
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoryResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub upload_file: Option<String>,
    pub video_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Story> for StoryResponseDto {
    fn from(s: Story) -> Self {
        Self {
            id: s.id,
            title: s.title,
            description: s.description,
            prompt: s.prompt,
            upload_file: s.upload_file,
            video_url: s.video_path,
            status: s.status,
            created_at: s.created_at,
        }
    }
}
