use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::files::models::File;
use crate::shared::format::format_file_size;

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
];

/// Query parameters for listing files
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FileListQuery {
    /// Case-insensitive substring match on title, original name, transcription or tags
    pub search: Option<String>,
    /// Filter by media kind ("video" or "image")
    #[serde(rename = "type")]
    pub file_type: Option<String>,
}

/// Response DTO for an uploaded file
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileResponseDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub original_name: String,
    /// "video" or "image"
    pub file_type: String,
    /// Human-readable size, e.g. "1.5 MB"
    pub size: String,
    pub size_bytes: i64,
    pub mime_type: String,
    /// "m:ss" for videos, "N/A" for images
    pub duration: Option<String>,
    pub transcription: Option<String>,
    pub tags: Vec<String>,
    /// Public URL under /uploads
    pub url: String,
    pub thumbnail: Option<String>,
    pub processing_status: String,
    pub upload_date: DateTime<Utc>,
}

impl From<File> for FileResponseDto {
    fn from(f: File) -> Self {
        Self {
            id: f.id,
            title: f.title,
            original_name: f.original_name,
            file_type: f.file_type,
            size: format_file_size(f.file_size),
            size_bytes: f.file_size,
            mime_type: f.mime_type,
            duration: f.duration,
            transcription: f.transcription,
            tags: f.tags.0,
            url: f.file_path,
            thumbnail: f.thumbnail_path,
            processing_status: f.processing_status,
            upload_date: f.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    #[test]
    fn response_dto_carries_the_thumbnail_url() {
        let row = File {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: Some("Beach day".to_string()),
            original_name: "beach.jpg".to_string(),
            file_path: "/uploads/u1/beach.jpg".to_string(),
            file_size: 2048,
            mime_type: "image/jpeg".to_string(),
            file_type: "image".to_string(),
            duration: Some("N/A".to_string()),
            transcription: Some("a sandy beach".to_string()),
            tags: Json(vec!["beach".to_string()]),
            thumbnail_path: Some("/uploads/u1/beach.jpg".to_string()),
            processing_status: "completed".to_string(),
            created_at: Utc::now(),
        };

        let dto = FileResponseDto::from(row);

        assert_eq!(dto.thumbnail.as_deref(), Some("/uploads/u1/beach.jpg"));
        assert_eq!(dto.size, "2 KB");
    }
}
