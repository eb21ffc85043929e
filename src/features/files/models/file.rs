use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Uploaded media file row.
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_type: String,
    pub duration: Option<String>,
    pub transcription: Option<String>,
    pub tags: Json<Vec<String>>,
    pub thumbnail_path: Option<String>,
    pub processing_status: String,
    pub created_at: DateTime<Utc>,
}

/// Media kind derived from the MIME type at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Video,
    Image,
}

impl FileType {
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("video/") {
            Some(Self::Video)
        } else if mime_type.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }
}

/// Lifecycle of the annotation pipeline for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_from_mime() {
        assert_eq!(FileType::from_mime("video/mp4"), Some(FileType::Video));
        assert_eq!(FileType::from_mime("image/jpeg"), Some(FileType::Image));
        assert_eq!(FileType::from_mime("application/pdf"), None);
    }
}
