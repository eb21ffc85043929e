use std::sync::Arc;

use serde_json::json;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::features::analytics::AnalyticsService;
use crate::features::files::dtos::{FileListQuery, FileResponseDto, ALLOWED_MIME_TYPES};
use crate::features::files::models::{File, FileType, ProcessingStatus};
use crate::features::files::services::{AnnotationService, CaptionService, TranscriptionService};
use crate::modules::media::MediaToolkit;
use crate::modules::storage::LocalStore;
use crate::shared::constants::{DEFAULT_VIDEO_DURATION, IMAGE_DURATION};
use crate::shared::format::format_file_size;

/// One part of a multipart upload, already read into memory.
pub struct UploadFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Service for uploading, listing and deleting media files.
///
/// Upload runs the full annotation pipeline synchronously: persist to
/// disk, transcribe or caption, then title and tag the result. Vendor
/// failures degrade to canned output, so an upload only fails on disk
/// or database errors.
pub struct FileService {
    pool: PgPool,
    store: Arc<LocalStore>,
    media: Arc<MediaToolkit>,
    transcriptions: Arc<TranscriptionService>,
    captions: Arc<CaptionService>,
    annotations: Arc<AnnotationService>,
    analytics: Arc<AnalyticsService>,
    max_file_size: usize,
    max_files_per_upload: usize,
}

impl FileService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        store: Arc<LocalStore>,
        media: Arc<MediaToolkit>,
        transcriptions: Arc<TranscriptionService>,
        captions: Arc<CaptionService>,
        annotations: Arc<AnnotationService>,
        analytics: Arc<AnalyticsService>,
        storage: &StorageConfig,
    ) -> Self {
        Self {
            pool,
            store,
            media,
            transcriptions,
            captions,
            annotations,
            analytics,
            max_file_size: storage.max_file_size,
            max_files_per_upload: storage.max_files_per_upload,
        }
    }

    /// Upload a batch of files and run each through the annotation pipeline.
    pub async fn upload(&self, user_id: Uuid, files: Vec<UploadFile>) -> Result<Vec<FileResponseDto>> {
        if files.is_empty() {
            return Err(AppError::BadRequest("No files uploaded".to_string()));
        }
        if files.len() > self.max_files_per_upload {
            return Err(AppError::BadRequest(format!(
                "Too many files. Maximum is {} per upload",
                self.max_files_per_upload
            )));
        }

        // Validate the whole batch up front so a bad file rejects the
        // request before anything touches disk.
        for file in &files {
            self.validate(file)?;
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for file in files {
            uploaded.push(self.process_one(user_id, file).await?);
        }

        Ok(uploaded)
    }

    fn validate(&self, file: &UploadFile) -> Result<()> {
        if !ALLOWED_MIME_TYPES.contains(&file.content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Invalid file type: {}. Only images and videos are allowed",
                file.content_type
            )));
        }
        if file.data.len() > self.max_file_size {
            return Err(AppError::BadRequest(format!(
                "File {} is too large. Maximum size is {}",
                file.original_name,
                format_file_size(self.max_file_size as i64)
            )));
        }
        if file.data.is_empty() {
            return Err(AppError::BadRequest(format!(
                "File {} is empty",
                file.original_name
            )));
        }
        Ok(())
    }

    async fn process_one(&self, user_id: Uuid, file: UploadFile) -> Result<FileResponseDto> {
        let id = Uuid::new_v4();
        let file_type = FileType::from_mime(&file.content_type).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid file type: {}", file.content_type))
        })?;

        let stored = self
            .store
            .save(
                &user_id.to_string(),
                &format!("{}_{}", id, file.original_name),
                &file.data,
            )
            .await?;

        let row = sqlx::query_as::<_, File>(
            r#"
            INSERT INTO files (
                id, user_id, original_name, file_path, file_size,
                mime_type, file_type, thumbnail_path, processing_status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&file.original_name)
        .bind(&stored.url)
        .bind(file.data.len() as i64)
        .bind(&file.content_type)
        .bind(file_type.as_str())
        // Previews are served straight from the upload itself
        .bind(&stored.url)
        .bind(ProcessingStatus::Processing.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert file row: {:?}", e);
            AppError::Database(e)
        })?;

        let (transcription, duration) = match file_type {
            FileType::Video => self.annotate_video(&stored.path).await,
            FileType::Image => {
                let caption = self.captions.caption(&file.data, &file.content_type).await;
                (caption, IMAGE_DURATION.to_string())
            }
        };

        let annotation = self
            .annotations
            .annotate(&file.original_name, file_type.as_str(), &transcription)
            .await;

        let row = sqlx::query_as::<_, File>(
            r#"
            UPDATE files
            SET title = $1, transcription = $2, tags = $3,
                duration = $4, processing_status = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&annotation.title)
        .bind(&transcription)
        .bind(Json(&annotation.labels))
        .bind(&duration)
        .bind(ProcessingStatus::Completed.as_str())
        .bind(row.id)
        .fetch_one(&self.pool)
        .await?;

        self.analytics
            .record(
                user_id,
                "file_uploaded",
                json!({
                    "file_id": row.id,
                    "file_type": row.file_type,
                    "file_size": row.file_size,
                }),
            )
            .await;

        tracing::info!(file_id = %row.id, file_type = %row.file_type, "Upload processed");

        Ok(row.into())
    }

    /// Extract the audio track and run it through the transcription chain.
    ///
    /// An ffmpeg failure (missing binary, corrupt container) degrades to
    /// the mock transcript rather than failing the upload.
    async fn annotate_video(&self, video_path: &std::path::Path) -> (String, String) {
        let duration = match self.media.probe_duration(video_path).await {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Duration probe failed: {}", e);
                DEFAULT_VIDEO_DURATION.to_string()
            }
        };

        let transcription = match self.media.extract_audio(video_path).await {
            Ok(wav_path) => {
                let result = match tokio::fs::read(&wav_path).await {
                    Ok(wav_bytes) => self.transcriptions.transcribe(&wav_bytes).await,
                    Err(e) => {
                        tracing::warn!("Failed to read extracted audio: {}", e);
                        self.transcriptions.transcribe(&[]).await
                    }
                };
                self.media.cleanup(&wav_path).await;
                result
            }
            Err(e) => {
                tracing::warn!("Audio extraction failed: {}", e);
                self.transcriptions.transcribe(&[]).await
            }
        };

        (transcription, duration)
    }

    /// List the user's files, newest first, with optional search and
    /// type filters.
    pub async fn list(&self, user_id: Uuid, query: FileListQuery) -> Result<Vec<FileResponseDto>> {
        if let Some(file_type) = query.file_type.as_deref() {
            if file_type != "video" && file_type != "image" {
                return Err(AppError::BadRequest(format!(
                    "Invalid type filter: {}. Use \"video\" or \"image\"",
                    file_type
                )));
            }
        }

        let files = build_list_query(user_id, &query)
            .build_query_as::<File>()
            .fetch_all(&self.pool)
            .await?;

        Ok(files.into_iter().map(Into::into).collect())
    }

    /// Delete a file row and its disk artifacts.
    ///
    /// Disk removal is best effort; a missing artifact does not fail the
    /// request once the row is gone.
    pub async fn delete(&self, user_id: Uuid, file_id: Uuid) -> Result<()> {
        let file = sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE id = $1 AND user_id = $2",
        )
        .bind(file_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await?;

        for url in std::iter::once(file.file_path.as_str())
            .chain(file.thumbnail_path.as_deref())
        {
            if let Some(path) = self.store.resolve_url(url) {
                if let Err(e) = self.store.delete(&path).await {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!(file_id = %file_id, "File deleted");

        Ok(())
    }
}

fn build_list_query(user_id: Uuid, query: &FileListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM files WHERE user_id = ");
    qb.push_bind(user_id);

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR original_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR transcription ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR tags::text ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(file_type) = query.file_type.as_deref() {
        qb.push(" AND file_type = ");
        qb.push_bind(file_type.to_string());
    }

    qb.push(" ORDER BY created_at DESC");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_without_filters_only_scopes_by_user() {
        let query = FileListQuery {
            search: None,
            file_type: None,
        };
        let sql = build_list_query(Uuid::nil(), &query).into_sql();

        assert_eq!(
            sql,
            "SELECT * FROM files WHERE user_id = $1 ORDER BY created_at DESC"
        );
    }

    #[test]
    fn list_query_search_matches_tags_too() {
        let query = FileListQuery {
            search: Some("beach".to_string()),
            file_type: Some("image".to_string()),
        };
        let sql = build_list_query(Uuid::nil(), &query).into_sql();

        assert!(sql.contains("title ILIKE $2"));
        assert!(sql.contains("original_name ILIKE $3"));
        assert!(sql.contains("transcription ILIKE $4"));
        assert!(sql.contains("tags::text ILIKE $5"));
        assert!(sql.contains("file_type = $6"));
    }

    #[test]
    fn list_query_ignores_blank_search() {
        let query = FileListQuery {
            search: Some("   ".to_string()),
            file_type: None,
        };
        let sql = build_list_query(Uuid::nil(), &query).into_sql();

        assert!(!sql.contains("ILIKE"));
    }
}
