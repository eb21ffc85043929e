use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{FileListQuery, FileResponseDto};
use crate::features::files::services::{FileService, UploadFile};
use crate::shared::types::{ApiResponse, Meta};

/// Upload media files and run them through the annotation pipeline
#[utoipa::path(
    post,
    path = "/api/files/upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files uploaded and processed", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 400, description = "No files, too many files, or a disallowed type"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Payload too large")
    ),
    security(("bearer_auth" = [])),
    tag = "files"
)]
pub async fn upload_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<FileResponseDto>>>)> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("File part is missing a filename".to_string()))?;
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        files.push(UploadFile {
            original_name,
            content_type,
            data: data.to_vec(),
        });
    }

    let uploaded = service.upload(user.id, files).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(uploaded), None, None)),
    ))
}

/// List the user's files
#[utoipa::path(
    get,
    path = "/api/files",
    params(FileListQuery),
    responses(
        (status = 200, description = "List of the user's files", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 400, description = "Invalid type filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "files"
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Query(query): Query<FileListQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    let files = service.list(user.id, query).await?;
    let total = files.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Delete a file and its disk artifacts
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = [])),
    tag = "files"
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(user.id, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("File deleted successfully".to_string()),
        None,
    )))
}
