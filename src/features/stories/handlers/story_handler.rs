use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::stories::dtos::{GenerateStoryRequestDto, StoryResponseDto};
use crate::features::stories::services::StoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Generate a story from one of the user's files
#[utoipa::path(
    post,
    path = "/api/stories/generate",
    request_body = GenerateStoryRequestDto,
    responses(
        (status = 201, description = "Story generated", body = ApiResponse<StoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stories"
)]
pub async fn generate_story(
    user: AuthenticatedUser,
    State(service): State<Arc<StoryService>>,
    AppJson(dto): AppJson<GenerateStoryRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<StoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let story = service.generate(user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(story), None, None)),
    ))
}

/// List the user's stories
#[utoipa::path(
    get,
    path = "/api/stories",
    responses(
        (status = 200, description = "List of the user's stories", body = ApiResponse<Vec<StoryResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "stories"
)]
pub async fn list_stories(
    user: AuthenticatedUser,
    State(service): State<Arc<StoryService>>,
) -> Result<Json<ApiResponse<Vec<StoryResponseDto>>>> {
    let stories = service.list(user.id).await?;
    let total = stories.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(stories),
        None,
        Some(Meta { total }),
    )))
}

/// Delete a story
#[utoipa::path(
    delete,
    path = "/api/stories/{id}",
    params(
        ("id" = Uuid, Path, description = "Story ID")
    ),
    responses(
        (status = 200, description = "Story deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Story not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stories"
)]
pub async fn delete_story(
    user: AuthenticatedUser,
    State(service): State<Arc<StoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(user.id, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Story deleted successfully".to_string()),
        None,
    )))
}
