use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::analytics::dtos::AnalyticsSummaryDto;
use crate::features::analytics::services::AnalyticsService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ApiResponse;

/// Get usage totals for the authenticated user
#[utoipa::path(
    get,
    path = "/api/analytics",
    responses(
        (status = 200, description = "Usage totals", body = ApiResponse<AnalyticsSummaryDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_summary(
    user: AuthenticatedUser,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<AnalyticsSummaryDto>>> {
    let summary = service.summary(user.id).await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}
