use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, GoogleLoginQuery, GoogleLoginResponseDto, LoginRequestDto, ProfileResponseDto,
    RegisterRequestDto, SetPasswordRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(auth_response), None, None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Sign in with a Google OAuth authorization code
#[utoipa::path(
    get,
    path = "/api/auth/google",
    params(GoogleLoginQuery),
    responses(
        (status = 200, description = "Google sign-in successful", body = ApiResponse<GoogleLoginResponseDto>),
        (status = 401, description = "Invalid or expired authorization code"),
        (status = 502, description = "Google API unavailable")
    ),
    tag = "auth"
)]
pub async fn google_login(
    State(service): State<Arc<AuthService>>,
    Query(query): Query<GoogleLoginQuery>,
) -> Result<Json<ApiResponse<GoogleLoginResponseDto>>> {
    if query.code.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Authorization code is required".to_string(),
        ));
    }

    let response = service.google_login(&query.code).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Set a password on an OAuth-created account
#[utoipa::path(
    post,
    path = "/api/auth/set-password",
    request_body = SetPasswordRequestDto,
    responses(
        (status = 200, description = "Password set successfully"),
        (status = 400, description = "Password already set or validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn set_password(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<SetPasswordRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.set_password(user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Password set successfully".to_string()),
        None,
    )))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/auth/user/profile",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    let profile = service.get_profile(user.id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}
