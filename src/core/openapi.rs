use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{dtos as analytics_dtos, handlers as analytics_handlers};
use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::stories::{dtos as stories_dtos, handlers as stories_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::google_login,
        auth::handlers::set_password,
        auth::handlers::get_profile,
        // Files
        files_handlers::upload_files,
        files_handlers::list_files,
        files_handlers::delete_file,
        // Stories
        stories_handlers::generate_story,
        stories_handlers::list_stories,
        stories_handlers::delete_story,
        // Analytics
        analytics_handlers::get_summary,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::SetPasswordRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            auth::dtos::GoogleLoginResponseDto,
            auth::dtos::ProfileResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::GoogleLoginResponseDto>,
            ApiResponse<auth::dtos::ProfileResponseDto>,
            // Files
            files_dtos::FileResponseDto,
            ApiResponse<Vec<files_dtos::FileResponseDto>>,
            // Stories
            stories_dtos::GenerateStoryRequestDto,
            stories_dtos::StoryResponseDto,
            ApiResponse<stories_dtos::StoryResponseDto>,
            ApiResponse<Vec<stories_dtos::StoryResponseDto>>,
            // Analytics
            analytics_dtos::AnalyticsSummaryDto,
            ApiResponse<analytics_dtos::AnalyticsSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and Google OAuth"),
        (name = "files", description = "Media upload and the annotation pipeline"),
        (name = "stories", description = "AI story generation"),
        (name = "analytics", description = "Usage totals"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "StoryAI API",
        version = "0.1.0",
        description = "API documentation for StoryAI",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
