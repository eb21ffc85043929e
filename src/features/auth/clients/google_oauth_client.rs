use serde::Deserialize;

use crate::core::config::GoogleOAuthConfig;
use crate::core::error::{AppError, Result};

/// Token response from Google's OAuth token endpoint
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// Profile returned by Google's userinfo endpoint (OpenID Connect v3)
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Stable Google account ID
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub name: String,
    pub picture: Option<String>,
}

/// Client for Google's OAuth 2.0 code exchange and userinfo endpoints
pub struct GoogleOAuthClient {
    config: GoogleOAuthConfig,
    http_client: reqwest::Client,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Exchange an authorization code for the user's Google profile.
    ///
    /// The redirect URI defaults to "postmessage", which is what Google
    /// expects for the popup-based auth-code flow used by the frontend.
    pub async fn fetch_user_info(&self, code: &str) -> Result<GoogleUserInfo> {
        let access_token = self.exchange_code(code).await?;

        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch Google user info: {}", e);
                AppError::ExternalServiceError(format!("Failed to fetch user info: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Google userinfo error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Google userinfo error: HTTP {}",
                status
            )));
        }

        response.json::<GoogleUserInfo>().await.map_err(|e| {
            tracing::error!("Failed to parse Google user info: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse user info: {}", e))
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<String> {
        if !self.config.is_configured() {
            return Err(AppError::ExternalServiceError(
                "Google OAuth is not configured".to_string(),
            ));
        }

        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to exchange Google auth code: {}", e);
                AppError::ExternalServiceError(format!("Failed to exchange auth code: {}", e))
            })?;

        let status = response.status();

        if status.as_u16() == 400 {
            // Expired or already-used authorization code
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Google rejected auth code: {}", body);
            return Err(AppError::Unauthorized(
                "Invalid or expired authorization code".to_string(),
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Google token error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Google token error: HTTP {}",
                status
            )));
        }

        let token = response.json::<GoogleTokenResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse Google token response: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse token response: {}", e))
        })?;

        Ok(token.access_token)
    }
}
