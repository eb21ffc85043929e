use serde::Deserialize;

use crate::core::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    generated_text: String,
}

/// Client for the self-hosted image captioning sidecar.
///
/// The sidecar wraps a Hugging Face BLIP model and accepts raw image
/// bytes, responding with `[{"generated_text": "..."}]`.
pub struct HfCaptionClient {
    service_url: String,
    http_client: reqwest::Client,
}

impl HfCaptionClient {
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn caption(&self, image_bytes: Vec<u8>, mime_type: &str) -> Result<String> {
        let response = self
            .http_client
            .post(&self.service_url)
            .header("content-type", mime_type.to_string())
            .body(image_bytes)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Caption service request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Caption service failed: HTTP {}",
                response.status()
            )));
        }

        let captions = response.json::<Vec<CaptionResponse>>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Caption service response: {}", e))
        })?;

        captions
            .into_iter()
            .map(|c| c.generated_text)
            .find(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AppError::ExternalServiceError("Caption service returned no caption".to_string())
            })
    }
}
