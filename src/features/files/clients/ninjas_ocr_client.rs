use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::core::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct OcrFragment {
    text: String,
}

/// Client for the API Ninjas image-to-text endpoint.
///
/// OCR output is used as a caption of last resort for images with
/// visible text when the captioning sidecar is unavailable.
pub struct NinjasOcrClient {
    api_key: String,
    api_url: String,
    http_client: reqwest::Client,
}

impl NinjasOcrClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn extract_text(&self, image_bytes: Vec<u8>, mime_type: &str) -> Result<String> {
        let part = Part::bytes(image_bytes)
            .file_name("image")
            .mime_str(mime_type)
            .map_err(|e| AppError::Internal(format!("Failed to build multipart: {}", e)))?;

        let form = Form::new().part("image", part);

        let response = self
            .http_client
            .post(&self.api_url)
            .header("X-Api-Key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("API Ninjas request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "API Ninjas OCR failed: HTTP {}",
                response.status()
            )));
        }

        let fragments = response
            .json::<Vec<OcrFragment>>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("API Ninjas response: {}", e)))?;

        let text = fragments
            .into_iter()
            .map(|f| f.text)
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            return Err(AppError::ExternalServiceError(
                "API Ninjas found no text in the image".to_string(),
            ));
        }

        Ok(text)
    }
}
