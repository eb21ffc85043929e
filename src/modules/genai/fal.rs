use base64::prelude::{Engine, BASE64_STANDARD};
use serde::Deserialize;
use serde_json::json;

use crate::core::error::{AppError, Result};

const DEFAULT_RUN_URL: &str = "https://fal.run/fal-ai/veo2/image-to-video";

#[derive(Debug, Deserialize)]
struct RunResponse {
    video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    url: String,
}

/// Client for fal.ai's synchronous image-to-video endpoint.
///
/// The source image is passed inline as a data URI, so no separate
/// upload round trip is needed.
pub struct FalClient {
    http: reqwest::Client,
    api_key: String,
    run_url: String,
}

impl FalClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            run_url: DEFAULT_RUN_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_run_url(api_key: String, run_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            run_url,
        }
    }

    /// Generate a clip from a still image and return the MP4 bytes.
    pub async fn generate_video(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<Vec<u8>> {
        let image_url = format!(
            "data:{};base64,{}",
            mime_type,
            BASE64_STANDARD.encode(image_bytes)
        );

        let response = self
            .http
            .post(&self.run_url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&json!({
                "prompt": prompt,
                "image_url": image_url,
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("fal.ai request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "fal.ai returned {}: {}",
                status, body
            )));
        }

        let payload: RunResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid fal.ai response: {}", e))
        })?;

        let video_url = payload
            .video
            .map(|v| v.url)
            .ok_or_else(|| {
                AppError::ExternalServiceError("fal.ai returned no video".to_string())
            })?;

        let download = self.http.get(&video_url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("fal.ai video download failed: {}", e))
        })?;

        if !download.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "fal.ai video download returned {}",
                download.status()
            )));
        }

        let bytes = download.bytes().await.map_err(|e| {
            AppError::ExternalServiceError(format!("fal.ai video download failed: {}", e))
        })?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_response_extracts_video_url() {
        let payload: RunResponse = serde_json::from_str(
            r#"{"video": {"url": "https://fal.media/files/clip.mp4", "content_type": "video/mp4"}}"#,
        )
        .unwrap();
        assert_eq!(
            payload.video.unwrap().url,
            "https://fal.media/files/clip.mp4"
        );
    }

    #[test]
    fn run_response_tolerates_missing_video() {
        let payload: RunResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.video.is_none());
    }
}
