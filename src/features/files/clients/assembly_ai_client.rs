use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::core::error::{AppError, Result};

const POLL_INTERVAL: Duration = Duration::from_secs(3);
const POLL_MAX_ATTEMPTS: u32 = 100;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    text: Option<String>,
    error: Option<String>,
}

/// Client for the AssemblyAI transcription API.
///
/// Three-step flow: upload the audio bytes, create a transcript job,
/// then poll until the job completes or errors.
pub struct AssemblyAiClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl AssemblyAiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn transcribe(&self, audio_bytes: Vec<u8>) -> Result<String> {
        let audio_url = self.upload(audio_bytes).await?;
        let transcript_id = self.create_transcript(&audio_url).await?;
        self.poll_transcript(&transcript_id).await
    }

    async fn upload(&self, audio_bytes: Vec<u8>) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(audio_bytes)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("AssemblyAI upload failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "AssemblyAI upload failed: HTTP {}",
                response.status()
            )));
        }

        let body = response.json::<UploadResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("AssemblyAI upload response: {}", e))
        })?;

        Ok(body.upload_url)
    }

    async fn create_transcript(&self, audio_url: &str) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&json!({ "audio_url": audio_url }))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("AssemblyAI transcript request: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "AssemblyAI transcript request failed: HTTP {}",
                response.status()
            )));
        }

        let body = response.json::<TranscriptResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("AssemblyAI transcript response: {}", e))
        })?;

        Ok(body.id)
    }

    async fn poll_transcript(&self, transcript_id: &str) -> Result<String> {
        for _ in 0..POLL_MAX_ATTEMPTS {
            let response = self
                .http_client
                .get(format!("{}/transcript/{}", self.base_url, transcript_id))
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| {
                    AppError::ExternalServiceError(format!("AssemblyAI poll failed: {}", e))
                })?;

            let body = response.json::<TranscriptResponse>().await.map_err(|e| {
                AppError::ExternalServiceError(format!("AssemblyAI poll response: {}", e))
            })?;

            match body.status.as_str() {
                "completed" => {
                    return body.text.filter(|t| !t.is_empty()).ok_or_else(|| {
                        AppError::ExternalServiceError(
                            "AssemblyAI returned an empty transcript".to_string(),
                        )
                    });
                }
                "error" => {
                    return Err(AppError::ExternalServiceError(format!(
                        "AssemblyAI transcription failed: {}",
                        body.error.unwrap_or_else(|| "unknown error".to_string())
                    )));
                }
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }

        Err(AppError::ExternalServiceError(
            "AssemblyAI transcription timed out".to_string(),
        ))
    }
}
