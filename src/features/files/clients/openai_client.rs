use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::core::error::{AppError, Result};

const TRANSCRIPTIONS_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const TRANSCRIPTION_MODEL: &str = "gpt-4o-mini-transcribe";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for OpenAI's audio transcription endpoint.
pub struct OpenAiClient {
    api_key: String,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn transcribe(&self, wav_bytes: Vec<u8>) -> Result<String> {
        let part = Part::bytes(wav_bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| AppError::Internal(format!("Failed to build multipart: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("model", TRANSCRIPTION_MODEL);

        let response = self
            .http_client
            .post(TRANSCRIPTIONS_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("OpenAI transcription failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("OpenAI transcription error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "OpenAI transcription failed: HTTP {}",
                status
            )));
        }

        let body = response.json::<TranscriptionResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("OpenAI transcription response: {}", e))
        })?;

        if body.text.is_empty() {
            return Err(AppError::ExternalServiceError(
                "OpenAI returned an empty transcript".to_string(),
            ));
        }

        Ok(body.text)
    }
}
