use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::core::error::{AppError, Result};

const RECOGNIZE_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognizeAlternative {
    transcript: Option<String>,
}

/// Client for the Google Cloud Speech-to-Text synchronous recognize API.
///
/// Audio must be 16 kHz mono LINEAR16, which matches the ffmpeg
/// extraction settings used by the media toolkit.
pub struct GoogleSpeechClient {
    api_key: String,
    http_client: reqwest::Client,
}

impl GoogleSpeechClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String> {
        let content = base64::engine::general_purpose::STANDARD.encode(wav_bytes);

        let body = json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": 16000,
                "languageCode": "en-US"
            },
            "audio": { "content": content }
        });

        let url = format!(
            "{}?key={}",
            RECOGNIZE_URL,
            urlencoding::encode(&self.api_key)
        );

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Google Speech request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Google Speech error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Google Speech failed: HTTP {}",
                status
            )));
        }

        let body = response.json::<RecognizeResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Google Speech response: {}", e))
        })?;

        let transcript = body
            .results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .filter_map(|a| a.transcript)
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.trim().is_empty() {
            return Err(AppError::ExternalServiceError(
                "Google Speech returned no transcript".to_string(),
            ));
        }

        Ok(transcript)
    }
}
