use base64::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::error::{AppError, Result};

/// Model used for story generation, transcription and annotation
pub const GEMINI_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Model used for image-to-video generation
const GEMINI_VIDEO_MODEL: &str = "veo-2.0-generate-001";

/// Fixed delay between polls of a long-running video operation
const VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Cap on video operation polls; beyond this the generation is treated as
/// failed instead of hanging the request forever.
const VIDEO_POLL_MAX_ATTEMPTS: u32 = 30;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generated video clip settings
const VIDEO_DURATION_SECONDS: u32 = 5;
const VIDEO_ASPECT_RATIO: &str = "16:9";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateVideoRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Debug, Serialize)]
struct VideoInstance {
    prompt: String,
    image: VideoImage,
}

#[derive(Debug, Serialize)]
struct VideoImage {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

#[derive(Debug, Serialize)]
struct VideoParameters {
    #[serde(rename = "durationSeconds")]
    duration_seconds: u32,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    #[serde(rename = "generatedVideos", default)]
    generated_videos: Vec<GeneratedVideo>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideo {
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: Option<String>,
}

/// Google Gemini REST client
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    fn keyed_url(&self, path: &str) -> String {
        format!(
            "{}/{}?key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn generate_content(&self, parts: Vec<Part>) -> Result<String> {
        let url = self.keyed_url(&format!("models/{}:generateContent", GEMINI_TEXT_MODEL));
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid Gemini response: {}", e))
        })?;

        let text = payload
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::ExternalServiceError(
                "Gemini returned no candidate text".to_string(),
            ));
        }

        Ok(text)
    }

    /// One-shot text generation from a rendered prompt
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate_content(vec![Part {
            text: Some(prompt.to_string()),
            inline_data: None,
        }])
        .await
    }

    /// Transcribe WAV audio by sending it inline alongside a transcription prompt
    pub async fn transcribe_audio(&self, wav_bytes: &[u8]) -> Result<String> {
        let prompt = "Please transcribe the following audio content. \
                      Provide a natural, readable transcription with proper punctuation. \
                      Focus on clarity and accuracy.";

        self.generate_content(vec![
            Part {
                text: Some(prompt.to_string()),
                inline_data: None,
            },
            Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: "audio/wav".to_string(),
                    data: BASE64_STANDARD.encode(wav_bytes),
                }),
            },
        ])
        .await
    }

    /// Generate a short video clip from a still image via the Veo
    /// long-running operation API, returning the downloaded MP4 bytes.
    ///
    /// Polls at a fixed interval with a hard attempt cap; a run that is
    /// still pending after the cap is reported as a vendor failure.
    pub async fn generate_video(&self, prompt: &str, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let url = self.keyed_url(&format!("models/{}:predictLongRunning", GEMINI_VIDEO_MODEL));
        let request = GenerateVideoRequest {
            instances: vec![VideoInstance {
                prompt: prompt.to_string(),
                image: VideoImage {
                    bytes_base64_encoded: BASE64_STANDARD.encode(image_bytes),
                    mime_type: "image/jpeg".to_string(),
                },
            }],
            parameters: VideoParameters {
                duration_seconds: VIDEO_DURATION_SECONDS,
                aspect_ratio: VIDEO_ASPECT_RATIO,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Veo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Veo returned {}: {}",
                status, body
            )));
        }

        let mut operation: Operation = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid Veo operation response: {}", e))
        })?;

        let mut attempts = 0u32;
        while !operation.done {
            attempts += 1;
            if attempts > VIDEO_POLL_MAX_ATTEMPTS {
                return Err(AppError::ExternalServiceError(format!(
                    "Video generation timed out after {} polls",
                    VIDEO_POLL_MAX_ATTEMPTS
                )));
            }

            tokio::time::sleep(VIDEO_POLL_INTERVAL).await;
            operation = self.poll_operation(&operation.name).await?;
            debug!(
                "Veo operation {} poll {}: done={}",
                operation.name, attempts, operation.done
            );
        }

        if let Some(err) = operation.error {
            return Err(AppError::ExternalServiceError(format!(
                "Video generation failed: {}",
                err.message.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        let uri = operation
            .response
            .and_then(|r| r.generated_videos.into_iter().next())
            .and_then(|v| v.video)
            .and_then(|v| v.uri)
            .ok_or_else(|| {
                AppError::ExternalServiceError("No video download URL returned".to_string())
            })?;

        self.download_video(&uri).await
    }

    async fn poll_operation(&self, name: &str) -> Result<Operation> {
        let url = self.keyed_url(name);
        let response = self.http.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Veo operation poll failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Veo operation poll returned {}", status);
            return Err(AppError::ExternalServiceError(format!(
                "Veo operation poll returned {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid Veo operation response: {}", e))
        })
    }

    async fn download_video(&self, uri: &str) -> Result<Vec<u8>> {
        // The returned URI requires the API key appended as a query parameter
        let separator = if uri.contains('?') { '&' } else { '?' };
        let download_url = format!(
            "{}{}key={}",
            uri,
            separator,
            urlencoding::encode(&self.api_key)
        );

        let response = self.http.get(&download_url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Video download failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Video download returned {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Video download failed: {}", e))
        })?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_url_encodes_key() {
        let client =
            GeminiClient::with_base_url("a/b key".to_string(), "http://localhost".to_string());
        let url = client.keyed_url("models/test:generateContent");
        assert_eq!(
            url,
            "http://localhost/models/test:generateContent?key=a%2Fb%20key"
        );
    }

    #[test]
    fn test_candidate_text_deserializes() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Once upon"}, {"text": "a time"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text: Vec<_> = parsed.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        assert_eq!(text.join(" "), "Once upon a time");
    }

    #[test]
    fn test_operation_deserializes_pending_and_done() {
        let pending: Operation =
            serde_json::from_str(r#"{"name": "operations/abc"}"#).unwrap();
        assert!(!pending.done);

        let done: Operation = serde_json::from_str(
            r#"{
                "name": "operations/abc",
                "done": true,
                "response": {"generatedVideos": [{"video": {"uri": "https://dl/video.mp4"}}]}
            }"#,
        )
        .unwrap();
        assert!(done.done);
        let uri = done
            .response
            .unwrap()
            .generated_videos
            .into_iter()
            .next()
            .unwrap()
            .video
            .unwrap()
            .uri
            .unwrap();
        assert_eq!(uri, "https://dl/video.mp4");
    }
}
