use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::core::config::VendorConfig;
use crate::core::error::Result;
use crate::features::files::clients::{AssemblyAiClient, GoogleSpeechClient, OpenAiClient};
use crate::modules::genai::GeminiClient;
use crate::shared::constants::MOCK_TRANSCRIPTIONS;

/// A speech-to-text vendor that can transcribe 16 kHz mono WAV audio.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String>;
}

struct AssemblyAiProvider(AssemblyAiClient);

#[async_trait]
impl TranscriptionProvider for AssemblyAiProvider {
    fn name(&self) -> &'static str {
        "assemblyai"
    }

    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String> {
        self.0.transcribe(wav_bytes.to_vec()).await
    }
}

struct GeminiProvider(Arc<GeminiClient>);

#[async_trait]
impl TranscriptionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String> {
        self.0.transcribe_audio(wav_bytes).await
    }
}

struct OpenAiProvider(OpenAiClient);

#[async_trait]
impl TranscriptionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String> {
        self.0.transcribe(wav_bytes.to_vec()).await
    }
}

struct GoogleSpeechProvider(GoogleSpeechClient);

#[async_trait]
impl TranscriptionProvider for GoogleSpeechProvider {
    fn name(&self) -> &'static str {
        "google-speech"
    }

    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String> {
        self.0.transcribe(wav_bytes).await
    }
}

/// Runs configured transcription vendors in priority order.
///
/// Vendor order is AssemblyAI, Gemini, OpenAI, Google Speech. A vendor
/// failure moves on to the next; when every vendor fails (or none is
/// configured) a canned transcript is returned so upload processing can
/// always finish.
pub struct TranscriptionService {
    providers: Vec<Box<dyn TranscriptionProvider>>,
}

impl TranscriptionService {
    pub fn from_config(vendors: &VendorConfig, gemini: Option<Arc<GeminiClient>>) -> Self {
        let mut providers: Vec<Box<dyn TranscriptionProvider>> = Vec::new();

        if let Some(key) = &vendors.assembly_ai_api_key {
            providers.push(Box::new(AssemblyAiProvider(AssemblyAiClient::new(
                key.clone(),
                vendors.assembly_ai_base_url.clone(),
            ))));
        }
        if let Some(gemini) = gemini {
            providers.push(Box::new(GeminiProvider(gemini)));
        }
        if let Some(key) = &vendors.openai_api_key {
            providers.push(Box::new(OpenAiProvider(OpenAiClient::new(key.clone()))));
        }
        if let Some(key) = &vendors.google_cloud_api_key {
            providers.push(Box::new(GoogleSpeechProvider(GoogleSpeechClient::new(
                key.clone(),
            ))));
        }

        Self { providers }
    }

    /// Transcribe audio, falling through the vendor chain on failure.
    ///
    /// Infallible by construction: the mock transcript is the terminal
    /// link of the chain.
    pub async fn transcribe(&self, wav_bytes: &[u8]) -> String {
        for provider in &self.providers {
            match provider.transcribe(wav_bytes).await {
                Ok(text) => {
                    tracing::info!(provider = provider.name(), "Transcription succeeded");
                    return text;
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        "Transcription failed, trying next vendor: {}",
                        e
                    );
                }
            }
        }

        tracing::warn!("All transcription vendors failed, using mock transcript");
        mock_transcription()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

fn mock_transcription() -> String {
    MOCK_TRANSCRIPTIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOCK_TRANSCRIPTIONS[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    struct FailingProvider;

    #[async_trait]
    impl TranscriptionProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn transcribe(&self, _wav_bytes: &[u8]) -> Result<String> {
            Err(AppError::ExternalServiceError("boom".to_string()))
        }
    }

    struct FixedProvider(&'static str);

    #[async_trait]
    impl TranscriptionProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn transcribe(&self, _wav_bytes: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn falls_through_to_next_provider() {
        let service = TranscriptionService {
            providers: vec![Box::new(FailingProvider), Box::new(FixedProvider("hello"))],
        };
        assert_eq!(service.transcribe(b"wav").await, "hello");
    }

    #[tokio::test]
    async fn empty_chain_returns_mock() {
        let service = TranscriptionService { providers: vec![] };
        let text = service.transcribe(b"wav").await;
        assert!(MOCK_TRANSCRIPTIONS.contains(&text.as_str()));
    }

    #[tokio::test]
    async fn all_failures_return_mock() {
        let service = TranscriptionService {
            providers: vec![Box::new(FailingProvider), Box::new(FailingProvider)],
        };
        let text = service.transcribe(b"wav").await;
        assert!(MOCK_TRANSCRIPTIONS.contains(&text.as_str()));
    }
}
