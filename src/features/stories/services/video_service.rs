use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::VendorConfig;
use crate::core::error::Result;
use crate::modules::genai::{FalClient, GeminiClient};

/// A vendor that can turn a still image into a short clip.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self, prompt: &str, image_bytes: &[u8], mime_type: &str)
        -> Result<Vec<u8>>;
}

struct GeminiVeoProvider(Arc<GeminiClient>);

#[async_trait]
impl VideoProvider for GeminiVeoProvider {
    fn name(&self) -> &'static str {
        "gemini-veo"
    }

    async fn generate(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        _mime_type: &str,
    ) -> Result<Vec<u8>> {
        self.0.generate_video(prompt, image_bytes).await
    }
}

struct FalProvider(FalClient);

#[async_trait]
impl VideoProvider for FalProvider {
    fn name(&self) -> &'static str {
        "fal"
    }

    async fn generate(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<Vec<u8>> {
        self.0.generate_video(prompt, image_bytes, mime_type).await
    }
}

/// Runs configured image-to-video vendors in priority order.
///
/// Unlike transcription there is no mock terminal link: when every
/// vendor fails the story is still created, just without a clip.
pub struct VideoGenerationService {
    providers: Vec<Box<dyn VideoProvider>>,
}

impl VideoGenerationService {
    pub fn from_config(vendors: &VendorConfig, gemini: Option<Arc<GeminiClient>>) -> Self {
        let mut providers: Vec<Box<dyn VideoProvider>> = Vec::new();

        if let Some(gemini) = gemini {
            providers.push(Box::new(GeminiVeoProvider(gemini)));
        }
        if let Some(key) = &vendors.fal_api_key {
            providers.push(Box::new(FalProvider(FalClient::new(key.clone()))));
        }

        Self { providers }
    }

    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Generate a clip, or None when every configured vendor fails.
    pub async fn generate(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Option<Vec<u8>> {
        for provider in &self.providers {
            match provider.generate(prompt, image_bytes, mime_type).await {
                Ok(bytes) => {
                    tracing::info!(provider = provider.name(), "Video generation succeeded");
                    return Some(bytes);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        "Video generation failed, trying next vendor: {}",
                        e
                    );
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    struct FailingProvider;

    #[async_trait]
    impl VideoProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _image_bytes: &[u8],
            _mime_type: &str,
        ) -> Result<Vec<u8>> {
            Err(AppError::ExternalServiceError("boom".to_string()))
        }
    }

    struct FixedProvider;

    #[async_trait]
    impl VideoProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _image_bytes: &[u8],
            _mime_type: &str,
        ) -> Result<Vec<u8>> {
            Ok(vec![1, 2, 3])
        }
    }

    #[tokio::test]
    async fn falls_through_to_next_provider() {
        let service = VideoGenerationService {
            providers: vec![Box::new(FailingProvider), Box::new(FixedProvider)],
        };
        assert_eq!(
            service.generate("p", b"img", "image/png").await,
            Some(vec![1, 2, 3])
        );
    }

    #[tokio::test]
    async fn exhausted_chain_returns_none() {
        let service = VideoGenerationService {
            providers: vec![Box::new(FailingProvider)],
        };
        assert!(service.generate("p", b"img", "image/png").await.is_none());
    }
}
