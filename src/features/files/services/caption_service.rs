use async_trait::async_trait;

use crate::core::config::VendorConfig;
use crate::core::error::Result;
use crate::features::files::clients::{HfCaptionClient, NinjasOcrClient};
use crate::shared::constants::MOCK_IMAGE_CAPTION;

/// A vendor that can describe the contents of an image.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn caption(&self, image_bytes: &[u8], mime_type: &str) -> Result<String>;
}

struct HfSidecarProvider(HfCaptionClient);

#[async_trait]
impl CaptionProvider for HfSidecarProvider {
    fn name(&self) -> &'static str {
        "caption-sidecar"
    }

    async fn caption(&self, image_bytes: &[u8], mime_type: &str) -> Result<String> {
        self.0.caption(image_bytes.to_vec(), mime_type).await
    }
}

struct NinjasOcrProvider(NinjasOcrClient);

#[async_trait]
impl CaptionProvider for NinjasOcrProvider {
    fn name(&self) -> &'static str {
        "ninjas-ocr"
    }

    async fn caption(&self, image_bytes: &[u8], mime_type: &str) -> Result<String> {
        self.0.extract_text(image_bytes.to_vec(), mime_type).await
    }
}

/// Describes images via the captioning sidecar, falling back to OCR and
/// finally to a canned caption.
pub struct CaptionService {
    providers: Vec<Box<dyn CaptionProvider>>,
}

impl CaptionService {
    pub fn from_config(vendors: &VendorConfig) -> Self {
        let mut providers: Vec<Box<dyn CaptionProvider>> = Vec::new();

        if let Some(url) = &vendors.caption_service_url {
            providers.push(Box::new(HfSidecarProvider(HfCaptionClient::new(
                url.clone(),
            ))));
        }
        if let Some(key) = &vendors.ninjas_api_key {
            providers.push(Box::new(NinjasOcrProvider(NinjasOcrClient::new(
                key.clone(),
                vendors.ninjas_api_url.clone(),
            ))));
        }

        Self { providers }
    }

    pub async fn caption(&self, image_bytes: &[u8], mime_type: &str) -> String {
        for provider in &self.providers {
            match provider.caption(image_bytes, mime_type).await {
                Ok(text) => {
                    tracing::info!(provider = provider.name(), "Image caption succeeded");
                    return text;
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        "Image caption failed, trying next vendor: {}",
                        e
                    );
                }
            }
        }

        tracing::warn!("All caption vendors failed, using mock caption");
        MOCK_IMAGE_CAPTION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    struct FailingProvider;

    #[async_trait]
    impl CaptionProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn caption(&self, _image_bytes: &[u8], _mime_type: &str) -> Result<String> {
            Err(AppError::ExternalServiceError("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn empty_chain_returns_mock() {
        let service = CaptionService { providers: vec![] };
        assert_eq!(
            service.caption(b"img", "image/png").await,
            MOCK_IMAGE_CAPTION
        );
    }

    #[tokio::test]
    async fn all_failures_return_mock() {
        let service = CaptionService {
            providers: vec![Box::new(FailingProvider)],
        };
        assert_eq!(
            service.caption(b"img", "image/png").await,
            MOCK_IMAGE_CAPTION
        );
    }
}
