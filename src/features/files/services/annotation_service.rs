use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use minijinja::Value;
use serde::Deserialize;

use crate::modules::genai::GeminiClient;
use crate::shared::constants::MOCK_TAGS;
use crate::shared::llm::parse_llm_json;
use crate::shared::prompts::render_template;

/// Title and labels produced for an uploaded file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Annotation {
    pub title: String,
    pub labels: Vec<String>,
}

/// Generates a title and tags for a file from its transcript or caption.
///
/// Uses Gemini when configured; otherwise (or on any vendor or parse
/// failure) degrades to a filename-derived title with canned tags.
pub struct AnnotationService {
    gemini: Option<Arc<GeminiClient>>,
}

impl AnnotationService {
    pub fn new(gemini: Option<Arc<GeminiClient>>) -> Self {
        Self { gemini }
    }

    pub async fn annotate(
        &self,
        original_name: &str,
        file_type: &str,
        transcription: &str,
    ) -> Annotation {
        let Some(gemini) = &self.gemini else {
            return fallback_annotation(original_name);
        };

        match self.annotate_with_gemini(gemini, file_type, transcription).await {
            Ok(annotation) => annotation,
            Err(e) => {
                tracing::warn!("Annotation failed, using fallback: {}", e);
                fallback_annotation(original_name)
            }
        }
    }

    async fn annotate_with_gemini(
        &self,
        gemini: &GeminiClient,
        file_type: &str,
        transcription: &str,
    ) -> Result<Annotation, String> {
        let mut ctx = HashMap::new();
        ctx.insert("file_type", Value::from(file_type));
        ctx.insert("transcription", Value::from(transcription));

        let prompt = render_template("annotation.jinja", &ctx).map_err(|e| e.to_string())?;

        let raw = gemini
            .generate_text(&prompt)
            .await
            .map_err(|e| e.to_string())?;

        let annotation: Annotation = parse_llm_json(&raw)?;

        if annotation.title.trim().is_empty() {
            return Err("model returned an empty title".to_string());
        }

        Ok(annotation)
    }
}

/// Title from the filename stem plus canned tags.
fn fallback_annotation(original_name: &str) -> Annotation {
    let title = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.replace(['_', '-'], " "))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "Untitled upload".to_string());

    Annotation {
        title,
        labels: MOCK_TAGS.iter().map(|t| t.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_uses_filename_stem() {
        let a = fallback_annotation("summer_trip-2024.mp4");
        assert_eq!(a.title, "summer trip 2024");
        assert_eq!(a.labels.len(), MOCK_TAGS.len());
    }

    #[test]
    fn fallback_handles_empty_name() {
        let a = fallback_annotation("");
        assert_eq!(a.title, "Untitled upload");
    }

    #[tokio::test]
    async fn annotate_without_gemini_falls_back() {
        let service = AnnotationService::new(None);
        let a = service.annotate("beach.png", "image", "a beach").await;
        assert_eq!(a.title, "beach");
    }
}
