//! Template engine for prompt management.
//!
//! Templates live in `templates/prompts/` and are embedded at compile time,
//! so prompt text ships with the binary and cannot drift from the code that
//! fills it in.

use minijinja::{Environment, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    env.add_template(
        "story_system.jinja",
        include_str!("../../../templates/prompts/story_system.jinja"),
    )
    .expect("embedded story template is valid");

    env.add_template(
        "annotation.jinja",
        include_str!("../../../templates/prompts/annotation.jinja"),
    )
    .expect("embedded annotation template is valid");

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template with the given context.
///
/// # Arguments
/// * `template_name` - The template name, e.g. "story_system.jinja"
/// * `ctx` - A map of variable names to values
pub fn render_template(
    template_name: &str,
    ctx: &HashMap<&str, Value>,
) -> Result<String, TemplateError> {
    let env = get_environment();

    let template = env
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    let render_ctx = Value::from_iter(ctx.iter().map(|(k, v)| (*k, v.clone())));

    template
        .render(render_ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_story_template_embeds_prompt_and_transcript() {
        let mut ctx = HashMap::new();
        ctx.insert("prompt", Value::from("Make it about a birthday"));
        ctx.insert("transcription", Value::from("Happy birthday! Make a wish."));

        let rendered = render_template("story_system.jinja", &ctx).unwrap();
        assert!(rendered.contains("storytelling assistant"));
        assert!(rendered.contains("Make it about a birthday"));
        assert!(rendered.contains("Happy birthday! Make a wish."));
    }

    #[test]
    fn test_render_annotation_template() {
        let mut ctx = HashMap::new();
        ctx.insert("file_type", Value::from("video"));
        ctx.insert("transcription", Value::from("A walk on the beach"));

        let rendered = render_template("annotation.jinja", &ctx).unwrap();
        assert!(rendered.contains("\"labels\""));
        assert!(rendered.contains("A walk on the beach"));
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let ctx = HashMap::new();
        let err = render_template("missing.jinja", &ctx).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }
}
