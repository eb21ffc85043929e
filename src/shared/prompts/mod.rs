//! Prompt template management using Jinja2 syntax.

mod engine;

pub use engine::render_template;
