//! Helpers for parsing loosely structured output from generative models.

mod parser;

pub use parser::parse_llm_json;
