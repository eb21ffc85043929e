pub mod constants;
pub mod format;
pub mod llm;
pub mod prompts;
pub mod test_helpers;
pub mod types;
