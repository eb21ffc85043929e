//! Generative AI vendor clients
//!
//! One shared Gemini client covers the three surfaces this service uses
//! (text generation, audio transcription via inline data, and Veo
//! long-running video generation), plus a fal.ai client as the backup
//! image-to-video vendor.

mod fal;
mod gemini;

pub use fal::FalClient;
pub use gemini::GeminiClient;
