//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the local storage backend, the ffmpeg media toolkit and the
//! Gemini REST client shared by several features.

pub mod genai;
pub mod media;
pub mod storage;
