mod annotation_service;
mod caption_service;
mod file_service;
mod transcription_service;

pub use annotation_service::AnnotationService;
pub use caption_service::CaptionService;
pub use file_service::{FileService, UploadFile};
pub use transcription_service::TranscriptionService;
