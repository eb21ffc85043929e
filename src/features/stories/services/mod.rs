mod story_service;
mod video_service;

pub use story_service::StoryService;
pub use video_service::VideoGenerationService;
