mod story_dto;

pub use story_dto::{GenerateStoryRequestDto, StoryResponseDto};
