mod story;

pub use story::{Story, StoryStatus};
