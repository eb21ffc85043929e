mod story_handler;

pub use story_handler::*;
