//! Fallback content used when every AI vendor is unavailable or fails.

/// Canned transcriptions, one of which is picked at random when no
/// transcription vendor is configured or the whole chain fails.
pub const MOCK_TRANSCRIPTIONS: &[&str] = &[
    "This is such a beautiful day! I'm so happy to be here with everyone. The weather is perfect and we're having an amazing time together.",
    "Look at this incredible view! We should definitely take more pictures to remember this moment. This place is absolutely stunning.",
    "Happy birthday! Make a wish and blow out the candles! This is such a special day and I'm so glad we could all be here to celebrate.",
    "I love spending time with family and friends like this. These are the moments that really matter and create lasting memories.",
    "This vacation has been absolutely incredible so far. Every day brings new adventures and beautiful experiences.",
    "The sunset looks absolutely breathtaking tonight. I've never seen colors like this in the sky before.",
    "Everyone looks so happy and relaxed. It's wonderful to see everyone enjoying themselves and having such a great time.",
    "This is definitely going to be a memorable experience that we'll talk about for years to come.",
];

/// Caption used when every captioning vendor fails for an uploaded image
pub const MOCK_IMAGE_CAPTION: &str = "This is a mock transcription for the image.";

/// Tags applied when the annotation call fails
pub const MOCK_TAGS: &[&str] = &["family", "vacation", "happy", "outdoor"];

/// Story description is never null: this placeholder is persisted when the
/// generative call fails or returns an empty candidate.
pub const DEFAULT_STORY_DESCRIPTION: &str =
    "This is a generated story based on your prompt and transcript.";

/// Duration recorded for videos whose metadata could not be probed
pub const DEFAULT_VIDEO_DURATION: &str = "2:30";

/// Duration recorded for images
pub const IMAGE_DURATION: &str = "N/A";
