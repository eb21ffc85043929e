//! Media toolkit wrapping the external ffmpeg/ffprobe binaries

mod ffmpeg;

pub use ffmpeg::MediaToolkit;
