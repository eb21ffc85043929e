//! ffmpeg/ffprobe wrapper for audio extraction and duration probing.
//!
//! Transcription vendors expect mono 16 kHz PCM WAV, so extraction always
//! downmixes and resamples to that format.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::core::config::MediaConfig;
use crate::core::error::{AppError, Result};
use crate::shared::format::format_duration;

pub struct MediaToolkit {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl MediaToolkit {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path,
            ffprobe_path: config.ffprobe_path,
        }
    }

    /// Extract the audio track of a video as mono 16 kHz PCM WAV.
    ///
    /// The WAV is written next to the source file with an `_audio.wav`
    /// suffix; callers are responsible for removing it afterwards.
    pub async fn extract_audio(&self, video_path: &Path) -> Result<PathBuf> {
        let audio_path = audio_sibling_path(video_path);

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(video_path)
            .args(["-vn", "-acodec", "pcm_s16le", "-ac", "1", "-ar", "16000", "-y"])
            .arg(&audio_path)
            .output()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to spawn ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Internal(format!(
                "Audio extraction failed for {}: {}",
                video_path.display(),
                stderr.trim()
            )));
        }

        debug!("Extracted audio to {}", audio_path.display());
        Ok(audio_path)
    }

    /// Probe the playback duration of a media file, formatted as "m:ss"
    pub async fn probe_duration(&self, media_path: &Path) -> Result<String> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(media_path)
            .output()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to spawn ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Internal(format!(
                "Duration probe failed for {}: {}",
                media_path.display(),
                stderr.trim()
            )));
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    /// Remove a temporary artifact, ignoring files that are already gone
    pub async fn cleanup(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to clean up {}: {}", path.display(), e);
            }
        }
    }
}

fn audio_sibling_path(video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());
    video_path.with_file_name(format!("{}_audio.wav", stem))
}

fn parse_probe_output(stdout: &str) -> Result<String> {
    let seconds: f64 = stdout
        .trim()
        .parse()
        .map_err(|_| AppError::Internal(format!("Unparseable ffprobe output: {stdout:?}")))?;
    Ok(format_duration(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_sibling_path() {
        let path = audio_sibling_path(Path::new("/tmp/u1/clip.mp4"));
        assert_eq!(path, PathBuf::from("/tmp/u1/clip_audio.wav"));
    }

    #[test]
    fn test_parse_probe_output() {
        assert_eq!(parse_probe_output("150.336000\n").unwrap(), "2:30");
        assert_eq!(parse_probe_output("59.9").unwrap(), "0:59");
        assert!(parse_probe_output("N/A").is_err());
    }
}
