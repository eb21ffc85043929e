//! Local-disk storage backend for uploaded media.
//!
//! Layout mirrors the public URL space: a file saved under
//! `<root>/<user_id>/<name>` is served at `/uploads/<user_id>/<name>`.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

/// URL prefix under which stored files are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// A file persisted to the local store
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Public URL path, e.g. `/uploads/<user_id>/<name>`
    pub url: String,
}

/// Local-disk storage client
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create the store, ensuring the uploads root exists
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.uploads_dir).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create uploads directory {}: {}",
                config.uploads_dir.display(),
                e
            ))
        })?;

        info!("Local store initialized at {}", config.uploads_dir.display());

        Ok(Self {
            root: config.uploads_dir.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist bytes under `<root>/<subdir>/<filename>`.
    ///
    /// `subdir` may contain forward slashes ("stories/<user_id>"); each
    /// segment and the filename are sanitized against path traversal.
    pub async fn save(&self, subdir: &str, filename: &str, data: &[u8]) -> Result<StoredFile> {
        let subdir = sanitize_segments(subdir)?;
        let filename = sanitize_filename(filename)?;

        let dir = self.root.join(&subdir);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create {}: {}", dir.display(), e)))?;

        let path = dir.join(&filename);
        fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!("Stored {} ({} bytes)", path.display(), data.len());

        Ok(StoredFile {
            url: format!("{}/{}/{}", UPLOADS_URL_PREFIX, subdir, filename),
            path,
        })
    }

    /// Remove a stored file by its absolute path. Returns false when the
    /// file was already gone, so deletes are idempotent.
    pub async fn delete(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Map a public `/uploads/...` URL back to the on-disk path
    pub fn resolve_url(&self, url: &str) -> Option<PathBuf> {
        let rel = url.strip_prefix(UPLOADS_URL_PREFIX)?.trim_start_matches('/');
        let rel = sanitize_segments(rel).ok()?;
        Some(self.root.join(rel))
    }
}

/// Reject empty names and anything that could escape the uploads root
fn sanitize_filename(name: &str) -> Result<String> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(AppError::BadRequest(format!("Invalid file name: {name:?}")));
    }
    Ok(name.to_string())
}

fn sanitize_segments(path: &str) -> Result<String> {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(sanitize_filename)
        .collect::<Result<_>>()?;

    if segments.is_empty() {
        return Err(AppError::BadRequest("Empty storage path".to_string()));
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageConfig;
    use uuid::Uuid;

    fn temp_config() -> StorageConfig {
        StorageConfig {
            uploads_dir: std::env::temp_dir().join(format!("storyai-test-{}", Uuid::new_v4())),
            max_file_size: 1024,
            max_files_per_upload: 10,
        }
    }

    #[tokio::test]
    async fn test_save_resolve_and_delete_roundtrip() {
        let config = temp_config();
        let store = LocalStore::new(&config).await.unwrap();

        let stored = store.save("user-1", "clip.mp4", b"hello").await.unwrap();
        assert_eq!(stored.url, "/uploads/user-1/clip.mp4");
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"hello");

        let resolved = store.resolve_url(&stored.url).unwrap();
        assert_eq!(resolved, stored.path);

        assert!(store.delete(&stored.path).await.unwrap());
        // Second delete is a no-op
        assert!(!store.delete(&stored.path).await.unwrap());

        tokio::fs::remove_dir_all(&config.uploads_dir).await.ok();
    }

    #[tokio::test]
    async fn test_save_rejects_path_traversal() {
        let config = temp_config();
        let store = LocalStore::new(&config).await.unwrap();

        assert!(store.save("user-1", "../evil.sh", b"x").await.is_err());
        assert!(store.save("../user-1", "ok.txt", b"x").await.is_err());

        tokio::fs::remove_dir_all(&config.uploads_dir).await.ok();
    }

    #[tokio::test]
    async fn test_resolve_url_rejects_foreign_prefix() {
        let config = temp_config();
        let store = LocalStore::new(&config).await.unwrap();

        assert!(store.resolve_url("/other/user-1/clip.mp4").is_none());
        assert!(store.resolve_url("/uploads/../etc/passwd").is_none());

        tokio::fs::remove_dir_all(&config.uploads_dir).await.ok();
    }
}
