//! Avatar file storage.
//!
//! Uploads land in a temp directory first and are only moved next to the
//! permanent avatars when the owning customer record is actually saved, so
//! an abandoned form never publishes a file.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::services::{ServiceError, ServiceResult};

const TEMP_URL_PREFIX: &str = "/uploads/temp";
const AVATAR_URL_PREFIX: &str = "/uploads/avatars";

/// Filesystem store rooted at the configured upload directory.
#[derive(Clone, Debug)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    fn avatars_dir(&self) -> PathBuf {
        self.root.join("avatars")
    }

    /// Stages an uploaded avatar under a fresh unique name preserving the
    /// original extension and returns its relative URL.
    pub fn store_temp_avatar(&self, source: &Path, original_name: &str) -> ServiceResult<String> {
        let size = fs::metadata(source).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(ServiceError::validation("file", "File is missing or empty"));
        }

        let file_name = match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        let temp_dir = self.temp_dir();
        fs::create_dir_all(&temp_dir)?;
        fs::copy(source, temp_dir.join(&file_name))?;

        Ok(format!("{TEMP_URL_PREFIX}/{file_name}"))
    }

    /// Moves a staged avatar to the permanent location, overwriting any
    /// same-named file already there. Returns `None` when no temp URL was
    /// supplied; otherwise the permanent URL is returned even if the temp
    /// file no longer exists on disk.
    pub fn commit_temp_avatar(&self, temp_url: Option<&str>) -> ServiceResult<Option<String>> {
        let Some(temp_url) = temp_url.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let Some(file_name) = Path::new(temp_url).file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };

        let temp_path = self.temp_dir().join(file_name);
        let avatars_dir = self.avatars_dir();
        fs::create_dir_all(&avatars_dir)?;
        let final_path = avatars_dir.join(file_name);

        if temp_path.exists() {
            if final_path.exists() {
                fs::remove_file(&final_path)?;
            }
            fs::rename(&temp_path, &final_path)?;
        }

        Ok(Some(format!("{AVATAR_URL_PREFIX}/{file_name}")))
    }

    /// Resolves a relative upload URL back to a path under the store root.
    pub fn resolve(&self, url: &str) -> PathBuf {
        let relative = url.trim_start_matches("/uploads/").trim_start_matches('/');
        self.root.join(relative)
    }

    /// Reads the file behind an upload URL; `None` when it is gone.
    pub fn read(&self, url: &str) -> ServiceResult<Option<Vec<u8>>> {
        let path = self.resolve(url);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(path)?))
    }

    /// Content type derived from the file extension, `image/png` style.
    pub fn mime_for(url: &str) -> String {
        match Path::new(url).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("image/{}", ext.to_ascii_lowercase()),
            None => "application/octet-stream".to_string(),
        }
    }
}
