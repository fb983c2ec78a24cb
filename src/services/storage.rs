//! Cover image storage on the local filesystem

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{
    config::UploadsConfig,
    error::{AppError, AppResult},
};

const COVERS_DIR: &str = "covers";

/// File received from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct CoverStorage {
    root: PathBuf,
    url_prefix: String,
    allowed_extensions: Vec<String>,
}

impl CoverStorage {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            root: PathBuf::from(&config.directory),
            url_prefix: config.url_prefix.trim_end_matches('/').to_string(),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    fn covers_dir(&self) -> PathBuf {
        self.root.join(COVERS_DIR)
    }

    /// Lowercased extension of `file_name` if it is on the allow-list
    pub fn validate_extension(&self, file_name: &str) -> AppResult<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if ext.is_empty() || !self.allowed_extensions.contains(&ext) {
            return Err(AppError::Validation(format!(
                "Unsupported file type. Allowed: {}",
                self.allowed_extensions.join(", ")
            )));
        }
        Ok(ext)
    }

    /// Save a cover and return its public URL
    pub async fn save(&self, file: &UploadedFile) -> AppResult<String> {
        let ext = self.validate_extension(&file.file_name)?;
        if file.data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        let dir = self.covers_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let name = generate_name(&ext, Utc::now());
        tokio::fs::write(dir.join(&name), &file.data).await?;

        tracing::debug!(file = %name, size = file.data.len(), "Cover saved");
        Ok(format!("{}/{}/{}", self.url_prefix, COVERS_DIR, name))
    }

    /// Remove the file behind a cover URL. Failures are logged, never returned.
    pub async fn delete(&self, url: &str) {
        let Some(path) = self.path_for(url) else {
            tracing::warn!(url, "Refusing to delete cover outside the covers directory");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Cover deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), "Failed to delete cover: {}", e),
        }
    }

    /// Local path for a URL this storage produced; `None` for anything else
    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let prefix = format!("{}/{}/", self.url_prefix, COVERS_DIR);
        let name = url.strip_prefix(&prefix)?;
        let is_plain_name = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        is_plain_name.then(|| self.covers_dir().join(name))
    }
}

/// `book_<YYYYmmdd_HHMMSS>_<8 hex>.<ext>`
pub fn generate_name(ext: &str, now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("book_{}_{}.{}", now.format("%Y%m%d_%H%M%S"), &suffix[..8], ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn storage(root: &Path) -> CoverStorage {
        CoverStorage::new(&UploadsConfig {
            directory: root.to_string_lossy().to_string(),
            ..UploadsConfig::default()
        })
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("bookshelf-test-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_extension_allow_list() {
        let s = storage(Path::new("unused"));
        assert_eq!(s.validate_extension("cover.PNG").unwrap(), "png");
        assert_eq!(s.validate_extension("a.b.jpeg").unwrap(), "jpeg");
        assert!(s.validate_extension("cover.exe").is_err());
        assert!(s.validate_extension("cover").is_err());
        assert!(s.validate_extension(".png").is_err());
    }

    #[test]
    fn test_generated_name_format() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let name = generate_name("png", now);
        assert!(name.starts_with("book_20260102_030405_"));
        assert!(name.ends_with(".png"));
        let hex = &name["book_20260102_030405_".len()..name.len() - 4];
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let s = storage(Path::new("uploads"));
        assert!(s.path_for("/uploads/covers/book_1.png").is_some());
        assert!(s.path_for("/uploads/covers/../secret").is_none());
        assert!(s.path_for("/uploads/covers/..").is_none());
        assert!(s.path_for("/elsewhere/covers/book_1.png").is_none());
        assert!(s.path_for("/uploads/covers/").is_none());
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let root = temp_root();
        let s = storage(&root);
        let url = s
            .save(&UploadedFile {
                file_name: "cover.jpg".to_string(),
                data: vec![0xff, 0xd8, 0xff],
            })
            .await
            .unwrap();
        assert!(url.starts_with("/uploads/covers/book_"));

        let path = s.path_for(&url).unwrap();
        assert!(path.exists());

        s.delete(&url).await;
        assert!(!path.exists());
        // second delete is a no-op
        s.delete(&url).await;

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_file() {
        let s = storage(&temp_root());
        let result = s
            .save(&UploadedFile {
                file_name: "cover.png".to_string(),
                data: Vec::new(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
