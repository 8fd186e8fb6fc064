use std::path::{Path, PathBuf};

use bytes::Bytes;
use rand::Rng;
use tokio::fs;

use crate::error::{Error, Result};

/// Logical buckets of the document store. Each maps to a directory under
/// the uploads root, served read-only at `/uploads`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Resumes,
    Documents,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resumes => "resumes",
            Self::Documents => "documents",
        }
    }
}

/// Result of a successful store: the publicly resolvable URL plus the
/// original filename, kept for display.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub url: String,
    pub filename: String,
}

#[derive(Clone)]
pub struct UploadService {
    root: PathBuf,
    public_base_url: String,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Writes the blob under a collision-resistant name
    /// (`{millis}-{suffix}.{ext}`). Any storage failure comes back as a
    /// retryable upload error, never as an empty result.
    pub async fn store(
        &self,
        bucket: Bucket,
        original_filename: &str,
        data: &Bytes,
    ) -> Result<StoredFile> {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let suffix: u32 = rand::thread_rng().gen();
        let stored_name = format!(
            "{}-{:08x}.{}",
            chrono::Utc::now().timestamp_millis(),
            suffix,
            ext
        );

        let dir = self.root.join(bucket.as_str());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Upload(format!("Failed to create upload dir: {}", e)))?;

        let path = dir.join(&stored_name);
        fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write {} to {:?}: {}", original_filename, path, e);
            Error::Upload(format!("Failed to store file: {}", e))
        })?;

        Ok(StoredFile {
            url: format!(
                "{}/uploads/{}/{}",
                self.public_base_url,
                bucket.as_str(),
                stored_name
            ),
            filename: original_filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_blob_and_returns_public_url() {
        let dir = std::env::temp_dir().join(format!("intake-uploads-{}", uuid::Uuid::new_v4()));
        let service = UploadService::new(&dir, "https://example.org");

        let stored = tokio_test::block_on(service.store(
            Bucket::Resumes,
            "resume.pdf",
            &Bytes::from_static(b"%PDF-1.4 test"),
        ))
        .expect("store should succeed");

        assert_eq!(stored.filename, "resume.pdf");
        assert!(stored.url.starts_with("https://example.org/uploads/resumes/"));
        assert!(stored.url.ends_with(".pdf"));

        let name = stored.url.rsplit('/').next().unwrap();
        let on_disk = dir.join("resumes").join(name);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"%PDF-1.4 test");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_extension_falls_back_to_bin() {
        let dir = std::env::temp_dir().join(format!("intake-uploads-{}", uuid::Uuid::new_v4()));
        let service = UploadService::new(&dir, "https://example.org");

        let stored = tokio_test::block_on(service.store(
            Bucket::Documents,
            "certificate",
            &Bytes::from_static(b"data"),
        ))
        .expect("store should succeed");

        assert!(stored.url.ends_with(".bin"));
        std::fs::remove_dir_all(dir).ok();
    }
}
