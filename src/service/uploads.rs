use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::config::Settings;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("invalid upload name {0:?}")]
    InvalidName(String),

    #[error("upload io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns the upload directory and the size limit from `Settings`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: u64,
}

impl UploadStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.upload_directory.clone(),
            max_bytes: settings.max_upload_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Maps a client-supplied name to a path inside the upload directory.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, UploadError> {
        let relative =
            sanitize_name(name).ok_or_else(|| UploadError::InvalidName(name.to_string()))?;
        Ok(self.root.join(relative))
    }

    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        self.check_size(bytes.len() as u64)?;
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "upload stored");
        Ok(path)
    }
}

/// Returns `None` for empty names and names that climb out with `..`.
fn sanitize_name(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim_start_matches('/');
    let path = Path::new(trimmed);

    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(limit: u64) -> UploadStore {
        let mut settings = Settings::defaults(Path::new("/srv/avk"));
        settings.max_upload_bytes = limit;
        UploadStore::new(&settings)
    }

    #[test]
    fn takes_directory_and_limit_from_settings() {
        let store = store(1024);
        assert_eq!(store.root(), Path::new("/srv/avk/uploads"));
        assert_eq!(store.max_bytes(), 1024);
    }

    #[test]
    fn size_at_limit_is_accepted() {
        let store = store(10);
        assert!(store.check_size(10).is_ok());
        assert!(matches!(
            store.check_size(11),
            Err(UploadError::TooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn resolve_strips_leading_slashes() {
        let store = store(10);
        assert_eq!(
            store.resolve("/marriage/photos/a.jpg").unwrap(),
            PathBuf::from("/srv/avk/uploads/marriage/photos/a.jpg")
        );
        assert_eq!(
            store.resolve("./a.jpg").unwrap(),
            PathBuf::from("/srv/avk/uploads/a.jpg")
        );
    }

    #[test]
    fn resolve_rejects_escapes_and_empty_names() {
        let store = store(10);
        for name in ["../etc/passwd", "a/../../b", "", "/", "."] {
            assert!(
                matches!(store.resolve(name), Err(UploadError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }
}
