use super::{join_url, validate_path, ImageStore, StorageError};
use async_trait::async_trait;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Files on the local public disk, served by the HTTP layer under `public_url`.
pub struct LocalStore {
    root: PathBuf,
    public_url: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(validate_path(path)?))
    }
}

#[async_trait]
impl ImageStore for LocalStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        debug!("Stored {}", target.display());
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.resolve(path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn files(&self, directory: &str) -> Result<Vec<String>, StorageError> {
        let directory = validate_path(directory)?;
        let mut entries = match tokio::fs::read_dir(self.root.join(directory)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            files.push(format!("{}/{}", directory, name));
        }
        files.sort();
        Ok(files)
    }

    async fn delete_directory(&self, directory: &str) -> Result<(), StorageError> {
        let target = self.resolve(directory)?;
        match tokio::fs::remove_dir_all(&target).await {
            Ok(()) => {
                info!("Deleted directory {}", target.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.public_url, path)
    }
}
