use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for staged-upload byte storage
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn upload_file(&self, key: &str, data: Vec<u8>) -> Result<()>;
    async fn get_file(&self, key: &str) -> Result<Vec<u8>>;
    async fn delete_file(&self, key: &str) -> Result<()>;
    async fn file_exists(&self, key: &str) -> Result<bool>;
}

/// Local-disk storage rooted at a staging directory. Keys are flat file
/// names generated by the upload path, never caller-controlled paths.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let name = Path::new(key)
            .file_name()
            .context("storage key has no file name component")?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn upload_file(&self, key: &str, data: Vec<u8>) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating staging dir {}", self.root.display()))?;
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("writing staged file {}", path.display()))?;
        Ok(())
    }

    async fn get_file(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading staged file {}", path.display()))
    }

    async fn delete_file(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("deleting staged file {}", path.display()))?;
        Ok(())
    }

    async fn file_exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path());

        storage.upload_file("doc_1.pdf", b"%PDF-1.7".to_vec()).await.unwrap();
        assert!(storage.file_exists("doc_1.pdf").await.unwrap());
        assert_eq!(storage.get_file("doc_1.pdf").await.unwrap(), b"%PDF-1.7");

        storage.delete_file("doc_1.pdf").await.unwrap();
        assert!(!storage.file_exists("doc_1.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_flattened_to_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path());

        storage
            .upload_file("../escape.pdf", b"data".to_vec())
            .await
            .unwrap();
        assert!(storage.file_exists("escape.pdf").await.unwrap());
        assert!(!dir.path().parent().unwrap().join("escape.pdf").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path());
        assert!(storage.get_file("ghost.pdf").await.is_err());
        assert!(!storage.file_exists("ghost.pdf").await.unwrap());
    }
}
