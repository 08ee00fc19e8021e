use super::Source;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// File on the local filesystem.
pub struct LocalSource {
    path: PathBuf,
    location: String,
}

impl LocalSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl Source for LocalSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.location))?;
        tracing::debug!(path = %self.location, bytes = data.len(), "read local input");
        Ok(data)
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.location.clone())
    }

    fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ep1.mp3");
        std::fs::write(&path, b"\xFF\xFB\x90\x00").unwrap();

        let source = LocalSource::new(&path);
        assert_eq!(source.file_name(), "ep1.mp3");
        assert_eq!(source.read_all().await.unwrap(), b"\xFF\xFB\x90\x00");
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let source = LocalSource::new("does/not/exist.mp3");
        let err = source.read_all().await.unwrap_err();
        assert!(err.to_string().contains("does/not/exist.mp3"));
    }
}
