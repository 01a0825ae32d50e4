use async_trait::async_trait;
use service_core::error::AppError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Where uploaded proof-of-transfer files live.
#[async_trait]
pub trait EvidenceStorage: Send + Sync {
    /// Store a new file. Never replaces an existing one.
    async fn save(&self, filename: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn delete(&self, filename: &str) -> Result<(), AppError>;
}

/// Flat directory on the local filesystem, also served under `/uploads`.
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, AppError> {
        // Names come from `stored_filename`; refuse anything that could escape the directory.
        if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid upload name: {}",
                filename
            )));
        }
        Ok(self.base_path.join(filename))
    }
}

#[async_trait]
impl EvidenceStorage for LocalStorage {
    async fn save(&self, filename: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.path_for(filename)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => AppError::Conflict(anyhow::anyhow!(
                    "Upload {} already exists, retry the upload",
                    filename
                )),
                _ => AppError::from(e),
            })?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn delete(&self, filename: &str) -> Result<(), AppError> {
        let path = self.path_for(filename)?;
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }
}
