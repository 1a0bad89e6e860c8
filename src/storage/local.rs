use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWriteExt};

use super::{BlobReader, BlobStore};
use crate::error::{IndexError, Result};

/// Blob store on the local filesystem, rooted at the upload directory / 本地文件存储
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get root directory / 获取根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalize a storage name to prevent directory traversal / 规范化路径
    fn normalize_name(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim_start_matches('/').replace('\\', "/");

        let normalized: Vec<&str> = name.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
        if normalized.is_empty() {
            return Err(IndexError::StorageIo(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty storage file name",
            )));
        }
        if normalized.iter().any(|component| *component == "..") {
            return Err(IndexError::StorageIo(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Access path exceeds root directory scope",
            )));
        }

        Ok(self.root.join(normalized.join("/")))
    }

    /// Map a blob path back under the root / 将文件路径映射回根目录
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path)
            .strip_prefix(&self.root)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| path.to_string());
        self.normalize_name(&relative)
    }
}

fn not_found_or_io(path: &str, e: io::Error) -> IndexError {
    if e.kind() == io::ErrorKind::NotFound {
        IndexError::NotFound(path.to_string())
    } else {
        IndexError::StorageIo(e)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, name: &str, reader: &mut (dyn AsyncRead + Unpin + Send)) -> Result<String> {
        let full_path = self.normalize_name(name)?;

        let target = full_path.clone();
        let file = tokio::task::spawn_blocking(move || {
            // Ensure parent directory exists / 确保父目录存在
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(&target)
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        let mut file = tokio::fs::File::from_std(file);
        let written = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;

        tracing::debug!("Stored blob {:?} ({} bytes)", full_path, written);
        Ok(full_path.to_string_lossy().to_string())
    }

    async fn open(&self, path: &str) -> Result<BlobReader> {
        let full_path = self.resolve(path)?;
        let file = tokio::fs::File::open(&full_path)
            .await
            .map_err(|e| not_found_or_io(path, e))?;
        Ok(Box::new(file))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        tokio::fs::remove_file(&full_path)
            .await
            .map_err(|e| not_found_or_io(path, e))
    }
}
