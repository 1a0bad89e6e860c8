use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;

pub mod local;

pub use local::LocalBlobStore;

/// Boxed blob reader / 文件读取器
pub type BlobReader = Box<dyn AsyncRead + Unpin + Send + Sync>;

/// Blob store interface (primitive operations only) / 文件存储接口
///
/// Paths returned by `store` are the identity of a blob for the rest of its
/// life: they are written into index records and handed back to `open` and
/// `remove` unchanged.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write the whole stream under `name`, overwriting any previous blob
    /// with that name. Returns the blob path.
    async fn store(&self, name: &str, reader: &mut (dyn AsyncRead + Unpin + Send)) -> Result<String>;

    /// Open a blob for reading; `NotFound` once it is gone / 打开文件
    async fn open(&self, path: &str) -> Result<BlobReader>;

    /// Delete a blob / 删除文件
    async fn remove(&self, path: &str) -> Result<()>;

    /// Read a blob fully into memory / 读取完整文件
    async fn read_all(&self, path: &str) -> Result<bytes::Bytes> {
        let mut reader = self.open(path).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(bytes::Bytes::from(buf))
    }
}
